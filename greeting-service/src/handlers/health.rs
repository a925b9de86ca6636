/// Liveness check. Independent of every flow.
pub async fn health_check() -> &'static str {
    "OK"
}
