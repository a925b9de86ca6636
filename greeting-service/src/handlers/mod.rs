//! HTTP handlers for the greeting service.

pub mod flow;
pub mod health;
pub mod metrics;

use service_core::error::AppError;

pub use flow::run_flow;
pub use health::health_check;
pub use self::metrics::metrics_endpoint;

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("No such route"))
}
