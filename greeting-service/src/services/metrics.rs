//! Metrics collection and Prometheus export.
//!
//! Installs the global recorder and renders the /metrics payload.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::{Mutex, OnceLock};

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Install the Prometheus recorder. Subsequent calls, including concurrent
/// ones, are no-ops.
pub fn init_metrics() -> Result<(), AppError> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))
    })?;

    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record one flow invocation.
pub fn record_flow_invocation(flow: &'static str, outcome: &'static str) {
    counter!("flow_invocations_total", "flow" => flow, "outcome" => outcome).increment(1);
}
