//! Application startup and lifecycle management.
//!
//! Router-wide layers only look at headers. Body handling is attached per
//! flow route, so the flow handler stays the single reader of each body.

use crate::config::GreetingConfig;
use crate::flows::{Flow, HelloFlow};
use crate::handlers::{health_check, metrics_endpoint, not_found, run_flow};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{make_request_span, metrics_middleware, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Mount a flow at `/{name}` with its own body limit.
pub fn flow_router<F: Flow>(flow: F, max_body_bytes: usize) -> Router {
    let descriptor = flow.descriptor();
    let path = descriptor.route_path();

    tracing::info!(
        flow = descriptor.name,
        path = %path,
        input_schema = %descriptor.input_schema,
        output_schema = %descriptor.output_schema,
        "Registered flow"
    );

    Router::new()
        .route(&path, post(run_flow::<F>))
        .route_layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(Arc::new(flow))
}

/// Full HTTP surface of the service. External harnesses embed this directly.
pub fn build_router(config: &GreetingConfig) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .merge(flow_router(HelloFlow::new(), config.max_body_bytes))
        .fallback(not_found)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Bind the listener and assemble the router.
    pub async fn build(config: GreetingConfig) -> Result<Self, AppError> {
        let router = build_router(&config);

        // Port 0 picks a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            service = %config.service_name,
            environment = ?config.environment,
            port,
            "Greeting service listening"
        );

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })?;

        tracing::info!("Service shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
