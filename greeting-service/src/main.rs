use greeting_service::config::{GreetingConfig, ServeMode};
use greeting_service::services::init_metrics;
use greeting_service::startup::{build_router, Application};
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = GreetingConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        serve_mode = ?config.serve_mode,
        "Starting greeting service"
    );

    if config.serve_mode == ServeMode::Deferred {
        // Registration still runs so schema problems surface here.
        let _router = build_router(&config);
        tracing::info!("Serve mode is deferred; leaving the listener to the external harness");
        return Ok(());
    }

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    Ok(())
}
