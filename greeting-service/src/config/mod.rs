use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default request body ceiling for flow routes.
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone)]
pub struct GreetingConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    /// OTLP collector; spans are only exported when set.
    pub otlp_endpoint: Option<String>,
    pub serve_mode: ServeMode,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

/// Whether the process binds its own listener or leaves serving to an
/// external harness that embeds the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeMode {
    Listen,
    Deferred,
}

impl GreetingConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let serve_mode: ServeMode = get_env("SERVE_MODE", Some("listen"))?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        if environment == Environment::Prod && serve_mode == ServeMode::Deferred {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "SERVE_MODE=deferred is only allowed in dev"
            )));
        }

        let default_limit = DEFAULT_MAX_BODY_BYTES.to_string();
        let max_body_bytes = get_env("MAX_BODY_BYTES", Some(&default_limit))?
            .parse::<usize>()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid MAX_BODY_BYTES: {}", e))
            })?;

        Ok(GreetingConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("greeting-service"))?,
            log_level: get_env("LOG_LEVEL", Some("info"))?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            serve_mode,
            max_body_bytes,
        })
    }

    /// Configuration for in-process tests: random port, no export.
    pub fn for_tests() -> Self {
        GreetingConfig {
            common: core_config::Config { port: 0 },
            environment: Environment::Dev,
            service_name: "greeting-service".to_string(),
            log_level: "debug".to_string(),
            otlp_endpoint: None,
            serve_mode: ServeMode::Listen,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::str::FromStr for ServeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "listen" => Ok(ServeMode::Listen),
            "deferred" => Ok(ServeMode::Deferred),
            _ => Err(format!("Invalid serve mode: {}", s)),
        }
    }
}
