use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Layered load: optional `configuration` file, `APP__*` variables, then
    /// the bare `PORT` variable set by hosting platforms. An empty `PORT`
    /// counts as unset.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .set_override_option(
                "port",
                std::env::var("PORT").ok().filter(|p| !p.is_empty()),
            )?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn load_with(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        // SAFETY: ENV_LOCK serializes every test that touches the environment.
        unsafe {
            std::env::remove_var("PORT");
            std::env::remove_var("APP__PORT");
            for (key, value) in vars {
                std::env::set_var(key, value);
            }
        }

        let result = Config::load();

        unsafe {
            std::env::remove_var("PORT");
            std::env::remove_var("APP__PORT");
        }
        result
    }

    #[test]
    fn test_port_defaults_to_8080() {
        assert_eq!(load_with(&[]).unwrap().port, 8080);
    }

    #[test]
    fn test_empty_port_falls_back_to_default() {
        assert_eq!(load_with(&[("PORT", "")]).unwrap().port, 8080);
    }

    #[test]
    fn test_port_variable() {
        assert_eq!(load_with(&[("PORT", "9091")]).unwrap().port, 9091);
    }

    #[test]
    fn test_prefixed_port_variable() {
        assert_eq!(load_with(&[("APP__PORT", "7070")]).unwrap().port, 7070);
    }

    #[test]
    fn test_port_wins_over_prefixed_port() {
        let config = load_with(&[("APP__PORT", "7070"), ("PORT", "9091")]).unwrap();
        assert_eq!(config.port, 9091);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = load_with(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
