//! Configuration loading from disk and environment.
//!
//! The gateway boots from defaults or an optional TOML file, then applies
//! environment overrides: `PORT` for the listen port and
//! `{NAME}_SERVICE_URL` for each configured service.

use std::path::Path;
use std::fs;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env(String),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env(msg) => write!(f, "Environment error: {}", msg),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration.
///
/// With no path, starts from `GatewayConfig::default()`; environment
/// overrides are applied either way, then the result is validated.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = fs::read_to_string(p).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides through an injectable lookup so tests do
/// not have to mutate process-global state.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = env("PORT") {
        let port: u16 = port
            .parse()
            .map_err(|_| ConfigError::Env(format!("PORT '{}' is not a valid port", port)))?;
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }

    for svc in &mut config.services {
        let key = format!("{}_SERVICE_URL", svc.name.to_uppercase());
        if let Some(url) = env(&key) {
            svc.url = url;
        }
    }

    Ok(())
}
