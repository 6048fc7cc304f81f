//! Layered configuration loading.
//!
//! Sources, later ones overriding earlier ones:
//! 1. `{dir}/default.toml`
//! 2. `{dir}/{environment}.toml`
//! 3. `{dir}/local.toml`
//! 4. Environment variables such as `SIDESA__DATABASE__HOST`
//!
//! The environment name comes from `SIDESA__APP__ENVIRONMENT`, the same
//! variable that overrides `app.environment`, so both always agree.

use crate::validation::{format_validation_errors, ConfigValidator};
use crate::AppConfig;
use config::{Config, ConfigError, Environment, File, Map};
use sidesa_core::SidesaError;
use std::path::Path;
use tracing::{debug, info, warn};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SIDESA";

/// Separator between the prefix and each nested key.
pub const ENV_SEPARATOR: &str = "__";

/// Variable selecting the environment-specific file.
pub const ENVIRONMENT_VAR: &str = "SIDESA__APP__ENVIRONMENT";

/// Default directory holding the TOML files.
pub const DEFAULT_CONFIG_DIR: &str = "./config";

/// Loads and validates configuration from `config_dir` plus the process
/// environment (after reading `.env`, if present).
pub fn load_config(config_dir: &str) -> Result<AppConfig, SidesaError> {
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file found or error loading it: {}", e);
    }

    load_config_with_env(config_dir, std::env::vars().collect())
}

/// Loads and validates configuration with an explicit set of variables.
pub fn load_config_with_env(
    config_dir: &str,
    env: Map<String, String>,
) -> Result<AppConfig, SidesaError> {
    let environment = env
        .get(ENVIRONMENT_VAR)
        .cloned()
        .unwrap_or_else(|| "development".to_string());
    info!("Loading configuration for environment: {}", environment);

    let mut builder = Config::builder();

    for name in ["default", environment.as_str(), "local"] {
        let path = format!("{}/{}.toml", config_dir, name);
        if Path::new(&path).exists() {
            debug!("Loading config from: {}", path);
            builder = builder.add_source(File::with_name(&path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(Some(env)),
    );

    let app_config: AppConfig = builder
        .build()
        .and_then(Config::try_deserialize)
        .map_err(config_error_to_sidesa_error)?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validates a loaded configuration, reporting every problem at once.
pub fn validate_config(config: &AppConfig) -> Result<(), SidesaError> {
    if config.app.environment == "production"
        && config.database.password.is_empty()
        && config.database.url.is_none()
    {
        warn!("Database password is empty in production");
    }

    ConfigValidator::validate(config)
        .map_err(|errors| SidesaError::Configuration(format_validation_errors(&errors)))
}

fn config_error_to_sidesa_error(err: ConfigError) -> SidesaError {
    SidesaError::Configuration(err.to_string())
}
