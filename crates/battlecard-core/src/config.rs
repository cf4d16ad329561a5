use crate::app_config::{AppConfig, Environment};
use crate::{BrandContext, ConfigError};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let gemini_api_key = require("GEMINI_API_KEY")?;

    let env = parse_environment(&or_default("BATTLECARD_ENV", "development"));
    let bind_addr = parse_addr("BATTLECARD_BIND_ADDR", "127.0.0.1:3000")?;
    let log_level = or_default("BATTLECARD_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("BATTLECARD_DATA_DIR", "./data"));

    let gemini_base_url = or_default(
        "BATTLECARD_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let gemini_model = or_default("BATTLECARD_GEMINI_MODEL", "gemini-2.5-flash");
    let ai_timeout_secs = parse_u64("BATTLECARD_AI_TIMEOUT_SECS", "120")?;
    if ai_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BATTLECARD_AI_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let defaults = BrandContext::default();
    let brand = BrandContext {
        name: or_default("BATTLECARD_BRAND_NAME", &defaults.name),
        positioning: or_default("BATTLECARD_BRAND_POSITIONING", &defaults.positioning),
        usp: or_default("BATTLECARD_BRAND_USP", &defaults.usp),
        audience: or_default("BATTLECARD_BRAND_AUDIENCE", &defaults.audience),
        output_language: or_default("BATTLECARD_OUTPUT_LANGUAGE", &defaults.output_language),
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_dir,
        gemini_api_key,
        gemini_base_url,
        gemini_model,
        ai_timeout_secs,
        brand,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
