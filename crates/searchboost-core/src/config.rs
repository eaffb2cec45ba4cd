use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
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

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
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

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => match raw.as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                other => Err(ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: format!("expected a boolean, got \"{other}\""),
                }),
            },
        }
    };

    let shop_domain = require("SHOPIFY_SHOP_DOMAIN")?;
    let shopify_access_token = require("SHOPIFY_ACCESS_TOKEN")?;

    let env = parse_environment(&or_default("SEARCHBOOST_ENV", "development"));
    let bind_addr = parse_addr("SEARCHBOOST_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SEARCHBOOST_LOG_LEVEL", "info");

    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2024-01");
    let shopify_timeout_secs = parse_u64("SEARCHBOOST_SHOPIFY_TIMEOUT_SECS", "30")?;
    let shopify_max_retries = parse_u32("SEARCHBOOST_SHOPIFY_MAX_RETRIES", "3")?;
    let shopify_backoff_base_ms = parse_u64("SEARCHBOOST_SHOPIFY_BACKOFF_BASE_MS", "1000")?;

    let openai_api_key = lookup("OPENAI_API_KEY").ok();
    let anthropic_api_key = lookup("ANTHROPIC_API_KEY").ok();
    let openai_model = or_default("SEARCHBOOST_OPENAI_MODEL", "gpt-4o-mini");
    let anthropic_model = or_default("SEARCHBOOST_ANTHROPIC_MODEL", "claude-3-haiku-20240307");
    let llm_timeout_secs = parse_u64("SEARCHBOOST_LLM_TIMEOUT_SECS", "45")?;
    let mock_optimizer = parse_bool("SEARCHBOOST_MOCK_OPTIMIZER", false)?;

    let audit_log_path = PathBuf::from(or_default("SEARCHBOOST_AUDIT_LOG_PATH", "./audit.jsonl"));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        shop_domain,
        shopify_access_token,
        shopify_api_version,
        shopify_timeout_secs,
        shopify_max_retries,
        shopify_backoff_base_ms,
        openai_api_key,
        anthropic_api_key,
        openai_model,
        anthropic_model,
        llm_timeout_secs,
        mock_optimizer,
        audit_log_path,
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
