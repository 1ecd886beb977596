use crate::app_config::{AppConfig, RESOLVER_CYCLE_CEILING};
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
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let openai_api_key = require("OPENAI_API_KEY")?;
    let serp_api_key = require("SERP_API_KEY")?;
    let proxycurl_api_key = require("PROXYCURL_API_KEY")?;
    let rapidapi_key = require("X_RAPIDAPI_KEY")?;

    let log_level = or_default("ICEBREAKER_LOG_LEVEL", "info");
    let user_agent = or_default("ICEBREAKER_USER_AGENT", "icebreaker/0.1 (person-intel)");

    let openai_base_url = or_default("ICEBREAKER_OPENAI_BASE_URL", "https://api.openai.com/v1");
    let openai_model = or_default("ICEBREAKER_OPENAI_MODEL", "gpt-3.5-turbo");
    let serp_base_url = or_default("ICEBREAKER_SERP_BASE_URL", "https://serpapi.com");
    let proxycurl_base_url = or_default(
        "ICEBREAKER_PROXYCURL_BASE_URL",
        "https://nubela.co/proxycurl",
    );
    let rapidapi_host = or_default("X_RAPIDAPI_HOST", "twitter135.p.rapidapi.com");
    let twitter_base_url = or_default(
        "ICEBREAKER_TWITTER_BASE_URL",
        "https://twitter135.p.rapidapi.com",
    );

    let request_timeout_secs = parse_u64("ICEBREAKER_REQUEST_TIMEOUT_SECS", "30")?;
    let call_timeout_secs = parse_u64("ICEBREAKER_CALL_TIMEOUT_SECS", "60")?;
    if call_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ICEBREAKER_CALL_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let max_retries = parse_u32("ICEBREAKER_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("ICEBREAKER_RETRY_BACKOFF_BASE_MS", "500")?;

    let resolver_max_cycles = parse_u32("ICEBREAKER_RESOLVER_MAX_CYCLES", "5")?;
    if !(1..=RESOLVER_CYCLE_CEILING).contains(&resolver_max_cycles) {
        return Err(ConfigError::InvalidEnvVar {
            var: "ICEBREAKER_RESOLVER_MAX_CYCLES".to_string(),
            reason: format!("must be between 1 and {RESOLVER_CYCLE_CEILING}"),
        });
    }
    let activity_fetch_count = parse_u32("ICEBREAKER_ACTIVITY_FETCH_COUNT", "5")?;
    let schema_retry = parse_bool(
        "ICEBREAKER_SCHEMA_RETRY",
        &or_default("ICEBREAKER_SCHEMA_RETRY", "true"),
    )?;

    Ok(AppConfig {
        log_level,
        user_agent,
        openai_api_key,
        openai_base_url,
        openai_model,
        serp_api_key,
        serp_base_url,
        proxycurl_api_key,
        proxycurl_base_url,
        rapidapi_key,
        rapidapi_host,
        twitter_base_url,
        request_timeout_secs,
        call_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        resolver_max_cycles,
        activity_fetch_count,
        schema_retry,
    })
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no` (case-insensitive).
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
