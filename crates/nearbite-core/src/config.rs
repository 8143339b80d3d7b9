use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Reads `NEARBITE_*` settings, after merging a `.env` file from the working
/// directory when one exists.
///
/// # Errors
///
/// [`ConfigError::MissingEnvVar`] when production runs without an API base
/// URL, [`ConfigError::InvalidEnvVar`] when a value does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] but only sees the process environment; no
/// `.env` file is read.
///
/// # Errors
///
/// See [`load_app_config`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Assembles an [`AppConfig`] from `lookup`, which stands in for
/// `std::env::var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_radius = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let km = raw.parse::<f64>().map_err(|e| invalid(var, e.to_string()))?;
        if !km.is_finite() || km < 0.0 {
            return Err(invalid(
                var,
                format!("radius must be a finite, non-negative number of km, got {raw}"),
            ));
        }
        Ok(km)
    };

    let env = parse_environment(&or_default("NEARBITE_ENV", "development"))?;

    let api_base_url = match lookup("NEARBITE_API_BASE_URL") {
        Ok(url) => url,
        Err(_) if env == Environment::Production => {
            return Err(ConfigError::MissingEnvVar("NEARBITE_API_BASE_URL".to_string()));
        }
        Err(_) => DEFAULT_API_BASE_URL.to_string(),
    };

    let log_level = or_default("NEARBITE_LOG_LEVEL", "info");
    let http_timeout_secs = parse_u64("NEARBITE_HTTP_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("NEARBITE_USER_AGENT", "nearbite/0.1 (restaurant-discovery)");

    let search_radius_km = parse_radius("NEARBITE_SEARCH_RADIUS_KM", "10")?;
    let category_radius_km = parse_radius("NEARBITE_CATEGORY_RADIUS_KM", "15")?;

    let status_batch_size = parse_usize("NEARBITE_STATUS_BATCH_SIZE", "3")?;
    if status_batch_size == 0 {
        return Err(invalid(
            "NEARBITE_STATUS_BATCH_SIZE",
            "batch size must be at least 1".to_string(),
        ));
    }
    let status_batch_delay_ms = parse_u64("NEARBITE_STATUS_BATCH_DELAY_MS", "100")?;
    let status_refresh_secs = parse_u64("NEARBITE_STATUS_REFRESH_SECS", "300")?;
    let feed_refresh_secs = parse_u64("NEARBITE_FEED_REFRESH_SECS", "30")?;

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        http_timeout_secs,
        user_agent,
        search_radius_km,
        category_radius_km,
        status_batch_size,
        status_batch_delay_ms,
        status_refresh_secs,
        feed_refresh_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEARBITE_ENV".to_string(),
            reason: format!("expected development, test, or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
