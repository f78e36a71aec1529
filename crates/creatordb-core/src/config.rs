use crate::app_config::{AppConfig, Environment, SourceKind};
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
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("CREATORDB_ENV", "development"))?;
    let source = parse_source(&or_default("CREATORDB_SOURCE", "fixture"))?;

    let database_url = lookup("DATABASE_URL").ok().filter(|s| !s.trim().is_empty());
    if source == SourceKind::Postgres && database_url.is_none() {
        return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    }

    let bind_addr = parse_addr("CREATORDB_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CREATORDB_LOG_LEVEL", "info");
    let fixture_path = PathBuf::from(or_default(
        "CREATORDB_FIXTURE_PATH",
        "./config/creators.yaml",
    ));

    let db_max_connections = parse_u32("CREATORDB_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("CREATORDB_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("CREATORDB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let rate_limit_max_requests = parse_usize("CREATORDB_RATE_LIMIT_MAX_REQUESTS", "120")?;
    let rate_limit_window_secs = parse_u64("CREATORDB_RATE_LIMIT_WINDOW_SECS", "60")?;
    if rate_limit_window_secs == 0 {
        return Err(invalid(
            "CREATORDB_RATE_LIMIT_WINDOW_SECS",
            "window must be at least one second".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        source,
        fixture_path,
        database_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CREATORDB_ENV".to_string(),
            reason: format!(
                "unknown environment '{other}'; expected development, test, or production"
            ),
        }),
    }
}

fn parse_source(s: &str) -> Result<SourceKind, ConfigError> {
    match s {
        "fixture" => Ok(SourceKind::Fixture),
        "postgres" => Ok(SourceKind::Postgres),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CREATORDB_SOURCE".to_string(),
            reason: format!("unknown source '{other}'; expected fixture or postgres"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
