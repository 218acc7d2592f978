//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The connection string can either be
//! given whole as `DATABASE_URL` or composed from the same discrete
//! variables the database container itself is initialized with, so the
//! two sides of the connection can never disagree.

use std::net::SocketAddr;
use std::time::Duration;

use crate::readiness::ProbePolicy;

/// Top-level service configuration.
///
/// Loaded once at startup via [`CourierConfig::from_env`].
#[derive(Debug, Clone)]
pub struct CourierConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Seconds between readiness probe attempts.
    pub db_ready_interval_secs: u64,

    /// Timeout in seconds for a single readiness probe attempt.
    pub db_ready_timeout_secs: u64,

    /// Grace period in seconds before probe failures count.
    pub db_ready_start_period_secs: u64,

    /// Consecutive counted failures before the database is declared
    /// unhealthy.
    pub db_ready_retries: u32,
}

impl CourierConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()?;

        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            let user = std::env::var("POSTGRES_USER").unwrap_or_else(|_| "courier".to_string());
            let password =
                std::env::var("POSTGRES_PASSWORD").unwrap_or_else(|_| "courier".to_string());
            let db = std::env::var("POSTGRES_DB").unwrap_or_else(|_| "courier".to_string());
            let host = std::env::var("DATABASE_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = std::env::var("DATABASE_PORT").unwrap_or_else(|_| "5432".to_string());
            compose_database_url(&user, &password, &host, &port, &db)
        });

        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10);
        let database_min_connections = parse_env("DATABASE_MIN_CONNECTIONS", 2);
        let database_connect_timeout_secs = parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5);

        let db_ready_interval_secs = parse_env("DB_READY_INTERVAL_SECS", 5);
        let db_ready_timeout_secs = parse_env("DB_READY_TIMEOUT_SECS", 5);
        let db_ready_start_period_secs = parse_env("DB_READY_START_PERIOD_SECS", 10);
        let db_ready_retries = parse_env("DB_READY_RETRIES", 5);

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections,
            database_min_connections,
            database_connect_timeout_secs,
            db_ready_interval_secs,
            db_ready_timeout_secs,
            db_ready_start_period_secs,
            db_ready_retries,
        })
    }

    /// Returns the readiness probe schedule derived from this config.
    #[must_use]
    pub fn probe_policy(&self) -> ProbePolicy {
        ProbePolicy {
            interval: Duration::from_secs(self.db_ready_interval_secs),
            attempt_timeout: Duration::from_secs(self.db_ready_timeout_secs),
            start_period: Duration::from_secs(self.db_ready_start_period_secs),
            retries: self.db_ready_retries,
        }
    }
}

/// Builds a PostgreSQL connection string from its discrete parts.
#[must_use]
pub fn compose_database_url(
    user: &str,
    password: &str,
    host: &str,
    port: &str,
    database: &str,
) -> String {
    format!("postgres://{user}:{password}@{host}:{port}/{database}")
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn compose_url_matches_discrete_parts() {
        let url = compose_database_url("appuser", "apppassword", "db", "5432", "appdb");
        assert_eq!(url, "postgres://appuser:apppassword@db:5432/appdb");
    }

    #[test]
    fn parse_env_falls_back_on_missing() {
        let value: u64 = parse_env("COURIER_TEST_UNSET_KEY", 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn probe_policy_uses_configured_schedule() {
        let Ok(listen_addr) = "127.0.0.1:8000".parse() else {
            panic!("valid socket address");
        };
        let config = CourierConfig {
            listen_addr,
            database_url: String::new(),
            database_max_connections: 10,
            database_min_connections: 2,
            database_connect_timeout_secs: 5,
            db_ready_interval_secs: 5,
            db_ready_timeout_secs: 5,
            db_ready_start_period_secs: 10,
            db_ready_retries: 5,
        };
        let policy = config.probe_policy();
        assert_eq!(policy.interval, Duration::from_secs(5));
        assert_eq!(policy.attempt_timeout, Duration::from_secs(5));
        assert_eq!(policy.start_period, Duration::from_secs(10));
        assert_eq!(policy.retries, 5);
    }
}
