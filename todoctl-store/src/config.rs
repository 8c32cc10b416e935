//! Store configuration
//!
//! Defaults, optionally replaced by a TOML file, optionally overridden by
//! environment variables (a `.env` file is honoured).
//!
//! ```toml
//! database_url = "postgres://todoctl@localhost/todoctl"
//! max_connections = 10
//! query_timeout_secs = 3
//! acquire_timeout_secs = 5
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/todoctl";

/// Deadline applied to every store call
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Kept low: each store call needs one connection for one statement.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_MAX_CONNECTIONS: &str = "TODOCTL_DB_MAX_CONNECTIONS";
pub const ENV_QUERY_TIMEOUT_SECS: &str = "TODOCTL_DB_QUERY_TIMEOUT_SECS";
pub const ENV_ACQUIRE_TIMEOUT_SECS: &str = "TODOCTL_DB_ACQUIRE_TIMEOUT_SECS";

/// Connection and deadline settings for the store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// PostgreSQL connection string
    pub database_url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Deadline for a single store call, in seconds
    pub query_timeout_secs: u64,
    /// How long to wait for a free pooled connection, in seconds
    pub acquire_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT.as_secs(),
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Load a TOML config file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read store config: {:?}", path))?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse store config (invalid TOML)")?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DATABASE_URL` and `TODOCTL_DB_*` variables on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self> {
        dotenvy::dotenv().ok();
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_from(&lookup, ENV_DATABASE_URL, &mut self.database_url)?;
        override_from(&lookup, ENV_MAX_CONNECTIONS, &mut self.max_connections)?;
        override_from(&lookup, ENV_QUERY_TIMEOUT_SECS, &mut self.query_timeout_secs)?;
        override_from(&lookup, ENV_ACQUIRE_TIMEOUT_SECS, &mut self.acquire_timeout_secs)?;

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.database_url.trim().is_empty(), "database_url must not be empty");
        ensure!(self.max_connections > 0, "max_connections must be at least 1");
        ensure!(self.query_timeout_secs > 0, "query_timeout_secs must be at least 1");
        ensure!(self.acquire_timeout_secs > 0, "acquire_timeout_secs must be at least 1");
        Ok(())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

fn override_from<F, T>(lookup: &F, key: &str, slot: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = lookup(key) {
        *slot = raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.query_timeout(), Duration::from_secs(3));
        assert_eq!(config.acquire_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = StoreConfig::from_toml_str(
            r#"
            database_url = "postgres://todoctl@db/todoctl"
            max_connections = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.database_url, "postgres://todoctl@db/todoctl");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.query_timeout_secs, 3);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = StoreConfig::from_toml_str("query_timeout = 3").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = StoreConfig::from_toml_str("query_timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("query_timeout_secs"));
    }

    #[test]
    fn overrides_apply_on_top() {
        let config = StoreConfig::default()
            .with_overrides(lookup(&[
                (ENV_DATABASE_URL, "postgres://other/todoctl"),
                (ENV_QUERY_TIMEOUT_SECS, " 10 "),
            ]))
            .unwrap();

        assert_eq!(config.database_url, "postgres://other/todoctl");
        assert_eq!(config.query_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn invalid_override_names_the_variable() {
        let err = StoreConfig::default()
            .with_overrides(lookup(&[(ENV_MAX_CONNECTIONS, "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_MAX_CONNECTIONS));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "acquire_timeout_secs = 9").unwrap();
        file.flush().unwrap();

        let config = StoreConfig::load(file.path()).unwrap();
        assert_eq!(config.acquire_timeout(), Duration::from_secs(9));
    }

    #[test]
    fn load_missing_file_fails() {
        let err = StoreConfig::load("/nonexistent/todoctl.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read store config"));
    }
}
