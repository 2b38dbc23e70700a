use std::{fmt, str::FromStr, time::Duration};

use anyhow::{Result, anyhow};
use sea_orm::{ConnectOptions, ConnectionTrait, DatabaseConnection};

use crate::config::DatabaseConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Storage engines the record store can run on, picked from the URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn for_url(url: &str) -> Result<Self> {
        url.parse()
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Sqlite => "sqlite",
        }
    }

    pub fn connect_options(self, cfg: &DatabaseConfig) -> ConnectOptions {
        let mut options = ConnectOptions::new(cfg.url.clone());
        options
            .max_connections(cfg.max_connections)
            .min_connections(cfg.min_idle)
            .connect_timeout(CONNECT_TIMEOUT)
            .sqlx_logging(false);

        // An in-memory sqlite database lives and dies with one connection.
        if self == Backend::Sqlite && cfg.url.contains(":memory:") {
            options.max_connections(1).min_connections(1);
        }
        options
    }

    /// Per-connection settings applied once the pool is up.
    pub async fn prepare(self, db: &DatabaseConnection) -> Result<()> {
        if self == Backend::Sqlite {
            db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
            db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
                .await?;
        }
        Ok(())
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(url: &str) -> Result<Self> {
        let scheme = url
            .trim()
            .split_once(':')
            .map(|(scheme, _)| scheme.to_ascii_lowercase());

        match scheme.as_deref() {
            Some("postgres" | "postgresql") => Ok(Backend::Postgres),
            Some("sqlite") => Ok(Backend::Sqlite),
            Some(other) => Err(anyhow!(
                "unsupported database url '{other}:<redacted>'; expected postgres://, postgresql:// or sqlite:"
            )),
            None => Err(anyhow!("database url is missing a scheme")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Backend;
    use crate::config::DatabaseConfig;

    fn cfg(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            ..DatabaseConfig::default()
        }
    }

    #[test]
    fn picks_backend_from_scheme() {
        assert_eq!(Backend::for_url("sqlite::memory:").ok(), Some(Backend::Sqlite));
        assert_eq!(
            Backend::for_url("postgresql://hr@localhost/hermes").ok(),
            Some(Backend::Postgres)
        );
        assert_eq!(
            Backend::for_url("POSTGRES://hr@localhost/hermes").ok(),
            Some(Backend::Postgres)
        );
    }

    #[test]
    fn unsupported_scheme_error_hides_credentials() {
        let err = Backend::for_url("mysql://root:hunter2@db/hr")
            .expect_err("mysql should be rejected")
            .to_string();

        assert!(err.contains("unsupported database url 'mysql:<redacted>'"));
        assert!(!err.contains("hunter2"));
        assert!(Backend::for_url("nonsense").is_err());
    }

    #[test]
    fn in_memory_sqlite_is_pinned_to_one_connection() {
        let options = Backend::Sqlite.connect_options(&cfg("sqlite::memory:"));
        assert_eq!(options.get_max_connections(), Some(1));
        assert_eq!(options.get_min_connections(), Some(1));
    }
}
