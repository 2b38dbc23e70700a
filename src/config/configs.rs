use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub notifications: NotificationConfig,
}

impl AppConfig {
    /// Reads `.env`, then `APP_*` variables, then checks the result.
    pub fn from_env() -> Result<Self> {
        envconfig::load_dotenv();
        let cfg: Self = envconfig::deserialize(envconfig::environment(None))?;
        validate::validate(&cfg)?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_DATABASE_URL.to_string(),
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Retired signing secrets, still accepted when verifying sessions.
    pub previous_jwt_secrets: Vec<String>,
    pub session_ttl_minutes: u64,
    pub cookie_secure: bool,
    pub admin_username: String,
    pub admin_password: String,
}

impl AuthConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes.saturating_mul(60))
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            previous_jwt_secrets: Vec::new(),
            session_ttl_minutes: defaults::DEFAULT_SESSION_TTL_MINUTES,
            cookie_secure: false,
            admin_username: defaults::DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationConfig {
    pub queue_size: usize,
    pub webhook_timeout_secs: u64,
    pub smtp_timeout_secs: u64,
}

impl NotificationConfig {
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    pub fn smtp_timeout(&self) -> Duration {
        Duration::from_secs(self.smtp_timeout_secs)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            queue_size: defaults::DEFAULT_NOTIFICATION_QUEUE_SIZE,
            webhook_timeout_secs: defaults::DEFAULT_WEBHOOK_TIMEOUT_SECS,
            smtp_timeout_secs: defaults::DEFAULT_SMTP_TIMEOUT_SECS,
        }
    }
}
