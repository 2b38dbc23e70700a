use anyhow::{Result, bail};

use super::AppConfig;

const MIN_JWT_SECRET_BYTES: usize = 16;
const MIN_ADMIN_PASSWORD_LEN: usize = 8;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    if cfg.auth.jwt_secret.trim().len() < MIN_JWT_SECRET_BYTES {
        errors.push(format!(
            "auth.jwt_secret must be at least {MIN_JWT_SECRET_BYTES} bytes"
        ));
    }

    if cfg
        .auth
        .previous_jwt_secrets
        .iter()
        .any(|secret| secret.trim().is_empty())
    {
        errors.push("auth.previous_jwt_secrets must not contain empty entries".to_string());
    }

    if cfg.auth.session_ttl_minutes == 0 {
        errors.push("auth.session_ttl_minutes must be > 0".to_string());
    }

    if cfg.auth.admin_username.trim().is_empty() {
        errors.push("auth.admin_username must not be empty".to_string());
    }

    if cfg.auth.admin_password.len() < MIN_ADMIN_PASSWORD_LEN {
        errors.push(format!(
            "auth.admin_password must be at least {MIN_ADMIN_PASSWORD_LEN} characters"
        ));
    }

    if cfg.notifications.queue_size == 0 {
        errors.push("notifications.queue_size must be > 0".to_string());
    }

    if cfg.notifications.webhook_timeout_secs == 0 {
        errors.push("notifications.webhook_timeout_secs must be > 0".to_string());
    }

    if cfg.notifications.smtp_timeout_secs == 0 {
        errors.push("notifications.smtp_timeout_secs must be > 0".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
