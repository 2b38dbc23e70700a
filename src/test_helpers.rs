use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::mpsc::Receiver;

use crate::{
    config::{AppConfig, AuthConfig, DatabaseConfig},
    db::connection,
    notifications::{Notification, NotificationQueue},
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-secret-0123456789";

/// Fresh in-memory SQLite with the full schema synced.
pub async fn memory_db() -> DatabaseConnection {
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_idle: 1,
    };
    connection::connect(&cfg)
        .await
        .expect("in-memory database should connect")
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".to_string();
    cfg.auth = AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        admin_password: "adminpassword".to_string(),
        ..AuthConfig::default()
    };
    cfg
}

/// State over an in-memory database. The receiver stands in for the
/// notification worker so tests can inspect what was queued.
pub async fn test_state() -> (Arc<AppState>, Receiver<Notification>) {
    let cfg = test_config();
    let db = memory_db().await;
    let (queue, rx) = NotificationQueue::new(cfg.notifications.queue_size);
    (AppState::new(cfg, db, queue), rx)
}
