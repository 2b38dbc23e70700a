use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::{
        Authenticator, AuthorizationGuard,
        bootstrap::{build_authenticator, build_guard},
    },
    config::AppConfig,
    lifecycle::EventSink,
    notifications::NotificationQueue,
    services::ServiceContext,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub authenticator: Authenticator,
    pub guard: AuthorizationGuard,
    pub notifications: NotificationQueue,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        notifications: NotificationQueue,
    ) -> Arc<Self> {
        let services = ServiceContext::new(&db);
        let authenticator = build_authenticator(&config.auth, &services);
        let guard = build_guard(&services);
        Arc::new(Self {
            config,
            db,
            authenticator,
            guard,
            notifications,
        })
    }

    pub fn events(&self) -> Arc<dyn EventSink> {
        Arc::new(self.notifications.clone())
    }
}
