use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    db::dao::DaoContext,
    lifecycle::{EventSink, LifecycleEngine},
    notifications::NotificationQueue,
    services::{
        admin_service::AdminService, audit_service::AuditService,
        reference_service::ReferenceService, settings_service::SettingsService,
        user_service::UserService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn daos(&self) -> &DaoContext {
        &self.daos
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn audit(&self) -> AuditService {
        AuditService::new(self.daos.audit())
    }

    pub fn settings(&self) -> SettingsService {
        SettingsService::new(self.daos.settings(), self.daos.template(), self.audit())
    }

    pub fn references(&self) -> ReferenceService {
        ReferenceService::new(self.daos.reference(), self.audit())
    }

    pub fn admin(&self, alerts: NotificationQueue) -> AdminService {
        AdminService::new(self.daos.user(), self.daos.role(), self.audit(), alerts)
    }

    pub fn lifecycle(&self, events: Arc<dyn EventSink>) -> LifecycleEngine {
        LifecycleEngine::new(self.daos.employee(), self.audit(), events)
    }
}
