use crate::{
    db::{
        dao::AuditDao,
        entities::audit_log::{self, AuditLevel},
    },
    error::AppError,
};

/// How many entries the log view returns.
pub const RECENT_LIMIT: u64 = 400;

/// Append-only audit trail. Writes never fail the caller.
#[derive(Clone)]
pub struct AuditService {
    dao: AuditDao,
}

impl AuditService {
    pub fn new(dao: AuditDao) -> Self {
        Self { dao }
    }

    pub async fn info(&self, action: &str, actor: &str, description: &str) {
        self.record(AuditLevel::Info, action, actor, description)
            .await
    }

    pub async fn warn(&self, action: &str, actor: &str, description: &str) {
        self.record(AuditLevel::Warn, action, actor, description)
            .await
    }

    pub async fn recent(&self) -> Result<Vec<audit_log::Model>, AppError> {
        Ok(self.dao.recent(RECENT_LIMIT).await?)
    }

    async fn record(&self, level: AuditLevel, action: &str, actor: &str, description: &str) {
        if let Err(err) = self.dao.append(level, action, actor, description).await {
            tracing::warn!(action, actor, error = %err, "audit write failed");
        }
    }
}
