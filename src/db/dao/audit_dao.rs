use sea_orm::{DatabaseConnection, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::{
    audit_log::{self, AuditLevel},
    prelude::AuditLog,
};

#[derive(Clone)]
pub struct AuditDao {
    db: DatabaseConnection,
}

impl DaoBase for AuditDao {
    type Entity = AuditLog;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AuditDao {
    pub async fn append(
        &self,
        level: AuditLevel,
        action: &str,
        actor: &str,
        description: &str,
    ) -> DaoResult<audit_log::Model> {
        let model = audit_log::ActiveModel {
            level: Set(level),
            action: Set(action.to_string()),
            actor: Set(actor.to_string()),
            description: Set(description.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Newest first.
    pub async fn recent(&self, limit: u64) -> DaoResult<Vec<audit_log::Model>> {
        let mut pager = self.find_iter(None, |query| query);
        let mut rows = Vec::new();
        while (rows.len() as u64) < limit {
            let Some(mut response) = pager.next_page().await? else {
                break;
            };
            rows.append(&mut response.data);
        }
        rows.truncate(limit as usize);
        Ok(rows)
    }
}
