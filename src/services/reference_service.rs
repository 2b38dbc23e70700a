use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::{
        dao::ReferenceDao,
        entities::reference_entry::{self, ReferenceKind},
    },
    error::AppError,
    services::audit_service::AuditService,
};

#[derive(Clone)]
pub struct ReferenceService {
    dao: ReferenceDao,
    audit: AuditService,
}

impl ReferenceService {
    pub fn new(dao: ReferenceDao, audit: AuditService) -> Self {
        Self { dao, audit }
    }

    pub async fn list(&self, kind: ReferenceKind) -> Result<Vec<reference_entry::Model>, AppError> {
        Ok(self.dao.list_kind(kind).await?)
    }

    pub async fn create(
        &self,
        actor: &str,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<reference_entry::Model, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Name is required"));
        }

        let entry = self.dao.create_entry(kind, name).await?;
        self.audit
            .info("Reference Data", actor, &format!("Added {kind:?} '{name}'"))
            .await;
        Ok(entry)
    }

    pub async fn names_by_id(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, AppError> {
        Ok(self.dao.names_by_id(ids).await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        db::entities::reference_entry::ReferenceKind, error::AppError, services::ServiceContext,
        test_helpers::memory_db,
    };

    #[tokio::test]
    async fn created_entries_resolve_by_id() {
        let db = memory_db().await;
        let references = ServiceContext::new(&db).references();

        let site = references
            .create("admin", ReferenceKind::Site, "  Lisbon ")
            .await
            .expect("create should succeed");
        references
            .create("admin", ReferenceKind::Department, "Finance")
            .await
            .expect("create should succeed");

        let sites = references
            .list(ReferenceKind::Site)
            .await
            .expect("list should succeed");
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].name, "Lisbon");

        let names = references
            .names_by_id(&[site.id])
            .await
            .expect("lookup should succeed");
        assert_eq!(names.get(&site.id).map(String::as_str), Some("Lisbon"));
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let db = memory_db().await;
        let err = ServiceContext::new(&db)
            .references()
            .create("admin", ReferenceKind::Currency, "  ")
            .await
            .expect_err("blank name should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
