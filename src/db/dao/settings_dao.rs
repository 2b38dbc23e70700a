use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set};

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::Settings, settings};

#[derive(Clone)]
pub struct SettingsDao {
    db: DatabaseConnection,
}

impl DaoBase for SettingsDao {
    type Entity = Settings;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl SettingsDao {
    pub async fn current(&self) -> DaoResult<Option<settings::Model>> {
        Settings::find()
            .order_by_desc(settings::Column::Version)
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Stores `revision` as the next version after `base_version`. A racing
    /// writer that already claimed that version trips the unique index.
    pub async fn append_revision(
        &self,
        base_version: i32,
        revision: settings::Model,
    ) -> DaoResult<settings::Model> {
        let mut active = revision.into_active_model().reset_all();
        active.version = Set(base_version.saturating_add(1));
        self.create(active).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    use super::SettingsDao;
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::settings;

    #[tokio::test]
    async fn current_is_none_before_first_save() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<settings::Model>::new()])
            .into_connection();
        let dao = SettingsDao::new(&db);

        let current = dao.current().await.expect("query should succeed");
        assert!(current.is_none());
    }

    #[tokio::test]
    async fn current_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("select failed".to_string())])
            .into_connection();
        let dao = SettingsDao::new(&db);

        let err = dao.current().await.expect_err("query should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
