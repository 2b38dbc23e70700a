use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{
    prelude::ReferenceEntry,
    reference_entry::{self, ReferenceKind},
};

#[derive(Clone)]
pub struct ReferenceDao {
    db: DatabaseConnection,
}

impl DaoBase for ReferenceDao {
    type Entity = ReferenceEntry;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ReferenceDao {
    pub async fn list_kind(&self, kind: ReferenceKind) -> DaoResult<Vec<reference_entry::Model>> {
        self.find_iter(
            Some((reference_entry::Column::Name, Order::Asc)),
            move |query| query.filter(reference_entry::Column::Kind.eq(kind)),
        )
        .collect_all()
        .await
    }

    pub async fn create_entry(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> DaoResult<reference_entry::Model> {
        let model = reference_entry::ActiveModel {
            kind: Set(kind),
            name: Set(name.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Resolves ids to display names in one round trip; unknown ids are absent.
    pub async fn names_by_id(&self, ids: &[Uuid]) -> DaoResult<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = ReferenceEntry::find()
            .filter(reference_entry::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;

        Ok(rows.into_iter().map(|row| (row.id, row.name)).collect())
    }
}
