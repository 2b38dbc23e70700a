use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::{
    auth::CapabilitySet,
    db::entities::{prelude::Role, role},
};

#[derive(Clone)]
pub struct RoleDao {
    db: DatabaseConnection,
}

impl DaoBase for RoleDao {
    type Entity = Role;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RoleDao {
    pub async fn find_by_name(&self, name: &str) -> DaoResult<Option<role::Model>> {
        let name = name.to_string();
        self.find_one(move |query| query.filter(role::Column::Name.eq(name)))
            .await
    }

    pub async fn create_role(
        &self,
        name: &str,
        description: Option<String>,
        capabilities: CapabilitySet,
    ) -> DaoResult<role::Model> {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            capability_bits: Set(capabilities.bits()),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn update_role(
        &self,
        id: &Uuid,
        description: Option<String>,
        capabilities: CapabilitySet,
    ) -> DaoResult<role::Model> {
        self.update(*id, move |active| {
            active.description = Set(description);
            active.capability_bits = Set(capabilities.bits());
        })
        .await
    }

    pub async fn list_roles(&self) -> DaoResult<Vec<role::Model>> {
        self.find_iter(Some((role::Column::Name, Order::Asc)), |query| query)
            .collect_all()
            .await
    }
}
