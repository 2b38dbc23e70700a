use record_derive::record;
use sea_orm::entity::prelude::*;

use crate::auth::CapabilitySet;

#[record]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    /// Bitmask of `Capability` values.
    pub capability_bits: i64,
}

impl Model {
    pub fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::from_bits(self.capability_bits)
    }
}

impl ActiveModelBehavior for ActiveModel {}
