use record_derive::record;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    #[sea_orm(string_value = "onboarding")]
    Onboarding,
    #[sea_orm(string_value = "update")]
    Update,
    #[sea_orm(string_value = "offboarding")]
    Offboarding,
    #[sea_orm(string_value = "welcome")]
    Welcome,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::Onboarding,
        TemplateKind::Update,
        TemplateKind::Offboarding,
        TemplateKind::Welcome,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Onboarding => "onboarding",
            TemplateKind::Update => "update",
            TemplateKind::Offboarding => "offboarding",
            TemplateKind::Welcome => "welcome",
        }
    }
}

#[record]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "email_templates")]
pub struct Model {
    #[sea_orm(unique)]
    pub kind: TemplateKind,
    pub subject: String,
    pub body: String,
}

impl ActiveModelBehavior for ActiveModel {}
