use record_derive::record;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lookup tables that employees point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    #[sea_orm(string_value = "site")]
    Site,
    #[sea_orm(string_value = "department")]
    Department,
    #[sea_orm(string_value = "employer")]
    Employer,
    #[sea_orm(string_value = "employment_contract")]
    EmploymentContract,
    #[sea_orm(string_value = "employment_type")]
    EmploymentType,
    #[sea_orm(string_value = "currency")]
    Currency,
    #[sea_orm(string_value = "pay_frequency")]
    PayFrequency,
    #[sea_orm(string_value = "hr_team")]
    HrTeam,
}

impl ReferenceKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "site" | "sites" => Some(Self::Site),
            "department" | "departments" => Some(Self::Department),
            "employer" | "employers" => Some(Self::Employer),
            "employment_contract" | "employment_contracts" => Some(Self::EmploymentContract),
            "employment_type" | "employment_types" => Some(Self::EmploymentType),
            "currency" | "currencies" => Some(Self::Currency),
            "pay_frequency" | "pay_frequencies" => Some(Self::PayFrequency),
            "hr_team" | "hr_teams" => Some(Self::HrTeam),
            _ => None,
        }
    }
}

#[record]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "reference_entries")]
pub struct Model {
    pub kind: ReferenceKind,
    pub name: String,
}

impl ActiveModelBehavior for ActiveModel {}
