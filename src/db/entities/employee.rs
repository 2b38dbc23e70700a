use record_derive::record;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    #[sea_orm(string_value = "onboarded")]
    Onboarded,
    #[sea_orm(string_value = "offboarded")]
    Offboarded,
}

#[record(created_at = "created_date", updated_at = "modified_date")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    /// Lower-cased `full_name`, backs case-insensitive search.
    pub search_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub nationality: Option<String>,
    pub country_of_origin: Option<String>,
    pub working_country: Option<String>,
    pub personal_email: Option<String>,
    pub company_email: Option<String>,

    pub job_title: Option<String>,
    pub direct_manager: Option<String>,
    pub site_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub employer_id: Option<Uuid>,
    pub hr_team_id: Option<Uuid>,
    pub employment_contract_id: Option<Uuid>,
    pub business_unit: Option<String>,
    pub business_vertical: Option<String>,
    pub brand_code: Option<String>,
    pub product_code: Option<String>,
    pub supplier: Option<String>,
    pub entity_to_be_billed: Option<String>,

    pub currency_id: Option<Uuid>,
    pub salary: Option<String>,
    pub salary_period: Option<String>,
    pub pay_frequency_id: Option<Uuid>,
    pub net_salary: Option<String>,
    pub change_reason: Option<String>,
    pub increase_percentage: Option<String>,
    pub employment_type_id: Option<Uuid>,
    pub working_hours: Option<String>,

    pub employment_status: EmploymentStatus,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl Model {
    pub fn is_offboarded(&self) -> bool {
        self.employment_status == EmploymentStatus::Offboarded
    }
}

impl ActiveModelBehavior for ActiveModel {}
