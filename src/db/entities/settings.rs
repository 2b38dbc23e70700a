use record_derive::record;
use sea_orm::entity::prelude::*;

/// One saved revision of the notification settings. Rows are never updated;
/// the highest `version` is the live configuration.
#[record]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(unique)]
    pub version: i32,
    pub notify_onboarded: bool,
    pub notify_updated: bool,
    pub notify_offboarded: bool,
    pub notify_reboarded: bool,
    pub send_welcome_email: bool,
    pub webhook_url: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<i32>,
    pub smtp_username: Option<String>,
    #[serde(skip_serializing)]
    pub smtp_password: Option<String>,
    /// Comma separated.
    pub email_recipients: Option<String>,
    pub saved_by: String,
}

impl ActiveModelBehavior for ActiveModel {}
