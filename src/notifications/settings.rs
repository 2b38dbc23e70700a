use serde::Serialize;

use crate::{db::entities::settings, lifecycle::TransitionKind};

const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TriggerFlags {
    pub onboarded: bool,
    pub updated: bool,
    pub offboarded: bool,
    pub reboarded: bool,
    /// Only honoured together with `onboarded`.
    pub welcome_email: bool,
}

impl TriggerFlags {
    pub fn enabled(&self, kind: TransitionKind) -> bool {
        match kind {
            TransitionKind::Onboarded => self.onboarded,
            TransitionKind::Updated => self.updated,
            TransitionKind::Offboarded => self.offboarded,
            TransitionKind::Reboarded => self.reboarded,
        }
    }

    pub fn welcome_enabled(&self) -> bool {
        self.onboarded && self.welcome_email
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub recipients: Vec<String>,
}

/// Immutable view of one settings revision, handed to the dispatcher per
/// event. Version 0 means nothing has been saved yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSnapshot {
    pub version: i32,
    pub triggers: TriggerFlags,
    pub webhook_url: Option<String>,
    pub smtp: Option<SmtpSettings>,
}

impl SettingsSnapshot {
    pub fn from_row(row: Option<&settings::Model>) -> Self {
        let Some(row) = row else {
            return Self::default();
        };

        Self {
            version: row.version,
            triggers: TriggerFlags {
                onboarded: row.notify_onboarded,
                updated: row.notify_updated,
                offboarded: row.notify_offboarded,
                reboarded: row.notify_reboarded,
                welcome_email: row.send_welcome_email,
            },
            webhook_url: non_blank(row.webhook_url.as_deref()),
            smtp: smtp_from_row(row),
        }
    }
}

/// SMTP counts as configured once host, username and password are all set.
fn smtp_from_row(row: &settings::Model) -> Option<SmtpSettings> {
    let host = non_blank(row.smtp_host.as_deref())?;
    let username = non_blank(row.smtp_username.as_deref())?;
    let password = row.smtp_password.clone().filter(|value| !value.is_empty())?;
    let port = row
        .smtp_port
        .and_then(|port| u16::try_from(port).ok())
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_SMTP_PORT);

    Some(SmtpSettings {
        host,
        port,
        username,
        password,
        recipients: parse_recipients(row.email_recipients.as_deref().unwrap_or_default()),
    })
}

pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
