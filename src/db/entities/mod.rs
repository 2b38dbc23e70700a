#[allow(unused_imports)]
pub mod prelude {
    pub use super::audit_log::Entity as AuditLog;
    pub use super::email_template::Entity as EmailTemplate;
    pub use super::employee::Entity as Employee;
    pub use super::reference_entry::Entity as ReferenceEntry;
    pub use super::role::Entity as Role;
    pub use super::settings::Entity as Settings;
    pub use super::user::Entity as User;
}

pub mod audit_log;
pub mod email_template;
pub mod employee;
pub mod reference_entry;
pub mod role;
pub mod settings;
pub mod user;
