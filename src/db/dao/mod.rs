pub mod audit_dao;
pub mod base;
mod context;
pub mod employee_dao;
pub mod error;
pub mod record;
pub mod reference_dao;
pub mod role_dao;
pub mod settings_dao;
pub mod template_dao;
pub mod user_dao;

pub use audit_dao::AuditDao;
pub use base::{ColumnFilter, DaoBase, DaoPager, FilterOp, PaginatedResponse};
pub use context::DaoContext;
pub use employee_dao::EmployeeDao;
pub use error::{DaoLayerError, DaoResult};
pub use record::{RecordEntity, StampedRecord};
pub use reference_dao::ReferenceDao;
pub use role_dao::RoleDao;
pub use settings_dao::SettingsDao;
pub use template_dao::TemplateDao;
pub use user_dao::UserDao;
