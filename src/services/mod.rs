pub mod admin_service;
pub mod audit_service;
pub mod context;
pub mod reference_service;
pub mod settings_service;
pub mod user_service;

pub use context::ServiceContext;
