pub mod admin;
pub mod auth;
pub mod employees;
pub mod logs;
pub mod references;
mod router;
pub mod settings;

pub use router::router;
