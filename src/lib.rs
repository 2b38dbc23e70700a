pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod middleware;
pub mod notifications;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

#[doc(hidden)]
pub mod test_helpers;
