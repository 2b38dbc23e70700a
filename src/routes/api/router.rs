use std::sync::Arc;

use axum::Router;
use tower_cookies::CookieManagerLayer;

use crate::state::AppState;

use super::{admin, auth, employees, logs, references, settings};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(auth::router(state.clone()))
        .merge(employees::router(state.clone()))
        .merge(admin::router(state.clone()))
        .merge(settings::router(state.clone()))
        .merge(references::router(state.clone()))
        .merge(logs::router(state))
        .layer(CookieManagerLayer::new())
}
