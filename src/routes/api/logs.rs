use std::sync::Arc;

use axum::{Router, extract::State, routing::get};

use crate::{
    auth::CanViewLogs,
    db::entities::audit_log,
    middleware::Authorized,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/logs", get(recent)).with_state(state)
}

async fn recent(
    State(state): State<Arc<AppState>>,
    _: Authorized<CanViewLogs>,
) -> ApiResult<Vec<audit_log::Model>> {
    JsonApiResponse::ok(ServiceContext::from_state(&state).audit().recent().await?)
}
