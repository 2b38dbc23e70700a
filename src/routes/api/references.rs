use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use crate::{
    auth::CanManageReferenceData,
    db::entities::reference_entry::{self, ReferenceKind},
    error::AppError,
    middleware::{Authorized, CurrentActor},
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct NewReference {
    pub name: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/references/{kind}", get(list).post(create))
        .with_state(state)
}

fn parse_kind(kind: &str) -> Result<ReferenceKind, AppError> {
    ReferenceKind::parse(kind)
        .ok_or_else(|| AppError::not_found(format!("Unknown reference kind {kind}")))
}

async fn list(
    State(state): State<Arc<AppState>>,
    _: CurrentActor,
    Path(kind): Path<String>,
) -> ApiResult<Vec<reference_entry::Model>> {
    let kind = parse_kind(&kind)?;
    JsonApiResponse::ok(ServiceContext::from_state(&state).references().list(kind).await?)
}

async fn create(
    State(state): State<Arc<AppState>>,
    Authorized { actor, .. }: Authorized<CanManageReferenceData>,
    Path(kind): Path<String>,
    Json(body): Json<NewReference>,
) -> ApiResult<reference_entry::Model> {
    let kind = parse_kind(&kind)?;
    let entry = ServiceContext::from_state(&state)
        .references()
        .create(&actor.username, kind, &body.name)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "Created", entry)
}
