use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{CanEditEmployee, CanOffboard, CanOnboard},
    db::{dao::PaginatedResponse, entities::employee},
    lifecycle::{EmployeeFields, LifecycleEngine, LifecycleOutcome},
    middleware::{Authorized, CurrentActor},
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

const DEFAULT_PAGE_SIZE: u64 = 25;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl ListQuery {
    fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// `changed` is false when the record was already in the target state.
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub changed: bool,
    pub employee: employee::Model,
}

#[derive(Debug, Serialize)]
pub struct ExistingEmployee {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub employment_status: employee::EmploymentStatus,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/employees", get(list_onboarded).post(onboard))
        .route("/employees/offboarded", get(list_offboarded))
        .route("/employees/{id}", get(detail).put(update))
        .route("/employees/{id}/exists", get(exists))
        .route("/employees/{id}/offboard", post(offboard))
        .route("/employees/{id}/reboard", post(reboard))
        .with_state(state)
}

fn engine(state: &AppState) -> LifecycleEngine {
    ServiceContext::from_state(state).lifecycle(state.events())
}

async fn list_onboarded(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<employee::Model>> {
    let page = engine(&state)
        .search_onboarded(&actor, query.search.as_deref(), query.page(), query.page_size())
        .await?;
    JsonApiResponse::ok(page)
}

async fn list_offboarded(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<employee::Model>> {
    let page = engine(&state)
        .search_offboarded(&actor, query.search.as_deref(), query.page(), query.page_size())
        .await?;
    JsonApiResponse::ok(page)
}

async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> ApiResult<employee::Model> {
    JsonApiResponse::ok(engine(&state).get(&actor, id).await?)
}

async fn exists(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> ApiResult<ExistingEmployee> {
    let employee = engine(&state).get(&actor, id).await?;
    JsonApiResponse::with_status(
        StatusCode::OK,
        "Employee already exists",
        ExistingEmployee {
            id: employee.id,
            full_name: employee.full_name,
            email: employee.email,
            employment_status: employee.employment_status,
        },
    )
}

async fn onboard(
    State(state): State<Arc<AppState>>,
    Authorized { actor, .. }: Authorized<CanOnboard>,
    Json(fields): Json<EmployeeFields>,
) -> ApiResult<TransitionResponse> {
    let employee = engine(&state).onboard(&actor, fields).await?;
    JsonApiResponse::with_status(
        StatusCode::CREATED,
        "Employee onboarded",
        TransitionResponse {
            changed: true,
            employee,
        },
    )
}

async fn update(
    State(state): State<Arc<AppState>>,
    Authorized { actor, .. }: Authorized<CanEditEmployee>,
    Path(id): Path<Uuid>,
    Json(fields): Json<EmployeeFields>,
) -> ApiResult<TransitionResponse> {
    let outcome = engine(&state).update(&actor, id, fields).await?;
    respond(outcome, "Employee updated", "Offboarded employees cannot be edited")
}

async fn offboard(
    State(state): State<Arc<AppState>>,
    Authorized { actor, .. }: Authorized<CanOffboard>,
    Path(id): Path<Uuid>,
) -> ApiResult<TransitionResponse> {
    let outcome = engine(&state).offboard(&actor, id).await?;
    respond(outcome, "Employee offboarded", "Employee is already offboarded")
}

async fn reboard(
    State(state): State<Arc<AppState>>,
    Authorized { actor, .. }: Authorized<CanOnboard>,
    Path(id): Path<Uuid>,
) -> ApiResult<TransitionResponse> {
    let outcome = engine(&state).reboard(&actor, id).await?;
    respond(outcome, "Employee re-onboarded", "Employee is already onboarded")
}

fn respond(
    outcome: LifecycleOutcome,
    applied: &str,
    skipped: &str,
) -> ApiResult<TransitionResponse> {
    let (changed, message, employee) = match outcome {
        LifecycleOutcome::Applied(employee) => (true, applied, employee),
        LifecycleOutcome::Skipped(employee) => (false, skipped, employee),
    };
    JsonApiResponse::with_status(
        StatusCode::OK,
        message,
        TransitionResponse { changed, employee },
    )
}
