use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{Capability, CapabilitySet, RequireCapabilityLayer},
    db::entities::{role, user},
    middleware::CurrentActor,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        admin_service::{
            AdminService, CreateUserRequest, RoleRequest, RoleUpdateRequest, UpdateUserRequest,
        },
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RoleView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub capabilities: CapabilitySet,
}

impl From<role::Model> for RoleView {
    fn from(role: role::Model) -> Self {
        Self {
            id: role.id,
            capabilities: role.capabilities(),
            name: role.name,
            description: role.description,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/{id}", put(update_user))
        .route("/admin/users/{id}/password", post(reset_password))
        .route("/admin/users/{id}/deactivate", post(deactivate_user))
        .route("/admin/roles", get(list_roles).post(create_role))
        .route("/admin/roles/{id}", put(update_role))
        .route_layer(RequireCapabilityLayer::new(
            state.clone(),
            Capability::AdministerUsers,
        ))
        .with_state(state)
}

fn admin(state: &AppState) -> AdminService {
    ServiceContext::from_state(state).admin(state.notifications.clone())
}

async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Vec<user::Model>> {
    JsonApiResponse::ok(admin(&state).list_users().await?)
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<user::Model> {
    let user = admin(&state).create_user(&actor, body).await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "User created", user)
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<user::Model> {
    JsonApiResponse::ok(admin(&state).update_user(&actor, id, body).await?)
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(body): Json<PasswordResetRequest>,
) -> ApiResult<serde_json::Value> {
    admin(&state)
        .reset_password(&actor, id, &body.password)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "Password updated", serde_json::Value::Null)
}

async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> ApiResult<user::Model> {
    let user = admin(&state).deactivate(&actor, id).await?;
    JsonApiResponse::with_status(StatusCode::OK, "User deactivated", user)
}

async fn list_roles(State(state): State<Arc<AppState>>) -> ApiResult<Vec<RoleView>> {
    let roles = admin(&state).list_roles().await?;
    JsonApiResponse::ok(roles.into_iter().map(RoleView::from).collect())
}

async fn create_role(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<RoleRequest>,
) -> ApiResult<RoleView> {
    let role = admin(&state).create_role(&actor, body).await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "Role created", role.into())
}

async fn update_role(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(body): Json<RoleUpdateRequest>,
) -> ApiResult<RoleView> {
    let role = admin(&state).update_role(&actor, id, body).await?;
    JsonApiResponse::ok(role.into())
}
