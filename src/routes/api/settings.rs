use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;

use crate::{
    auth::CanAdministerSettings,
    db::entities::{
        email_template::{self, TemplateKind},
        settings,
    },
    error::AppError,
    middleware::Authorized,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        settings_service::{EmailSettingsUpdate, SettingsService, SettingsView, TriggerUpdate},
    },
    state::AppState,
};

type SettingsAdmin = Authorized<CanAdministerSettings>;

#[derive(Debug, Deserialize)]
pub struct WebhookUpdate {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TemplateUpdate {
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/settings", get(view))
        .route("/settings/triggers", put(save_triggers))
        .route("/settings/webhook", put(save_webhook))
        .route("/settings/email", put(save_email))
        .route("/settings/templates", get(templates))
        .route("/settings/templates/{kind}", put(save_template))
        .with_state(state)
}

fn service(state: &AppState) -> SettingsService {
    ServiceContext::from_state(state).settings()
}

async fn view(State(state): State<Arc<AppState>>, _: SettingsAdmin) -> ApiResult<SettingsView> {
    JsonApiResponse::ok(service(&state).view().await?)
}

async fn save_triggers(
    State(state): State<Arc<AppState>>,
    Authorized { actor, .. }: SettingsAdmin,
    Json(body): Json<TriggerUpdate>,
) -> ApiResult<SettingsView> {
    let saved = service(&state)
        .save_triggers(&actor.username, body)
        .await?;
    saved_view(saved)
}

async fn save_webhook(
    State(state): State<Arc<AppState>>,
    Authorized { actor, .. }: SettingsAdmin,
    Json(body): Json<WebhookUpdate>,
) -> ApiResult<SettingsView> {
    let saved = service(&state)
        .save_webhook(&actor.username, body.webhook_url)
        .await?;
    saved_view(saved)
}

async fn save_email(
    State(state): State<Arc<AppState>>,
    Authorized { actor, .. }: SettingsAdmin,
    Json(body): Json<EmailSettingsUpdate>,
) -> ApiResult<SettingsView> {
    let saved = service(&state).save_email(&actor.username, body).await?;
    saved_view(saved)
}

async fn templates(
    State(state): State<Arc<AppState>>,
    _: SettingsAdmin,
) -> ApiResult<Vec<email_template::Model>> {
    JsonApiResponse::ok(service(&state).templates().await?)
}

async fn save_template(
    State(state): State<Arc<AppState>>,
    Authorized { actor, .. }: SettingsAdmin,
    Path(kind): Path<String>,
    Json(body): Json<TemplateUpdate>,
) -> ApiResult<email_template::Model> {
    let kind = TemplateKind::parse(&kind)
        .ok_or_else(|| AppError::not_found(format!("Unknown template kind {kind}")))?;
    let saved = service(&state)
        .save_template(&actor.username, kind, body.subject, body.body)
        .await?;
    JsonApiResponse::ok(saved)
}

fn saved_view(saved: settings::Model) -> ApiResult<SettingsView> {
    JsonApiResponse::with_status(
        StatusCode::OK,
        "Settings saved",
        SettingsView::from(Some(saved)),
    )
}
