use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use hermes_hr::{
    auth::bootstrap::seed_admin,
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    middleware::{catch_panic_layer, json_error_middleware, redirect_middleware},
    notifications::{
        HttpWebhook, NotificationDispatcher, NotificationQueue, NotificationWorker, SmtpMailer,
    },
    routes::router,
    services::ServiceContext,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.logging);

    let db = connection::connect(&cfg.database).await?;
    seed_admin(&cfg.auth, &ServiceContext::new(&db)).await?;

    let (queue, rx) = NotificationQueue::new(cfg.notifications.queue_size);
    let dispatcher = NotificationDispatcher::new(
        Arc::new(HttpWebhook::new(cfg.notifications.webhook_timeout())?),
        Arc::new(SmtpMailer::new(cfg.notifications.smtp_timeout())),
    );
    NotificationWorker::new(rx, &db, dispatcher).spawn();

    let state = AppState::new(cfg, db, queue);

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(middleware::from_fn(redirect_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", state.config.general.host, state.config.general.port)
        .parse()
        .context("invalid general.host/general.port")?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
