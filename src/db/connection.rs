use sea_orm::{Database, DatabaseConnection};
use tracing::info;

use super::backend::Backend;
use crate::config::DatabaseConfig;

pub const ENTITY_REGISTRY: &str = "hermes_hr::db::entities::*";

/// Opens the pool, applies backend pragmas and brings tables in line with
/// the entity definitions.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let backend = Backend::for_url(&cfg.url)?;
    info!(%backend, "connecting to record store");

    let db = Database::connect(backend.connect_options(cfg)).await?;
    backend.prepare(&db).await?;

    sync_schema(&db).await?;
    Ok(db)
}

pub async fn sync_schema(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("syncing record store schema");
    db.get_schema_registry(ENTITY_REGISTRY).sync(db).await?;
    Ok(())
}
