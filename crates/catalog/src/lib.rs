use sqlx::{migrate::Migrator, SqlitePool};
use tracing::info;

use error::CatalogResult;

pub mod entities;
pub mod error;
pub mod github;
pub mod languages;
pub mod scopes;
pub mod service;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Brings the catalog schema up to date
pub async fn migrate(pool: &SqlitePool) -> CatalogResult<()> {
  MIGRATOR.run(pool).await?;

  info!("Catalog schema is up to date");

  Ok(())
}
