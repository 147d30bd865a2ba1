use std::env;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use octarepo_catalog::{scopes::Scopes, service::query};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[tokio::main]
async fn main() -> Result<()> {
  dotenvy::dotenv().ok();

  let log_level = env::var("OCTAREPO_LOG_LEVEL").context("OCTAREPO_LOG_LEVEL is not set in .env file")?;
  let db_url = env::var("DATABASE_URL").context("DATABASE_URL is not set in .env file")?;
  let max_connections = match env::var("OCTAREPO_MAX_CONNECTIONS") {
    Ok(value) => value
      .parse::<u32>()
      .with_context(|| format!("OCTAREPO_MAX_CONNECTIONS must be a number, got `{value}`"))?,
    Err(_) => DEFAULT_MAX_CONNECTIONS,
  };

  let env_filter = EnvFilter::from_default_env().add_directive(log_level.parse()?);

  // Initialize tracing subscriber with the environment filter
  tracing_subscriber::fmt().with_env_filter(env_filter).init();

  let pool = SqlitePoolOptions::new()
    .max_connections(max_connections)
    .min_connections(1)
    .connect(&db_url)
    .await
    .context("Database connection failed")?;

  if let Err(err) = octarepo_catalog::migrate(&pool).await {
    error!("Failed to prepare the catalog schema: {:?}", err);
    pool.close().await;
    return Err(err.into());
  }

  let everything = Scopes::new();
  let active_only = Scopes::new().active();
  let (total, active) = tokio::try_join!(
    query::projects::count(&pool, &everything),
    query::projects::count(&pool, &active_only),
  )?;

  info!("Catalog ready: {} projects, {} active", total, active);

  pool.close().await;

  Ok(())
}
