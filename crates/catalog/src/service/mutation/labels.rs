use std::borrow::Cow;

use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{entities::label::Label, error::CatalogResult, service::query};

const CREATE_LABEL: &str = "INSERT INTO labels (id, name) VALUES (?1, ?2) RETURNING *";

/// Creates a label, or returns the existing one with the same name
#[instrument(skip(pool))]
pub async fn create(pool: &SqlitePool, name: &str) -> CatalogResult<Label> {
  let name = name.trim();
  if name.is_empty() {
    let mut errors = ValidationErrors::new();
    errors.add(
      "name",
      ValidationError::new("blank").with_message(Cow::Borrowed("can't be blank")),
    );
    return Err(errors.into());
  }

  if let Some(label) = query::labels::find_by_name(pool, name).await? {
    return Ok(label);
  }

  sqlx::query_as::<_, Label>(CREATE_LABEL)
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(Into::into)
}
