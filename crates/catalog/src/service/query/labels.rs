use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
  entities::label::{Label, ProjectLabel},
  error::CatalogResult,
};

const LIST_LABELS: &str = "SELECT * FROM labels ORDER BY name";
const FIND_LABEL_BY_ID: &str = "SELECT * FROM labels WHERE id = ?1";
const FIND_LABEL_BY_NAME: &str = "SELECT * FROM labels WHERE name = ?1";
const LABELS_FOR_PROJECT: &str = r#"
  SELECT l.*
  FROM labels AS l
  INNER JOIN project_labels AS pl ON pl.label_id = l.id
  WHERE pl.project_id = ?1
  ORDER BY l.name
"#;
const LINKS_FOR_PROJECT: &str = "SELECT * FROM project_labels WHERE project_id = ?1 ORDER BY created_at, id";

pub async fn list(pool: &SqlitePool) -> CatalogResult<Vec<Label>> {
  sqlx::query_as::<_, Label>(LIST_LABELS)
    .fetch_all(pool)
    .await
    .map_err(Into::into)
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> CatalogResult<Option<Label>> {
  sqlx::query_as::<_, Label>(FIND_LABEL_BY_ID)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> CatalogResult<Option<Label>> {
  sqlx::query_as::<_, Label>(FIND_LABEL_BY_NAME)
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}

/// Labels attached to a project, ordered by name
pub async fn for_project(pool: &SqlitePool, project_id: Uuid) -> CatalogResult<Vec<Label>> {
  sqlx::query_as::<_, Label>(LABELS_FOR_PROJECT)
    .bind(project_id)
    .fetch_all(pool)
    .await
    .map_err(Into::into)
}

/// Join rows linking a project to its labels
pub async fn links_for_project(pool: &SqlitePool, project_id: Uuid) -> CatalogResult<Vec<ProjectLabel>> {
  sqlx::query_as::<_, ProjectLabel>(LINKS_FOR_PROJECT)
    .bind(project_id)
    .fetch_all(pool)
    .await
    .map_err(Into::into)
}
