use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
pub struct Label {
  pub id: Uuid,
  pub name: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Join row between a project and one of its labels.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
pub struct ProjectLabel {
  pub id: Uuid,
  pub project_id: Uuid,
  pub label_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
