use sqlx::{migrate::MigrateError, Error as SqlxError};
use thiserror::Error;
use validator::ValidationErrors;

pub type CatalogResult<T = ()> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error(transparent)]
  InvalidInput(#[from] ValidationErrors),
  #[error("User with nickname `{0}` already exists")]
  UserAlreadyExist(String),
  #[error("Entity `{0}` is not found")]
  ResourceNotFound(String),
  #[error("Database error: {0}")]
  DatabaseError(#[from] SqlxError),
  #[error("Migration error: {0}")]
  Migration(#[from] MigrateError),
  #[error("an internal error occurred")]
  Anyhow(#[from] anyhow::Error),
}

impl CatalogError {
  /// Field-level messages for validation failures, sorted by field name.
  ///
  /// Every other error kind yields an empty list.
  pub fn field_errors(&self) -> Vec<(String, Vec<String>)> {
    let CatalogError::InvalidInput(errors) = self else {
      return vec![];
    };

    let mut details: Vec<(String, Vec<String>)> = errors
      .field_errors()
      .into_iter()
      .map(|(field, errs)| {
        (
          field.to_string(),
          errs
            .iter()
            .map(|err| err.message.as_ref().map_or_else(|| err.code.to_string(), |m| m.to_string()))
            .collect(),
        )
      })
      .collect();
    details.sort_by(|a, b| a.0.cmp(&b.0));
    details
  }

  /// Whether validation failed for `field`.
  pub fn has_field_error(&self, field: &str) -> bool {
    match self {
      CatalogError::InvalidInput(errors) => errors.field_errors().contains_key(field),
      _ => false,
    }
  }
}
