use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
  entities::user::User,
  error::{CatalogError, CatalogResult},
  service::query,
};

const CREATE_USER: &str = "INSERT INTO users (id, nickname, email) VALUES (?1, ?2, ?3) RETURNING *";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserParams {
  #[validate(length(min = 1, max = 39))]
  pub nickname: String,
  #[validate(email)]
  pub email: Option<String>,
}

/// Registers a submitter
///
/// # Errors
/// - UserAlreadyExist if the nickname is taken
/// - InvalidInput when the nickname or email is malformed
#[instrument(skip(pool))]
pub async fn create(pool: &SqlitePool, params: CreateUserParams) -> CatalogResult<User> {
  params.validate()?;

  if query::users::find_by_nickname(pool, &params.nickname).await?.is_some() {
    return Err(CatalogError::UserAlreadyExist(params.nickname));
  }

  let user = sqlx::query_as::<_, User>(CREATE_USER)
    .bind(Uuid::new_v4())
    .bind(&params.nickname)
    .bind(&params.email)
    .fetch_one(pool)
    .await?;

  debug!("Created user {}", user.id);

  Ok(user)
}
