use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{entities::user::User, error::CatalogResult};

const FIND_USER_BY_ID: &str = "SELECT * FROM users WHERE id = ?1";
const FIND_USER_BY_NICKNAME: &str = "SELECT * FROM users WHERE nickname = ?1";

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> CatalogResult<Option<User>> {
  sqlx::query_as::<_, User>(FIND_USER_BY_ID)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}

pub async fn find_by_nickname(pool: &SqlitePool, nickname: &str) -> CatalogResult<Option<User>> {
  sqlx::query_as::<_, User>(FIND_USER_BY_NICKNAME)
    .bind(nickname)
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}
