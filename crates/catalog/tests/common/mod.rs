#![allow(dead_code)]

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use uuid::Uuid;

use octarepo_catalog::{
  entities::{label::Label, project::Project, user::User},
  service::mutation::{
    self,
    projects::{CreateProjectParams, LabelAttributes, ProjectAttributes},
    users::CreateUserParams,
  },
};

/// Fresh in-memory catalog with the schema applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn test_pool() -> SqlitePool {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .idle_timeout(None)
    .max_lifetime(None)
    .connect("sqlite::memory:")
    .await
    .unwrap();

  octarepo_catalog::migrate(&pool).await.unwrap();

  pool
}

pub async fn create_user(pool: &SqlitePool, nickname: &str) -> User {
  mutation::users::create(
    pool,
    CreateUserParams {
      nickname: nickname.to_string(),
      email: Some(format!("{nickname}@example.com")),
    },
  )
  .await
  .unwrap()
}

pub async fn create_label(pool: &SqlitePool, name: &str) -> Label {
  mutation::labels::create(pool, name).await.unwrap()
}

pub fn attributes(repo: &str, language: &str) -> ProjectAttributes {
  ProjectAttributes {
    name: repo.to_string(),
    description: format!("{repo} is a friendly project to contribute to"),
    github_url: format!("https://github.com/octahive/{repo}"),
    main_language: language.to_string(),
  }
}

pub fn params(user: &User, attributes: ProjectAttributes, labels: &[&Label]) -> CreateProjectParams {
  CreateProjectParams {
    attributes,
    user_id: user.id,
    labels_attributes: labels
      .iter()
      .map(|label| LabelAttributes {
        id: Some(label.id),
        name: None,
      })
      .collect(),
  }
}

pub async fn create_project(pool: &SqlitePool, user: &User, repo: &str, language: &str, labels: &[&Label]) -> Project {
  mutation::projects::create(pool, params(user, attributes(repo, language), labels))
    .await
    .unwrap()
}

pub async fn set_inactive(pool: &SqlitePool, id: Uuid, inactive: Option<bool>) {
  sqlx::query("UPDATE projects SET inactive = ?1 WHERE id = ?2")
    .bind(inactive)
    .bind(id)
    .execute(pool)
    .await
    .unwrap();
}

pub fn sorted_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
  let mut names: Vec<&str> = names.into_iter().collect();
  names.sort_unstable();
  names
}
