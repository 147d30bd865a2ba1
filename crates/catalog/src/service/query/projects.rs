use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
  entities::{
    project::{Project, ProjectRow},
    user::User,
  },
  error::CatalogResult,
  scopes::Scopes,
};

use super::labels;

/// Fixed number of projects per page.
pub const PER_PAGE: i64 = 20;

const SELECT_PROJECTS: &str = "SELECT p.* FROM projects AS p";
const COUNT_PROJECTS: &str = "SELECT COUNT(*) FROM projects AS p";
const ORDER_PROJECTS: &str = " ORDER BY p.created_at, p.id";
const FIND_PROJECT_BY_ID: &str = "SELECT * FROM projects WHERE id = ?1";
const FILTER_BY_REPOSITORY: &str = "SELECT * FROM projects WHERE github_url LIKE ?1 ORDER BY created_at, id";

const FIND_PROJECT_WITH_SUBMITTER: &str = r#"
  SELECT
    p.id as project_id,
    p.name as project_name,
    p.description as project_description,
    p.github_url as project_github_url,
    p.main_language as project_main_language,
    p.inactive as project_inactive,
    p.created_at as project_created_at,
    p.updated_at as project_updated_at,
    u.id as user_id,
    u.nickname as user_nickname,
    u.email as user_email,
    u.created_at as user_created_at,
    u.updated_at as user_updated_at
  FROM projects AS p
  INNER JOIN users AS u ON p.user_id = u.id
  WHERE p.id = ?1
"#;

/// Fetches one page of projects matching `scopes`
///
/// # Arguments
/// * `pool` - The database connection pool
/// * `scopes` - Filters to apply, all of which must hold
/// * `page` - The page number (1-based, values below 1 are read as 1)
///
/// # Returns
/// A tuple containing the projects and the total number of pages
pub async fn list(pool: &SqlitePool, scopes: &Scopes, page: i64) -> CatalogResult<(Vec<ProjectRow>, i64)> {
  let (total_count, projects) = tokio::try_join!(count(pool, scopes), fetch_page(pool, scopes, page))?;

  let total_pages = calculate_total_pages(total_count, PER_PAGE);

  Ok((projects, total_pages))
}

/// Fetches every project matching `scopes`, unpaginated
pub async fn all(pool: &SqlitePool, scopes: &Scopes) -> CatalogResult<Vec<ProjectRow>> {
  let mut builder = QueryBuilder::<Sqlite>::new(SELECT_PROJECTS);
  scopes.push_where(&mut builder);
  builder.push(ORDER_PROJECTS);

  builder
    .build_query_as::<ProjectRow>()
    .fetch_all(pool)
    .await
    .map_err(Into::into)
}

pub async fn count(pool: &SqlitePool, scopes: &Scopes) -> CatalogResult<i64> {
  let mut builder = QueryBuilder::<Sqlite>::new(COUNT_PROJECTS);
  scopes.push_where(&mut builder);

  let count = builder.build_query_scalar::<i64>().fetch_one(pool).await?;
  Ok(count)
}

/// Fetches a project together with its submitter and labels
pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> CatalogResult<Option<Project>> {
  let project = sqlx::query(FIND_PROJECT_WITH_SUBMITTER)
    .bind(id)
    .map(map_row_to_project)
    .fetch_optional(pool)
    .await?;

  let Some(mut project) = project else {
    return Ok(None);
  };

  project.labels = labels::for_project(pool, project.id).await?;

  Ok(Some(project))
}

pub async fn find_row(pool: &SqlitePool, id: Uuid) -> CatalogResult<Option<ProjectRow>> {
  sqlx::query_as::<_, ProjectRow>(FIND_PROJECT_BY_ID)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}

/// Projects whose GitHub URL contains `repository` (ASCII case-insensitive)
pub async fn filter_by_repository(pool: &SqlitePool, repository: &str) -> CatalogResult<Vec<ProjectRow>> {
  sqlx::query_as::<_, ProjectRow>(FILTER_BY_REPOSITORY)
    .bind(format!("%{repository}%"))
    .fetch_all(pool)
    .await
    .map_err(Into::into)
}

pub async fn find_by_github_repo(pool: &SqlitePool, repository: &str) -> CatalogResult<Option<ProjectRow>> {
  Ok(filter_by_repository(pool, repository).await?.into_iter().next())
}

async fn fetch_page(pool: &SqlitePool, scopes: &Scopes, page: i64) -> CatalogResult<Vec<ProjectRow>> {
  let offset = page_offset(page);

  let mut builder = QueryBuilder::<Sqlite>::new(SELECT_PROJECTS);
  scopes.push_where(&mut builder);
  builder
    .push(ORDER_PROJECTS)
    .push(" LIMIT ")
    .push_bind(PER_PAGE)
    .push(" OFFSET ")
    .push_bind(offset);

  builder
    .build_query_as::<ProjectRow>()
    .fetch_all(pool)
    .await
    .map_err(Into::into)
}

/// Rows to skip for a 1-based page. Out-of-range pages saturate and read empty.
fn page_offset(page: i64) -> i64 {
  page.max(1).saturating_sub(1).saturating_mul(PER_PAGE)
}

fn calculate_total_pages(total_count: i64, limit: i64) -> i64 {
  (total_count as f64 / limit as f64).ceil() as i64
}

fn map_row_to_project(row: SqliteRow) -> Project {
  Project {
    id: row.get("project_id"),
    name: row.get("project_name"),
    description: row.get("project_description"),
    github_url: row.get("project_github_url"),
    main_language: row.get("project_main_language"),
    inactive: row.get("project_inactive"),
    submitted_by: User {
      id: row.get("user_id"),
      nickname: row.get("user_nickname"),
      email: row.get("user_email"),
      created_at: row.get("user_created_at"),
      updated_at: row.get("user_updated_at"),
    },
    labels: vec![],
    created_at: row.get("project_created_at"),
    updated_at: row.get("project_updated_at"),
  }
}
