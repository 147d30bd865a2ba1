use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use sqlx::{Error as SqlxError, SqliteConnection, SqlitePool};
use tracing::{debug, info, instrument};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
  entities::project::{Project, ProjectRow},
  error::{CatalogError, CatalogResult},
  languages::is_known_language,
  service::query,
};

// SQL Query Constants
const COUNT_PROJECTS_WITH_URL: &str =
  "SELECT COUNT(*) FROM projects WHERE github_url = ?1 COLLATE NOCASE AND (?2 IS NULL OR id <> ?2)";
const COUNT_LABELS_BY_ID: &str = "SELECT COUNT(*) FROM labels WHERE id = ?1";
const INSERT_PROJECT: &str = r#"
    INSERT INTO projects (id, name, description, github_url, main_language, user_id)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    RETURNING *
"#;
const INSERT_PROJECT_LABEL: &str = "INSERT INTO project_labels (id, project_id, label_id) VALUES (?1, ?2, ?3)";
const UPDATE_PROJECT: &str = r#"
    UPDATE projects
    SET name = ?1, description = ?2, github_url = ?3, main_language = ?4, updated_at = CURRENT_TIMESTAMP
    WHERE id = ?5
    RETURNING *
"#;
const DEACTIVATE_PROJECT: &str = r#"
    UPDATE projects
    SET inactive = 1, updated_at = CURRENT_TIMESTAMP
    WHERE id = ?1
    RETURNING *
"#;

static GITHUB_URL: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i-u)^https?://(www\.)?github\.com/[\w-]*/[\w.-]*/?$").unwrap());

const TAKEN_MESSAGE: &str = "Project has already been suggested.";

/// User-editable attributes of a project, checked on every write.
///
/// Missing fields deserialize as empty so they surface as `blank` errors.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProjectAttributes {
  #[validate(custom(function = "not_blank"))]
  pub name: String,
  #[validate(
    custom(function = "not_blank"),
    length(min = 20, max = 200, message = "must be between 20 and 200 characters")
  )]
  pub description: String,
  #[validate(
    custom(function = "not_blank"),
    regex(path = *GITHUB_URL, message = "Enter a valid GitHub URL.")
  )]
  pub github_url: String,
  #[validate(custom(function = "not_blank"), custom(function = "programming_language"))]
  pub main_language: String,
}

/// Nested label reference submitted with a new project.
///
/// Only entries carrying an `id` are linked; nothing is created from `name`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelAttributes {
  pub id: Option<Uuid>,
  pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectParams {
  #[serde(flatten)]
  pub attributes: ProjectAttributes,
  pub user_id: Uuid,
  #[serde(default)]
  pub labels_attributes: Vec<LabelAttributes>,
}

/// Creates a new project submitted by `params.user_id`
///
/// # Errors
/// - InvalidInput if any attribute is invalid or the GitHub URL is already suggested
/// - ResourceNotFound if the submitter or a referenced label doesn't exist
/// - DatabaseError for any database-related issues
#[instrument(skip(pool))]
pub async fn create(pool: &SqlitePool, params: CreateProjectParams) -> CatalogResult<Project> {
  validate_attributes(pool, &params.attributes, None).await?;

  if query::users::find_by_id(pool, params.user_id).await?.is_none() {
    return Err(CatalogError::ResourceNotFound(params.user_id.to_string()));
  }

  let label_ids = nested_label_ids(&params.labels_attributes);

  let mut tx = pool.begin().await?;

  let row = sqlx::query_as::<_, ProjectRow>(INSERT_PROJECT)
    .bind(Uuid::new_v4())
    .bind(&params.attributes.name)
    .bind(&params.attributes.description)
    .bind(&params.attributes.github_url)
    .bind(&params.attributes.main_language)
    .bind(params.user_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_write_error)?;

  for label_id in label_ids {
    link_label(&mut *tx, row.id, label_id).await?;
  }

  tx.commit().await?;

  info!("Project {} submitted for {}", row.id, row.github_repository());

  get_project(pool, row.id).await
}

/// Replaces the editable attributes of an existing project
///
/// # Errors
/// - ResourceNotFound if project doesn't exist
/// - InvalidInput if any attribute is invalid or the GitHub URL belongs to another project
/// - DatabaseError for any database-related issues
#[instrument(skip(pool), fields(project_id = %id))]
pub async fn update(pool: &SqlitePool, id: Uuid, params: ProjectAttributes) -> CatalogResult<Project> {
  ensure_project_exists(pool, id).await?;
  validate_attributes(pool, &params, Some(id)).await?;

  sqlx::query_as::<_, ProjectRow>(UPDATE_PROJECT)
    .bind(&params.name)
    .bind(&params.description)
    .bind(&params.github_url)
    .bind(&params.main_language)
    .bind(id)
    .fetch_one(pool)
    .await
    .map_err(map_write_error)?;

  get_project(pool, id).await
}

/// Marks a project inactive and persists the flag right away
///
/// Attribute validation is skipped and labels are left untouched. Calling it
/// on an inactive project keeps it inactive.
///
/// # Errors
/// - ResourceNotFound if project doesn't exist
/// - DatabaseError for any database-related issues
#[instrument(skip(pool), fields(project_id = %id))]
pub async fn deactivate(pool: &SqlitePool, id: Uuid) -> CatalogResult<ProjectRow> {
  let row = sqlx::query_as::<_, ProjectRow>(DEACTIVATE_PROJECT)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| CatalogError::ResourceNotFound(id.to_string()))?;

  debug!("Deactivated project {}", row.github_repository());

  Ok(row)
}

async fn validate_attributes(
  pool: &SqlitePool,
  attributes: &ProjectAttributes,
  except: Option<Uuid>,
) -> CatalogResult<()> {
  let mut errors = match attributes.validate() {
    Ok(()) => ValidationErrors::new(),
    Err(errors) => errors,
  };

  if !attributes.github_url.trim().is_empty() && github_url_taken(pool, &attributes.github_url, except).await? {
    errors.add("github_url", taken_error());
  }

  if errors.is_empty() {
    Ok(())
  } else {
    debug!("Rejected project attributes: {}", errors);
    Err(errors.into())
  }
}

async fn github_url_taken(pool: &SqlitePool, github_url: &str, except: Option<Uuid>) -> CatalogResult<bool> {
  let (count,): (i64,) = sqlx::query_as(COUNT_PROJECTS_WITH_URL)
    .bind(github_url)
    .bind(except)
    .fetch_one(pool)
    .await?;

  Ok(count > 0)
}

async fn link_label(conn: &mut SqliteConnection, project_id: Uuid, label_id: Uuid) -> CatalogResult<()> {
  let (count,): (i64,) = sqlx::query_as(COUNT_LABELS_BY_ID)
    .bind(label_id)
    .fetch_one(&mut *conn)
    .await?;

  if count == 0 {
    return Err(CatalogError::ResourceNotFound(label_id.to_string()));
  }

  sqlx::query(INSERT_PROJECT_LABEL)
    .bind(Uuid::new_v4())
    .bind(project_id)
    .bind(label_id)
    .execute(&mut *conn)
    .await?;

  Ok(())
}

async fn ensure_project_exists(pool: &SqlitePool, id: Uuid) -> CatalogResult<()> {
  query::projects::find_row(pool, id)
    .await?
    .map(|_| ())
    .ok_or_else(|| CatalogError::ResourceNotFound(id.to_string()))
}

async fn get_project(pool: &SqlitePool, id: Uuid) -> CatalogResult<Project> {
  query::projects::find_by_id(pool, id)
    .await?
    .ok_or_else(|| CatalogError::ResourceNotFound(id.to_string()))
}

/// Ids of nested labels in submission order, without blanks or repeats.
fn nested_label_ids(labels: &[LabelAttributes]) -> Vec<Uuid> {
  let mut ids: Vec<Uuid> = Vec::with_capacity(labels.len());
  for id in labels.iter().filter_map(|label| label.id) {
    if !ids.contains(&id) {
      ids.push(id);
    }
  }
  ids
}

/// A unique violation can only come from `github_url` losing a race with a
/// concurrent submission.
fn map_write_error(err: SqlxError) -> CatalogError {
  match &err {
    SqlxError::Database(db_err) if db_err.is_unique_violation() => {
      let mut errors = ValidationErrors::new();
      errors.add("github_url", taken_error());
      errors.into()
    },
    _ => err.into(),
  }
}

fn taken_error() -> ValidationError {
  ValidationError::new("taken").with_message(Cow::Borrowed(TAKEN_MESSAGE))
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(ValidationError::new("blank").with_message(Cow::Borrowed("can't be blank")));
  }
  Ok(())
}

fn programming_language(value: &str) -> Result<(), ValidationError> {
  if !is_known_language(value) {
    return Err(ValidationError::new("inclusion").with_message(Cow::Borrowed("must be a programming language")));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use sqlx::sqlite::SqlitePoolOptions;

  use super::*;

  fn attributes() -> ProjectAttributes {
    ProjectAttributes {
      name: "octarepo".to_string(),
      description: "x".repeat(20),
      github_url: "https://github.com/octahive/octarepo".to_string(),
      main_language: "Rust".to_string(),
    }
  }

  fn failed_fields(attributes: &ProjectAttributes) -> Vec<String> {
    let mut fields: Vec<String> = match attributes.validate() {
      Ok(()) => vec![],
      Err(errors) => errors.field_errors().keys().map(|field| field.to_string()).collect(),
    };
    fields.sort();
    fields
  }

  #[test]
  fn valid_attributes_pass() {
    assert!(attributes().validate().is_ok());
  }

  #[test]
  fn blank_fields_are_reported_per_field() {
    let attributes = ProjectAttributes {
      name: "   ".to_string(),
      description: String::new(),
      github_url: String::new(),
      main_language: String::new(),
    };

    assert_eq!(
      failed_fields(&attributes),
      vec!["description", "github_url", "main_language", "name"]
    );
  }

  #[test]
  fn description_length_bounds_are_inclusive() {
    for (len, valid) in [(19, false), (20, true), (200, true), (201, false)] {
      let attributes = ProjectAttributes {
        description: "d".repeat(len),
        ..attributes()
      };
      assert_eq!(attributes.validate().is_ok(), valid, "length {len}");
    }
  }

  #[test]
  fn description_length_counts_characters() {
    let attributes = ProjectAttributes {
      description: "ü".repeat(200),
      ..attributes()
    };

    assert!(attributes.validate().is_ok());
  }

  #[test]
  fn github_url_must_point_at_a_repository() {
    for url in [
      "https://github.com/foo/bar",
      "http://www.github.com/foo/bar/",
      "HTTPS://GITHUB.COM/Foo/Bar.js",
    ] {
      let attributes = ProjectAttributes {
        github_url: url.to_string(),
        ..attributes()
      };
      assert!(attributes.validate().is_ok(), "url: {url}");
    }

    for url in [
      "github.com/foo/bar",
      "https://gitlab.com/foo/bar",
      "https://github.com/foo/bar/issues",
      "git@github.com:foo/bar.git",
    ] {
      let attributes = ProjectAttributes {
        github_url: url.to_string(),
        ..attributes()
      };
      assert_eq!(failed_fields(&attributes), vec!["github_url"], "url: {url}");
    }
  }

  #[test]
  fn github_url_owner_and_repository_are_ascii() {
    for url in ["https://github.com/föö/bär", "https://github.com/foo/bär", "https://github.com/ｆｏｏ/bar"] {
      let attributes = ProjectAttributes {
        github_url: url.to_string(),
        ..attributes()
      };
      assert_eq!(failed_fields(&attributes), vec!["github_url"], "url: {url}");
    }
  }

  #[test]
  fn missing_fields_deserialize_as_blank() {
    let attributes: ProjectAttributes = serde_json::from_value(serde_json::json!({
      "description": "x".repeat(20),
      "github_url": "https://github.com/octahive/octarepo",
      "main_language": "Rust",
    }))
    .unwrap();

    assert_eq!(failed_fields(&attributes), vec!["name"]);
  }

  #[test]
  fn blank_language_reports_blank_and_inclusion() {
    let attributes = ProjectAttributes {
      main_language: " ".to_string(),
      ..attributes()
    };

    let errors = attributes.validate().unwrap_err();
    let mut codes: Vec<String> = errors.field_errors()["main_language"]
      .iter()
      .map(|err| err.code.to_string())
      .collect();
    codes.sort();
    assert_eq!(codes, vec!["blank", "inclusion"]);
  }

  #[tokio::test]
  async fn storage_unique_violation_becomes_github_url_error() {
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .connect("sqlite::memory:")
      .await
      .unwrap();
    crate::migrate(&pool).await.unwrap();

    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, nickname) VALUES (?1, 'octocat')")
      .bind(user_id)
      .execute(&pool)
      .await
      .unwrap();

    let mut results = Vec::new();
    for url in ["https://github.com/octahive/octarepo", "https://github.com/OctaHive/OctaRepo"] {
      let result = sqlx::query_as::<_, ProjectRow>(INSERT_PROJECT)
        .bind(Uuid::new_v4())
        .bind("octarepo")
        .bind("x".repeat(20))
        .bind(url)
        .bind("Rust")
        .bind(user_id)
        .fetch_one(&pool)
        .await;
      results.push(result);
    }

    assert!(results[0].is_ok());
    let err = map_write_error(results.remove(1).unwrap_err());
    assert_eq!(
      err.field_errors(),
      vec![("github_url".to_string(), vec![TAKEN_MESSAGE.to_string()])]
    );

    let err = map_write_error(SqlxError::RowNotFound);
    assert!(matches!(err, CatalogError::DatabaseError(SqlxError::RowNotFound)));
  }

  #[test]
  fn main_language_must_be_known() {
    let ruby = ProjectAttributes {
      main_language: "Ruby".to_string(),
      ..attributes()
    };
    assert!(ruby.validate().is_ok());

    for language in ["COBOL-74", "ruby"] {
      let attributes = ProjectAttributes {
        main_language: language.to_string(),
        ..attributes()
      };
      let errors = attributes.validate().unwrap_err();
      let messages: Vec<String> = errors.field_errors()["main_language"]
        .iter()
        .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .collect();
      assert_eq!(messages, vec!["must be a programming language"]);
    }
  }

  #[test]
  fn nested_labels_without_id_are_dropped() {
    let docs = Uuid::new_v4();
    let easy = Uuid::new_v4();
    let labels = vec![
      LabelAttributes {
        id: Some(docs),
        name: None,
      },
      LabelAttributes {
        id: None,
        name: Some("brand new".to_string()),
      },
      LabelAttributes {
        id: Some(easy),
        name: Some("easy".to_string()),
      },
      LabelAttributes {
        id: Some(docs),
        name: None,
      },
    ];

    assert_eq!(nested_label_ids(&labels), vec![docs, easy]);
  }
}
