use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{label::Label, user::User};

static REPOSITORY_PREFIX: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)^(((https|http|git)?://(www\.)?)|git@)github\.com(:|/)").unwrap());
static REPOSITORY_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\.git|/)$").unwrap());

/// Reduces a GitHub URL to its bare `owner/repo` slug.
///
/// Accepts the `https://`, `http://` and `git://` forms (each optionally with
/// `www.`) as well as the SSH `git@github.com:` form, and drops a trailing
/// `.git` or `/`. A bare slug is returned as is.
pub fn github_repository(github_url: &str) -> String {
  let without_prefix = REPOSITORY_PREFIX.replace(github_url, "");
  REPOSITORY_SUFFIX.replace(&without_prefix, "").into_owned()
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
pub struct ProjectRow {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub github_url: String,
  pub main_language: String,
  pub inactive: Option<bool>,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl ProjectRow {
  pub fn github_repository(&self) -> String {
    github_repository(&self.github_url)
  }

  /// Unset counts as active.
  pub fn is_active(&self) -> bool {
    !self.inactive.unwrap_or(false)
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub github_url: String,
  pub main_language: String,
  pub inactive: Option<bool>,
  pub submitted_by: User,
  pub labels: Vec<Label>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Project {
  pub fn github_repository(&self) -> String {
    github_repository(&self.github_url)
  }

  pub fn is_active(&self) -> bool {
    !self.inactive.unwrap_or(false)
  }

  pub fn label_names(&self) -> Vec<&str> {
    self.labels.iter().map(|label| label.name.as_str()).collect()
  }
}

impl From<&Project> for ProjectRow {
  fn from(project: &Project) -> Self {
    ProjectRow {
      id: project.id,
      name: project.name.clone(),
      description: project.description.clone(),
      github_url: project.github_url.clone(),
      main_language: project.main_language.clone(),
      inactive: project.inactive,
      user_id: project.submitted_by.id,
      created_at: project.created_at,
      updated_at: project.updated_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn github_repository_strips_url_forms() {
    for url in [
      "https://github.com/foo/bar",
      "http://www.github.com/foo/bar/",
      "git@github.com:foo/bar.git",
      "git://github.com/foo/bar.git",
      "HTTPS://GitHub.com/foo/bar",
      "foo/bar",
    ] {
      assert_eq!(github_repository(url), "foo/bar", "url: {url}");
    }
  }

  #[test]
  fn github_repository_is_idempotent() {
    let once = github_repository("https://www.github.com/rust-lang/rust.git");
    assert_eq!(once, "rust-lang/rust");
    assert_eq!(github_repository(&once), once);
  }

  #[test]
  fn github_repository_keeps_dots_inside_the_name() {
    assert_eq!(github_repository("https://github.com/foo/bar.js"), "foo/bar.js");
    assert_eq!(github_repository("https://github.com/foo/bar.js.git"), "foo/bar.js");
  }

  #[test]
  fn unset_inactive_means_active() {
    let now = Utc::now();
    let mut row = ProjectRow {
      id: Uuid::new_v4(),
      name: "octarepo".to_string(),
      description: "A catalog of projects worth contributing to".to_string(),
      github_url: "https://github.com/foo/bar".to_string(),
      main_language: "Rust".to_string(),
      inactive: None,
      user_id: Uuid::new_v4(),
      created_at: now,
      updated_at: now,
    };
    assert!(row.is_active());

    row.inactive = Some(false);
    assert!(row.is_active());

    row.inactive = Some(true);
    assert!(!row.is_active());
    assert_eq!(row.github_repository(), "foo/bar");
  }
}
