//! Remote collaborators a project talks to: the GitHub API client and the
//! popularity scorer. Both are traits so callers can plug in real clients
//! and tests can plug in fakes.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::entities::project::ProjectRow;

pub type GithubResult<T = Value> = Result<T, GithubError>;

#[derive(Debug, Error)]
pub enum GithubError {
  #[error("GitHub request failed: {0}")]
  Request(String),
  #[error("GitHub resource `{0}` is not found")]
  NotFound(String),
  #[error(transparent)]
  Other(#[from] anyhow::Error),
}

/// Identity used to build a client on behalf of a user.
#[derive(Debug)]
pub struct Credentials {
  pub nickname: String,
  pub token: SecretString,
}

impl Credentials {
  pub fn new(nickname: impl Into<String>, token: impl Into<String>) -> Self {
    Self {
      nickname: nickname.into(),
      token: SecretString::from(token.into()),
    }
  }
}

/// Query options forwarded to list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListOptions {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub since: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sha: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl ListOptions {
  /// Adds a query parameter. `since` and `sha` land in their typed fields so
  /// they are never shadowed by a flattened duplicate.
  pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    let key = key.into();
    let value = value.into();
    match key.as_str() {
      "since" => self.since = Some(value_to_string(value)),
      "sha" => self.sha = Some(value_to_string(value)),
      _ => {
        self.extra.insert(key, value);
      },
    }
    self
  }

  /// Sets the lookback cutoff, dropping any duplicate left in `extra`.
  pub fn set_since(&mut self, since: String) {
    self.extra.remove("since");
    self.since = Some(since);
  }

  /// Sets the branch, dropping any duplicate left in `extra`.
  pub fn set_sha(&mut self, sha: impl Into<String>) {
    self.extra.remove("sha");
    self.sha = Some(sha.into());
  }
}

fn value_to_string(value: Value) -> String {
  match value {
    Value::String(s) => s,
    other => other.to_string(),
  }
}

#[async_trait]
pub trait GithubClient: Send + Sync {
  async fn issues(&self, repository: &str, options: ListOptions) -> GithubResult;

  async fn commits(&self, repository: &str, options: ListOptions) -> GithubResult;

  async fn repository(&self, repository: &str) -> GithubResult;
}

/// Builds a [`GithubClient`] authenticated as the given user.
pub trait GithubConnector: Send + Sync {
  fn connect(&self, credentials: &Credentials) -> Box<dyn GithubClient>;
}

#[async_trait]
pub trait PopularityScorer: Send + Sync {
  async fn score(&self) -> GithubResult<f64>;
}

/// Builds a [`PopularityScorer`] for one project on behalf of a user.
pub trait ScorerFactory: Send + Sync {
  fn scorer(&self, credentials: &Credentials, project: &ProjectRow) -> Box<dyn PopularityScorer>;
}

#[cfg(test)]
mod tests {
  use secrecy::ExposeSecret;
  use serde_json::json;

  use super::*;

  #[test]
  fn list_options_flatten_extra_parameters() {
    let options = ListOptions {
      since: Some("2026-04-19T00:00:00Z".to_string()),
      ..Default::default()
    }
    .with("state", "open");

    assert_eq!(
      serde_json::to_value(&options).unwrap(),
      json!({ "since": "2026-04-19T00:00:00Z", "state": "open" })
    );
  }

  #[test]
  fn typed_parameters_are_not_shadowed_by_extra() {
    let mut options = ListOptions::default().with("sha", "develop").with("since", "1999-01-01T00:00:00Z");
    assert!(options.extra.is_empty());

    options.extra.insert("sha".to_string(), json!("feature"));
    options.set_sha("master");
    options.set_since("2026-04-19T00:00:00Z".to_string());

    assert_eq!(
      serde_json::to_value(&options).unwrap(),
      json!({ "since": "2026-04-19T00:00:00Z", "sha": "master" })
    );
  }

  #[test]
  fn credentials_hide_the_token() {
    let credentials = Credentials::new("octocat", "ghp_secret");

    assert_eq!(credentials.token.expose_secret(), "ghp_secret");
    assert!(!format!("{credentials:?}").contains("ghp_secret"));
  }
}
