use chrono::{DateTime, Months, SecondsFormat, Utc};
use tracing::{debug, instrument};

use crate::{
  entities::project::ProjectRow,
  github::{Credentials, GithubConnector, GithubResult, ListOptions, ScorerFactory},
};

pub const DEFAULT_ISSUES_MONTHS: u32 = 6;
pub const DEFAULT_COMMITS_MONTHS: u32 = 3;
pub const COMMITS_BRANCH: &str = "master";

/// Timestamp `months` months before `now`, in UTC ISO-8601 with second precision.
pub fn lookback_cutoff(now: DateTime<Utc>, months: u32) -> String {
  now
    .checked_sub_months(Months::new(months))
    .unwrap_or(DateTime::<Utc>::MIN_UTC)
    .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Issues of the project's repository opened or updated within the last
/// `months_ago` months (six by default).
#[instrument(skip(connector, credentials, options), fields(project_id = %project.id))]
pub async fn issues(
  project: &ProjectRow,
  connector: &dyn GithubConnector,
  credentials: &Credentials,
  months_ago: Option<u32>,
  mut options: ListOptions,
) -> GithubResult {
  options.set_since(lookback_cutoff(
    Utc::now(),
    months_ago.unwrap_or(DEFAULT_ISSUES_MONTHS),
  ));

  let repository = project.github_repository();
  debug!("Fetch issues of {} since {:?}", repository, options.since);

  connector.connect(credentials).issues(&repository, options).await
}

/// Commits on `master` within the last `months_ago` months (three by default).
/// A caller supplied `sha` is always replaced.
#[instrument(skip(connector, credentials, options), fields(project_id = %project.id))]
pub async fn commits(
  project: &ProjectRow,
  connector: &dyn GithubConnector,
  credentials: &Credentials,
  months_ago: Option<u32>,
  mut options: ListOptions,
) -> GithubResult {
  options.set_since(lookback_cutoff(
    Utc::now(),
    months_ago.unwrap_or(DEFAULT_COMMITS_MONTHS),
  ));
  options.set_sha(COMMITS_BRANCH);

  let repository = project.github_repository();
  debug!("Fetch commits of {} since {:?}", repository, options.since);

  connector.connect(credentials).commits(&repository, options).await
}

#[instrument(skip(connector, credentials), fields(project_id = %project.id))]
pub async fn repo(project: &ProjectRow, connector: &dyn GithubConnector, credentials: &Credentials) -> GithubResult {
  connector
    .connect(credentials)
    .repository(&project.github_repository())
    .await
}

#[instrument(skip(factory, credentials), fields(project_id = %project.id))]
pub async fn score(
  project: &ProjectRow,
  factory: &dyn ScorerFactory,
  credentials: &Credentials,
) -> GithubResult<f64> {
  factory.scorer(credentials, project).score().await
}
