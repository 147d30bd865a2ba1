use sqlx::{QueryBuilder, Sqlite};

/// A single named filter over the `projects` table (aliased `p`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
  NotOwner(String),
  ByLanguage(String),
  ByLanguages(Vec<String>),
  ByLabels(Vec<String>),
  Active,
}

impl ProjectScope {
  /// Appends this filter as a boolean SQL expression.
  pub fn push_condition(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
    match self {
      // Compared literally against the un-prefixed form; stored URLs carry a scheme.
      ProjectScope::NotOwner(user) => {
        builder.push("p.github_url <> ").push_bind(format!("github.com/{user}/"));
      },
      ProjectScope::ByLanguage(language) => {
        builder
          .push("lower(p.main_language) = ")
          .push_bind(language.to_lowercase());
      },
      ProjectScope::ByLanguages(languages) => {
        if languages.is_empty() {
          builder.push("1 = 0");
          return;
        }

        builder.push("lower(p.main_language) IN (");
        let mut separated = builder.separated(", ");
        for language in languages {
          separated.push_bind(language.clone());
        }
        separated.push_unseparated(")");
      },
      ProjectScope::ByLabels(labels) => {
        if labels.is_empty() {
          builder.push("1 = 0");
          return;
        }

        builder.push(
          "p.id IN (SELECT pl.project_id FROM project_labels AS pl \
           INNER JOIN labels AS l ON l.id = pl.label_id WHERE l.name IN (",
        );
        let mut separated = builder.separated(", ");
        for label in labels {
          separated.push_bind(label.clone());
        }
        separated.push_unseparated("))");
      },
      ProjectScope::Active => {
        builder.push("(p.inactive IS NULL OR p.inactive = 0)");
      },
    }
  }
}

/// Conjunction of [`ProjectScope`]s, built by chaining.
///
/// ```ignore
/// let scopes = Scopes::new().active().by_language("ruby").by_labels(["docs"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scopes(Vec<ProjectScope>);

impl Scopes {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn not_owner(self, user: impl Into<String>) -> Self {
    self.with(ProjectScope::NotOwner(user.into()))
  }

  pub fn by_language(self, language: impl Into<String>) -> Self {
    self.with(ProjectScope::ByLanguage(language.into()))
  }

  /// Matches lower-cased `main_language` against the given names as-is.
  pub fn by_languages<I, S>(self, languages: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.with(ProjectScope::ByLanguages(languages.into_iter().map(Into::into).collect()))
  }

  pub fn by_labels<I, S>(self, labels: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.with(ProjectScope::ByLabels(labels.into_iter().map(Into::into).collect()))
  }

  pub fn active(self) -> Self {
    self.with(ProjectScope::Active)
  }

  pub fn with(mut self, scope: ProjectScope) -> Self {
    self.0.push(scope);
    self
  }

  pub fn scopes(&self) -> &[ProjectScope] {
    &self.0
  }

  /// Appends a `WHERE` clause joining every scope with `AND`. No-op when empty.
  pub fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
    for (i, scope) in self.0.iter().enumerate() {
      builder.push(if i == 0 { " WHERE (" } else { " AND (" });
      scope.push_condition(builder);
      builder.push(")");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sql(scopes: &Scopes) -> String {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT p.* FROM projects AS p");
    scopes.push_where(&mut builder);
    builder.sql().to_string()
  }

  #[test]
  fn empty_scopes_add_no_where_clause() {
    assert_eq!(sql(&Scopes::new()), "SELECT p.* FROM projects AS p");
  }

  #[test]
  fn scopes_are_joined_with_and() {
    let scopes = Scopes::new().active().by_language("Ruby").by_languages(["ruby", "go"]);

    assert_eq!(
      sql(&scopes),
      "SELECT p.* FROM projects AS p WHERE ((p.inactive IS NULL OR p.inactive = 0)) \
       AND (lower(p.main_language) = ?) AND (lower(p.main_language) IN (?, ?))"
    );
  }

  #[test]
  fn label_scope_uses_a_subquery() {
    let scopes = Scopes::new().by_labels(["docs", "easy"]);

    assert_eq!(
      sql(&scopes),
      "SELECT p.* FROM projects AS p WHERE (p.id IN (SELECT pl.project_id FROM project_labels AS pl \
       INNER JOIN labels AS l ON l.id = pl.label_id WHERE l.name IN (?, ?)))"
    );
  }

  #[test]
  fn empty_sets_match_nothing() {
    let scopes = Scopes::new().by_languages(Vec::<String>::new()).by_labels(Vec::<String>::new());

    assert_eq!(sql(&scopes), "SELECT p.* FROM projects AS p WHERE (1 = 0) AND (1 = 0)");
  }

  #[test]
  fn chaining_keeps_scope_order() {
    let scopes = Scopes::new().not_owner("octocat").active();

    assert_eq!(
      scopes.scopes(),
      &[ProjectScope::NotOwner("octocat".to_string()), ProjectScope::Active]
    );
  }
}
