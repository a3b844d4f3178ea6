#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
};

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use typed_builder::TypedBuilder;

use crate::{constants::LIST_ISSUES, error::GradingError};

/// An issue as listed from a student repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct Issue {
    /// Issue title, matched against grade spec patterns.
    pub title:      String,
    /// Issue body.
    #[serde(default)]
    #[builder(default)]
    pub body:       String,
    /// Issue number within its repository.
    pub number:     u64,
    /// When the issue was opened, if known.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    #[builder(default)]
    pub created_at: Option<NaiveDateTime>,
    /// Username of whoever opened the issue.
    pub author:     String,
}

/// Accepts RFC 3339 timestamps as well as the naive `T`- or space-separated
/// forms, with or without fractional seconds.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.naive_utc()));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp `{raw}`")))
}

/// Outcome reported by whatever produced a hook result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The hook ran to completion.
    #[default]
    Success,
    /// The hook ran, with warnings.
    Warning,
    /// The hook failed.
    Error,
}

/// One result attached to a repository in the results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookResult {
    /// Discriminator, e.g. `list-issues`.
    pub name:   String,
    /// Reported status.
    #[serde(default)]
    pub status: Status,
    /// Optional message.
    #[serde(default)]
    pub msg:    Option<String>,
    /// Payload. For `list-issues` results this maps issue numbers to issues.
    #[serde(default)]
    pub data:   serde_json::Map<String, serde_json::Value>,
}

impl HookResult {
    /// Creates a `list-issues` result holding `issues`.
    pub fn list_issues<I: IntoIterator<Item = Issue>>(issues: I) -> Result<Self, serde_json::Error> {
        let data = issues
            .into_iter()
            .map(|issue| serde_json::to_value(&issue).map(|value| (issue.number.to_string(), value)))
            .collect::<Result<serde_json::Map<_, _>, _>>()?;
        Ok(Self {
            name: LIST_ISSUES.to_string(),
            status: Status::Success,
            msg: None,
            data,
        })
    }

    /// Decodes the payload as issues, in ascending issue number order.
    pub fn issues(&self) -> Result<Vec<Issue>, serde_json::Error> {
        let mut issues = self
            .data
            .values()
            .map(|v| Issue::deserialize(v))
            .collect::<Result<Vec<_>, _>>()?;
        issues.sort_by_key(|i| i.number);
        Ok(issues)
    }
}

/// State filter issues were listed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Only open issues.
    Open,
    /// Only closed issues.
    Closed,
    /// Every issue.
    All,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::All => "all",
        })
    }
}

/// The contents of a results file: repository name -> hook results.
///
/// The key `list-issues` is reserved for metadata about how issues were
/// listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HookResults(BTreeMap<String, Vec<HookResult>>);

impl HookResults {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the results of one repository.
    pub fn insert(&mut self, repo: impl Into<String>, results: Vec<HookResult>) {
        self.0.insert(repo.into(), results);
    }

    /// Builder-style [`HookResults::insert`].
    pub fn with(mut self, repo: impl Into<String>, results: Vec<HookResult>) -> Self {
        self.insert(repo, results);
        self
    }

    /// Returns the results of `repo`, or `None` if the repository is absent.
    pub fn get(&self, repo: &str) -> Option<&[HookResult]> {
        self.0.get(repo).map(Vec::as_slice)
    }

    /// Returns the `list-issues` result of `repo`.
    ///
    /// `Ok(None)` means the repository has no results at all.
    pub fn list_issues(&self, repo: &str) -> Result<Option<&HookResult>, GradingError> {
        let Some(results) = self.get(repo) else {
            return Ok(None);
        };
        results
            .iter()
            .find(|r| r.name == LIST_ISSUES)
            .map(Some)
            .ok_or_else(|| GradingError::MissingRecord(repo.to_string()))
    }

    /// Reads the issue state from the reserved metadata entry.
    pub fn issue_state(&self) -> Result<IssueState, GradingError> {
        let state = self
            .get(LIST_ISSUES)
            .and_then(|results| results.first())
            .and_then(|meta| meta.data.get("state"))
            .ok_or(GradingError::MissingMetadata)?;
        IssueState::deserialize(state)
            .map_err(|_| GradingError::IssueStateNotAll(state.to_string().trim_matches('"').into()))
    }

    /// Ensures issues were listed with the `all` state filter.
    pub fn check_issue_state(&self, allow_other_states: bool) -> Result<(), GradingError> {
        if self.get(LIST_ISSUES).is_none() {
            return Err(GradingError::MissingMetadata);
        }
        if allow_other_states {
            return Ok(());
        }
        match self.issue_state()? {
            IssueState::All => Ok(()),
            other => Err(GradingError::IssueStateNotAll(other.to_string())),
        }
    }
}

/// Splits `issues` into those opened by an authorized author and the rest,
/// keeping their order.
pub fn authorize<'a, I>(issues: I, authorized: &HashSet<String>) -> (Vec<&'a Issue>, Vec<&'a Issue>)
where
    I: IntoIterator<Item = &'a Issue>,
{
    issues
        .into_iter()
        .partition(|issue| authorized.contains(&issue.author))
}
