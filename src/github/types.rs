use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A GitHub account. Used both for users and organizations, and for the
/// author of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub login: String,
    /// Display name; only present on full profile responses
    #[serde(default)]
    pub name: Option<String>,
}

impl Account {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            name: None,
        }
    }
}

/// A repository handle as returned by the repository endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub full_name: String, // "owner/repo" format
    pub name: String,
    pub owner: Account,
    #[serde(default)]
    pub private: bool,
}

impl Repository {
    /// Build a handle from an "owner/repo" name
    pub fn from_full_name(full_name: &str) -> Self {
        let (owner, name) = full_name.split_once('/').unwrap_or(("", full_name));
        Self {
            full_name: full_name.to_string(),
            name: name.to_string(),
            owner: Account::new(owner),
            private: false,
        }
    }
}

/// One side of a pull request (head or base)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchRef {
    pub label: String, // "owner:branch"
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

/// A pull request record exactly as the hosting API reports it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawPullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub head: BranchRef,
    pub base: BranchRef,
    pub user: Account,
    /// Not computed on listings; `None` until GitHub has worked it out
    #[serde(default)]
    pub mergeable: Option<bool>,
    #[serde(default)]
    pub draft: bool,
}
