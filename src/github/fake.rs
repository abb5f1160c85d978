//! In-memory [`HostingApi`] for tests. Records every call it receives.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use super::error::ApiError;
use super::gateway::HostingApi;
use super::types::{Account, BranchRef, RawPullRequest, Repository};

/// Timestamp `secs` seconds after the epoch
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// A pull request with the given creation and update times (epoch seconds)
pub fn raw_pull(number: u64, created: i64, updated: i64) -> RawPullRequest {
    RawPullRequest {
        number,
        title: format!("Pull {}", number),
        html_url: format!("https://github.com/pull/{}", number),
        created_at: at(created),
        updated_at: at(updated),
        head: BranchRef {
            label: format!("fork:feature-{}", number),
            ref_name: format!("feature-{}", number),
            sha: "a1".to_string(),
        },
        base: BranchRef {
            label: "owner:main".to_string(),
            ref_name: "main".to_string(),
            sha: "b2".to_string(),
        },
        user: Account {
            login: "me".to_string(),
            name: Some("spam".to_string()),
        },
        mergeable: None,
        draft: false,
    }
}

#[derive(Default)]
pub struct FakeHosting {
    repos: Vec<(Repository, Vec<RawPullRequest>)>,
    mergeable: HashMap<(String, u64), Option<bool>>,
    failing: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeHosting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repository and its open pulls. Pulls default to mergeable.
    pub fn with_repo(mut self, full_name: &str, pulls: Vec<RawPullRequest>) -> Self {
        for pull in &pulls {
            self.mergeable
                .insert((full_name.to_string(), pull.number), Some(true));
        }
        self.repos.push((Repository::from_full_name(full_name), pulls));
        self
    }

    pub fn with_mergeable(mut self, full_name: &str, number: u64, value: Option<bool>) -> Self {
        self.mergeable.insert((full_name.to_string(), number), value);
        self
    }

    /// Listing pulls of this repository fails
    pub fn failing_on(mut self, full_name: &str) -> Self {
        self.failing = Some(full_name.to_string());
        self
    }

    pub fn repo(&self, full_name: &str) -> Repository {
        Repository::from_full_name(full_name)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn owned_by(&self, login: &str) -> Vec<Repository> {
        self.repos
            .iter()
            .filter(|(repo, _)| repo.owner.login == login)
            .map(|(repo, _)| repo.clone())
            .collect()
    }

    fn account(&self, login: &str) -> Result<Account, ApiError> {
        if self.owned_by(login).is_empty() {
            return Err(ApiError::NotFound(format!("no account {}", login)));
        }
        Ok(Account::new(login))
    }
}

#[async_trait]
impl HostingApi for FakeHosting {
    async fn get_repo(&self, full_name: &str) -> Result<Repository, ApiError> {
        self.record(format!("get_repo {}", full_name));
        self.repos
            .iter()
            .find(|(repo, _)| repo.full_name == full_name)
            .map(|(repo, _)| repo.clone())
            .ok_or_else(|| ApiError::NotFound(format!("no repository {}", full_name)))
    }

    async fn get_repos(&self) -> Result<Vec<Repository>, ApiError> {
        self.record("get_repos".to_string());
        Ok(self.repos.iter().map(|(repo, _)| repo.clone()).collect())
    }

    async fn get_organization(&self, name: &str) -> Result<Account, ApiError> {
        self.record(format!("get_organization {}", name));
        self.account(name)
    }

    async fn get_organization_repos(&self, org: &Account) -> Result<Vec<Repository>, ApiError> {
        self.record(format!("get_organization_repos {}", org.login));
        Ok(self.owned_by(&org.login))
    }

    async fn get_user(&self, name: &str) -> Result<Account, ApiError> {
        self.record(format!("get_user {}", name));
        self.account(name)
    }

    async fn get_user_repos(&self, user: &Account) -> Result<Vec<Repository>, ApiError> {
        self.record(format!("get_user_repos {}", user.login));
        Ok(self.owned_by(&user.login))
    }

    async fn get_pulls(&self, repo: &Repository) -> Result<Vec<RawPullRequest>, ApiError> {
        self.record(format!("get_pulls {}", repo.full_name));
        if self.failing.as_deref() == Some(repo.full_name.as_str()) {
            return Err(ApiError::Api(format!("listing {} failed", repo.full_name)));
        }
        Ok(self
            .repos
            .iter()
            .find(|(r, _)| r.full_name == repo.full_name)
            .map(|(_, pulls)| pulls.clone())
            .unwrap_or_default())
    }

    async fn get_mergeable(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<Option<bool>, ApiError> {
        self.record(format!("get_mergeable {}#{}", repo.full_name, number));
        Ok(self
            .mergeable
            .get(&(repo.full_name.clone(), number))
            .copied()
            .flatten())
    }
}
