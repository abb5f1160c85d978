//! The capabilities the report needs from the hosting API, and the octocrab
//! implementation used by the binary.
//!
//! Everything above this module talks to [`HostingApi`] only, so tests can
//! swap in an in-memory fake.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Mutex;

use super::error::{map_octocrab_error, ApiError};
use super::types::{Account, RawPullRequest, Repository};

const PER_PAGE: &str = "100";

#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Fetch one repository by its "owner/repo" name
    async fn get_repo(&self, full_name: &str) -> Result<Repository, ApiError>;

    /// Every repository visible to the authenticated identity
    async fn get_repos(&self) -> Result<Vec<Repository>, ApiError>;

    async fn get_organization(&self, name: &str) -> Result<Account, ApiError>;

    async fn get_organization_repos(&self, org: &Account) -> Result<Vec<Repository>, ApiError>;

    async fn get_user(&self, name: &str) -> Result<Account, ApiError>;

    async fn get_user_repos(&self, user: &Account) -> Result<Vec<Repository>, ApiError>;

    /// Open pull requests of a repository, in the order GitHub lists them.
    /// The author's display name is filled in where GitHub knows it.
    async fn get_pulls(&self, repo: &Repository) -> Result<Vec<RawPullRequest>, ApiError>;

    /// Round trip for a single pull request's mergeability.
    /// `None` means GitHub has not finished computing it.
    async fn get_mergeable(&self, repo: &Repository, number: u64)
        -> Result<Option<bool>, ApiError>;
}

/// Octocrab-backed [`HostingApi`]
pub struct OctocrabHosting {
    client: Octocrab,
    // login -> display name, so each author profile is fetched once per run
    names: Mutex<HashMap<String, Option<String>>>,
}

impl OctocrabHosting {
    pub fn new(client: Octocrab) -> Self {
        Self {
            client,
            names: Mutex::new(HashMap::new()),
        }
    }

    async fn get_one<T>(&self, route: String, operation: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        tracing::debug!("GET {}", route);
        self.client
            .get::<T, _, _>(route, None::<&()>)
            .await
            .map_err(|e| map_octocrab_error(operation, e))
    }

    /// Fetch every page of a listing
    async fn list<T>(
        &self,
        route: String,
        params: &[(&str, &str)],
        operation: &str,
    ) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        tracing::debug!("GET {} (all pages)", route);
        let page: Page<T> = self
            .client
            .get(route, Some(params))
            .await
            .map_err(|e| map_octocrab_error(operation, e))?;

        self.client
            .all_pages(page)
            .await
            .map_err(|e| map_octocrab_error(operation, e))
    }

    async fn display_name(&self, login: &str) -> Result<Option<String>, ApiError> {
        let cached = self.names.lock().unwrap().get(login).cloned();
        if let Some(name) = cached {
            return Ok(name);
        }

        let profile: Account = self
            .get_one(format!("/users/{}", login), "get user profile")
            .await?;

        self.names
            .lock()
            .unwrap()
            .insert(login.to_string(), profile.name.clone());
        Ok(profile.name)
    }
}

#[async_trait]
impl HostingApi for OctocrabHosting {
    async fn get_repo(&self, full_name: &str) -> Result<Repository, ApiError> {
        self.get_one(format!("/repos/{}", full_name), "get repository")
            .await
    }

    async fn get_repos(&self) -> Result<Vec<Repository>, ApiError> {
        self.list("/user/repos".to_string(), &[("per_page", PER_PAGE)], "list repositories")
            .await
    }

    async fn get_organization(&self, name: &str) -> Result<Account, ApiError> {
        self.get_one(format!("/orgs/{}", name), "get organization")
            .await
    }

    async fn get_organization_repos(&self, org: &Account) -> Result<Vec<Repository>, ApiError> {
        self.list(
            format!("/orgs/{}/repos", org.login),
            &[("per_page", PER_PAGE)],
            "list organization repositories",
        )
        .await
    }

    async fn get_user(&self, name: &str) -> Result<Account, ApiError> {
        self.get_one(format!("/users/{}", name), "get user").await
    }

    async fn get_user_repos(&self, user: &Account) -> Result<Vec<Repository>, ApiError> {
        self.list(
            format!("/users/{}/repos", user.login),
            &[("per_page", PER_PAGE)],
            "list user repositories",
        )
        .await
    }

    async fn get_pulls(&self, repo: &Repository) -> Result<Vec<RawPullRequest>, ApiError> {
        let mut pulls: Vec<RawPullRequest> = self
            .list(
                format!("/repos/{}/pulls", repo.full_name),
                &[("state", "open"), ("per_page", PER_PAGE)],
                "list pull requests",
            )
            .await?;

        for pull in &mut pulls {
            pull.user.name = self.display_name(&pull.user.login).await?;
        }

        Ok(pulls)
    }

    async fn get_mergeable(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<Option<bool>, ApiError> {
        let pull: RawPullRequest = self
            .get_one(
                format!("/repos/{}/pulls/{}", repo.full_name, number),
                "get pull request",
            )
            .await?;
        Ok(pull.mergeable)
    }
}
