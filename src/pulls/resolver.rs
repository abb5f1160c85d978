use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::rc::Rc;

use super::wrapper::PullRequest;
use crate::github::{HostingApi, Repository};

/// Progress hook invoked around each repository visited.
#[async_trait(?Send)]
pub trait RepoCallback {
    /// A free-form status line (e.g. `Looking up repo "x"...`)
    fn status(&mut self, line: &str);

    /// Called before the pull requests of `repo` are fetched
    fn before_fetch(&mut self, index: usize, count: usize, repo: &Repository);

    /// Called with the pull requests just fetched for `repo`
    async fn after_fetch(
        &mut self,
        api: &dyn HostingApi,
        index: usize,
        count: usize,
        repo: &Repository,
        pulls: &[Rc<PullRequest>],
    ) -> Result<()>;
}

/// What a repository specification names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Repo,
    User,
    Organization,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Repo => write!(f, "repo"),
            Target::User => write!(f, "user"),
            Target::Organization => write!(f, "organization"),
        }
    }
}

impl Target {
    /// Retrieve all open pull requests for the repositories `name` designates
    pub async fn resolve<'c>(
        self,
        api: &dyn HostingApi,
        name: &str,
        callback: Option<&mut (dyn RepoCallback + 'c)>,
    ) -> Result<Vec<Rc<PullRequest>>> {
        match self {
            Target::Repo => from_repo(api, name, callback).await,
            Target::User => from_user(api, name, callback).await,
            Target::Organization => from_organization(api, name, callback).await,
        }
    }
}

/// Build the list of all open pull requests in the given repositories.
///
/// Repositories are visited in order and their pulls appended in listing
/// order; nothing is sorted or deduplicated. The first failed fetch aborts
/// the whole walk.
pub async fn from_repos<'c>(
    api: &dyn HostingApi,
    repos: Vec<Repository>,
    mut callback: Option<&mut (dyn RepoCallback + 'c)>,
) -> Result<Vec<Rc<PullRequest>>> {
    let count = repos.len();
    let mut pulls = Vec::new();

    for (idx, repo) in repos.into_iter().enumerate() {
        if let Some(cb) = callback.as_deref_mut() {
            cb.before_fetch(idx, count, &repo);
        }

        let repo_pulls: Vec<Rc<PullRequest>> = api
            .get_pulls(&repo)
            .await?
            .into_iter()
            .map(|pr| Rc::new(PullRequest::new(repo.clone(), pr)))
            .collect();

        if let Some(cb) = callback.as_deref_mut() {
            cb.after_fetch(api, idx, count, &repo, &repo_pulls).await?;
        }

        pulls.extend(repo_pulls);
    }

    Ok(pulls)
}

/// Open pull requests of one repository, named "owner/repo"
pub async fn from_repo<'c>(
    api: &dyn HostingApi,
    repo_name: &str,
    callback: Option<&mut (dyn RepoCallback + 'c)>,
) -> Result<Vec<Rc<PullRequest>>> {
    let repo = api.get_repo(repo_name).await?;
    from_repos(api, vec![repo], callback).await
}

/// Open pull requests across every repository of an organization
pub async fn from_organization<'c>(
    api: &dyn HostingApi,
    org_name: &str,
    callback: Option<&mut (dyn RepoCallback + 'c)>,
) -> Result<Vec<Rc<PullRequest>>> {
    let org = api.get_organization(org_name).await?;
    let repos = api.get_organization_repos(&org).await?;
    from_repos(api, repos, callback).await
}

/// Open pull requests across every repository belonging to a user
pub async fn from_user<'c>(
    api: &dyn HostingApi,
    user_name: &str,
    callback: Option<&mut (dyn RepoCallback + 'c)>,
) -> Result<Vec<Rc<PullRequest>>> {
    let user = api.get_user(user_name).await?;
    let repos = api.get_user_repos(&user).await?;
    from_repos(api, repos, callback).await
}

/// Open pull requests across every repository the authenticated identity can see
pub async fn from_all<'c>(
    api: &dyn HostingApi,
    callback: Option<&mut (dyn RepoCallback + 'c)>,
) -> Result<Vec<Rc<PullRequest>>> {
    let repos = api.get_repos().await?;
    from_repos(api, repos, callback).await
}
