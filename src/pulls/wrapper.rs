use anyhow::Result;
use std::cell::Cell;
use std::ops::Deref;

use crate::github::{HostingApi, RawPullRequest, Repository};

/// A pull request together with the repository it was listed from.
///
/// Field access on the underlying record goes straight through (`pull.number`,
/// `pull.head.label`, ...). Mergeability is the exception: listings do not
/// carry it, so it is fetched on first use and cached until invalidated.
#[derive(Debug)]
pub struct PullRequest {
    repo: Repository,
    pr: RawPullRequest,
    mergeable: Cell<Option<bool>>,
}

impl PullRequest {
    pub fn new(repo: Repository, pr: RawPullRequest) -> Self {
        Self {
            repo,
            pr,
            mergeable: Cell::new(None),
        }
    }

    /// The repository the pull request is against
    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// The underlying record
    pub fn pr(&self) -> &RawPullRequest {
        &self.pr
    }

    /// Whether the pull request can be merged cleanly.
    ///
    /// Only the first call (or the first after [`invalidate_mergeable`]) asks
    /// the hosting API. If GitHub has not computed the value yet the pull is
    /// reported as not mergeable and the next call asks again.
    ///
    /// [`invalidate_mergeable`]: PullRequest::invalidate_mergeable
    pub async fn mergeable(&self, api: &dyn HostingApi) -> Result<bool> {
        if let Some(cached) = self.mergeable.get() {
            return Ok(cached);
        }

        let fetched = api.get_mergeable(&self.repo, self.pr.number).await?;
        self.mergeable.set(fetched);
        Ok(fetched.unwrap_or(false))
    }

    /// Forget the cached mergeability so the next access re-fetches it
    pub fn invalidate_mergeable(&self) {
        self.mergeable.set(None);
    }

    /// Return a short reference in the format "owner/repo#123"
    pub fn short_ref(&self) -> String {
        format!("{}#{}", self.repo.full_name, self.pr.number)
    }
}

impl Deref for PullRequest {
    type Target = RawPullRequest;

    fn deref(&self) -> &RawPullRequest {
        &self.pr
    }
}
