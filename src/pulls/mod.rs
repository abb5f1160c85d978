//! Wrapped pull requests and the walk that collects them from repositories.

pub mod resolver;
pub mod wrapper;

pub use resolver::{
    from_all, from_organization, from_repo, from_repos, from_user, RepoCallback, Target,
};
pub use wrapper::PullRequest;
