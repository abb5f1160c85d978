pub mod client;
pub mod error;
pub mod gateway;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use client::{create_client, DEFAULT_GITHUB_URL};
pub use error::ApiError;
pub use gateway::{HostingApi, OctocrabHosting};
pub use types::{Account, BranchRef, RawPullRequest, Repository};
