use anyhow::{Context, Result};
use http::Uri;
use octocrab::Octocrab;

pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";

/// Create an authenticated GitHub client against the given API URL.
///
/// With a username the secret is sent with basic authentication (a password
/// or a personal access token both work); otherwise it is used as a token.
pub fn create_client(github_url: &str, username: Option<&str>, secret: &str) -> Result<Octocrab> {
    let base_uri: Uri = github_url
        .parse()
        .with_context(|| format!("Invalid GitHub API URL: {}", github_url))?;

    let builder = match username {
        Some(user) => Octocrab::builder().basic_auth(user.to_string(), secret.to_string()),
        None => Octocrab::builder().personal_token(secret.to_string()),
    };

    builder
        .base_uri(base_uri)
        .context("Invalid GitHub API URL")?
        .build()
        .context("Failed to create GitHub client")
}
