pub mod prompt;

use anyhow::Result;

/// Environment variable name for providing a GitHub token without a prompt
pub const ENV_TOKEN_VAR: &str = "TUGBOAT_GH_TOKEN";

pub use prompt::prompt_for_secret;

/// Check for a GitHub token in the TUGBOAT_GH_TOKEN environment variable.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env() -> Option<String> {
    non_empty(std::env::var(ENV_TOKEN_VAR).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Find the password or token to authenticate with: the command line value,
/// then the environment, then an interactive prompt.
pub fn resolve_secret(password: Option<String>, username: Option<&str>) -> Result<String> {
    if let Some(secret) = non_empty(password) {
        return Ok(secret);
    }

    if let Some(token) = get_token_from_env() {
        tracing::debug!("Using token from {}", ENV_TOKEN_VAR);
        return Ok(token);
    }

    prompt_for_secret(username)
}
