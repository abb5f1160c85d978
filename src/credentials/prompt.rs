use anyhow::{Context, Result};

/// Text shown when asking for the secret
pub fn prompt_text(username: Option<&str>) -> String {
    match username {
        Some(user) => format!("Password for {}> ", user),
        None => "GitHub token> ".to_string(),
    }
}

/// Prompts the user for a password or personal access token
pub fn prompt_for_secret(username: Option<&str>) -> Result<String> {
    let secret = rpassword::prompt_password(prompt_text(username))
        .context("Failed to read password from terminal")?;

    let secret = secret.trim();

    if secret.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    Ok(secret.to_string())
}
