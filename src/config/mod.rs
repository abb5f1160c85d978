mod schema;

pub use schema::{Config, TargetConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::github::DEFAULT_GITHUB_URL;
use crate::pulls::Target;
use crate::report::SortKey;

/// Get the config directory path (~/.config/tugboat/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("tugboat"))
}

/// Get the default config file path (~/.config/tugboat/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/tugboat/config.yaml), and a missing default file yields an
///   empty configuration.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly named config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => match get_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = serde_saphyr::from_str(content)?;
    Ok(config)
}

/// Values given on the command line; these win over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub username: Option<String>,
    pub github_url: Option<String>,
    pub sort_by: Option<SortKey>,
    pub targets: Vec<(Target, String)>,
}

/// Effective settings for one run
#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    pub username: Option<String>,
    pub github_url: String,
    /// `None` leaves pulls in collection order
    pub sort_by: Option<SortKey>,
    pub targets: Vec<(Target, String)>,
}

impl Config {
    pub fn merge(self, cli: Overrides) -> Settings {
        let sort_by = match (cli.sort_by, self.sort_by) {
            (Some(key), _) => Some(key),
            (None, Some(name)) => {
                let key = SortKey::parse(&name);
                if key.is_none() {
                    tracing::warn!("Unknown sort_by {:?} in config, keeping collection order", name);
                }
                key
            }
            (None, None) => Some(SortKey::default()),
        };

        let targets = if cli.targets.is_empty() {
            self.targets.into_iter().map(TargetConfig::into_target).collect()
        } else {
            cli.targets
        };

        Settings {
            username: cli.username.or(self.username),
            github_url: cli
                .github_url
                .or(self.github_url)
                .unwrap_or_else(|| DEFAULT_GITHUB_URL.to_string()),
            sort_by,
            targets,
        }
    }
}
