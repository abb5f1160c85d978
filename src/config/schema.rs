use serde::{Deserialize, Serialize};

use crate::pulls::Target;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    /// "created", "updated" or "repo"
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

/// One repository specification, e.g. `- org: rackerlabs`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetConfig {
    Repo(String),
    User(String),
    #[serde(alias = "org")]
    Organization(String),
}

impl TargetConfig {
    pub fn into_target(self) -> (Target, String) {
        match self {
            TargetConfig::Repo(name) => (Target::Repo, name),
            TargetConfig::User(name) => (Target::User, name),
            TargetConfig::Organization(name) => (Target::Organization, name),
        }
    }
}
