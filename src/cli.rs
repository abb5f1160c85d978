//! Command line surface of the `tugboat` binary.

use clap::{ArgGroup, ArgMatches, Parser};
use std::path::PathBuf;

use crate::config::Overrides;
use crate::github::ApiError;
use crate::pulls::Target;
use crate::report::{SortKey, Verbosity};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_AUTH: i32 = 1;
pub const EXIT_NETWORK: i32 = 2;
pub const EXIT_CONFIG: i32 = 4;

/// Generate a report of all open pull requests on the given repositories.
///
/// Repositories are chosen with --repo, --user and --org, each of which may
/// be repeated. They are looked up in the order given.
#[derive(Parser, Debug)]
#[command(name = "tugboat")]
#[command(version)]
#[command(group(ArgGroup::new("sorting").multiple(false)))]
pub struct Cli {
    /// Username for accessing the GitHub API
    #[arg(short, long, help_heading = "Authentication")]
    pub username: Option<String>,

    /// Password or personal access token; prompted for if not given
    #[arg(short, long, help_heading = "Authentication")]
    pub password: Option<String>,

    /// API URL for accessing the GitHub API [default: https://api.github.com]
    #[arg(short, long, help_heading = "Authentication")]
    pub github_url: Option<String>,

    /// A repository to report on, as "<login>/<repo>"
    #[arg(short = 'r', long = "repo", value_name = "LOGIN/REPO", help_heading = "Repositories")]
    pub repos: Vec<String>,

    /// A user whose visible repositories are reported on
    #[arg(short = 'U', long = "user", value_name = "LOGIN", help_heading = "Repositories")]
    pub users: Vec<String>,

    /// An organization whose visible repositories are reported on
    #[arg(short = 'o', long = "org", value_name = "ORG", help_heading = "Repositories")]
    pub orgs: Vec<String>,

    /// Sort pull requests by creation time (the default)
    #[arg(short, long, group = "sorting")]
    pub created: bool,

    /// Sort pull requests by last update time
    #[arg(short = 'P', long, group = "sorting")]
    pub updated: bool,

    /// Sort pull requests by repository name and pull request number
    #[arg(short, long, visible_alias = "alphabetically", group = "sorting")]
    pub alpha: bool,

    /// File to write the report to; "-" for standard output
    #[arg(short = 'O', long, default_value = crate::output::STDOUT_TARGET)]
    pub output: String,

    /// Emit status messages with pull request counts while working
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Emit only the final report
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug logging and full error chains
    #[arg(short, long)]
    pub debug: bool,

    /// Path to config file (defaults to ~/.config/tugboat/config.yaml)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }

    pub fn sort_by(&self) -> Option<SortKey> {
        if self.created {
            Some(SortKey::Created)
        } else if self.updated {
            Some(SortKey::Updated)
        } else if self.alpha {
            Some(SortKey::Repo)
        } else {
            None
        }
    }

    /// Settings taken from the command line, with targets in the order given
    pub fn overrides(&self, matches: &ArgMatches) -> Overrides {
        Overrides {
            username: self.username.clone(),
            github_url: self.github_url.clone(),
            sort_by: self.sort_by(),
            targets: ordered_targets(matches),
        }
    }
}

/// Interleave --repo, --user and --org values in command line order
pub fn ordered_targets(matches: &ArgMatches) -> Vec<(Target, String)> {
    let mut indexed = Vec::new();
    for (id, target) in [
        ("repos", Target::Repo),
        ("users", Target::User),
        ("orgs", Target::Organization),
    ] {
        if let (Some(values), Some(indices)) =
            (matches.get_many::<String>(id), matches.indices_of(id))
        {
            indexed.extend(indices.zip(values).map(|(i, v)| (i, target, v.clone())));
        }
    }

    indexed.sort_by_key(|(i, _, _)| *i);
    indexed.into_iter().map(|(_, t, v)| (t, v)).collect()
}

/// Exit code for a failed run
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.chain().find_map(|e| e.downcast_ref::<ApiError>()) {
        Some(api) if api.is_authentication() => EXIT_AUTH,
        _ => EXIT_NETWORK,
    }
}

/// Route `tracing` output to stderr; debug level with `--debug`
pub fn init_logging(debug: bool) {
    let level = if debug { "tugboat=debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .with_target(false)
        .try_init();
}
