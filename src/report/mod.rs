//! Collect, summarize, sort and print the open pull request report.

pub mod progress;
pub mod render;
pub mod summary;

pub use progress::{NormalProgress, VerboseProgress, Verbosity};
pub use render::{format_age, report, report_at, SortKey};
pub use summary::{PullSummary, RepoSummary};
