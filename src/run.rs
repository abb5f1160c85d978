use anyhow::{Context, Result};
use std::io::{self, Write};

use crate::config::Settings;
use crate::github::HostingApi;
use crate::output::open_output;
use crate::report::{report, Verbosity};

/// Open the output, write the report for `settings`, and release the output.
///
/// A file opened for the report is closed on every path out of this function,
/// including failures; standard output is never closed.
pub async fn run_report(
    api: &dyn HostingApi,
    settings: &Settings,
    output: &str,
    verbosity: Verbosity,
) -> Result<()> {
    tracing::debug!(
        "Reporting on {} targets, sorted by {:?}, to {}",
        settings.targets.len(),
        settings.sort_by,
        output
    );

    let mut stream = open_output(output)?;
    let mut progress = verbosity.callback(io::stderr());

    report(
        api,
        &settings.targets,
        &mut stream,
        progress.as_deref_mut(),
        settings.sort_by,
    )
    .await?;

    stream.flush().context("Failed to write report")
}
