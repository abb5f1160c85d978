use anyhow::Result;
use async_trait::async_trait;
use std::io::Write;
use std::rc::Rc;

use crate::github::{HostingApi, Repository};
use crate::pulls::{PullRequest, RepoCallback};

/// How much status output to emit while the report is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only the report itself
    Quiet,
    /// One line per repository
    #[default]
    Normal,
    /// One line per repository, with pull and mergeable counts
    Verbose,
}

impl Verbosity {
    /// The progress callback for this level, writing to `out`
    pub fn callback<'a, W: Write + 'a>(self, out: W) -> Option<Box<dyn RepoCallback + 'a>> {
        match self {
            Verbosity::Quiet => None,
            Verbosity::Normal => Some(Box::new(NormalProgress::new(out))),
            Verbosity::Verbose => Some(Box::new(VerboseProgress::new(out))),
        }
    }
}

/// Names each repository as it is processed
pub struct NormalProgress<W> {
    out: W,
}

impl<W: Write> NormalProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait(?Send)]
impl<W: Write> RepoCallback for NormalProgress<W> {
    fn status(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
    }

    fn before_fetch(&mut self, index: usize, count: usize, repo: &Repository) {
        let _ = writeln!(
            self.out,
            "Processing repository \"{}\" ({}/{})...",
            repo.full_name,
            index + 1,
            count
        );
    }

    async fn after_fetch(
        &mut self,
        _api: &dyn HostingApi,
        _index: usize,
        _count: usize,
        _repo: &Repository,
        _pulls: &[Rc<PullRequest>],
    ) -> Result<()> {
        Ok(())
    }
}

/// Names each repository, then reports how many pulls it has and how many of
/// those are mergeable. Mergeability looked up here stays cached for the
/// report.
pub struct VerboseProgress<W> {
    out: W,
}

impl<W: Write> VerboseProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait(?Send)]
impl<W: Write> RepoCallback for VerboseProgress<W> {
    fn status(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
    }

    fn before_fetch(&mut self, index: usize, count: usize, repo: &Repository) {
        // Finished by after_fetch on the same line
        let _ = write!(
            self.out,
            "Processing repository \"{}\" ({}/{})... ",
            repo.full_name,
            index + 1,
            count
        );
        let _ = self.out.flush();
    }

    async fn after_fetch(
        &mut self,
        api: &dyn HostingApi,
        _index: usize,
        _count: usize,
        _repo: &Repository,
        pulls: &[Rc<PullRequest>],
    ) -> Result<()> {
        let mut mergeable = 0;
        for pull in pulls {
            if pull.mergeable(api).await? {
                mergeable += 1;
            }
        }

        let _ = writeln!(self.out, "{} pulls ({} mergeable)", pulls.len(), mergeable);
        Ok(())
    }
}
