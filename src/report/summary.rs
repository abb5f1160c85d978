use std::rc::Rc;

use crate::pulls::PullRequest;

/// Tracks the oldest and youngest pull requests, and those updated least and
/// most recently. Ties keep whichever pull was seen first.
#[derive(Debug, Default)]
pub struct PullSummary {
    pub oldest: Option<Rc<PullRequest>>,
    pub youngest: Option<Rc<PullRequest>>,
    pub least_recent: Option<Rc<PullRequest>>,
    pub most_recent: Option<Rc<PullRequest>>,
}

impl PullSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pull(&mut self, pull: &Rc<PullRequest>) {
        if self.oldest.as_ref().map_or(true, |p| p.created_at > pull.created_at) {
            self.oldest = Some(Rc::clone(pull));
        }

        if self.youngest.as_ref().map_or(true, |p| p.created_at < pull.created_at) {
            self.youngest = Some(Rc::clone(pull));
        }

        if self.least_recent.as_ref().map_or(true, |p| p.updated_at > pull.updated_at) {
            self.least_recent = Some(Rc::clone(pull));
        }

        if self.most_recent.as_ref().map_or(true, |p| p.updated_at < pull.updated_at) {
            self.most_recent = Some(Rc::clone(pull));
        }
    }

    /// Add every pull in order, handing the list back for chaining
    pub fn add_pulls(&mut self, pulls: Vec<Rc<PullRequest>>) -> Vec<Rc<PullRequest>> {
        for pull in &pulls {
            self.add_pull(pull);
        }
        pulls
    }
}

/// Per-repository pull request counts for the breakdown section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSummary {
    pub name: String,
    pub pulls: usize,
    pub mergeable: usize,
}

impl RepoSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pulls: 0,
            mergeable: 0,
        }
    }

    /// Count one pull request
    pub fn add(&mut self, mergeable: bool) -> &mut Self {
        self.pulls += 1;
        if mergeable {
            self.mergeable += 1;
        }
        self
    }
}
