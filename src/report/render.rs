use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::rc::Rc;
use std::time::Instant;

use super::summary::{PullSummary, RepoSummary};
use crate::github::HostingApi;
use crate::pulls::{PullRequest, RepoCallback, Target};

/// Order in which pull requests appear in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Creation time, oldest first
    #[default]
    Created,
    /// Last update time, least recent first
    Updated,
    /// Repository full name, then pull request number
    Repo,
}

impl SortKey {
    /// Look up a key by name; unknown names give `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "created" => Some(SortKey::Created),
            "updated" => Some(SortKey::Updated),
            "repo" => Some(SortKey::Repo),
            _ => None,
        }
    }

    /// Stable sort, so equal keys keep collection order
    pub fn sort(self, pulls: &mut [Rc<PullRequest>]) {
        match self {
            SortKey::Created => pulls.sort_by_key(|p| p.created_at),
            SortKey::Updated => pulls.sort_by_key(|p| p.updated_at),
            SortKey::Repo => pulls.sort_by(|a, b| {
                (a.repo().full_name.as_str(), a.number)
                    .cmp(&(b.repo().full_name.as_str(), b.number))
            }),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Created => write!(f, "created"),
            SortKey::Updated => write!(f, "updated"),
            SortKey::Repo => write!(f, "repo"),
        }
    }
}

/// Format the time elapsed from `time` to `now` into `template`, replacing
/// its `{}`. Returns an empty string when `time` is not in the past.
pub fn format_age(now: DateTime<Utc>, time: DateTime<Utc>, template: &str) -> String {
    let age = now - time;
    if age <= Duration::zero() {
        return String::new();
    }

    let secs = u64::try_from(age.num_seconds()).unwrap_or(0);
    let formatted = humantime::format_duration(std::time::Duration::from_secs(secs));
    template.replacen("{}", &formatted.to_string(), 1)
}

/// Generate a report of all open pull requests on the given targets,
/// stamped with the current time.
///
/// Status lines go through `callback` when one is set; the report itself is
/// written to `stream`. Nothing is written to `stream` if collection fails.
pub async fn report<'c, W: Write>(
    api: &dyn HostingApi,
    targets: &[(Target, String)],
    stream: &mut W,
    callback: Option<&mut (dyn RepoCallback + 'c)>,
    sort_by: Option<SortKey>,
) -> Result<()> {
    report_at(api, targets, stream, callback, sort_by, Utc::now()).await
}

/// [`report`] with an explicit start time, against which ages are measured
pub async fn report_at<'c, W: Write>(
    api: &dyn HostingApi,
    targets: &[(Target, String)],
    stream: &mut W,
    mut callback: Option<&mut (dyn RepoCallback + 'c)>,
    sort_by: Option<SortKey>,
    start: DateTime<Utc>,
) -> Result<()> {
    let timer = Instant::now();

    let mut summary = PullSummary::new();
    let mut pulls = Vec::new();
    for (target, name) in targets {
        if let Some(cb) = callback.as_deref_mut() {
            cb.status(&format!("Looking up {} \"{}\"...", target, name));
        }

        let found = target.resolve(api, name, callback.as_deref_mut()).await?;
        pulls.extend(summary.add_pulls(found));
    }

    if let Some(key) = sort_by {
        key.sort(&mut pulls);
    }

    if let Some(cb) = callback.as_deref_mut() {
        cb.status("Generating report...");
    }

    if pulls.is_empty() {
        writeln!(stream, "No open pull requests")?;
        return Ok(());
    }

    let mut mergeable = Vec::with_capacity(pulls.len());
    for pull in &pulls {
        mergeable.push(pull.mergeable(api).await?);
    }

    let (Some(oldest), Some(youngest), Some(least_recent), Some(most_recent)) = (
        &summary.oldest,
        &summary.youngest,
        &summary.least_recent,
        &summary.most_recent,
    ) else {
        bail!("Pull summary is empty despite {} open pulls", pulls.len());
    };

    writeln!(
        stream,
        "Open PRs: {} ({} mergeable)",
        pulls.len(),
        mergeable.iter().filter(|m| **m).count()
    )?;
    writeln!(stream, "    Oldest PR, from {}: {}", oldest.created_at, oldest.short_ref())?;
    writeln!(stream, "    Youngest PR, from {}: {}", youngest.created_at, youngest.short_ref())?;
    writeln!(
        stream,
        "    Least recently updated PR, at {}: {}",
        least_recent.updated_at,
        least_recent.short_ref()
    )?;
    writeln!(
        stream,
        "    Most recently updated PR, at {}: {}",
        most_recent.updated_at,
        most_recent.short_ref()
    )?;

    let mut repos: BTreeMap<&str, RepoSummary> = BTreeMap::new();
    for (pull, &is_mergeable) in pulls.iter().zip(&mergeable) {
        write_pull(stream, pull, is_mergeable, start)?;

        let name = pull.repo().full_name.as_str();
        repos
            .entry(name)
            .or_insert_with(|| RepoSummary::new(name))
            .add(is_mergeable);
    }

    writeln!(stream)?;
    writeln!(stream, "Repositories with open pull requests: {}", repos.len())?;
    writeln!(stream, "Breakdown by repository:")?;
    for repo in repos.values() {
        writeln!(
            stream,
            "    Open PRs for {}: {} ({} mergeable)",
            repo.name, repo.pulls, repo.mergeable
        )?;
    }

    let elapsed = std::time::Duration::from_millis(
        u64::try_from(timer.elapsed().as_millis()).unwrap_or(u64::MAX),
    );
    writeln!(stream)?;
    writeln!(
        stream,
        "Report generated in {} at {}",
        humantime::format_duration(elapsed),
        start
    )?;

    Ok(())
}

fn write_pull<W: Write>(
    stream: &mut W,
    pull: &PullRequest,
    mergeable: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    writeln!(stream)?;
    writeln!(stream, "Pull request {}:", pull.short_ref())?;
    writeln!(stream, "    URL: {}", pull.html_url)?;
    writeln!(stream, "    Merge {} -> {}", pull.head.label, pull.base.label)?;
    writeln!(
        stream,
        "    Proposed {}{}",
        pull.created_at,
        format_age(now, pull.created_at, " (age: {})")
    )?;
    writeln!(
        stream,
        "    Proposed by {} ({})",
        pull.user.name.as_deref().unwrap_or("<unknown>"),
        pull.user.login
    )?;
    writeln!(
        stream,
        "    Last updated: {}{}",
        pull.updated_at,
        format_age(now, pull.updated_at, " ({} ago)")
    )?;
    writeln!(stream, "    Mergeable: {}", if mergeable { "yes" } else { "no" })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::{at, raw_pull, FakeHosting};
    use crate::github::Repository;
    use crate::report::progress::NormalProgress;
    use rstest::rstest;

    fn scenario() -> FakeHosting {
        FakeHosting::new()
            .with_repo("repo1", vec![raw_pull(1, 10, 90), raw_pull(2, 20, 80)])
            .with_repo("repo2", vec![raw_pull(1, 30, 70)])
            .with_mergeable("repo1", 2, Some(false))
    }

    fn targets(names: &[&str]) -> Vec<(Target, String)> {
        names
            .iter()
            .map(|n| (Target::Repo, n.to_string()))
            .collect()
    }

    async fn render(
        api: &FakeHosting,
        targets: &[(Target, String)],
        sort_by: Option<SortKey>,
        start: i64,
    ) -> String {
        let mut out = Vec::new();
        report_at(api, targets, &mut out, None, sort_by, at(start))
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn pull_order(text: &str) -> Vec<&str> {
        text.lines()
            .filter_map(|l| l.strip_prefix("Pull request "))
            .map(|l| l.trim_end_matches(':'))
            .collect()
    }

    #[test]
    fn test_format_age_past() {
        assert_eq!(format_age(at(100), at(30), " (age: {})"), " (age: 1m 10s)");
        assert_eq!(format_age(at(100), at(90), " ({} ago)"), " (10s ago)");
    }

    #[test]
    fn test_format_age_zero_or_future_is_empty() {
        assert_eq!(format_age(at(100), at(100), " (age: {})"), "");
        assert_eq!(format_age(at(100), at(130), " (age: {})"), "");
    }

    #[test]
    fn test_format_age_days() {
        let day = 24 * 60 * 60;
        assert_eq!(format_age(at(2 * day + 5), at(0), "{}"), "2days 5s");
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("created"), Some(SortKey::Created));
        assert_eq!(SortKey::parse("updated"), Some(SortKey::Updated));
        assert_eq!(SortKey::parse("repo"), Some(SortKey::Repo));
        assert_eq!(SortKey::parse("size"), None);
        assert_eq!(SortKey::Repo.to_string(), "repo");
    }

    #[tokio::test]
    async fn test_full_report_sorted_by_updated() {
        let api = scenario();
        let text = render(&api, &targets(&["repo1", "repo2"]), Some(SortKey::Updated), 100).await;

        let expected = "\
Open PRs: 3 (2 mergeable)
    Oldest PR, from 1970-01-01 00:00:10 UTC: repo1#1
    Youngest PR, from 1970-01-01 00:00:30 UTC: repo2#1
    Least recently updated PR, at 1970-01-01 00:01:10 UTC: repo2#1
    Most recently updated PR, at 1970-01-01 00:01:30 UTC: repo1#1

Pull request repo2#1:
    URL: https://github.com/pull/1
    Merge fork:feature-1 -> owner:main
    Proposed 1970-01-01 00:00:30 UTC (age: 1m 10s)
    Proposed by spam (me)
    Last updated: 1970-01-01 00:01:10 UTC (30s ago)
    Mergeable: yes

Pull request repo1#2:
    URL: https://github.com/pull/2
    Merge fork:feature-2 -> owner:main
    Proposed 1970-01-01 00:00:20 UTC (age: 1m 20s)
    Proposed by spam (me)
    Last updated: 1970-01-01 00:01:20 UTC (20s ago)
    Mergeable: no

Pull request repo1#1:
    URL: https://github.com/pull/1
    Merge fork:feature-1 -> owner:main
    Proposed 1970-01-01 00:00:10 UTC (age: 1m 30s)
    Proposed by spam (me)
    Last updated: 1970-01-01 00:01:30 UTC (10s ago)
    Mergeable: yes

Repositories with open pull requests: 2
Breakdown by repository:
    Open PRs for repo1: 2 (1 mergeable)
    Open PRs for repo2: 1 (1 mergeable)

";
        assert!(text.starts_with(expected), "unexpected report:\n{}", text);

        let trailer = &text[expected.len()..];
        assert!(trailer.starts_with("Report generated in "));
        assert!(trailer.ends_with(" at 1970-01-01 00:01:40 UTC\n"));
        assert_eq!(trailer.lines().count(), 1);
    }

    #[rstest]
    #[case(Some(SortKey::Created), vec!["repo1#1", "repo1#2", "repo2#1"])]
    #[case(Some(SortKey::Updated), vec!["repo2#1", "repo1#2", "repo1#1"])]
    #[case(Some(SortKey::Repo), vec!["repo1#1", "repo1#2", "repo2#1"])]
    #[case(None, vec!["repo2#1", "repo1#1", "repo1#2"])]
    #[tokio::test]
    async fn test_sort_order(#[case] sort_by: Option<SortKey>, #[case] expected: Vec<&str>) {
        let api = scenario();
        let text = render(&api, &targets(&["repo2", "repo1"]), sort_by, 100).await;
        assert_eq!(pull_order(&text), expected);
    }

    #[tokio::test]
    async fn test_sort_is_stable_on_ties() {
        let api = FakeHosting::new()
            .with_repo("b", vec![raw_pull(9, 50, 50)])
            .with_repo("a", vec![raw_pull(3, 50, 50), raw_pull(1, 10, 50)]);
        let text = render(&api, &targets(&["b", "a"]), Some(SortKey::Updated), 100).await;
        assert_eq!(pull_order(&text), vec!["b#9", "a#3", "a#1"]);

        let text = render(&api, &targets(&["b", "a"]), Some(SortKey::Created), 100).await;
        assert_eq!(pull_order(&text), vec!["a#1", "b#9", "a#3"]);
    }

    #[tokio::test]
    async fn test_breakdown_sorted_by_repository_name() {
        let api = FakeHosting::new()
            .with_repo("zeta", vec![raw_pull(1, 1, 1)])
            .with_repo("alpha", vec![raw_pull(2, 2, 2)])
            .with_repo("mid", vec![raw_pull(3, 3, 3), raw_pull(4, 4, 4)]);
        let text = render(&api, &targets(&["zeta", "mid", "alpha"]), Some(SortKey::Created), 100).await;

        let rows: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("    Open PRs for "))
            .collect();
        assert_eq!(
            rows,
            vec![
                "    Open PRs for alpha: 1 (1 mergeable)",
                "    Open PRs for mid: 2 (2 mergeable)",
                "    Open PRs for zeta: 1 (1 mergeable)",
            ]
        );
        assert!(text.contains("Repositories with open pull requests: 3\n"));
    }

    #[tokio::test]
    async fn test_no_targets() {
        let api = scenario();
        let text = render(&api, &[], Some(SortKey::Created), 100).await;
        assert_eq!(text, "No open pull requests\n");
    }

    #[tokio::test]
    async fn test_no_open_pulls() {
        let api = FakeHosting::new().with_repo("quiet/repo", vec![]);
        let text = render(&api, &targets(&["quiet/repo"]), Some(SortKey::Created), 100).await;
        assert_eq!(text, "No open pull requests\n");
    }

    #[tokio::test]
    async fn test_unknown_author_and_future_times() {
        let mut pull = raw_pull(4, 500, 600);
        pull.user.name = None;
        let api = FakeHosting::new().with_repo("owner/repo", vec![pull]);

        let text = render(&api, &targets(&["owner/repo"]), Some(SortKey::Created), 100).await;

        assert!(text.contains("    Proposed by <unknown> (me)\n"));
        assert!(text.contains("    Proposed 1970-01-01 00:08:20 UTC\n"));
        assert!(text.contains("    Last updated: 1970-01-01 00:10:00 UTC\n"));
    }

    #[tokio::test]
    async fn test_mergeable_fetched_once_per_pull() {
        let api = scenario();
        render(&api, &targets(&["repo1", "repo2"]), Some(SortKey::Created), 100).await;
        assert_eq!(api.count_calls("get_mergeable"), 3);
    }

    #[tokio::test]
    async fn test_failure_writes_nothing() {
        let api = scenario().failing_on("repo2");
        let mut out = Vec::new();

        let result = report_at(
            &api,
            &targets(&["repo1", "repo2"]),
            &mut out,
            None,
            Some(SortKey::Created),
            at(100),
        )
        .await;

        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_status_lines_through_callback() {
        let api = FakeHosting::new()
            .with_repo("org/a", vec![raw_pull(1, 1, 1)])
            .with_repo("org/b", vec![]);
        let specs = vec![
            (Target::Organization, "org".to_string()),
            (Target::Repo, "org/a".to_string()),
        ];
        let mut progress = NormalProgress::new(Vec::new());
        let mut out = Vec::new();

        report_at(
            &api,
            &specs,
            &mut out,
            Some(&mut progress),
            Some(SortKey::Repo),
            at(100),
        )
        .await
        .unwrap();

        let status = String::from_utf8(progress.into_inner()).unwrap();
        assert_eq!(
            status,
            "Looking up organization \"org\"...\n\
             Processing repository \"org/a\" (1/2)...\n\
             Processing repository \"org/b\" (2/2)...\n\
             Looking up repo \"org/a\"...\n\
             Processing repository \"org/a\" (1/1)...\n\
             Generating report...\n"
        );

        // The same pull named twice appears twice
        let text = String::from_utf8(out).unwrap();
        assert_eq!(pull_order(&text), vec!["org/a#1", "org/a#1"]);
        assert!(text.contains("    Open PRs for org/a: 2 (2 mergeable)\n"));
    }

    #[tokio::test]
    async fn test_quiet_run_has_no_status() {
        let api = scenario();
        let mut out = Vec::new();
        report_at(&api, &[], &mut out, None, None, at(0)).await.unwrap();
        assert_eq!(out, b"No open pull requests\n");
    }

    #[test]
    fn test_sort_by_repo_uses_number_within_repo() {
        let mut pulls: Vec<Rc<PullRequest>> = [("b", 2), ("a", 10), ("a", 9), ("b", 1)]
            .iter()
            .map(|(repo, n)| {
                Rc::new(PullRequest::new(
                    Repository::from_full_name(repo),
                    raw_pull(*n, 0, 0),
                ))
            })
            .collect();

        SortKey::Repo.sort(&mut pulls);

        let order: Vec<String> = pulls.iter().map(|p| p.short_ref()).collect();
        assert_eq!(order, vec!["a#9", "a#10", "b#1", "b#2"]);
    }
}
