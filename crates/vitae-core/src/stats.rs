//! Sequential statistics aggregation over chunked date ranges, and the
//! typed record that merges aggregates with profile facts for rendering.
//!
//! Each aggregator reports its own api-call count; callers compose the
//! totals. Nothing here shares a mutable counter.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::error::{Result, VitaeError};
use crate::github::{GithubClient, SEARCH_PAGE_SIZE};
use crate::range::{chunk_until, Granularity};
use crate::throttle::Pacer;

// ---------------------------------------------------------------------------
// Aggregate results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ContributionTotals {
    pub total: u64,
    pub api_calls: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LineTotals {
    pub additions: u64,
    pub deletions: u64,
    pub api_calls: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RepoTotals {
    pub repos: u32,
    pub stars: u32,
    pub api_calls: u32,
}

/// All three aggregations, composed by the caller.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Aggregates {
    pub contributions: ContributionTotals,
    pub lines: LineTotals,
    pub repos: RepoTotals,
}

impl Aggregates {
    pub fn api_calls(&self) -> u32 {
        self.contributions.api_calls + self.lines.api_calls + self.repos.api_calls
    }
}

// ---------------------------------------------------------------------------
// Contribution aggregation (yearly chunks, one GraphQL call each)
// ---------------------------------------------------------------------------

/// Sum contribution totals over yearly ranges from `since` through `now`.
///
/// Sequential by design: one call per range keeps API usage predictable.
/// Any call failure propagates unhandled — the run is idempotent and safe
/// to re-trigger.
pub async fn contributions_since(
    client: &GithubClient,
    login: &str,
    since: NaiveDate,
    now: DateTime<Utc>,
) -> Result<ContributionTotals> {
    let ranges = chunk_until(Granularity::Year, since.year(), since.month(), now);

    let mut totals = ContributionTotals::default();
    for range in &ranges {
        totals.total += client.contributions(login, range).await?;
        totals.api_calls += 1;
    }
    tracing::info!(total = totals.total, api_calls = totals.api_calls, "contributions aggregated");
    Ok(totals)
}

// ---------------------------------------------------------------------------
// Lines-of-code aggregation (monthly chunks, paginated search + detail fetch)
// ---------------------------------------------------------------------------

/// Sum per-commit additions/deletions over monthly ranges from `since`
/// through `now`.
///
/// Per range: paginate the commit search (page size 100) until the reported
/// total is exhausted, then fetch each commit's stats. One api-call unit per
/// page fetch plus one per detail fetch. Between ranges the `pacer` decides
/// how long to sleep.
pub async fn lines_since(
    client: &GithubClient,
    login: &str,
    since: NaiveDate,
    now: DateTime<Utc>,
    pacer: &dyn Pacer,
) -> Result<LineTotals> {
    let ranges = chunk_until(Granularity::Month, since.year(), since.month(), now);

    let mut totals = LineTotals::default();
    for (i, range) in ranges.iter().enumerate() {
        let mut page = 1;
        let mut fetched: u32 = 0;
        loop {
            let result = client.search_commits(login, range, page).await?;
            totals.api_calls += 1;
            fetched += result.items.len() as u32;

            for item in &result.items {
                let stats = client.commit_stats(&item.url).await?;
                totals.api_calls += 1;
                totals.additions += stats.additions;
                totals.deletions += stats.deletions;
            }

            if result.items.is_empty() || fetched >= result.total_count {
                break;
            }
            page += 1;
        }

        if i + 1 < ranges.len() {
            let pause = pacer.pause();
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
    }
    tracing::info!(
        additions = totals.additions,
        deletions = totals.deletions,
        api_calls = totals.api_calls,
        "line counts aggregated"
    );
    Ok(totals)
}

// ---------------------------------------------------------------------------
// Repository aggregation (user lookup + paginated listing)
// ---------------------------------------------------------------------------

/// Public repository count and stargazer total for `login`.
///
/// Stars on forks are not counted; the repo count comes from the user
/// lookup rather than the listing length.
pub async fn repos_of(client: &GithubClient, login: &str) -> Result<RepoTotals> {
    let user = client.user(login).await?;

    let mut totals = RepoTotals {
        repos: user.public_repos,
        stars: 0,
        api_calls: 1,
    };
    let mut page = 1;
    loop {
        let batch = client.repos(login, page).await?;
        totals.api_calls += 1;
        let len = batch.len();
        totals.stars += batch
            .iter()
            .filter(|r| !r.fork)
            .map(|r| r.stargazers_count)
            .sum::<u32>();
        if len < SEARCH_PAGE_SIZE as usize {
            break;
        }
        page += 1;
    }
    Ok(totals)
}

// ---------------------------------------------------------------------------
// StatsRecord
// ---------------------------------------------------------------------------

/// The merged statistics record handed to the renderer: profile facts from
/// the config plus the aggregation results, validated once at construction
/// and immutable thereafter.
#[derive(Debug, Clone, Serialize)]
pub struct StatsRecord {
    pub name: String,
    pub age_years: u32,
    pub location: Option<String>,
    pub employer: String,
    pub role: Option<String>,
    pub tenure_years: u32,
    pub os: String,
    pub editor: String,
    pub shell: Option<String>,
    pub contributions: u64,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub repos: u32,
    pub stars: u32,
    pub updated_at: NaiveDate,
}

impl StatsRecord {
    pub fn new(cfg: &Config, agg: &Aggregates, today: NaiveDate) -> Result<Self> {
        if cfg.profile.name.trim().is_empty() {
            return Err(VitaeError::InvalidRecord("profile.name is empty".to_string()));
        }
        if cfg.profile.birth_date > today {
            return Err(VitaeError::InvalidRecord(format!(
                "birth_date {} is in the future",
                cfg.profile.birth_date
            )));
        }

        Ok(StatsRecord {
            name: cfg.profile.name.clone(),
            age_years: years_between(cfg.profile.birth_date, today),
            location: cfg.profile.location.clone(),
            employer: cfg.employment.employer.clone(),
            role: cfg.employment.role.clone(),
            tenure_years: years_between(cfg.employment.since, today),
            os: cfg.development.os.clone(),
            editor: cfg.development.editor.clone(),
            shell: cfg.development.shell.clone(),
            contributions: agg.contributions.total,
            lines_added: agg.lines.additions,
            lines_removed: agg.lines.deletions,
            repos: agg.repos.repos,
            stars: agg.repos.stars,
            updated_at: today,
        })
    }

    /// The stringified placeholder mapping the renderer consumes. Optional
    /// facts absent from the config are omitted, so their placeholders
    /// render as `N/A`.
    pub fn placeholders(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        let mut put = |k: &str, v: String| {
            map.insert(k.to_string(), v);
        };

        put("name", self.name.clone());
        put("age", format!("{} years", self.age_years));
        put("employer", self.employer.clone());
        put("tenure", format!("{} years", self.tenure_years));
        put("os", self.os.clone());
        put("editor", self.editor.clone());
        put("contributions", self.contributions.to_string());
        put("lines_added", self.lines_added.to_string());
        put("lines_removed", self.lines_removed.to_string());
        put("repos", self.repos.to_string());
        put("stars", self.stars.to_string());
        put("updated_at", self.updated_at.format("%Y-%m-%d").to_string());

        if let Some(location) = &self.location {
            put("location", location.clone());
        }
        if let Some(role) = &self.role {
            put("role", role.clone());
        }
        if let Some(shell) = &self.shell {
            put("shell", shell.clone());
        }
        map
    }
}

/// Whole years elapsed from `from` to `to`, floored at zero.
fn years_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
