//! Typed GitHub API client: the GraphQL contributions query, the REST
//! endpoints the aggregators paginate, and the contents API the publisher
//! writes through.
//!
//! Every operation is fail-fast. A non-success status becomes
//! [`VitaeError::Api`] and propagates to the caller; there is no retry.

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VitaeError};
use crate::range::DateRange;

const USER_AGENT: &str = concat!("vitae/", env!("CARGO_PKG_VERSION"));

/// Commit search page size; the remote caps a single query at 1000 results,
/// which is why callers chunk date ranges before searching.
pub const SEARCH_PAGE_SIZE: u32 = 100;

// ─── Client ───────────────────────────────────────────────────────────────

pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl GithubClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base("https://api.github.com", token)
    }

    /// Build a client against an alternate API base (used by tests to point
    /// at a local mock server).
    pub fn with_base(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Build a client from the `TOKEN` environment variable.
    pub fn from_env() -> Result<Self> {
        match std::env::var("TOKEN") {
            Ok(token) if !token.trim().is_empty() => Self::new(token),
            _ => Err(VitaeError::MissingToken),
        }
    }

    // ─── GraphQL ──────────────────────────────────────────────────────────

    /// Total contributions for `login` within `range`, via one GraphQL call.
    ///
    /// The remote limits `contributionsCollection` to a one-year window,
    /// which is why callers pass yearly chunks.
    pub async fn contributions(&self, login: &str, range: &DateRange) -> Result<u64> {
        tracing::debug!(login, from = %range.from, to = %range.to, "querying contributions");
        let body = GraphQlRequest {
            query: CONTRIBUTIONS_QUERY,
            variables: ContributionVars {
                login,
                from: iso_instant(&range.from),
                to: iso_instant(&range.to),
            },
        };
        let resp = self
            .http
            .post(format!("{}/graphql", self.api_base))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let parsed: GraphQlResponse = check(resp).await?.json().await?;

        if let Some(err) = parsed.errors.first() {
            return Err(VitaeError::GraphQl(err.message.clone()));
        }
        parsed
            .data
            .and_then(|d| d.user)
            .map(|u| {
                u.contributions_collection
                    .contribution_calendar
                    .total_contributions
            })
            .ok_or_else(|| {
                VitaeError::ResponseShape("graphql response has no user".to_string())
            })
    }

    // ─── REST ─────────────────────────────────────────────────────────────

    pub async fn user(&self, login: &str) -> Result<User> {
        let resp = self
            .http
            .get(format!("{}/users/{login}", self.api_base))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// One page of the user's repository listing (page numbers start at 1).
    pub async fn repos(&self, login: &str, page: u32) -> Result<Vec<Repo>> {
        let resp = self
            .http
            .get(format!("{}/users/{login}/repos", self.api_base))
            .query(&[("per_page", SEARCH_PAGE_SIZE), ("page", page)])
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// One page of the commit search `author:<login>
    /// committer-date:<from>..<to>` (page numbers start at 1).
    pub async fn search_commits(
        &self,
        login: &str,
        range: &DateRange,
        page: u32,
    ) -> Result<CommitSearchPage> {
        let query = format!(
            "author:{login} committer-date:{}..{}",
            iso_instant(&range.from),
            iso_instant(&range.to),
        );
        tracing::debug!(%query, page, "searching commits");
        let resp = self
            .http
            .get(format!("{}/search/commits", self.api_base))
            .query(&[
                ("q", query.as_str()),
                ("per_page", "100"),
                ("page", &page.to_string()),
            ])
            .header("Accept", "application/vnd.github.cloak-preview+json")
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Per-commit detail fetch; `url` is the absolute API URL returned by
    /// the commit search.
    pub async fn commit_stats(&self, url: &str) -> Result<CommitStats> {
        let resp = self.http.get(url).bearer_auth(&self.token).send().await?;
        let detail: CommitDetail = check(resp).await?.json().await?;
        Ok(detail.stats)
    }

    // ─── Contents ─────────────────────────────────────────────────────────

    /// Read the document at `path`, returning decoded content plus the
    /// version marker the contents API requires on write.
    pub async fn get_document(&self, owner: &str, repo: &str, path: &str) -> Result<Document> {
        let resp = self
            .http
            .get(format!("{}/repos/{owner}/{repo}/contents/{path}", self.api_base))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let raw: ContentsResponse = check(resp).await?.json().await?;

        // The contents API wraps base64 at 60 columns; strip the newlines
        // before decoding.
        let packed: String = raw.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(packed)
            .map_err(|e| VitaeError::ResponseShape(format!("invalid base64 content: {e}")))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| VitaeError::ResponseShape(format!("document is not utf-8: {e}")))?;
        Ok(Document { sha: raw.sha, content })
    }

    /// Overwrite the document at `path`, supplying the previously fetched
    /// version marker. A stale marker is rejected remotely and surfaces as
    /// [`VitaeError::DocumentConflict`].
    pub async fn put_document(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
        message: &str,
        sha: &str,
    ) -> Result<()> {
        tracing::debug!(owner, repo, path, "writing document");
        let body = PutContents {
            message,
            content: base64::engine::general_purpose::STANDARD.encode(content),
            sha,
        };
        let resp = self
            .http
            .put(format!("{}/repos/{owner}/{repo}/contents/{path}", self.api_base))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::CONFLICT {
            return Err(VitaeError::DocumentConflict { path: path.to_string() });
        }
        check(resp).await?;
        Ok(())
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────

const CONTRIBUTIONS_QUERY: &str = "\
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar { totalContributions }
    }
  }
}";

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: ContributionVars<'a>,
}

#[derive(Serialize)]
struct ContributionVars<'a> {
    login: &'a str,
    from: String,
    to: String,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<ContributionData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct ContributionData {
    user: Option<ContributionUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionUser {
    contributions_collection: ContributionsCollection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: ContributionCalendar,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionCalendar {
    total_contributions: u64,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub login: String,
    pub public_repos: u32,
}

#[derive(Debug, Deserialize)]
pub struct Repo {
    pub name: String,
    pub stargazers_count: u32,
    #[serde(default)]
    pub fork: bool,
}

#[derive(Debug, Deserialize)]
pub struct CommitSearchPage {
    pub total_count: u32,
    pub items: Vec<CommitSearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct CommitSearchItem {
    pub url: String,
}

#[derive(Deserialize)]
struct CommitDetail {
    #[serde(default)]
    stats: CommitStats,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommitStats {
    pub additions: u64,
    pub deletions: u64,
}

#[derive(Debug)]
pub struct Document {
    pub sha: String,
    pub content: String,
}

#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
}

// ─── Helpers ──────────────────────────────────────────────────────────────

fn iso_instant(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    Err(VitaeError::Api { status, message })
}

// ─── Tests ────────────────────────────────────────────────────────────────
