//! Write-back of the rendered document through the contents API's
//! optimistic-concurrency contract.

use serde::Serialize;

use crate::error::Result;
use crate::github::GithubClient;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PublishReceipt {
    pub api_calls: u32,
}

/// Overwrite the profile document with `content`.
///
/// Fetches the current document's version marker first, then writes with
/// that marker; the remote rejects the write if another writer updated the
/// document in between. The conflict surfaces unmodified — no retry. Two
/// remote calls on the success path.
pub async fn publish(
    client: &GithubClient,
    owner: &str,
    repo: &str,
    path: &str,
    content: &str,
    message: &str,
) -> Result<PublishReceipt> {
    let current = client.get_document(owner, repo, path).await?;
    client
        .put_document(owner, repo, path, content, message, &current.sha)
        .await?;
    tracing::info!(owner, repo, path, "document published");
    Ok(PublishReceipt { api_calls: 2 })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
