//! discovery
//!
//! Forge-root discovery for self-hosted GitLab and Gitea/Forgejo installs.
//!
//! # Design
//!
//! Self-hosted forges live under arbitrary roots (`https://git.example.com`,
//! `https://example.com/gitea`, ...), so the API base cannot be derived from
//! the project URL alone. Each function here fetches the project's human
//! page and searches the raw HTML for a forge-specific literal the frontend
//! embeds:
//!
//! - GitLab ships its GraphQL endpoint as a script constant:
//!   `` const url = `<root>/api/graphql` ``
//! - Gitea and Forgejo ship a config object containing
//!   `appUrl: '<root>',`
//!
//! This is a heuristic, brittle-by-design dependency on frontend markup.
//! It is isolated behind these two entry points so a future alternative
//! (a well-known `/api` probe, or explicit configuration) can replace it
//! without touching the adapters.
//!
//! The pattern match itself is split into pure extractor functions so
//! fixtures can exercise it without a network.

use regex::Regex;
use reqwest::Client;

use crate::http;
use crate::traits::ForgeError;

/// Discover a GitLab install's root from a project's human-facing URL.
///
/// # Errors
///
/// - `ForgeError::Http` if the page cannot be fetched (non-2xx)
/// - `ForgeError::Discovery` if the GraphQL endpoint marker is absent
pub async fn discover_gitlab_root(
    client: &Client,
    project_url: &str,
) -> Result<String, ForgeError> {
    let body = http::get_text(client, project_url).await?;
    extract_gitlab_root(&body).ok_or_else(|| {
        ForgeError::Discovery(format!(
            "no GitLab GraphQL endpoint marker in page at {}",
            project_url
        ))
    })
}

/// Discover a Gitea/Forgejo install's root from a project's human-facing URL.
///
/// # Errors
///
/// - `ForgeError::Http` if the page cannot be fetched (non-2xx)
/// - `ForgeError::Discovery` if the `appUrl` marker is absent
pub async fn discover_gitea_root(client: &Client, project_url: &str) -> Result<String, ForgeError> {
    let body = http::get_text(client, project_url).await?;
    extract_gitea_root(&body).ok_or_else(|| {
        ForgeError::Discovery(format!("no appUrl marker in page at {}", project_url))
    })
}

/// Pull the root out of GitLab page content: everything before
/// `/api/graphql` in the frontend's GraphQL URL constant.
fn extract_gitlab_root(body: &str) -> Option<String> {
    let marker = Regex::new(r"const url = `(.*)/api/graphql`").expect("valid marker pattern");
    let captures = marker.captures(body)?;
    Some(captures.get(1)?.as_str().to_string())
}

/// Pull the root out of Gitea/Forgejo page content: the `appUrl` config
/// value, with backslash escapes removed.
fn extract_gitea_root(body: &str) -> Option<String> {
    let marker = Regex::new(r"appUrl: '([^']*)',").expect("valid marker pattern");
    let captures = marker.captures(body)?;
    Some(captures.get(1)?.as_str().replace('\\', ""))
}
