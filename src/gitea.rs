//! gitea
//!
//! Gitea/Forgejo adapter over the REST API v1.
//!
//! # Design
//!
//! Like GitLab, self-hosted Gitea and Forgejo installs need root discovery
//! before the first API call; unlike GitLab, the v1 API addresses projects
//! by path directly, so there is no id-resolution step.
//!
//! Gitea mirrors GitHub's wire shapes for commit lists and releases, so
//! those deserialize natively. Branch detail uses Gitea's own field names
//! (`id`/`timestamp`) and goes through a pure remap.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::Deserialize;

use crate::discovery;
use crate::http;
use crate::traits::{CommitInfo, Forge, ForgeError, RefKind, ReleaseInfo, TagInfo};

/// Gitea/Forgejo adapter.
#[derive(Debug)]
pub struct GiteaForge {
    /// HTTP client for making requests
    client: Client,
    /// Resolved install root, no trailing slash
    forge_root: String,
    /// Project path below the root, e.g. "owner/project"
    project_path: String,
}

impl GiteaForge {
    /// Connect to the Gitea/Forgejo project behind an upstream URL.
    ///
    /// Performs one page fetch for root discovery; the result is cached for
    /// the adapter's lifetime.
    ///
    /// # Errors
    ///
    /// - `ForgeError::Discovery` if the page does not carry the `appUrl`
    ///   marker
    /// - `ForgeError::InvalidProject` if the discovered root is not a prefix
    ///   of the upstream URL
    pub async fn connect(upstream: &str) -> Result<Self, ForgeError> {
        let client = Client::new();

        let forge_root = discovery::discover_gitea_root(&client, upstream)
            .await?
            .trim_end_matches('/')
            .to_string();

        // Leading separator only; a trailing slash stays part of the path
        // as the forge served it.
        let project_path = upstream
            .strip_prefix(forge_root.as_str())
            .ok_or_else(|| {
                ForgeError::InvalidProject(format!(
                    "'{}' is not under the discovered Gitea root '{}'",
                    upstream, forge_root
                ))
            })?
            .trim_start_matches('/')
            .to_string();

        Ok(Self {
            client,
            forge_root,
            project_path,
        })
    }

    /// The resolved install root.
    pub fn forge_root(&self) -> &str {
        &self.forge_root
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/api/v1/repos/{}/{}",
            self.forge_root, self.project_path, path
        )
    }

    async fn api_get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ForgeError> {
        http::get_json(&self.client, url, None).await
    }
}

#[async_trait]
impl Forge for GiteaForge {
    fn name(&self) -> &'static str {
        "gitea"
    }

    async fn tags(&self) -> Result<Vec<TagInfo>, ForgeError> {
        self.api_get(&self.repo_url("tags")).await
    }

    async fn commits(&self) -> Result<Vec<CommitInfo>, ForgeError> {
        self.api_get(&self.repo_url("commits")).await
    }

    async fn tip_of_branch(&self, branch: &str) -> Result<CommitInfo, ForgeError> {
        let detail: GiteaBranch = self
            .api_get(&self.repo_url(&format!("branches/{}", branch)))
            .await?;
        Ok(detail.commit.into())
    }

    async fn releases(&self) -> Result<Vec<ReleaseInfo>, ForgeError> {
        self.api_get(&self.repo_url("releases")).await
    }

    /// Archive URL for a ref. The ref kind is ignored: Gitea serves every
    /// ref through the same `/archive/` path, always as `.tar.gz`.
    fn url_for_ref(&self, ref_name: &str, _kind: RefKind) -> Result<String, ForgeError> {
        Ok(format!(
            "{}/{}/archive/{}.tar.gz",
            self.forge_root, self.project_path, ref_name
        ))
    }

    fn changelog_for_ref(
        &self,
        new_ref: &str,
        old_ref: &str,
        kind: RefKind,
    ) -> Result<String, ForgeError> {
        let base = format!("{}/{}", self.forge_root, self.project_path);
        match kind {
            RefKind::Commits => Ok(format!("{}/compare/{}...{}", base, old_ref, new_ref)),
            RefKind::Tags | RefKind::Releases => {
                Ok(format!("{}/releases/tag/{}", base, new_ref))
            }
        }
    }
}

/// Branch detail; Gitea nests the tip commit under its own field names.
#[derive(Deserialize)]
struct GiteaBranch {
    commit: GiteaBranchCommit,
}

/// Native branch-tip commit record.
#[derive(Debug, Deserialize)]
struct GiteaBranchCommit {
    id: String,
    timestamp: DateTime<FixedOffset>,
}

impl From<GiteaBranchCommit> for CommitInfo {
    fn from(commit: GiteaBranchCommit) -> Self {
        CommitInfo::new(commit.id, commit.timestamp)
    }
}
