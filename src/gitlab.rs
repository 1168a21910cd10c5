//! gitlab
//!
//! GitLab adapter over the REST API v4, for gitlab.com and self-hosted
//! installs.
//!
//! # Design
//!
//! Construction is async and does the expensive work up front: discover the
//! install's root from the project page (see [`discovery`]), derive the
//! project path by stripping that root, then resolve the numeric project id
//! the v4 API addresses everything by. After `connect` returns, the adapter
//! holds only immutable state.
//!
//! GitLab's wire shapes differ from the normalized model, so commits,
//! branch tips and releases go through pure remap functions; fixtures can
//! exercise those without a network.
//!
//! [`discovery`]: crate::discovery

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::Deserialize;

use crate::discovery;
use crate::http;
use crate::traits::{
    CommitInfo, Forge, ForgeError, RefKind, ReleaseAsset, ReleaseInfo, TagInfo,
};

/// GitLab adapter.
#[derive(Debug)]
pub struct GitlabForge {
    /// HTTP client for making requests
    client: Client,
    /// Resolved install root, no trailing slash
    forge_root: String,
    /// Project path below the root, e.g. "group/subgroup/project"
    project_path: String,
    /// Numeric project id the v4 API addresses the project by
    project_id: u64,
}

impl GitlabForge {
    /// Connect to the GitLab project behind an upstream URL.
    ///
    /// Performs one page fetch for root discovery and one or two API calls
    /// for project-id resolution; both results are cached for the adapter's
    /// lifetime.
    ///
    /// # Errors
    ///
    /// - `ForgeError::Discovery` if the page does not carry the GitLab marker
    /// - `ForgeError::InvalidProject` if the discovered root is not a prefix
    ///   of the upstream URL
    /// - `ForgeError::ProjectNotFound` if the id cannot be resolved
    pub async fn connect(upstream: &str) -> Result<Self, ForgeError> {
        let client = Client::new();

        let forge_root = discovery::discover_gitlab_root(&client, upstream)
            .await?
            .trim_end_matches('/')
            .to_string();

        let project_path = upstream
            .strip_prefix(forge_root.as_str())
            .ok_or_else(|| {
                ForgeError::InvalidProject(format!(
                    "'{}' is not under the discovered GitLab root '{}'",
                    upstream, forge_root
                ))
            })?
            .trim_matches('/')
            .to_string();

        let project_id = resolve_project_id(&client, &forge_root, &project_path).await?;

        Ok(Self {
            client,
            forge_root,
            project_path,
            project_id,
        })
    }

    /// The resolved install root.
    pub fn forge_root(&self) -> &str {
        &self.forge_root
    }

    /// The numeric project id.
    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4/{}", self.forge_root, path)
    }

    async fn api_get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ForgeError> {
        http::get_json(&self.client, &self.api_url(path), None).await
    }
}

#[async_trait]
impl Forge for GitlabForge {
    fn name(&self) -> &'static str {
        "gitlab"
    }

    async fn tags(&self) -> Result<Vec<TagInfo>, ForgeError> {
        self.api_get(&format!("projects/{}/repository/tags", self.project_id))
            .await
    }

    async fn commits(&self) -> Result<Vec<CommitInfo>, ForgeError> {
        let native: Vec<GitlabCommit> = self
            .api_get(&format!("projects/{}/repository/commits", self.project_id))
            .await?;
        Ok(native.into_iter().map(CommitInfo::from).collect())
    }

    async fn tip_of_branch(&self, branch: &str) -> Result<CommitInfo, ForgeError> {
        let detail: GitlabBranch = self
            .api_get(&format!(
                "projects/{}/repository/branches/{}",
                self.project_id, branch
            ))
            .await?;
        Ok(detail.commit.into())
    }

    async fn releases(&self) -> Result<Vec<ReleaseInfo>, ForgeError> {
        let native: Vec<GitlabRelease> = self
            .api_get(&format!("projects/{}/releases", self.project_id))
            .await?;
        Ok(native.into_iter().map(ReleaseInfo::from).collect())
    }

    /// Archive URL for a ref. The ref kind is ignored: GitLab serves every
    /// ref through the same `/-/archive/` path, always as `.tar.bz2`.
    fn url_for_ref(&self, ref_name: &str, _kind: RefKind) -> Result<String, ForgeError> {
        let name = self
            .project_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.project_path);
        let clean_ref = ref_name.replace('/', "-");
        Ok(format!(
            "{}/{}/-/archive/{}/{}-{}.tar.bz2",
            self.forge_root, self.project_path, ref_name, name, clean_ref
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
            RefKind::Commits => Ok(format!("{}/-/compare/{}...{}", base, old_ref, new_ref)),
            RefKind::Tags => Ok(format!("{}/-/tags/{}", base, new_ref)),
            RefKind::Releases => Ok(format!("{}/-/releases/{}", base, new_ref)),
        }
    }
}

/// Resolve a project path to its numeric id.
///
/// Tries the exact-path lookup first. Some installs 404 on that endpoint,
/// so a 404 falls back to a search by the last path segment filtered for an
/// exact `path_with_namespace` match; the first exact match wins.
async fn resolve_project_id(
    client: &Client,
    forge_root: &str,
    project_path: &str,
) -> Result<u64, ForgeError> {
    let encoded = project_path.replace('/', "%2F");
    let direct = format!("{}/api/v4/projects/{}", forge_root, encoded);

    match http::get_json::<GitlabProject>(client, &direct, None).await {
        Ok(project) => Ok(project.id),
        Err(ForgeError::Http { status: 404, .. }) => {
            let name = project_path.rsplit('/').next().unwrap_or(project_path);
            let search = format!("{}/api/v4/projects?search={}", forge_root, name);
            let candidates: Vec<GitlabProject> = http::get_json(client, &search, None).await?;
            candidates
                .into_iter()
                .find(|p| p.path_with_namespace.as_deref() == Some(project_path))
                .map(|p| p.id)
                .ok_or_else(|| ForgeError::ProjectNotFound(project_path.to_string()))
        }
        Err(err) => Err(err),
    }
}

// --------------------------------------------------------------------------
// Native wire shapes and remapping
// --------------------------------------------------------------------------

/// Project record from the v4 projects endpoints.
#[derive(Deserialize)]
struct GitlabProject {
    id: u64,
    path_with_namespace: Option<String>,
}

/// Native commit record.
#[derive(Debug, Deserialize)]
struct GitlabCommit {
    id: String,
    committed_date: DateTime<FixedOffset>,
}

/// Branch detail; only the nested commit is of interest.
#[derive(Deserialize)]
struct GitlabBranch {
    commit: GitlabCommit,
}

/// Native release record.
#[derive(Debug, Deserialize)]
struct GitlabRelease {
    tag_name: String,
    #[serde(rename = "_links")]
    links: GitlabReleaseLinks,
    assets: GitlabReleaseAssets,
}

#[derive(Debug, Deserialize)]
struct GitlabReleaseLinks {
    #[serde(rename = "self")]
    self_url: String,
}

#[derive(Debug, Deserialize)]
struct GitlabReleaseAssets {
    #[serde(default)]
    links: Vec<GitlabAssetLink>,
    #[serde(default)]
    sources: Vec<GitlabAssetSource>,
}

/// A release asset uploaded as a link.
#[derive(Debug, Deserialize)]
struct GitlabAssetLink {
    name: String,
    direct_asset_url: String,
}

/// A source archive GitLab generates per release, one entry per format.
#[derive(Debug, Deserialize)]
struct GitlabAssetSource {
    format: String,
    url: String,
}

impl From<GitlabCommit> for CommitInfo {
    fn from(commit: GitlabCommit) -> Self {
        CommitInfo::new(commit.id, commit.committed_date)
    }
}

impl From<GitlabRelease> for ReleaseInfo {
    fn from(release: GitlabRelease) -> Self {
        let mut assets: Vec<ReleaseAsset> = release
            .assets
            .links
            .into_iter()
            .map(|link| ReleaseAsset {
                name: link.name,
                browser_download_url: link.direct_asset_url,
            })
            .collect();

        // GitLab does not expose pre-packaged archives the way GitHub does;
        // surfacing each source format as an asset keeps the same download
        // discoverable that url_for_ref later serves.
        for source in release.assets.sources {
            assets.push(ReleaseAsset {
                name: format!("source.{}", source.format),
                browser_download_url: source.url,
            });
        }

        ReleaseInfo {
            tag_name: release.tag_name,
            prerelease: false,
            draft: false,
            html_url: release.links.self_url,
            assets,
        }
    }
}
