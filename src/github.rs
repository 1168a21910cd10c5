//! github
//!
//! GitHub adapter over the REST API v3.
//!
//! # Design
//!
//! GitHub's wire shapes already match the normalized model, so `commits()`,
//! `tip_of_branch()` and `releases()` deserialize straight into
//! [`CommitInfo`]/[`ReleaseInfo`] with no remap pass. Tags come back in
//! their native shape.
//!
//! # Authentication
//!
//! Anonymous access is valid; an optional `(user, token)` credential pair
//! raises the request volume limits and is sent as HTTP Basic auth on every
//! request. Rate-limit responses are not retried here; a 403/429 surfaces
//! as `ForgeError::Http` like any other non-2xx.
//!
//! # Example
//!
//! ```ignore
//! use upstream_forge::github::GithubForge;
//! use upstream_forge::{Forge, RefKind};
//!
//! let forge = GithubForge::new("https://github.com/octocat/hello-world", None)?;
//! let tip = forge.tip_of_branch("main").await?;
//! let archive = forge.url_for_ref(&tip.sha, RefKind::Commits)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;

use crate::http;
use crate::traits::{CommitInfo, Credentials, Forge, ForgeError, RefKind, ReleaseInfo, TagInfo};

/// Default GitHub API base URL.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub adapter.
///
/// Holds the canonical project URL and the derived `owner/repo` pair;
/// both are validated at construction and immutable afterwards.
pub struct GithubForge {
    /// HTTP client for making requests
    client: Client,
    /// Canonical project URL, no trailing slash
    upstream: String,
    /// Derived "owner/repo" pair
    repo: String,
    /// Optional credential pair for authenticated requests
    auth: Option<Credentials>,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
}

// Custom Debug to avoid exposing credentials
impl std::fmt::Debug for GithubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubForge")
            .field("upstream", &self.upstream)
            .field("repo", &self.repo)
            .field("has_auth", &self.auth.is_some())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GithubForge {
    /// Create a GitHub adapter for an upstream project URL.
    ///
    /// The URL must reduce to exactly an `owner/repo` pair once the
    /// `github.com` prefix and surrounding slashes are stripped.
    ///
    /// # Arguments
    ///
    /// * `upstream` - Project URL, e.g. `https://github.com/owner/repo`
    /// * `auth` - Optional `(user, token)` pair; `None` uses anonymous access
    ///
    /// # Errors
    ///
    /// `ForgeError::InvalidProject` if the URL does not reduce to two path
    /// segments.
    pub fn new(
        upstream: impl Into<String>,
        auth: Option<Credentials>,
    ) -> Result<Self, ForgeError> {
        Self::with_api_base(upstream, auth, DEFAULT_API_BASE)
    }

    /// Create a GitHub adapter against a custom API base URL.
    ///
    /// Use this for GitHub Enterprise installs (e.g.
    /// `https://github.example.com/api/v3`) or a test server.
    pub fn with_api_base(
        upstream: impl Into<String>,
        auth: Option<Credentials>,
        api_base: impl Into<String>,
    ) -> Result<Self, ForgeError> {
        let upstream = upstream.into().trim_end_matches('/').to_string();
        let repo = parse_repo_path(&upstream)?;
        Ok(Self {
            client: Client::new(),
            upstream,
            repo,
            auth,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// The derived "owner/repo" pair.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Build an API URL under the repository.
    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api_base, self.repo, path)
    }

    async fn api_get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ForgeError> {
        http::get_json(&self.client, url, self.auth.as_ref()).await
    }
}

#[async_trait]
impl Forge for GithubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn tags(&self) -> Result<Vec<TagInfo>, ForgeError> {
        self.api_get(&self.repo_url("tags")).await
    }

    async fn commits(&self) -> Result<Vec<CommitInfo>, ForgeError> {
        self.api_get(&self.repo_url("commits")).await
    }

    async fn tip_of_branch(&self, branch: &str) -> Result<CommitInfo, ForgeError> {
        let detail: BranchDetail = self
            .api_get(&self.repo_url(&format!("branches/{}", branch)))
            .await?;
        Ok(detail.commit)
    }

    async fn releases(&self) -> Result<Vec<ReleaseInfo>, ForgeError> {
        self.api_get(&self.repo_url("releases?per_page=100")).await
    }

    fn url_for_ref(&self, ref_name: &str, kind: RefKind) -> Result<String, ForgeError> {
        match kind {
            RefKind::Tags | RefKind::Releases => Ok(format!(
                "{}/archive/refs/tags/{}.tar.gz",
                self.upstream, ref_name
            )),
            RefKind::Commits => Ok(format!("{}/archive/{}.tar.gz", self.upstream, ref_name)),
        }
    }

    fn changelog_for_ref(
        &self,
        new_ref: &str,
        old_ref: &str,
        kind: RefKind,
    ) -> Result<String, ForgeError> {
        match kind {
            RefKind::Commits => Ok(format!(
                "{}/compare/{}...{}",
                self.upstream, old_ref, new_ref
            )),
            RefKind::Tags | RefKind::Releases => {
                Ok(format!("{}/releases/tag/{}", self.upstream, new_ref))
            }
        }
    }
}

/// Branch detail response; only the nested commit is of interest.
#[derive(serde::Deserialize)]
struct BranchDetail {
    commit: CommitInfo,
}

/// Reduce an upstream URL to its "owner/repo" pair.
///
/// Accepts the project page URL with or without the scheme-and-host prefix;
/// anything that does not leave exactly two non-empty path segments is
/// rejected.
fn parse_repo_path(upstream: &str) -> Result<String, ForgeError> {
    let path = upstream
        .strip_prefix("https://github.com/")
        .or_else(|| upstream.strip_prefix("http://github.com/"))
        .unwrap_or(upstream)
        .trim_matches('/');

    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() != 2 || segments.iter().any(|s| s.is_empty()) {
        return Err(ForgeError::InvalidProject(format!(
            "'{}' doesn't seem to be a github repository",
            upstream
        )));
    }
    Ok(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_repo_path {
        use super::*;

        #[test]
        fn https_project_url() {
            assert_eq!(
                parse_repo_path("https://github.com/octocat/hello-world").unwrap(),
                "octocat/hello-world"
            );
        }

        #[test]
        fn bare_owner_repo_pair() {
            assert_eq!(parse_repo_path("octocat/hello-world").unwrap(), "octocat/hello-world");
        }

        #[test]
        fn owner_only_is_rejected() {
            assert!(matches!(
                parse_repo_path("https://github.com/octocat"),
                Err(ForgeError::InvalidProject(_))
            ));
        }

        #[test]
        fn nested_path_is_rejected() {
            assert!(matches!(
                parse_repo_path("https://github.com/a/b/c"),
                Err(ForgeError::InvalidProject(_))
            ));
        }

        #[test]
        fn empty_segment_is_rejected() {
            assert!(parse_repo_path("https://github.com/octocat//").is_err());
            assert!(parse_repo_path("").is_err());
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn trims_trailing_slash() {
            let forge = GithubForge::new("https://github.com/owner/repo/", None).unwrap();
            assert_eq!(forge.repo(), "owner/repo");
            assert_eq!(forge.upstream, "https://github.com/owner/repo");
        }

        #[test]
        fn name_is_github() {
            let forge = GithubForge::new("https://github.com/owner/repo", None).unwrap();
            assert_eq!(forge.name(), "github");
        }

        #[test]
        fn anonymous_access_is_valid() {
            let forge = GithubForge::new("https://github.com/owner/repo", None).unwrap();
            assert!(forge.auth.is_none());
        }

        #[test]
        fn non_github_url_is_rejected() {
            assert!(matches!(
                GithubForge::new("https://gitlab.com/owner/repo/extra", None),
                Err(ForgeError::InvalidProject(_))
            ));
        }

        #[test]
        fn repo_url_format() {
            let forge = GithubForge::new("https://github.com/octocat/hello-world", None).unwrap();
            assert_eq!(
                forge.repo_url("tags"),
                "https://api.github.com/repos/octocat/hello-world/tags"
            );
        }

        #[test]
        fn debug_redacts_credentials() {
            let forge = GithubForge::new(
                "https://github.com/owner/repo",
                Some(("alice".into(), "secret_token_abc123".into())),
            )
            .unwrap();
            let debug_output = format!("{:?}", forge);
            assert!(!debug_output.contains("secret_token_abc123"));
            assert!(debug_output.contains("has_auth"));
        }
    }

    mod url_construction {
        use super::*;

        fn forge() -> GithubForge {
            GithubForge::new("https://github.com/owner/repo", None).unwrap()
        }

        #[test]
        fn tag_ref_builds_tag_archive_url() {
            assert_eq!(
                forge().url_for_ref("v1.2.3", RefKind::Tags).unwrap(),
                "https://github.com/owner/repo/archive/refs/tags/v1.2.3.tar.gz"
            );
        }

        #[test]
        fn release_ref_builds_tag_archive_url() {
            assert_eq!(
                forge().url_for_ref("v1.2.3", RefKind::Releases).unwrap(),
                "https://github.com/owner/repo/archive/refs/tags/v1.2.3.tar.gz"
            );
        }

        #[test]
        fn commit_ref_builds_sha_archive_url() {
            assert_eq!(
                forge().url_for_ref("deadbeef", RefKind::Commits).unwrap(),
                "https://github.com/owner/repo/archive/deadbeef.tar.gz"
            );
        }

        #[test]
        fn url_for_ref_is_deterministic() {
            let forge = forge();
            assert_eq!(
                forge.url_for_ref("v1.0", RefKind::Tags).unwrap(),
                forge.url_for_ref("v1.0", RefKind::Tags).unwrap()
            );
        }

        #[test]
        fn commit_changelog_is_compare_url() {
            assert_eq!(
                forge()
                    .changelog_for_ref("new", "old", RefKind::Commits)
                    .unwrap(),
                "https://github.com/owner/repo/compare/old...new"
            );
        }

        #[test]
        fn tag_changelog_is_release_page() {
            assert_eq!(
                forge()
                    .changelog_for_ref("v2.0", "v1.0", RefKind::Tags)
                    .unwrap(),
                "https://github.com/owner/repo/releases/tag/v2.0"
            );
            assert_eq!(
                forge()
                    .changelog_for_ref("v2.0", "v1.0", RefKind::Releases)
                    .unwrap(),
                "https://github.com/owner/repo/releases/tag/v2.0"
            );
        }
    }
}
