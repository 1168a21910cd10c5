//! traits
//!
//! Forge trait definition and the normalized data model shared by all
//! adapters.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! URL construction (`url_for_ref`, `changelog_for_ref`) is pure and stays
//! synchronous: both are functions of the ref arguments and the adapter's
//! immutable configuration only.
//!
//! Each forge returns its own JSON shapes; adapters translate them into the
//! normalized types in this module so callers never branch on the forge
//! behind the trait object.
//!
//! # Example
//!
//! ```ignore
//! use upstream_forge::{Forge, RefKind};
//!
//! async fn latest_release_archive(forge: &dyn Forge) -> Result<String, ForgeError> {
//!     let releases = forge.releases().await?;
//!     let newest = releases.first().expect("project has releases");
//!     forge.url_for_ref(&newest.tag_name, RefKind::Releases)
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Credential pair `(user, token)` sent as HTTP Basic auth.
pub type Credentials = (String, String);

/// Errors from forge operations.
///
/// These map to the failure modes of talking to remote forges: malformed
/// upstream URLs, non-2xx responses, markup that no longer carries the
/// discovery marker, and unresolvable projects.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// The upstream URL does not reduce to the shape this adapter requires.
    /// Construction-time failure; the caller must supply a corrected URL.
    #[error("invalid project URL: {0}")]
    InvalidProject(String),

    /// A forge or page fetch returned a non-2xx response. Carries the status
    /// code verbatim; never retried internally.
    #[error("HTTP error: {status} - {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        message: String,
    },

    /// The forge-root marker pattern was absent from the page content.
    /// Either the forge changed its markup or the target is not actually
    /// that forge type.
    #[error("forge root discovery failed: {0}")]
    Discovery(String),

    /// GitLab project-id resolution exhausted both the direct lookup and
    /// the search fallback.
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// The operation was invoked with a ref kind this adapter does not
    /// support for it.
    #[error("{operation} does not support {kind} refs")]
    UnsupportedRefKind {
        /// The rejected ref kind
        kind: RefKind,
        /// The operation that rejected it
        operation: &'static str,
    },

    /// Network or connection error before any HTTP status existed.
    #[error("network error: {0}")]
    Network(String),
}

/// The kind of ref a URL is being built for.
///
/// A pure tag with no payload; adapters branch on it when constructing
/// archive and changelog URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// A git tag
    Tags,
    /// A commit SHA
    Commits,
    /// A published release
    Releases,
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefKind::Tags => write!(f, "tags"),
            RefKind::Commits => write!(f, "commits"),
            RefKind::Releases => write!(f, "releases"),
        }
    }
}

/// A commit in the normalized shape every adapter produces for `commits()`
/// and `tip_of_branch()`.
///
/// The nesting mirrors GitHub's native commit record, which doubles as the
/// wire format there; GitLab and Gitea adapters remap their native fields
/// into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit SHA
    pub sha: String,
    /// Nested commit detail
    pub commit: CommitDetail,
}

/// Inner commit object carrying authorship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetail {
    /// Commit author
    pub author: CommitAuthor,
}

/// Commit authorship, reduced to the timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitAuthor {
    /// Author date; the forge's original UTC offset is preserved
    pub date: DateTime<FixedOffset>,
}

impl CommitInfo {
    /// Build a normalized commit from a SHA and an author date.
    pub fn new(sha: impl Into<String>, date: DateTime<FixedOffset>) -> Self {
        Self {
            sha: sha.into(),
            commit: CommitDetail {
                author: CommitAuthor { date },
            },
        }
    }
}

/// A release in the normalized shape every adapter produces.
///
/// GitHub and Gitea return this natively; the GitLab adapter remaps its
/// link-assets and synthesizes `source.<format>` entries from the native
/// "sources" list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Tag the release was cut from
    pub tag_name: String,
    /// Whether the release is marked as a prerelease
    #[serde(default)]
    pub prerelease: bool,
    /// Whether the release is a draft
    #[serde(default)]
    pub draft: bool,
    /// Human-facing release page URL
    pub html_url: String,
    /// Downloadable artifacts, in the order the forge listed them
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable artifact attached to a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// Artifact file name
    pub name: String,
    /// Direct download URL
    pub browser_download_url: String,
}

/// A tag record, forge-native apart from the commit field name.
///
/// GitLab calls the tagged commit's SHA `id`; the serde alias absorbs that
/// so callers see one field. No further normalization is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// The commit the tag points at, when the forge includes one
    #[serde(default)]
    pub commit: Option<TagTarget>,
}

/// The commit reference inside a tag record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagTarget {
    /// Commit SHA (GitLab serves this as `id`)
    #[serde(alias = "id")]
    pub sha: String,
}

/// The uniform capability set for talking to a forge.
///
/// One concrete implementation exists per forge; callers hold a
/// `Box<dyn Forge>` obtained from [`create_forge`] and never branch on the
/// forge behind it.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. All adapter state (project
/// identifier, resolved forge root) is computed at construction and
/// immutable afterwards, so a single instance is safe to share.
///
/// # Error Handling
///
/// Network operations propagate every failure; none of them swallows an
/// error to produce a degraded result. A 404 from the forge surfaces as
/// `ForgeError::Http { status: 404, .. }`, never as an empty success.
///
/// [`create_forge`]: crate::create_forge
#[async_trait]
pub trait Forge: Send + Sync {
    /// The forge name (e.g. "github", "gitlab").
    fn name(&self) -> &'static str;

    /// List the project's tags.
    ///
    /// Only the first page the forge serves is fetched; deep tag histories
    /// are truncated.
    async fn tags(&self) -> Result<Vec<TagInfo>, ForgeError>;

    /// List the project's most recent commits, normalized to [`CommitInfo`].
    ///
    /// First page only, like [`tags`](Forge::tags).
    async fn commits(&self) -> Result<Vec<CommitInfo>, ForgeError>;

    /// Fetch the commit at the tip of `branch`.
    ///
    /// # Errors
    ///
    /// `ForgeError::Http { status: 404, .. }` if the branch does not exist.
    async fn tip_of_branch(&self, branch: &str) -> Result<CommitInfo, ForgeError>;

    /// List the project's releases, normalized to [`ReleaseInfo`].
    async fn releases(&self) -> Result<Vec<ReleaseInfo>, ForgeError>;

    /// Build a source-archive download URL for a ref.
    ///
    /// Pure: no network round-trip; identical inputs produce identical
    /// output for the adapter's lifetime.
    fn url_for_ref(&self, ref_name: &str, kind: RefKind) -> Result<String, ForgeError>;

    /// Build a human-facing changelog URL between two refs.
    ///
    /// Pure, like [`url_for_ref`](Forge::url_for_ref). For commit refs this
    /// is a compare view between `old_ref` and `new_ref`; for tag/release
    /// refs the forge's release or tag page for `new_ref`.
    fn changelog_for_ref(
        &self,
        new_ref: &str,
        old_ref: &str,
        kind: RefKind,
    ) -> Result<String, ForgeError>;
}
