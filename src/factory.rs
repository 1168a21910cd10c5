//! factory
//!
//! Forge selection and creation.
//!
//! # Design
//!
//! Callers use [`create_forge`] instead of importing specific adapters, so
//! variant forge behavior stays behind the [`Forge`] trait object rather
//! than leaking runtime type checks into call sites.
//!
//! # Provider Detection
//!
//! Hosted forges are recognized by URL host (`github.com`, `gitlab.com`,
//! `codeberg.org`). Self-hosted installs are indistinguishable by URL
//! shape, so those need an explicit provider override.
//!
//! # Example
//!
//! ```ignore
//! use upstream_forge::{create_forge, RefKind};
//!
//! // Auto-detect from URL
//! let forge = create_forge("https://github.com/owner/repo", None, None).await?;
//!
//! // Self-hosted Gitea: provider must be explicit
//! let forge = create_forge("https://git.example.com/owner/repo", None, Some("gitea")).await?;
//!
//! let tags = forge.tags().await?;
//! ```

use url::Url;

use crate::gitea::GiteaForge;
use crate::github::GithubForge;
use crate::gitlab::GitlabForge;
use crate::traits::{Credentials, Forge, ForgeError};

/// Supported forge providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgeProvider {
    /// GitHub (github.com or GitHub Enterprise)
    GitHub,
    /// GitLab (gitlab.com or self-hosted)
    GitLab,
    /// Gitea or Forgejo
    Gitea,
}

impl ForgeProvider {
    /// All supported providers.
    pub fn all() -> &'static [ForgeProvider] {
        &[
            ForgeProvider::GitHub,
            ForgeProvider::GitLab,
            ForgeProvider::Gitea,
        ]
    }

    /// The provider name as used in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            ForgeProvider::GitHub => "github",
            ForgeProvider::GitLab => "gitlab",
            ForgeProvider::Gitea => "gitea",
        }
    }

    /// Parse a provider from a string.
    ///
    /// "forgejo" is accepted as a synonym for the Gitea adapter; the two
    /// forges share an API.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(ForgeProvider::GitHub),
            "gitlab" => Some(ForgeProvider::GitLab),
            "gitea" | "forgejo" => Some(ForgeProvider::Gitea),
            _ => None,
        }
    }
}

impl std::fmt::Display for ForgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the forge provider from an upstream URL's host.
///
/// Returns `None` for hosts that cannot be classified by shape alone
/// (every self-hosted GitLab/Gitea install); pass an explicit provider to
/// [`create_forge`] for those.
pub fn detect_provider(upstream: &str) -> Option<ForgeProvider> {
    let url = Url::parse(upstream).ok()?;
    match url.host_str()? {
        "github.com" | "www.github.com" => Some(ForgeProvider::GitHub),
        "gitlab.com" | "www.gitlab.com" => Some(ForgeProvider::GitLab),
        // Codeberg is the one big hosted Forgejo instance.
        "codeberg.org" => Some(ForgeProvider::Gitea),
        _ => None,
    }
}

/// Create a forge adapter for an upstream project URL.
///
/// This is the primary entry point. Async because GitLab and Gitea
/// construction performs root-discovery round-trips before the adapter is
/// usable.
///
/// # Arguments
///
/// * `upstream` - The project's human-facing URL
/// * `auth` - Optional credential pair (GitHub only; ignored elsewhere)
/// * `provider_override` - Provider name to use instead of auto-detection
///
/// # Errors
///
/// - `ForgeError::InvalidProject` if the provider cannot be determined or
///   the URL does not fit the provider's shape
/// - any construction error of the selected adapter
pub async fn create_forge(
    upstream: &str,
    auth: Option<Credentials>,
    provider_override: Option<&str>,
) -> Result<Box<dyn Forge>, ForgeError> {
    let provider = match provider_override {
        Some(name) => ForgeProvider::parse(name).ok_or_else(|| {
            ForgeError::InvalidProject(format!(
                "unknown forge provider '{}'; available providers: {}",
                name,
                available_providers_string()
            ))
        })?,
        None => detect_provider(upstream).ok_or_else(|| {
            ForgeError::InvalidProject(format!(
                "could not detect a forge provider from '{}'; pass one of: {}",
                upstream,
                available_providers_string()
            ))
        })?,
    };

    match provider {
        ForgeProvider::GitHub => Ok(Box::new(GithubForge::new(upstream, auth)?)),
        ForgeProvider::GitLab => Ok(Box::new(GitlabForge::connect(upstream).await?)),
        ForgeProvider::Gitea => Ok(Box::new(GiteaForge::connect(upstream).await?)),
    }
}

/// Comma-separated list of provider names for error messages.
fn available_providers_string() -> String {
    ForgeProvider::all()
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}
