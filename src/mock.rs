//! mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! Downstream code that consumes `dyn Forge` needs a way to test without a
//! network. `MockForge` serves seeded tags, commits, branches and releases
//! from memory, and can be told to fail every network-shaped operation
//! with a configured error.
//!
//! # Example
//!
//! ```
//! use upstream_forge::mock::MockForge;
//! use upstream_forge::{CommitInfo, Forge};
//! use chrono::DateTime;
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new();
//! let date = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
//! forge.seed_branch("main", CommitInfo::new("abc123", date));
//!
//! let tip = forge.tip_of_branch("main").await.unwrap();
//! assert_eq!(tip.sha, "abc123");
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::traits::{CommitInfo, Forge, ForgeError, RefKind, ReleaseInfo, TagInfo};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockForge {
    inner: Arc<Mutex<MockForgeInner>>,
}

#[derive(Debug, Default)]
struct MockForgeInner {
    tags: Vec<TagInfo>,
    commits: Vec<CommitInfo>,
    branches: HashMap<String, CommitInfo>,
    releases: Vec<ReleaseInfo>,
    /// When set, every network-shaped operation returns this error.
    fail_with: Option<ForgeError>,
}

/// Fixed upstream the mock builds its URLs against.
const MOCK_UPSTREAM: &str = "https://forge.invalid/owner/repo";

impl MockForge {
    /// Create an empty mock forge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tag.
    pub fn seed_tag(&self, tag: TagInfo) {
        self.lock().tags.push(tag);
    }

    /// Seed a commit (most recent first, like the real adapters return).
    pub fn seed_commit(&self, commit: CommitInfo) {
        self.lock().commits.push(commit);
    }

    /// Seed a branch tip.
    pub fn seed_branch(&self, name: impl Into<String>, tip: CommitInfo) {
        self.lock().branches.insert(name.into(), tip);
    }

    /// Seed a release.
    pub fn seed_release(&self, release: ReleaseInfo) {
        self.lock().releases.push(release);
    }

    /// Make every network-shaped operation fail with `error`.
    pub fn fail_with(&self, error: ForgeError) {
        self.lock().fail_with = Some(error);
    }

    /// Clear a configured failure.
    pub fn heal(&self) {
        self.lock().fail_with = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockForgeInner> {
        self.inner.lock().expect("mock forge lock poisoned")
    }

    fn check_failure(&self) -> Result<(), ForgeError> {
        match &self.lock().fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn tags(&self) -> Result<Vec<TagInfo>, ForgeError> {
        self.check_failure()?;
        Ok(self.lock().tags.clone())
    }

    async fn commits(&self) -> Result<Vec<CommitInfo>, ForgeError> {
        self.check_failure()?;
        Ok(self.lock().commits.clone())
    }

    async fn tip_of_branch(&self, branch: &str) -> Result<CommitInfo, ForgeError> {
        self.check_failure()?;
        self.lock()
            .branches
            .get(branch)
            .cloned()
            .ok_or_else(|| ForgeError::Http {
                status: 404,
                message: format!("branch '{}' not found", branch),
            })
    }

    async fn releases(&self) -> Result<Vec<ReleaseInfo>, ForgeError> {
        self.check_failure()?;
        Ok(self.lock().releases.clone())
    }

    fn url_for_ref(&self, ref_name: &str, kind: RefKind) -> Result<String, ForgeError> {
        match kind {
            RefKind::Tags | RefKind::Releases => Ok(format!(
                "{}/archive/refs/tags/{}.tar.gz",
                MOCK_UPSTREAM, ref_name
            )),
            RefKind::Commits => Ok(format!("{}/archive/{}.tar.gz", MOCK_UPSTREAM, ref_name)),
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
                MOCK_UPSTREAM, old_ref, new_ref
            )),
            RefKind::Tags | RefKind::Releases => {
                Ok(format!("{}/releases/tag/{}", MOCK_UPSTREAM, new_ref))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn commit(sha: &str) -> CommitInfo {
        CommitInfo::new(
            sha,
            DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap(),
        )
    }

    #[tokio::test]
    async fn empty_mock_returns_empty_lists() {
        let forge = MockForge::new();
        assert!(forge.tags().await.unwrap().is_empty());
        assert!(forge.commits().await.unwrap().is_empty());
        assert!(forge.releases().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seeded_branch_is_served() {
        let forge = MockForge::new();
        forge.seed_branch("main", commit("abc123"));
        assert_eq!(forge.tip_of_branch("main").await.unwrap().sha, "abc123");
    }

    #[tokio::test]
    async fn missing_branch_is_a_404() {
        let forge = MockForge::new();
        let err = forge.tip_of_branch("gone").await.unwrap_err();
        assert!(matches!(err, ForgeError::Http { status: 404, .. }));
    }

    #[tokio::test]
    async fn configured_failure_applies_to_network_operations() {
        let forge = MockForge::new();
        forge.seed_commit(commit("abc"));
        forge.fail_with(ForgeError::Http {
            status: 500,
            message: "boom".into(),
        });

        assert!(forge.commits().await.is_err());
        // URL construction is pure and unaffected.
        assert!(forge.url_for_ref("v1.0", RefKind::Tags).is_ok());

        forge.heal();
        assert_eq!(forge.commits().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let forge = MockForge::new();
        let clone = forge.clone();
        clone.seed_tag(TagInfo {
            name: "v1.0".into(),
            commit: None,
        });
        assert_eq!(forge.tags().await.unwrap().len(), 1);
    }
}
