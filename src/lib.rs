//! upstream-forge - uniform access to source-code forge APIs
//!
//! This crate normalizes access to multiple forges (GitHub, GitLab,
//! Gitea/Forgejo) and plain HTML download pages, exposing one capability
//! set to fetch tags, commits, branch tips, releases, download URLs and
//! changelog URLs for an upstream project. It is the detection core for an
//! update checker; orchestration, persistence and user messaging live with
//! the caller.
//!
//! # Architecture
//!
//! - `traits` - The `Forge` trait, normalized data model, error taxonomy
//! - [`github`] - GitHub adapter (REST API v3)
//! - [`gitlab`] - GitLab adapter (REST API v4, root discovery, id resolution)
//! - [`gitea`] - Gitea/Forgejo adapter (REST API v1, root discovery)
//! - [`download`] - Link extraction from plain HTML download pages
//! - [`discovery`] - Forge-root discovery heuristics for self-hosted installs
//! - `factory` - Provider detection and adapter creation ([`create_forge`])
//! - [`mock`] - In-memory `Forge` implementation for downstream tests
//!
//! # Guarantees
//!
//! 1. Every adapter produces the same normalized commit and release shapes
//! 2. Adapter state is resolved at construction and immutable afterwards
//! 3. Failures propagate; no operation degrades into a partial success
//! 4. No retry, caching or persistence happens inside this crate
//!
//! # Example
//!
//! ```ignore
//! use upstream_forge::{create_forge, RefKind};
//!
//! let forge = create_forge("https://github.com/owner/repo", None, None).await?;
//! let releases = forge.releases().await?;
//! if let Some(latest) = releases.iter().find(|r| !r.prerelease && !r.draft) {
//!     let archive = forge.url_for_ref(&latest.tag_name, RefKind::Releases)?;
//!     println!("{archive}");
//! }
//! ```

pub mod discovery;
pub mod download;
mod factory;
pub mod gitea;
pub mod github;
pub mod gitlab;
mod http;
pub mod mock;
mod traits;

pub use download::{DownloadPage, LinkMap};
pub use factory::{create_forge, detect_provider, ForgeProvider};
pub use traits::*;
