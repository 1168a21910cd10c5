//! Property-based tests for adapter construction and URL building.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use upstream_forge::github::GithubForge;
use upstream_forge::{Forge, RefKind};

/// Strategy for a single path segment as GitHub allows them: starts
/// alphanumeric, continues with word characters, dots and dashes.
fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9_.-]{0,19}"
}

/// Strategy for ref names: tags, branch-ish names, SHAs.
fn ref_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9._/-]{0,29}"
}

proptest! {
    #[test]
    fn any_owner_repo_pair_constructs(owner in segment(), repo in segment()) {
        let url = format!("https://github.com/{}/{}", owner, repo);
        prop_assert!(GithubForge::new(url, None).is_ok());
    }

    #[test]
    fn bare_owner_repo_pair_constructs(owner in segment(), repo in segment()) {
        let spec = format!("{}/{}", owner, repo);
        prop_assert!(GithubForge::new(spec, None).is_ok());
    }

    #[test]
    fn single_segment_never_constructs(owner in segment()) {
        let url = format!("https://github.com/{}", owner);
        prop_assert!(GithubForge::new(url, None).is_err());
    }

    #[test]
    fn three_segments_never_construct(a in segment(), b in segment(), c in segment()) {
        let url = format!("https://github.com/{}/{}/{}", a, b, c);
        prop_assert!(GithubForge::new(url, None).is_err());
    }

    #[test]
    fn url_for_ref_is_pure(ref_name in ref_name()) {
        let forge = GithubForge::new("https://github.com/owner/repo", None).unwrap();
        for kind in [RefKind::Tags, RefKind::Commits, RefKind::Releases] {
            let first = forge.url_for_ref(&ref_name, kind).unwrap();
            let second = forge.url_for_ref(&ref_name, kind).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn changelog_for_commits_embeds_both_refs(new in ref_name(), old in ref_name()) {
        let forge = GithubForge::new("https://github.com/owner/repo", None).unwrap();
        let url = forge.changelog_for_ref(&new, &old, RefKind::Commits).unwrap();
        prop_assert!(url.contains(&new));
        prop_assert!(url.contains(&old));
    }
}
