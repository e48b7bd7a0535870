// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Classification of GitHub web URLs into addressable resources.
//!
//! A URL is matched against an ordered table of rules, one per
//! [`ResourceKind`]. The first rule that matches wins. Anything after the
//! number (a `#issuecomment-…` fragment, a query string, a `/files` tab) is
//! accepted and ignored.
//!
//! # Example
//!
//! ```
//! use issue2md::model::ResourceKind;
//! use issue2md::resolver::resolve;
//!
//! let target = resolve("https://github.com/rust-lang/rust/pull/12345#discussion_r1").unwrap();
//! assert_eq!(target.kind, ResourceKind::PullRequest);
//! assert_eq!(target.owner, "rust-lang");
//! assert_eq!(target.repo, "rust");
//! assert_eq!(target.number, 12345);
//! ```

use crate::model::{ResourceKind, ResourceRef};
use regex::Regex;
use snafu::prelude::*;
use std::num::ParseIntError;
use std::sync::LazyLock;
use tracing::debug;

/// Prefix every supported URL starts with.
pub const GITHUB_PREFIX: &str = "https://github.com/";

/// Error type for URL classification failures.
#[derive(Debug, Snafu)]
pub enum ResolveError {
    /// The input is not a GitHub URL at all.
    #[snafu(display("invalid GitHub URL: {url}"))]
    InvalidUrl {
        /// The offending input.
        url: String,
    },

    /// A GitHub URL that does not point at an issue, pull request or discussion.
    #[snafu(display("unsupported resource type: {url}"))]
    UnsupportedResourceType {
        /// The offending input.
        url: String,
    },

    /// The resource number could not be parsed.
    #[snafu(display("invalid number {number:?} in {url}: {source}"))]
    InvalidNumber {
        /// The offending input.
        url: String,
        /// The captured number text.
        number: String,
        /// The underlying parse failure.
        source: ParseIntError,
    },
}

/// Classification rules, in precedence order.
///
/// Each pattern captures owner, repository and number. Adding a resource kind
/// means adding a row here.
const RULES: &[(ResourceKind, &str)] = &[
    (
        ResourceKind::Issue,
        r"^https://github\.com/([^/]+)/([^/]+)/issues/(\d+)",
    ),
    (
        ResourceKind::PullRequest,
        r"^https://github\.com/([^/]+)/([^/]+)/pull/(\d+)",
    ),
    (
        ResourceKind::Discussion,
        r"^https://github\.com/([^/]+)/([^/]+)/discussions/(\d+)",
    ),
];

static COMPILED: LazyLock<Vec<(ResourceKind, Regex)>> = LazyLock::new(|| {
    RULES
        .iter()
        .filter_map(|&(kind, pattern)| Regex::new(pattern).ok().map(|re| (kind, re)))
        .collect()
});

/// Classifies a URL into a [`ResourceRef`].
///
/// # Errors
///
/// - [`ResolveError::InvalidUrl`] if the input does not start with
///   `https://github.com/`.
/// - [`ResolveError::UnsupportedResourceType`] if it does, but no rule
///   matches (for example `/tree/main`, or `/issues` without a number).
/// - [`ResolveError::InvalidNumber`] if the captured number does not fit in
///   a `u64`.
pub fn resolve(url: &str) -> Result<ResourceRef, ResolveError> {
    for (kind, re) in COMPILED.iter() {
        let Some(caps) = re.captures(url) else {
            continue;
        };

        let number_text = &caps[3];
        let number = number_text.parse::<u64>().context(InvalidNumberSnafu {
            url,
            number: number_text,
        })?;

        let target = ResourceRef {
            kind: *kind,
            owner: caps[1].to_owned(),
            repo: caps[2].to_owned(),
            number,
            original_url: url.to_owned(),
        };
        debug!(%target, "resolved URL");
        return Ok(target);
    }

    ensure!(url.starts_with(GITHUB_PREFIX), InvalidUrlSnafu { url });
    UnsupportedResourceTypeSnafu { url }.fail()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_compiles() {
        assert_eq!(COMPILED.len(), RULES.len());
    }

    #[test]
    fn resolves_issue() {
        let target = resolve("https://github.com/octocat/Hello-World/issues/123").unwrap();

        assert_eq!(target.kind, ResourceKind::Issue);
        assert_eq!(target.owner, "octocat");
        assert_eq!(target.repo, "Hello-World");
        assert_eq!(target.number, 123);
        assert_eq!(
            target.original_url,
            "https://github.com/octocat/Hello-World/issues/123"
        );
    }

    #[test]
    fn resolves_pull_request() {
        let target = resolve("https://github.com/golang/go/pull/62140").unwrap();

        assert_eq!(target.kind, ResourceKind::PullRequest);
        assert_eq!(target.owner, "golang");
        assert_eq!(target.repo, "go");
        assert_eq!(target.number, 62140);
    }

    #[test]
    fn resolves_discussion() {
        let target = resolve("https://github.com/vercel/next.js/discussions/4").unwrap();

        assert_eq!(target.kind, ResourceKind::Discussion);
        assert_eq!(target.repo, "next.js");
        assert_eq!(target.number, 4);
    }

    #[test]
    fn ignores_trailing_fragments() {
        let issue = resolve("https://github.com/o/r/issues/123#issuecomment-456").unwrap();
        assert_eq!(issue.number, 123);
        assert_eq!(
            issue.original_url,
            "https://github.com/o/r/issues/123#issuecomment-456"
        );

        let pull = resolve("https://github.com/o/r/pull/9/files#discussion_r123").unwrap();
        assert_eq!(pull.kind, ResourceKind::PullRequest);
        assert_eq!(pull.number, 9);

        let query = resolve("https://github.com/o/r/discussions/5?sort=top").unwrap();
        assert_eq!(query.number, 5);
    }

    #[test]
    fn captures_only_leading_digits() {
        let target = resolve("https://github.com/o/r/issues/42abc").unwrap();
        assert_eq!(target.number, 42);
    }

    #[test]
    fn rejects_other_github_paths() {
        for url in [
            "https://github.com/o/r/tree/main",
            "https://github.com/o/r/issues",
            "https://github.com/o/r/issues/",
            "https://github.com/o/r/pulls/1",
            "https://github.com/o/r",
            "https://github.com/",
        ] {
            let err = resolve(url).unwrap_err();
            assert!(
                matches!(err, ResolveError::UnsupportedResourceType { url: ref u } if u == url),
                "{url}: {err:?}"
            );
        }
    }

    #[test]
    fn rejects_non_github_urls() {
        for url in [
            "",
            "not a url",
            "http://github.com/o/r/issues/1",
            "https://gitlab.com/o/r/issues/1",
            "https://www.github.com/o/r/issues/1",
            "github.com/o/r/issues/1",
        ] {
            let err = resolve(url).unwrap_err();
            assert!(
                matches!(err, ResolveError::InvalidUrl { .. }),
                "{url}: {err:?}"
            );
        }
    }

    #[test]
    fn rejects_overflowing_number() {
        let url = "https://github.com/o/r/issues/99999999999999999999999";
        let err = resolve(url).unwrap_err();

        assert!(matches!(err, ResolveError::InvalidNumber { .. }));
        assert!(err.to_string().contains(url));
    }

    #[test]
    fn error_messages_carry_the_url() {
        let err = resolve("https://github.com/o/r/tree/main").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported resource type: https://github.com/o/r/tree/main"
        );

        let err = resolve("ftp://example.com").unwrap_err();
        assert_eq!(err.to_string(), "invalid GitHub URL: ftp://example.com");
    }
}
