// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Typed representations of GitHub issues, pull requests and discussions.
//!
//! All three resource kinds share one shape, [`Thread`]: a titled post with a
//! body, an author, a status and an ordered list of [`Comment`]s. Values are
//! built once per run by the fetch layer and handed to the renderer.

use chrono::{DateTime, Utc};
use std::fmt;

/// The kinds of GitHub resource this crate can convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// An issue (`/issues/{n}`).
    Issue,
    /// A pull request (`/pull/{n}`).
    PullRequest,
    /// A discussion (`/discussions/{n}`).
    Discussion,
}

impl ResourceKind {
    /// Returns the value written to the `type` front-matter field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull_request",
            Self::Discussion => "discussion",
        }
    }

    /// Returns the URL path segment that precedes the resource number.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Issue => "issues",
            Self::PullRequest => "pull",
            Self::Discussion => "discussions",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified resource URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    /// Which kind of resource the URL points at.
    pub kind: ResourceKind,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Issue, pull request or discussion number.
    pub number: u64,
    /// The URL exactly as it was given, fragment included.
    pub original_url: String,
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.owner,
            self.repo,
            self.kind.path_segment(),
            self.number
        )
    }
}

/// Emoji reaction counters for a post or comment.
///
/// Wrapped in an `Option` wherever it appears: `None` means reactions were
/// not requested or are unavailable, which is distinct from all-zero counts
/// even though both render as nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionCounts {
    /// 👍
    pub thumbs_up: u64,
    /// 👎
    pub thumbs_down: u64,
    /// 😄
    pub laugh: u64,
    /// 🎉 (GitHub calls this "hooray").
    pub hooray: u64,
    /// 😕
    pub confused: u64,
    /// ❤️
    pub heart: u64,
    /// 🚀
    pub rocket: u64,
    /// 👀
    pub eyes: u64,
}

impl ReactionCounts {
    /// Pairs each counter with its emoji, in display order.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, u64); 8] {
        [
            ("👍", self.thumbs_up),
            ("👎", self.thumbs_down),
            ("😄", self.laugh),
            ("🎉", self.hooray),
            ("😕", self.confused),
            ("❤️", self.heart),
            ("🚀", self.rocket),
            ("👀", self.eyes),
        ]
    }

    /// Returns `true` if every counter is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|&(_, count)| count == 0)
    }
}

/// Open/closed/merged state of a resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    /// Still open.
    #[default]
    Open,
    /// Closed without merging (or simply closed, for issues and discussions).
    Closed,
    /// A merged pull request.
    Merged,
}

impl Status {
    /// Status of an issue or discussion from its `closed` flag.
    #[must_use]
    pub const fn from_closed(closed: bool) -> Self {
        if closed { Self::Closed } else { Self::Open }
    }

    /// Status of a pull request. A merged pull request is never `Closed`.
    #[must_use]
    pub fn pull_request(state: &str, merged: bool) -> Self {
        if merged {
            Self::Merged
        } else if state.eq_ignore_ascii_case("closed") {
            Self::Closed
        } else {
            Self::Open
        }
    }

    /// Returns the value written to the `status` front-matter field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Merged => "merged",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single comment on a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Login of the comment author (empty for deleted accounts).
    pub author: String,
    /// Profile URL of the comment author.
    pub author_url: String,
    /// Raw Markdown body.
    pub body: String,
    /// When the comment was posted.
    pub created_at: DateTime<Utc>,
    /// Reaction counters, if they were requested.
    pub reactions: Option<ReactionCounts>,
    /// Whether this comment is the accepted answer of a discussion.
    ///
    /// Ignored for issues and pull requests.
    pub is_answer: bool,
}

/// The common shape of issues, pull requests and discussions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    /// Title of the resource.
    pub title: String,
    /// Raw Markdown body of the opening post.
    pub body: String,
    /// Login of the author (empty for deleted accounts).
    pub author: String,
    /// Profile URL of the author.
    pub author_url: String,
    /// When the resource was opened.
    pub created_at: DateTime<Utc>,
    /// Current state.
    pub status: Status,
    /// Canonical web URL of the resource.
    pub url: String,
    /// Reaction counters on the opening post, if they were requested.
    pub reactions: Option<ReactionCounts>,
    /// Comments, oldest first.
    pub comments: Vec<Comment>,
}

/// The timestamp used when upstream data has none or it cannot be parsed.
///
/// This is `0001-01-01T00:00:00Z`, the conventional "zero time".
#[must_use]
pub fn zero_time() -> DateTime<Utc> {
    DateTime::from_timestamp(-62_135_596_800, 0).unwrap_or_default()
}
