// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown rendering for issues, pull requests and discussions.
//!
//! This module transforms a [`Thread`] into a Markdown document with a YAML
//! front-matter header. Output depends only on the input data and the
//! [`RenderOptions`], so identical input always yields identical bytes.
//!
//! # Output Format
//!
//! The rendered Markdown includes:
//! - A `---` delimited front-matter block (title, url, author, `author_url`,
//!   `created_at`, status, type)
//! - A `# <title>` heading followed by the body
//! - An optional `## Reactions` section
//! - A `## Comments` section with one `###` heading per comment
//!
//! Sections are separated by a single blank line.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use issue2md::model::{Status, Thread};
//! use issue2md::renderer::{render_issue, RenderOptions};
//!
//! let issue = Thread {
//!     title: "Crash on startup".into(),
//!     body: "It crashes.".into(),
//!     author: "octocat".into(),
//!     author_url: "https://github.com/octocat".into(),
//!     created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
//!     status: Status::Open,
//!     url: "https://github.com/octocat/Hello-World/issues/1".into(),
//!     reactions: None,
//!     comments: vec![],
//! };
//!
//! let markdown = render_issue(&issue, &RenderOptions::default());
//!
//! assert!(markdown.starts_with("---\ntitle: \"Crash on startup\"\n"));
//! assert!(markdown.contains("# Crash on startup\n\nIt crashes.\n"));
//! ```

use crate::model::{Comment, ReactionCounts, ResourceKind, Thread};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// Marker appended to the accepted answer of a discussion.
pub const ANSWER_MARKER: &str = "✅ **Answer**";

/// Configuration options for Markdown rendering.
///
/// Both options are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Whether to include reaction counts.
    ///
    /// When disabled, no reaction line or heading is emitted even if the
    /// data carries non-zero counts.
    pub enable_reactions: bool,

    /// Whether comment authors render as profile links.
    ///
    /// When enabled, `@octocat` becomes `[@octocat](https://github.com/octocat)`.
    pub enable_user_links: bool,
}

/// Renders an issue as Markdown.
#[must_use]
pub fn render_issue(issue: &Thread, opts: &RenderOptions) -> String {
    render(ResourceKind::Issue, issue, opts)
}

/// Renders a pull request as Markdown.
#[must_use]
pub fn render_pull_request(pull: &Thread, opts: &RenderOptions) -> String {
    render(ResourceKind::PullRequest, pull, opts)
}

/// Renders a discussion as Markdown.
///
/// Unlike the other kinds, comments flagged as the accepted answer carry
/// [`ANSWER_MARKER`] after their body.
#[must_use]
pub fn render_discussion(discussion: &Thread, opts: &RenderOptions) -> String {
    render(ResourceKind::Discussion, discussion, opts)
}

/// Renders any resource kind as Markdown.
///
/// This is the shared routine behind [`render_issue`],
/// [`render_pull_request`] and [`render_discussion`]; `kind` selects the
/// `type` front-matter value and whether answer markers are shown.
#[must_use]
pub fn render(kind: ResourceKind, thread: &Thread, opts: &RenderOptions) -> String {
    let mut sections = vec![front_matter(kind, thread), format!("# {}\n", thread.title)];

    if !thread.body.is_empty() {
        sections.push(format!("{}\n", thread.body));
    }

    if let Some(line) = reaction_line(thread.reactions.as_ref(), opts) {
        sections.push(format!("## Reactions\n\n{line}\n"));
    }

    if !thread.comments.is_empty() {
        sections.push("---\n\n## Comments\n".to_owned());
        sections.extend(
            thread
                .comments
                .iter()
                .map(|comment| render_comment(kind, comment, opts)),
        );
    }

    sections.join("\n")
}

/// Whether comments of this kind can carry an accepted-answer marker.
const fn shows_answers(kind: ResourceKind) -> bool {
    matches!(kind, ResourceKind::Discussion)
}

fn render_comment(kind: ResourceKind, comment: &Comment, opts: &RenderOptions) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "### {} commented at {}",
        mention(&comment.author, &comment.author_url, opts.enable_user_links),
        format_timestamp(&comment.created_at)
    )
    .unwrap();

    let reactions = reaction_line(comment.reactions.as_ref(), opts);
    let lines: Vec<&str> = [
        Some(comment.body.as_str()).filter(|body| !body.is_empty()),
        Some(ANSWER_MARKER).filter(|_| shows_answers(kind) && comment.is_answer),
        reactions.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !lines.is_empty() {
        out.push('\n');
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

fn front_matter(kind: ResourceKind, thread: &Thread) -> String {
    let mut out = String::from("---\n");
    writeln!(out, "title: {}", quote_yaml(&thread.title)).unwrap();
    writeln!(out, "url: {}", quote_yaml(&thread.url)).unwrap();
    writeln!(out, "author: {}", quote_yaml(&thread.author)).unwrap();
    writeln!(out, "author_url: {}", quote_yaml(&thread.author_url)).unwrap();
    writeln!(out, "created_at: \"{}\"", format_timestamp(&thread.created_at)).unwrap();
    writeln!(out, "status: {}", quote_yaml(thread.status.as_str())).unwrap();
    writeln!(out, "type: {}", quote_yaml(kind.as_str())).unwrap();
    out.push_str("---\n");
    out
}

/// Quotes a string as a YAML scalar.
///
/// Values containing a single quote are single-quoted with every `'`
/// doubled. Everything else is double-quoted with backslash escapes.
fn quote_yaml(s: &str) -> String {
    if s.contains('\'') {
        return format!("'{}'", s.replace('\'', "''"));
    }

    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{0c}' => out.push_str("\\f"),
            c if c.is_ascii_control() => write!(out, "\\x{:02x}", u32::from(c)).unwrap(),
            c if c.is_control() => write!(out, "\\u{:04x}", u32::from(c)).unwrap(),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Formats reaction counts as `👍 5 ❤️ 3`, skipping zero counters.
///
/// Returns `None` when reactions are disabled, absent, or all zero.
fn reaction_line(reactions: Option<&ReactionCounts>, opts: &RenderOptions) -> Option<String> {
    if !opts.enable_reactions {
        return None;
    }

    let counts = reactions.filter(|counts| !counts.is_empty())?;
    let parts: Vec<String> = counts
        .entries()
        .iter()
        .filter(|&&(_, count)| count > 0)
        .map(|(emoji, count)| format!("{emoji} {count}"))
        .collect();

    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Formats an author reference as `@login` or `[@login](url)`.
fn mention(login: &str, url: &str, link: bool) -> String {
    if link {
        format!("[@{login}]({url})")
    } else {
        format!("@{login}")
    }
}

/// Formats a timestamp as RFC 3339 in UTC with whole seconds.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
