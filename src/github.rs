// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Fetching issues, pull requests and discussions from the GitHub GraphQL API.
//!
//! One query is issued per resource. It returns the opening post, the first
//! page of comments and, when requested, reaction counts. The response is
//! mapped onto the crate's [`Thread`] model; missing or malformed optional
//! fields degrade to empty values rather than failing.

use crate::config::Config;
use crate::model::{Comment, ReactionCounts, ResourceKind, ResourceRef, Status, Thread, zero_time};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use snafu::prelude::*;
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum number of comments fetched per resource.
pub const COMMENT_PAGE_SIZE: u32 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body, in characters, carried into [`FetchError::HttpStatus`].
pub const MAX_ERROR_BODY_CHARS: usize = 300;

/// Error type for fetch failures.
#[derive(Debug, Snafu)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[snafu(display("failed to build HTTP client: {source}"))]
    Client {
        /// The underlying client error.
        source: reqwest::Error,
    },

    /// The request could not be sent or the response could not be read.
    #[snafu(display("request for {target} failed: {source}"))]
    Transport {
        /// The resource being fetched.
        target: String,
        /// The underlying transport error.
        source: reqwest::Error,
    },

    /// GitHub answered with a non-success HTTP status.
    #[snafu(display("GitHub returned HTTP {status} for {target}: {body}"))]
    HttpStatus {
        /// The resource being fetched.
        target: String,
        /// The HTTP status code.
        status: u16,
        /// The response body, trimmed and cut to [`MAX_ERROR_BODY_CHARS`].
        body: String,
    },

    /// GitHub reported GraphQL errors and returned no data.
    #[snafu(display("GitHub API error for {target}: {message}"))]
    Api {
        /// The resource being fetched.
        target: String,
        /// All error messages, joined with `; `.
        message: String,
    },

    /// The repository or the resource does not exist (or is not visible).
    #[snafu(display("resource not found: {owner}/{repo}/{}/{number}", kind.path_segment()))]
    NotFound {
        /// Kind of the missing resource.
        kind: ResourceKind,
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
        /// Resource number.
        number: u64,
    },
}

/// A blocking GitHub GraphQL client.
pub struct Client {
    http: reqwest::blocking::Client,
    endpoint: String,
    token: Option<String>,
}

impl Client {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialized.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context(ClientSnafu)?;

        Ok(Self {
            http,
            endpoint: config.graphql_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Fetches a resource and its first page of comments.
    ///
    /// Reaction counts are only requested when `with_reactions` is set;
    /// otherwise every `reactions` field of the result is `None`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Transport`] on connection, timeout or decoding failures
    /// - [`FetchError::HttpStatus`] if GitHub answers with a non-2xx status
    /// - [`FetchError::NotFound`] if the repository or resource does not exist
    /// - [`FetchError::Api`] for any other GraphQL error
    pub fn fetch(&self, target: &ResourceRef, with_reactions: bool) -> Result<Thread, FetchError> {
        let payload = request_body(target, with_reactions);
        let mut request = self.http.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        debug!(%target, endpoint = %self.endpoint, with_reactions, "querying GitHub");
        let response = request.send().context(TransportSnafu {
            target: target.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return HttpStatusSnafu {
                target: target.to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            }
            .fail();
        }

        let body: GraphQlResponse = response.json().context(TransportSnafu {
            target: target.to_string(),
        })?;
        body.into_thread(target, with_reactions)
    }
}

/// Builds the JSON request body for one resource.
fn request_body(target: &ResourceRef, with_reactions: bool) -> serde_json::Value {
    json!({
        "query": query_for(target.kind),
        "variables": {
            "owner": target.owner,
            "name": target.repo,
            "number": target.number,
            "reactions": with_reactions,
        },
    })
}

/// Trims an error body and cuts it to [`MAX_ERROR_BODY_CHARS`] characters.
fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((end, _)) => format!("{}…", &body[..end]),
        None => body.to_owned(),
    }
}

/// Builds the GraphQL query for a resource kind.
fn query_for(kind: ResourceKind) -> String {
    let (field, state, comment_extra) = match kind {
        ResourceKind::Issue => ("issue", "closed", ""),
        ResourceKind::PullRequest => ("pullRequest", "state merged", ""),
        ResourceKind::Discussion => ("discussion", "closed", "isAnswer"),
    };

    format!(
        "query($owner: String!, $name: String!, $number: Int!, $reactions: Boolean!) {{
  repository(owner: $owner, name: $name) {{
    {field}(number: $number) {{
      title body url createdAt {state}
      author {{ login url }}
      reactionGroups @include(if: $reactions) {{ content reactors {{ totalCount }} }}
      comments(first: {COMMENT_PAGE_SIZE}) {{
        nodes {{
          body createdAt {comment_extra}
          author {{ login url }}
          reactionGroups @include(if: $reactions) {{ content reactors {{ totalCount }} }}
        }}
      }}
    }}
  }}
}}"
    )
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<QueryData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    issue: Option<ThreadNode>,
    pull_request: Option<ThreadNode>,
    discussion: Option<ThreadNode>,
}

impl RepositoryNode {
    fn take(self, kind: ResourceKind) -> Option<ThreadNode> {
        match kind {
            ResourceKind::Issue => self.issue,
            ResourceKind::PullRequest => self.pull_request,
            ResourceKind::Discussion => self.discussion,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadNode {
    title: String,
    body: Option<String>,
    url: String,
    created_at: Option<String>,
    author: Option<ActorNode>,
    #[serde(default)]
    closed: bool,
    state: Option<String>,
    #[serde(default)]
    merged: bool,
    reaction_groups: Option<Vec<ReactionGroupNode>>,
    comments: Option<CommentConnection>,
}

#[derive(Debug, Deserialize)]
struct CommentConnection {
    #[serde(default)]
    nodes: Vec<Option<CommentNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentNode {
    body: Option<String>,
    created_at: Option<String>,
    author: Option<ActorNode>,
    #[serde(default)]
    is_answer: bool,
    reaction_groups: Option<Vec<ReactionGroupNode>>,
}

#[derive(Debug, Deserialize)]
struct ActorNode {
    login: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ReactionGroupNode {
    content: String,
    reactors: CountNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountNode {
    total_count: u64,
}

impl GraphQlResponse {
    fn into_thread(self, target: &ResourceRef, with_reactions: bool) -> Result<Thread, FetchError> {
        let node = self
            .data
            .and_then(|data| data.repository)
            .and_then(|repository| repository.take(target.kind));

        if let Some(node) = node {
            return Ok(node.into_thread(target.kind, with_reactions));
        }

        let not_found = self.errors.is_empty()
            || self
                .errors
                .iter()
                .any(|err| err.kind.as_deref() == Some("NOT_FOUND"));
        ensure!(
            not_found,
            ApiSnafu {
                target: target.to_string(),
                message: self
                    .errors
                    .iter()
                    .map(|err| err.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            }
        );

        NotFoundSnafu {
            kind: target.kind,
            owner: &target.owner,
            repo: &target.repo,
            number: target.number,
        }
        .fail()
    }
}

impl ThreadNode {
    fn into_thread(self, kind: ResourceKind, with_reactions: bool) -> Thread {
        let status = match kind {
            ResourceKind::PullRequest => {
                Status::pull_request(self.state.as_deref().unwrap_or_default(), self.merged)
            }
            ResourceKind::Issue | ResourceKind::Discussion => Status::from_closed(self.closed),
        };
        let (author, author_url) = actor(self.author);

        let comments = self
            .comments
            .map(|connection| connection.nodes)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|node| node.into_comment(with_reactions))
            .collect();

        Thread {
            title: self.title,
            body: self.body.unwrap_or_default(),
            author,
            author_url,
            created_at: parse_timestamp(self.created_at.as_deref()),
            status,
            url: self.url,
            reactions: reaction_counts(self.reaction_groups, with_reactions),
            comments,
        }
    }
}

impl CommentNode {
    fn into_comment(self, with_reactions: bool) -> Comment {
        let (author, author_url) = actor(self.author);
        Comment {
            author,
            author_url,
            body: self.body.unwrap_or_default(),
            created_at: parse_timestamp(self.created_at.as_deref()),
            reactions: reaction_counts(self.reaction_groups, with_reactions),
            is_answer: self.is_answer,
        }
    }
}

/// Login and profile URL; deleted accounts come back as `null`.
fn actor(node: Option<ActorNode>) -> (String, String) {
    node.map(|a| (a.login, a.url)).unwrap_or_default()
}

fn reaction_counts(
    groups: Option<Vec<ReactionGroupNode>>,
    requested: bool,
) -> Option<ReactionCounts> {
    if !requested {
        return None;
    }

    let mut counts = ReactionCounts::default();
    for group in groups.unwrap_or_default() {
        let slot = match group.content.as_str() {
            "THUMBS_UP" => &mut counts.thumbs_up,
            "THUMBS_DOWN" => &mut counts.thumbs_down,
            "LAUGH" => &mut counts.laugh,
            "HOORAY" => &mut counts.hooray,
            "CONFUSED" => &mut counts.confused,
            "HEART" => &mut counts.heart,
            "ROCKET" => &mut counts.rocket,
            "EYES" => &mut counts.eyes,
            other => {
                debug!(content = other, "ignoring unknown reaction");
                continue;
            }
        };
        *slot += group.reactors.total_count;
    }
    Some(counts)
}

fn parse_timestamp(value: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return zero_time();
    };

    DateTime::parse_from_rfc3339(raw).map_or_else(
        |err| {
            warn!(raw, %err, "unparseable timestamp, using zero time");
            zero_time()
        },
        |ts| ts.with_timezone(&Utc),
    )
}
