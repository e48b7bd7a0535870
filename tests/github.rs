// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Tests for the GraphQL client against a local mock server.

use httpmock::prelude::*;
use issue2md::config::Config;
use issue2md::github::{Client, FetchError, MAX_ERROR_BODY_CHARS};
use issue2md::model::{ReactionCounts, Status};
use issue2md::resolver;
use serde_json::json;

fn client_for(server: &MockServer, token: Option<&str>) -> Client {
    let config = Config {
        token: token.map(str::to_owned),
        graphql_url: server.url("/graphql"),
    };
    Client::new(&config).unwrap()
}

#[test]
fn fetches_issue_with_token() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/graphql")
            .header("authorization", "Bearer ghp_test")
            .body_includes("issue(number: $number)")
            .json_body_includes(
                r#"{"variables": {"owner": "octocat", "name": "Hello-World", "number": 123, "reactions": false}}"#,
            );
        then.status(200).json_body(json!({
            "data": {"repository": {"issue": {
                "title": "Test Issue",
                "body": "Issue body",
                "url": "https://github.com/octocat/Hello-World/issues/123",
                "createdAt": "2024-01-01T12:00:00Z",
                "closed": false,
                "author": {"login": "octocat", "url": "https://github.com/octocat"},
                "comments": {"nodes": [
                    {"body": "First", "createdAt": "2024-01-02T10:00:00Z",
                     "author": {"login": "user1", "url": "https://github.com/user1"}}
                ]}
            }}}
        }));
    });

    let target = resolver::resolve("https://github.com/octocat/Hello-World/issues/123").unwrap();
    let thread = client_for(&server, Some("ghp_test"))
        .fetch(&target, false)
        .unwrap();

    mock.assert();
    assert_eq!(thread.title, "Test Issue");
    assert_eq!(thread.status, Status::Open);
    assert_eq!(thread.comments.len(), 1);
    assert!(thread.reactions.is_none());
}

#[test]
fn fetches_pull_request_reactions() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/graphql")
            .body_includes("pullRequest(number: $number)")
            .json_body_includes(
                r#"{"variables": {"owner": "o", "name": "r", "number": 9, "reactions": true}}"#,
            );
        then.status(200).json_body(json!({
            "data": {"repository": {"pullRequest": {
                "title": "Fix",
                "body": "",
                "url": "https://github.com/o/r/pull/9",
                "createdAt": "2024-01-01T12:00:00Z",
                "state": "CLOSED",
                "merged": true,
                "author": {"login": "a", "url": "https://github.com/a"},
                "reactionGroups": [
                    {"content": "ROCKET", "reactors": {"totalCount": 4}}
                ],
                "comments": {"nodes": []}
            }}}
        }));
    });

    let target = resolver::resolve("https://github.com/o/r/pull/9").unwrap();
    let thread = client_for(&server, None).fetch(&target, true).unwrap();

    mock.assert();
    assert_eq!(thread.status, Status::Merged);
    assert_eq!(
        thread.reactions,
        Some(ReactionCounts {
            rocket: 4,
            ..Default::default()
        })
    );
}

#[test]
fn reports_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/graphql");
        then.status(200).json_body(json!({
            "data": {"repository": {"discussion": null}},
            "errors": [{"type": "NOT_FOUND", "message": "Could not resolve to a Discussion."}]
        }));
    });

    let target = resolver::resolve("https://github.com/o/r/discussions/404").unwrap();
    let err = client_for(&server, None).fetch(&target, false).unwrap_err();

    assert!(matches!(err, FetchError::NotFound { number: 404, .. }));
    assert_eq!(err.to_string(), "resource not found: o/r/discussions/404");
}

#[test]
fn reports_http_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/graphql");
        then.status(401)
            .body("{\"message\": \"Bad credentials\"}\n");
    });

    let target = resolver::resolve("https://github.com/o/r/issues/1").unwrap();
    let err = client_for(&server, Some("bad")).fetch(&target, false).unwrap_err();

    match err {
        FetchError::HttpStatus { status, body, .. } => {
            assert_eq!(status, 401);
            assert_eq!(body, "{\"message\": \"Bad credentials\"}");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[test]
fn truncates_long_error_pages() {
    let page = format!("<html><body>{}</body></html>", "Bad gateway. ".repeat(200));
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/graphql");
        then.status(502).body(&page);
    });

    let target = resolver::resolve("https://github.com/o/r/issues/1").unwrap();
    let err = client_for(&server, None).fetch(&target, false).unwrap_err();

    match &err {
        FetchError::HttpStatus { status, body, .. } => {
            assert_eq!(*status, 502);
            assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS + 1);
            assert!(body.starts_with("<html><body>Bad gateway."));
            assert!(body.ends_with('…'));
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
    assert!(err.to_string().len() < page.len());
}

#[test]
fn reports_malformed_body_as_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/graphql");
        then.status(200).body("not json");
    });

    let target = resolver::resolve("https://github.com/o/r/issues/1").unwrap();
    let err = client_for(&server, None).fetch(&target, false).unwrap_err();

    assert!(matches!(err, FetchError::Transport { .. }));
    assert!(err.to_string().starts_with("request for o/r/issues/1 failed"));
}
