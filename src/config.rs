// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Environment configuration for the GitHub client.

use std::fmt;

/// Default GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Environment variable holding an optional access token.
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Environment variable overriding the GraphQL endpoint.
pub const GRAPHQL_URL_VAR: &str = "GITHUB_GRAPHQL_URL";

/// Settings for talking to GitHub.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    /// GraphQL endpoint URL.
    pub graphql_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            graphql_url: DEFAULT_GRAPHQL_URL.to_owned(),
        }
    }
}

// Keeps the token out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("graphql_url", &self.graphql_url)
            .finish()
    }
}

impl Config {
    /// Reads configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        Self {
            token: get(TOKEN_VAR),
            graphql_url: get(GRAPHQL_URL_VAR).unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = Config::from_lookup(lookup_from(&[]));

        assert_eq!(config, Config::default());
        assert!(config.token.is_none());
        assert_eq!(config.graphql_url, DEFAULT_GRAPHQL_URL);
    }

    #[test]
    fn reads_token_and_endpoint() {
        let config = Config::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "ghp_abc"),
            ("GITHUB_GRAPHQL_URL", "https://ghe.example.com/api/graphql"),
        ]));

        assert_eq!(config.token.as_deref(), Some("ghp_abc"));
        assert_eq!(config.graphql_url, "https://ghe.example.com/api/graphql");
    }

    #[test]
    fn blank_values_are_unset() {
        let config = Config::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "  "),
            ("GITHUB_GRAPHQL_URL", ""),
        ]));

        assert!(config.token.is_none());
        assert_eq!(config.graphql_url, DEFAULT_GRAPHQL_URL);
    }

    #[test]
    fn trims_token() {
        let config = Config::from_lookup(lookup_from(&[("GITHUB_TOKEN", "ghp_abc\n")]));
        assert_eq!(config.token.as_deref(), Some("ghp_abc"));
    }

    #[test]
    fn debug_redacts_token() {
        let config = Config {
            token: Some("ghp_secret".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");

        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
