// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert GitHub issues, pull requests and discussions to Markdown.
//!
//! This crate turns a single GitHub collaboration thread, identified by its
//! web URL, into a deterministic Markdown document with a YAML front-matter
//! header.
//!
//! # Overview
//!
//! 1. [`resolver`] classifies a URL into a typed [`model::ResourceRef`]
//! 2. [`github`] fetches the thread from the GitHub GraphQL API
//! 3. [`renderer`] renders the thread as Markdown
//!
//! # Example
//!
//! ```no_run
//! use issue2md::{config::Config, github, renderer, resolver};
//!
//! let target = resolver::resolve("https://github.com/octocat/Hello-World/issues/348").unwrap();
//! let client = github::Client::new(&Config::from_env()).unwrap();
//!
//! let opts = renderer::RenderOptions {
//!     enable_reactions: true,
//!     ..Default::default()
//! };
//!
//! let thread = client.fetch(&target, opts.enable_reactions).unwrap();
//! let markdown = renderer::render(target.kind, &thread, &opts);
//! println!("{markdown}");
//! ```
//!
//! # Modules
//!
//! - [`resolver`]: URL classification
//! - [`model`]: resource, comment and reaction types
//! - [`renderer`]: Markdown generation with configurable output options
//! - [`github`]: GraphQL client
//! - [`config`]: environment configuration

#![deny(missing_docs)]

pub mod config;
pub mod github;
pub mod model;
pub mod renderer;
pub mod resolver;
