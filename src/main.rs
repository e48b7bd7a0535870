// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for issue2md.
//!
//! This binary provides the `issue2md` command for converting a GitHub
//! issue, pull request or discussion to Markdown.

use issue2md::config::Config;
use issue2md::{github, renderer, resolver};
use lexopt::prelude::*;
use snafu::prelude::*;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Where to write the rendered output.
enum OutputTarget {
    /// Write to the given file.
    File(PathBuf),
    /// Write to stdout.
    Stdout,
}

struct Cli {
    url: String,
    output: OutputTarget,
    enable_reactions: bool,
    enable_user_links: bool,
    log_level: &'static str,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(transparent)]
    Resolve { source: resolver::ResolveError },

    #[snafu(transparent)]
    Fetch { source: github::FetchError },

    #[snafu(display("failed to create directory {}: {source}", path.display()))]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to write to stdout: {source}"))]
    WriteStdout { source: std::io::Error },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert a GitHub issue, pull request or discussion to Markdown

Usage: {name} [OPTIONS] <URL> [OUTPUT]

Arguments:
  <URL>     https://github.com/<owner>/<repo>/(issues|pull|discussions)/<number>
  [OUTPUT]  Output file (default: stdout, or - for stdout)

Options:
  -o, --output <FILE>       Output file (same as the OUTPUT argument)
      --enable-reactions    Include reaction counts
      --enable-user-links   Render comment authors as profile links
  -q, --quiet               Only log warnings and errors
  -v, --verbose             Log debug details
  -h, --help                Print help
  -V, --version             Print version

Environment:
  GITHUB_TOKEN              Access token (needed for private repositories)
  GITHUB_GRAPHQL_URL        GraphQL endpoint (default: https://api.github.com/graphql)
  RUST_LOG                  Log filter, overrides -q/-v",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut url: Option<String> = None;
    let mut output: Option<OutputTarget> = None;
    let mut enable_reactions = false;
    let mut enable_user_links = false;
    let mut log_level = "info";

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => {
                output = Some(output_target(parser.value()?.parse()?));
            }
            Long("enable-reactions") => enable_reactions = true,
            Long("enable-user-links") => enable_user_links = true,
            Short('q') | Long("quiet") => log_level = "warn",
            Short('v') | Long("verbose") => log_level = "debug",
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) if url.is_none() => url = Some(val.string()?),
            Value(val) if output.is_none() => output = Some(output_target(val.parse()?)),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        url: url.ok_or("missing required argument: <URL>")?,
        output: output.unwrap_or(OutputTarget::Stdout),
        enable_reactions,
        enable_user_links,
        log_level,
    })
}

fn output_target(path: PathBuf) -> OutputTarget {
    if path == Path::new("-") {
        OutputTarget::Stdout
    } else {
        OutputTarget::File(path)
    }
}

/// Sends log output to stderr so stdout stays clean Markdown.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,{}={level}", env!("CARGO_CRATE_NAME")))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[snafu::report]
fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;
    init_logging(cli.log_level);

    let target = resolver::resolve(&cli.url)?;
    let opts = renderer::RenderOptions {
        enable_reactions: cli.enable_reactions,
        enable_user_links: cli.enable_user_links,
    };

    let config = Config::from_env();
    debug!(?config, "loaded configuration");

    let client = github::Client::new(&config)?;
    let thread = client.fetch(&target, opts.enable_reactions)?;
    debug!(comments = thread.comments.len(), "fetched {target}");

    let markdown = renderer::render(target.kind, &thread, &opts);
    write_output(&cli.output, &markdown)
}

/// Writes the document to a file (creating parent directories) or stdout.
fn write_output(output: &OutputTarget, markdown: &str) -> Result<(), Error> {
    match output {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(markdown.as_bytes())
                .and_then(|()| stdout.flush())
                .context(WriteStdoutSnafu)
        }
        OutputTarget::File(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).context(CreateOutputDirSnafu { path: parent })?;
            }
            std::fs::write(path, markdown).context(WriteFileSnafu { path })?;
            info!("Wrote {}", path.display());
            Ok(())
        }
    }
}
