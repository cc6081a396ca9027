//! `micro-meta`: prints the meta tags found in the head of each given page.

#![allow(clippy::print_stdout, clippy::print_stderr, reason = "command line output")]

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use futures::future::join_all;
use serde_json::json;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use micro_meta::protocol::{MetaError, MetaMap};
use micro_meta_client::scraper::{DEFAULT_MAX_HEAD_BYTES, split_scheme};
use micro_meta_client::{Scraper, ScraperBuildError};

/// Fetch pages over HTTP and print the meta tags of their head.
///
/// Only the response up to `</head>` is read.
#[derive(Parser, Debug)]
#[command(name = "micro-meta")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Page URLs, e.g. `http://example.com/blog/post`.
    #[arg(required = true)]
    urls: Vec<String>,

    /// Port to connect to, unless the URL carries one.
    #[arg(short, long)]
    port: Option<u16>,

    /// Timeout of each whole fetch in seconds.
    #[arg(short, long, default_value = "10")]
    timeout: u64,

    /// Abort a fetch once the buffered head grows past this many bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_HEAD_BYTES)]
    max_head_bytes: usize,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).with_writer(std::io::stderr).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
    }

    let fetches = cli.urls.iter().map(|url| scrape(&cli, url));
    let results = join_all(fetches).await;

    let failed = results.iter().filter(|(_, result)| result.is_err()).count();
    info!(total = results.len(), failed, "all fetches finished");

    match cli.format {
        OutputFormat::Text => print_text(&results),
        OutputFormat::Json => print_json(&results),
    }

    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

async fn scrape<'a>(cli: &Cli, url: &'a str) -> (&'a str, Result<MetaMap, String>) {
    let scraper = match build_scraper(cli, url) {
        Ok(scraper) => scraper,
        Err(e) => {
            error!(url, cause = %e, "invalid url");
            return (url, Err(e.to_string()));
        }
    };

    let result = scraper.scrape().await.map_err(|e: MetaError| {
        error!(url, cause = %e, "fetch failed");
        e.to_string()
    });
    (url, result)
}

fn build_scraper(cli: &Cli, url: &str) -> Result<Scraper, ScraperBuildError> {
    let (host, path) = split_url(url);

    let mut builder = Scraper::builder()
        .host(host)
        .path(path)
        .timeout(Duration::from_secs(cli.timeout))
        .max_head_bytes(cli.max_head_bytes);
    if let Some(port) = cli.port {
        builder = builder.port(port);
    }
    builder.build()
}

/// Splits a URL into its scheme and host (with an optional port) and its path with query.
///
/// The scheme is kept on the host so the builder can reject what it can't fetch.
fn split_url(url: &str) -> (String, String) {
    let url = url.trim();
    let (scheme, rest) = split_scheme(url);

    let (host, path) = match rest.find(['/', '?', '#']) {
        Some(position) => {
            let (host, rest) = rest.split_at(position);
            let rest = rest.split('#').next().unwrap_or_default();
            let path = if rest.starts_with('/') { rest.to_string() } else { format!("/{rest}") };
            (host, path)
        }
        None => (rest, "/".to_string()),
    };

    match scheme {
        Some(scheme) => (format!("{scheme}://{host}"), path),
        None => (host.to_string(), path),
    }
}

fn print_text(results: &[(&str, Result<MetaMap, String>)]) {
    for (url, result) in results {
        match result {
            Ok(meta_map) => {
                println!("{url}");
                for (key, value) in meta_map.iter() {
                    println!("  {key}: {value}");
                }
            }
            Err(e) => eprintln!("{url}: error: {e}"),
        }
    }
}

fn print_json(results: &[(&str, Result<MetaMap, String>)]) {
    let values = results
        .iter()
        .map(|(url, result)| match result {
            Ok(meta_map) => json!({ "url": url, "meta": meta_map }),
            Err(e) => json!({ "url": url, "error": e }),
        })
        .collect::<Vec<_>>();

    match serde_json::to_string_pretty(&values) {
        Ok(output) => println!("{output}"),
        Err(e) => eprintln!("can't serialize output: {e}"),
    }
}
