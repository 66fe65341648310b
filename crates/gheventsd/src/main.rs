use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use ghevents::{secret, Metrics, Options, SecretProvider};
use prometheus::Registry;
use serde::Serialize;
use tracing::{info, info_span, warn};
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "gheventsd",
    about = "gheventsd — GitHub webhook event server bootstrap",
    version
)]
struct Cli {
    /// Log level: error, warn, info, debug, verbose (default: $GHEVENTS_LOG_LEVEL or warn)
    #[arg(long, env = "GHEVENTS_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and validate the server options, then report them
    Check {
        /// File holding the HMAC secret GitHub signs payloads with
        #[arg(long, env = "GHEVENTS_HMAC_SECRET_FILE")]
        hmac_secret_file: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// `--endpoint` and `--port` are owned by [`Options`] and attached to the
/// subcommands that build one.
fn command() -> clap::Command {
    Cli::command().mut_subcommand("check", Options::bind)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let matches = command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let raw = cli.log_level.unwrap_or_else(|| "warn".into());
    let log_level = if raw.eq_ignore_ascii_case("verbose") {
        "debug".to_owned()
    } else {
        raw
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&log_level))
        .init();

    match cli.command {
        Commands::Check {
            hmac_secret_file,
            json,
        } => {
            let sub = matches
                .subcommand_matches("check")
                .context("missing check arguments")?;
            cmd_check(sub, hmac_secret_file, json)
        }
    }
}

// ── Command implementations ───────────────────────────────────────────────────

#[derive(Serialize)]
struct Report<'a> {
    endpoint: &'a str,
    port: i64,
    hmac_secret: &'static str,
    metrics: Vec<String>,
}

fn cmd_check(matches: &ArgMatches, hmac_secret_file: Option<PathBuf>, json: bool) -> Result<()> {
    let registry = Registry::new();
    let metrics = Metrics::new().context("create metrics")?;
    metrics.register(&registry).context("register metrics")?;

    let (provider, configured): (SecretProvider, bool) = match hmac_secret_file {
        Some(path) => (secret::from_file(path), true),
        None => {
            warn!("no --hmac-secret-file given; payload signatures cannot be verified");
            (secret::from_bytes(Vec::new()), false)
        }
    };

    let mut opts = Options::new(
        provider,
        Arc::new(metrics),
        info_span!("github_event_server"),
    );
    opts.apply(matches).context("read server flags")?;
    opts.validate().context("invalid server options")?;

    let _entered = opts.logger().enter();
    info!(endpoint = opts.endpoint(), port = opts.port(), "server options validated");

    let hmac_secret = match (configured, opts.hmac_token().is_empty()) {
        (false, _) => "unset",
        (true, true) => "empty",
        (true, false) => "configured",
    };

    let report = Report {
        endpoint: opts.endpoint(),
        port: opts.port(),
        hmac_secret,
        metrics: registry
            .gather()
            .iter()
            .map(|mf| mf.get_name().to_owned())
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("endpoint:    {}", report.endpoint);
        println!("port:        {}", report.port);
        println!("hmac secret: {}", report.hmac_secret);
        println!("metrics:     {}", report.metrics.join(", "));
    }
    Ok(())
}
