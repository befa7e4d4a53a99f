//! github2prometheus CLI
//!
//! Collects GitHub repository statistics and republishes them as Prometheus
//! metrics. The run mode is chosen explicitly:
//!
//! - `serve`: long-running HTTP server, one collection per scrape
//! - `push`: one collection, pushed to a push gateway (for schedulers)
//! - `print` (alias `dev`): one collection, printed to standard output
//!
//! # Usage
//!
//! ```bash
//! GITHUB_ORG=function61 github2prometheus print
//! github2prometheus --github-user joonas serve --port 9100
//! PROMPIPE_ENDPOINT=https://prompipe.example.com/metrics PROMPIPE_AUTHTOKEN=... github2prometheus push
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shared::collect::collect_and_export;
use shared::config::github::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use shared::config::push::{ENV_PUSH_AUTH_TOKEN, ENV_PUSH_ENDPOINT};
use shared::config::{ConfigError, GitHubConfig, PushConfig};
use shared::export::{Exporter, PrintExporter, PushExporter};
use shared::github::{GitHubClient, RepositorySource};
use shared::models::Identities;

/// github2prometheus - GitHub repository statistics as Prometheus metrics
#[derive(Parser)]
#[command(name = "github2prometheus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    github: GitHubArgs,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where to collect from.
#[derive(Args)]
struct GitHubArgs {
    /// GitHub organization whose repositories are collected
    #[arg(long, env = "GITHUB_ORG")]
    github_org: Option<String>,

    /// GitHub user whose repositories are collected
    #[arg(long, env = "GITHUB_USER")]
    github_user: Option<String>,

    /// GitHub API token (optional, raises the rate limit)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    github_api_url: String,

    /// Timeout for outbound HTTP requests, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

impl GitHubArgs {
    fn identities(&self) -> Result<Identities, ConfigError> {
        Identities::new(self.github_org.clone(), self.github_user.clone())
    }

    fn github_config(&self) -> Result<GitHubConfig, ConfigError> {
        let mut config = GitHubConfig::default()
            .with_api_url(self.github_api_url.clone())
            .with_timeout_secs(self.timeout_secs);
        if let Some(token) = self.github_token.as_deref().filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        config.validate_config()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve /metrics over HTTP, collecting on every scrape
    Serve {
        /// Host address to bind to
        #[arg(long, env = "GITHUB2PROMETHEUS_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "GITHUB2PROMETHEUS_PORT", default_value_t = 8080)]
        port: u16,
    },

    /// Collect once and push the metrics to a push gateway
    Push {
        /// Push gateway endpoint
        #[arg(long, env = ENV_PUSH_ENDPOINT)]
        endpoint: Option<String>,

        /// Bearer token for the push gateway
        #[arg(long, env = ENV_PUSH_AUTH_TOKEN, hide_env_values = true)]
        auth_token: Option<String>,
    },

    /// Collect once and print the metrics to standard output
    #[command(alias = "dev")]
    Print,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result = run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = format!("{e:#}"), "github2prometheus failed");
    }
    result
}

/// Logs go to stderr so `print` output stays clean.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let identities = cli.github.identities()?;
    let github = cli.github.github_config()?;

    match cli.command {
        Commands::Serve { host, port } => {
            let config = api::Config {
                host,
                port,
                github,
                identities,
            };
            api::run_server_with_config(config).await
        }
        Commands::Push {
            endpoint,
            auth_token,
        } => {
            let push = push_config(endpoint, auth_token)?;
            let exporter = PushExporter::new(push, github.timeout())?;
            run_once(&github, &identities, &exporter).await
        }
        Commands::Print => run_once(&github, &identities, &PrintExporter::stdout()).await,
    }
}

fn push_config(
    endpoint: Option<String>,
    auth_token: Option<String>,
) -> Result<PushConfig, ConfigError> {
    PushConfig::new(
        endpoint.ok_or(ConfigError::MissingVariable(ENV_PUSH_ENDPOINT))?,
        auth_token.ok_or(ConfigError::MissingVariable(ENV_PUSH_AUTH_TOKEN))?,
    )
}

/// Runs a single collection cycle and hands the result to `exporter`.
async fn run_once<E: Exporter>(
    github: &GitHubConfig,
    identities: &Identities,
    exporter: &E,
) -> Result<()> {
    let source = RepositorySource::new(GitHubClient::new(github)?);

    let stats = collect_and_export(&source, identities, exporter)
        .await
        .context("Collection cycle failed")?;

    tracing::info!(
        repositories = stats.repositories,
        pages = stats.pages,
        samples = stats.samples,
        "Collection cycle complete"
    );
    Ok(())
}
