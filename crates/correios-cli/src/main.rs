mod cmd;
mod location;
mod output;

use clap::{Parser, Subcommand};
use correios_core::config::{TrackerConfig, DEFAULT_TIMEOUT_SECS};
use correios_core::paths;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "correios",
    about = "Simple command line tool to track your orders from Correios",
    version,
    propagate_version = true
)]
struct Cli {
    /// File used as storage (default: ~/.correios; .yaml/.yml selects YAML)
    #[arg(
        long = "file",
        short = 'f',
        visible_alias = "filestorage",
        global = true,
        env = paths::STORE_ENV
    )]
    file: Option<PathBuf>,

    /// Carrier status endpoint
    #[arg(long, global = true, env = "CORREIOS_ENDPOINT")]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "CORREIOS_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the status of one or more orders or the ones that you previously added
    #[command(visible_alias = "c")]
    Check {
        /// Tracking codes (omit to check every stored code)
        codes: Vec<String>,
    },

    /// List the codes stored
    #[command(visible_aliases = ["l", "ls"])]
    List,

    /// Store an order code to check later without specifying it
    #[command(visible_alias = "a")]
    Add {
        code: String,
        /// Optional free-text label shown next to the code's status
        label: Vec<String>,
    },

    /// Remove an order code from the storage file
    #[command(visible_aliases = ["rm", "r"])]
    Remove {
        /// Tracking code or label
        identifier: String,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = location::resolve_store_path(cli.file.as_deref()).and_then(|store| {
        match cli.command {
            Commands::Check { codes } => {
                let mut config =
                    TrackerConfig::default().with_timeout(Duration::from_secs(cli.timeout));
                if let Some(endpoint) = cli.endpoint {
                    config = config.with_endpoint(endpoint);
                }
                cmd::check::run(&store, config, &codes, cli.json)
            }
            Commands::List => cmd::list::run(&store, cli.json),
            Commands::Add { code, label } => cmd::add::run(&store, &code, &label, cli.json),
            Commands::Remove { identifier } => cmd::remove::run(&store, &identifier, cli.json),
        }
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
