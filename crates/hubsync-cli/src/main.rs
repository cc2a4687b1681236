//! Hubsync CLI - Docker Hub access synchronization.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Hubsync - mirror Docker Hub organizations, teams and repository access
#[derive(Parser, Debug)]
#[command(name = "hubsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

/// How to reach and authenticate against Docker Hub.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Docker Hub username
    #[arg(long, env = "HUBSYNC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Account password
    #[arg(long, env = "HUBSYNC_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Personal access token, instead of the password
    #[arg(long, env = "HUBSYNC_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub access_token: Option<String>,

    /// Credentials file with a saved session
    #[arg(long, env = "HUBSYNC_CREDENTIALS_FILE", global = true)]
    pub credentials_file: Option<PathBuf>,

    /// Organizations to sync (comma separated, default: all)
    #[arg(long, env = "HUBSYNC_ORGS", value_delimiter = ',', global = true)]
    pub orgs: Vec<String>,

    /// API base URL
    #[arg(long, env = "HUBSYNC_BASE_URL", default_value = hubsync_client::DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Records per API page
    #[arg(long, env = "HUBSYNC_PAGE_SIZE", default_value_t = hubsync_client::DEFAULT_PAGE_SIZE, global = true)]
    pub page_size: u32,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the credentials work
    Validate,

    /// Show connector metadata
    Metadata,

    /// Sync everything and print a JSON snapshot
    Sync {
        /// Write the snapshot to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Log in and save the session to the credentials file
    Login,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("hubsync={log_level},hubsync_client={log_level},hubsync_connector={log_level}")
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Validate => commands::validate(&cli.connection).await,
        Commands::Metadata => commands::metadata(&cli.connection).await,
        Commands::Sync { output } => commands::sync(&cli.connection, output.as_deref()).await,
        Commands::Login => commands::login(&cli.connection).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
