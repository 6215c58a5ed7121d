//! CLI entry point for pulp-rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pulp-rs")]
#[command(version)]
#[command(about = "A fast front-end server for headless WordPress blogs", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the site server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List content from the CMS
    List {
        /// Type of content to list (post, page)
        #[arg(default_value = "post")]
        r#type: String,

        /// Keep loading pages until the feed runs dry
        #[arg(short, long)]
        all: bool,

        /// Read posts through a running pulp-rs server instead of the CMS
        #[arg(long)]
        via: Option<String>,
    },

    /// Preview the hero slider in the terminal
    Slides,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "pulp_rs=debug,info"
    } else {
        "pulp_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot read current directory")?,
    };

    match cli.command {
        Commands::Server { port, ip } => {
            let pulp = pulp_rs::Pulp::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            pulp.serve(&ip, port).await?;
        }

        Commands::List { r#type, all, via } => {
            let pulp = pulp_rs::Pulp::new(&base_dir)?;
            pulp_rs::commands::list::run(&pulp, &r#type, all, via.as_deref()).await?;
        }

        Commands::Slides => {
            let pulp = pulp_rs::Pulp::new(&base_dir)?;
            pulp_rs::commands::slides::run(&pulp).await?;
            // The stdin reader thread cannot be cancelled
            std::process::exit(0);
        }

        Commands::Version => {
            println!("pulp-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
