//! Medizap CLI: the main entry point.
//!
//! Commands:
//! - `init`     : write a default config file
//! - `serve`    : start the HTTP API
//! - `ask`      : answer one question, or chat interactively
//! - `context`  : show retrieval results without calling the model
//! - `lookup`   : find diseases by name
//! - `symptoms` : rank diseases by a comma-separated symptom list
//! - `doctor`   : diagnose config, knowledge files, and provider

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "medizap",
    about = "Medizap: knowledge-grounded medical question answering",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.medizap/config.toml
    #[arg(short, long, global = true, env = "MEDIZAP_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a medical question
    Ask {
        /// The question; omit to enter interactive mode
        query: Option<String>,
    },

    /// Show keywords, ranked records, and context for a question
    Context {
        query: String,

        /// Also print the full prompt sent to the model
        #[arg(long)]
        prompt: bool,
    },

    /// Look up diseases by name
    Lookup { name: String },

    /// Rank diseases by how many of the given symptoms they list
    Symptoms {
        /// Comma-separated symptoms, e.g. "fever, cough"
        symptoms: String,
    },

    /// Diagnose system health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => commands::init::run(config_path, force).await?,
        Commands::Serve { port } => commands::serve::run(config_path, port).await?,
        Commands::Ask { query } => commands::ask::run(config_path, query).await?,
        Commands::Context { query, prompt } => {
            commands::context::run(config_path, &query, prompt).await?
        }
        Commands::Lookup { name } => commands::lookup::run(config_path, &name).await?,
        Commands::Symptoms { symptoms } => commands::symptoms::run(config_path, &symptoms).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}
