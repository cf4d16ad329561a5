mod chat;
mod competitors;
mod export;
mod logo;

use std::path::PathBuf;
use std::sync::Arc;

use battlecard_core::SectionType;
use battlecard_dashboard::Dashboard;
use battlecard_export::ExportFormat;
use battlecard_gemini::GeminiClient;
use battlecard_store::FileStorage;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::logo::LogoCommands;

#[derive(Debug, Parser)]
#[command(name = "battlecard")]
#[command(about = "Competitive battle cards from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List stored competitors with their freshness
    List,
    /// Print a battle card, or one section of it
    Show {
        /// Competitor id (defaults to the first competitor)
        id: Option<String>,
        /// Only print this section (e.g. `pricing`, `red_flags`)
        #[arg(long)]
        section: Option<SectionType>,
    },
    /// Research a new competitor and store its profile
    Add {
        #[arg(long)]
        name: String,
        /// Homepage, starting with http:// or https://
        #[arg(long)]
        url: String,
    },
    /// Regenerate one competitor, or all of them
    Refresh {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<String>,
        #[arg(long)]
        all: bool,
    },
    /// Remove a competitor (the last one cannot be removed)
    Delete { id: String },
    /// Write a battle card file to disk
    Export {
        id: String,
        /// csv, html (Word document) or pdf
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Manage the brand logo shown on the dashboard
    Logo {
        #[command(subcommand)]
        command: LogoCommands,
    },
    /// Ask the assistant about a competitor
    Ask {
        question: String,
        /// Competitor id (defaults to the first competitor)
        #[arg(long)]
        competitor: Option<String>,
    },
    /// Refresh every profile older than four weeks, one at a time
    CheckStale {
        /// List stale competitors without regenerating them
        #[arg(long)]
        dry_run: bool,
    },
}

fn open_dashboard() -> anyhow::Result<Dashboard> {
    let config = battlecard_core::load_app_config()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "opening data directory");
    let storage = Arc::new(FileStorage::open(config.data_dir.clone())?);
    let generator = Arc::new(GeminiClient::from_config(&config)?);
    Ok(Dashboard::new(storage, generator, config.brand))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("battlecard: no command given; run with --help for usage");
        return Ok(());
    };

    let dashboard = open_dashboard()?;
    match command {
        Commands::List => competitors::run_list(&dashboard).await,
        Commands::Show { id, section } => {
            competitors::run_show(&dashboard, id.as_deref(), section).await?;
        }
        Commands::Add { name, url } => competitors::run_add(&dashboard, &name, &url).await?,
        Commands::Refresh { id, all } => {
            competitors::run_refresh(&dashboard, id.as_deref(), all).await?;
        }
        Commands::Delete { id } => competitors::run_delete(&dashboard, &id).await?,
        Commands::Export { id, format, out } => {
            export::run_export(&dashboard, &id, format, &out).await?;
        }
        Commands::Logo { command } => logo::run_logo(&dashboard, command).await?,
        Commands::Ask {
            question,
            competitor,
        } => chat::run_ask(&dashboard, &question, competitor.as_deref()).await?,
        Commands::CheckStale { dry_run } => competitors::run_check_stale(&dashboard, dry_run).await,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
