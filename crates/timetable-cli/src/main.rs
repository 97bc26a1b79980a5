mod extract;
mod geodata_store;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "timetable-cli")]
#[command(about = "Extract courses and lessons from saved timetabling portal pages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse fetched portal pages into courses with geocoded lessons.
    Extract {
        /// Portal result pages, processed in order.
        #[arg(long = "page", required = true, num_args = 1..)]
        pages: Vec<PathBuf>,
        /// Geodata cache to read and update (defaults to `TIMETABLE_GEODATA_PATH`).
        #[arg(long)]
        geodata: Option<PathBuf>,
        /// Write courses here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = timetable_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Extract {
            pages,
            geodata,
            out,
        }) => {
            let geodata_path = geodata.unwrap_or_else(|| config.geodata_path.clone());
            extract::run_extract(&config, &pages, &geodata_path, out.as_deref()).await?;
        }
        None => println!("timetable-cli: run `timetable-cli extract --page <FILE>`"),
    }

    Ok(())
}
