mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use weekcal_core::WeekcalConfig;

#[derive(Parser)]
#[command(name = "weekcal")]
#[command(about = "Import this week's events from .ics files and export your weekly schedule")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the occurrences of an .ics file that fall in this week
    Import {
        path: PathBuf,

        /// Print occurrences as JSON
        #[arg(long)]
        json: bool,

        /// Use the week containing this date (YYYY-MM-DD)
        #[arg(long)]
        week_of: Option<String>,
    },
    /// Write occurrences from a JSON file to an .ics file
    Export {
        occurrences: PathBuf,

        /// Output file (defaults to output_path from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Place events on the week containing this date (YYYY-MM-DD)
        #[arg(long)]
        week_of: Option<String>,
    },
    /// Show the current week window
    Week {
        /// Use the week containing this date (YYYY-MM-DD)
        #[arg(long)]
        week_of: Option<String>,
    },
    /// Show the config path and effective settings
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = WeekcalConfig::load()?;

    match cli.command {
        Commands::Import {
            path,
            json,
            week_of,
        } => {
            let window = utils::week_window(week_of.as_deref())?;
            commands::import::run(&path, json, &window, &config)
        }
        Commands::Export {
            occurrences,
            output,
            week_of,
        } => {
            let window = utils::week_window(week_of.as_deref())?;
            let output = match output {
                Some(path) => path,
                None => config.output_path()?,
            };
            commands::export::run(&occurrences, &output, &window)
        }
        Commands::Week { week_of } => {
            let window = utils::week_window(week_of.as_deref())?;
            commands::week::run(&window)
        }
        Commands::Config => commands::config::run(&config),
    }
}

/// Log to stderr; `RUST_LOG` wins over the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
