mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kelime-cli", about = "Vocabulary drilling with spaced repetition", version)]
struct Cli {
    /// Config file (default: <config dir>/kelime/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding review state
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Catalog JSON file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List items due for review now
    Due,

    /// Rate an item as remembered or missed
    Rate {
        /// Item id
        id: u32,
        #[command(flatten)]
        verdict: Verdict,
    },

    /// Flag or unflag an item as difficult
    Toggle {
        /// Item id
        id: u32,
    },

    /// Free study over a chunk or the whole catalog
    Study {
        /// Chunk number, starting at 1
        #[arg(long, conflicts_with = "all")]
        chunk: Option<usize>,
        /// Study the whole catalog
        #[arg(long)]
        all: bool,
        /// Only items flagged as difficult
        #[arg(long)]
        unknown_only: bool,
        /// Keep catalog order
        #[arg(long)]
        no_shuffle: bool,
    },

    /// Review every due item once
    Review,

    /// List catalog items
    List {
        /// Case-insensitive substring filter on either side
        #[arg(long)]
        query: Option<String>,
        /// Only items flagged as difficult
        #[arg(long)]
        unknown_only: bool,
    },

    /// Show catalog chunks
    Chunks,

    /// Show review statistics
    Stats,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Verdict {
    /// Remembered
    #[arg(long)]
    pass: bool,
    /// Missed
    #[arg(long)]
    fail: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();

    let overrides = app::Overrides {
        config: cli.config,
        data_dir: cli.data_dir,
        catalog: cli.catalog,
    };
    let mut app = app::App::new(overrides)?;

    match cli.command {
        Command::Due => {
            commands::due::run(&app, &cli.format, use_color)?;
        }
        Command::Rate { id, verdict } => {
            commands::rate::run_rate(&mut app, id, verdict.pass, &cli.format)?;
        }
        Command::Toggle { id } => {
            commands::rate::run_toggle(&mut app, id, &cli.format)?;
        }
        Command::Study { chunk, all, unknown_only, no_shuffle } => {
            let scope = app::resolve_scope(chunk, all)?;
            commands::study::run(&mut app, scope, unknown_only, !no_shuffle, use_color)?;
        }
        Command::Review => {
            commands::review::run(&mut app, use_color)?;
        }
        Command::List { query, unknown_only } => {
            commands::list::run(&app, query.as_deref(), unknown_only, &cli.format, use_color)?;
        }
        Command::Chunks => {
            commands::list::run_chunks(&app, &cli.format)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
    }

    Ok(())
}
