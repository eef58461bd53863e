mod commands;
mod fields;
mod parse;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quickcap_core::config::QuickcapConfig;
use quickcap_core::sync::Direction;

use crate::fields::FieldArgs;

#[derive(Parser)]
#[command(name = "quickcap")]
#[command(about = "Capture tasks and events and sync them to a remote store")]
struct Cli {
    /// Print diagnostic logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a new task (or event with --event)
    Add {
        /// Quick-entry phrase, e.g. "call the bank tomorrow 30m #admin hard"
        text: Vec<String>,

        /// Capture an event instead of a task
        #[arg(short, long)]
        event: bool,

        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Change an existing item
    Edit {
        /// Item id or display number (#12)
        reference: String,

        /// Quick-entry phrase applied before the field flags
        #[arg(short, long)]
        text: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },
    /// List items, newest first
    List {
        /// Include completed and canceled items
        #[arg(short, long)]
        all: bool,

        /// Only items carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Delete an item
    Delete {
        /// Item id or display number (#12)
        reference: String,
    },
    /// Show the tag index
    Tags {
        /// Only tags containing this text
        #[arg(short, long)]
        matching: Option<String>,
    },
    /// Push, pull or merge the local data file with the remote store
    Sync {
        /// push, pull or merge
        direction: Direction,
    },
    /// Write a JSON backup
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Add every item from a JSON backup
    Import { file: PathBuf },
    /// Print a link that carries all items in its fragment
    Share {
        #[arg(long)]
        base_url: String,
    },
    /// Replace all items with the content of a share link
    OpenLink { link: String },
    /// Show configuration paths and the active backend
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        init_logging();
    }

    if let Commands::Config = cli.command {
        return commands::config::run();
    }

    let config = QuickcapConfig::load()?;

    match cli.command {
        Commands::Add {
            text,
            event,
            fields,
        } => commands::add::run(&config, &text.join(" "), event, &fields).await,
        Commands::Edit {
            reference,
            text,
            fields,
        } => commands::edit::run(&config, &reference, text.as_deref(), &fields).await,
        Commands::List { all, tag } => commands::list::run(&config, all, tag.as_deref()).await,
        Commands::Delete { reference } => commands::delete::run(&config, &reference).await,
        Commands::Tags { matching } => commands::tags::run(&config, matching.as_deref()).await,
        Commands::Sync { direction } => commands::sync::run(&config, direction).await,
        Commands::Export { out } => commands::export::run(&config, out.as_deref()).await,
        Commands::Import { file } => commands::import::run(&config, &file).await,
        Commands::Share { base_url } => commands::share::run(&config, &base_url).await,
        Commands::OpenLink { link } => commands::open_link::run(&config, &link).await,
        Commands::Config => commands::config::run(),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quickcap_core=debug,quickcap=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
