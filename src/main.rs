mod commands;
mod logging;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use daygrid_core::WindowKind;

use crate::commands::Query;

#[derive(Parser)]
#[command(name = "daygrid")]
#[command(about = "Show calendar events by day, week, or month")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events occurring in a day, week, or month
    Events {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Show where timed events sit in the hourly day grid
    Grid {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Print the boundaries of a day, week, or month window
    Window {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Window to show: day, week or month
    #[arg(long, default_value = "week")]
    view: WindowKind,

    /// Any date inside the window (YYYY-MM-DD). Defaults to today
    #[arg(short, long)]
    date: Option<String>,

    /// Whose events to show
    #[arg(short, long)]
    owner: Option<String>,

    /// JSON file with event records
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// IANA timezone for local dates (e.g. "Europe/Stockholm")
    #[arg(long)]
    timezone: Option<String>,
}

impl From<QueryArgs> for Query {
    fn from(args: QueryArgs) -> Self {
        Query {
            view: args.view,
            date: args.date,
            owner: args.owner,
            file: args.file,
            timezone: args.timezone,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Events { query } => commands::events::run(query.into()),
        Commands::Grid { query } => commands::grid::run(query.into()),
        Commands::Window { query } => commands::window::run(query.into()),
    }
}
