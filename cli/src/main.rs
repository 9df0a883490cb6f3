mod commands;
mod config;
mod edamam;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    cmd_add, cmd_breakdown, cmd_day, cmd_delete, cmd_month, cmd_search, cmd_shell, cmd_year,
};
use crate::config::Config;
use crate::edamam::EdamamClient;
use nibble_core::db::Database;
use nibble_core::session::{Session, Theme};
use nibble_core::store::EntryStore;

#[derive(Parser)]
#[command(
    name = "nibble",
    version,
    about = "A small calorie log with a calendar",
    long_about = "\n\n  ┏┓╻╻┏┓ ┏┓ ╻  ┏━╸
  ┃┗┫┃┣┻┓┣┻┓┃  ┣╸
  ╹ ╹╹┗━┛┗━┛┗━╸┗━╸
  one bite at a time.
"
)]
struct Cli {
    /// Colour theme for tables and calendar glyphs
    #[arg(long, global = true, value_enum, default_value_t = ThemeArg::Light)]
    theme: ThemeArg,
    /// Log more detail to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the calories of a food (Edamam, then the built-in table)
    Search {
        /// Food name to look up
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a food entry
    Add {
        /// Food name
        food: String,
        /// Meal type: breakfast, lunch, dinner, snack
        #[arg(short, long, default_value = "snack")]
        meal: String,
        /// Date to log for (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Log with this calorie value instead of looking the food up
        #[arg(long)]
        calories: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an entry by ID
    Delete {
        /// Entry ID to delete
        entry_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a day's entries grouped by meal (defaults to today)
    Day {
        /// Date to show (YYYY-MM-DD or today/yesterday/tomorrow)
        date: Option<String>,
        /// Show a flat table instead of meal groups
        #[arg(long)]
        table: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how a day's calories split across meals
    Breakdown {
        /// Date to show (YYYY-MM-DD or today/yesterday/tomorrow)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a month calendar with daily totals
    Month {
        /// Month to show (YYYY-MM, default: current month)
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show intake density over the last 365 days
    Year {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start an interactive session
    Shell,
}

fn init_tracing(verbose: u8) {
    let default = if verbose == 0 {
        "nibble=warn,nibble_core=warn"
    } else {
        "nibble=debug,nibble_core=debug"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&config.db_path)?;
    let store = EntryStore::load(db)?;
    tracing::debug!(entries = store.len(), db = %config.db_path.display(), "store loaded");

    let mut session = Session::new(store, Local::now().date_naive());
    session.set_theme(cli.theme.into());
    let client = EdamamClient::new(config.edamam)?;

    match cli.command {
        Commands::Search { query, json } => cmd_search(&client, &query, json).await,
        Commands::Add {
            food,
            meal,
            date,
            calories,
            json,
        } => cmd_add(&mut session, &client, &food, &meal, date, calories, json).await,
        Commands::Delete { entry_id, json } => cmd_delete(&mut session, &entry_id, json),
        Commands::Day { date, table, json } => cmd_day(&mut session, date, table, json),
        Commands::Breakdown { date, json } => cmd_breakdown(&mut session, date, json),
        Commands::Month { month, json } => cmd_month(&mut session, month, json),
        Commands::Year { json } => cmd_year(&mut session, json),
        Commands::Shell => cmd_shell(&mut session, &client).await,
    }
}
