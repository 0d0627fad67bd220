use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use habit_tracker::cli::{analytics, category, habit, list};
use habit_tracker::config::Config;
use habit_tracker::habit::{current_minute, parse_timestamp};
use habit_tracker::logging::init_logging;
use habit_tracker::{HabitError, HabitStore, Periodicity};

#[derive(Parser)]
#[command(name = "habit-tracker")]
#[command(about = "Track daily, weekly and monthly habits and their streaks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "habit-tracker.yaml")]
    config: String,

    /// Use this time instead of now ("YYYY-MM-DD HH:MM")
    #[arg(long, global = true)]
    at: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new habit
    Add {
        /// Habit name (letters only)
        name: String,
        #[arg(short, long, value_enum)]
        periodicity: Periodicity,
        /// Category name (letters only)
        #[arg(short = 'g', long)]
        category: String,
    },

    /// Remove a habit and its log
    Remove {
        name: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete a category and every habit in it
    DeleteCategory {
        category: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Change a habit's periodicity (resets its streak and log)
    Periodicity {
        name: String,
        #[arg(value_enum)]
        periodicity: Periodicity,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Mark a habit as completed
    Complete { name: String },

    /// List habits
    List {
        /// Only show habits with this periodicity
        #[arg(short, long, value_enum)]
        periodicity: Option<Periodicity>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List categories
    Categories,

    /// Show the current streak of every habit
    Streaks,

    /// Show the longest streak of a habit
    Longest { name: String },

    /// Show the completion log of a habit
    Log {
        name: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config)?;
    let _logger = init_logging(&config)?;

    // Initialize store
    let store = HabitStore::open(&config.database_path())?;

    // One timestamp per action
    let now = match cli.at.as_deref() {
        Some(raw) => parse_timestamp(raw)?,
        None => current_minute(),
    };

    let result = match cli.command {
        Commands::Add {
            name,
            periodicity,
            category,
        } => habit::add(&store, &name, periodicity, &category, now),
        Commands::Remove { name, yes } => habit::remove(&store, &name, yes),
        Commands::DeleteCategory { category: name, yes } => category::delete(&store, &name, yes),
        Commands::Periodicity {
            name,
            periodicity,
            yes,
        } => habit::change_periodicity(&store, &name, periodicity, yes, now),
        Commands::Complete { name } => habit::complete(&store, &name, now),
        Commands::List { periodicity, json } => list::run(&store, periodicity, json),
        Commands::Categories => category::list(&store),
        Commands::Streaks => analytics::streaks(&store),
        Commands::Longest { name } => analytics::longest(&store, &name),
        Commands::Log { name, json } => analytics::log(&store, &name, json),
    };

    // Domain errors are reported, not fatal
    match result {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<HabitError>() {
            Some(domain) => {
                info!("event=command module=main status=rejected error={}", domain);
                println!("\n{}\n", domain);
                Ok(())
            }
            None => Err(err),
        },
    }
}
