//! Daily planner CLI.
//!
//! # Usage
//!
//! ```bash
//! # Tasks for today (or --date YYYY-MM-DD)
//! planner show
//!
//! # Add a task
//! planner add "Write report" --date 2024-06-01 --start 09:00 --end 10:00
//!
//! # Complete / delete by position in the list, or by id
//! planner done 1 --date 2024-06-01
//! planner rm 0b6c3c0e-1f1e-4d4e-9a59-2f0f5d2a8a51
//!
//! # Month calendar around a date
//! planner calendar --date 2024-06-15
//!
//! # Run database migrations (PLANNER_DATABASE_URL or DATABASE_URL)
//! planner migrate
//! ```
//!
//! Client settings come from `PLANNER_API_URL`, `PLANNER_SNAPSHOT_PATH`,
//! `PLANNER_CACHE_MAX_AGE_SECS` and `PLANNER_REQUEST_TIMEOUT_SECS`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use daily_planner_core::{ClockTime, PlanDate};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::tasks::TaskSelector;

#[derive(Parser)]
#[command(name = "planner")]
#[command(author, version, about = "Daily planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tasks for a date
    Show {
        /// Date to show (default: today)
        #[arg(short, long)]
        date: Option<PlanDate>,
    },
    /// Add a task
    Add {
        /// What to do
        todo: String,

        /// Date of the task (default: today)
        #[arg(short, long)]
        date: Option<PlanDate>,

        /// Start time, HH:MM
        #[arg(short, long)]
        start: Option<ClockTime>,

        /// End time, HH:MM
        #[arg(short, long)]
        end: Option<ClockTime>,
    },
    /// Mark a task completed
    Done {
        /// Position in the list (from 1) or task id
        task: TaskSelector,

        /// Date the position refers to (default: today)
        #[arg(short, long)]
        date: Option<PlanDate>,
    },
    /// Delete a task
    Rm {
        /// Position in the list (from 1) or task id
        task: TaskSelector,

        /// Date the position refers to (default: today)
        #[arg(short, long)]
        date: Option<PlanDate>,
    },
    /// Print the month calendar around a date
    Calendar {
        /// Selected date (default: today)
        #[arg(short, long)]
        date: Option<PlanDate>,
    },
    /// Run database migrations
    Migrate,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never mix with command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let today = PlanDate::today();

    match cli.command {
        Commands::Show { date } => {
            commands::tasks::show(date.unwrap_or(today)).await?;
        }
        Commands::Add {
            todo,
            date,
            start,
            end,
        } => {
            commands::tasks::add(date.unwrap_or(today), todo, start, end).await?;
        }
        Commands::Done { task, date } => {
            commands::tasks::complete(date.unwrap_or(today), task).await?;
        }
        Commands::Rm { task, date } => {
            commands::tasks::remove(date.unwrap_or(today), task).await?;
        }
        Commands::Calendar { date } => {
            commands::calendar::print(date.unwrap_or(today), today);
        }
        Commands::Migrate => commands::migrate::run().await?,
    }
    Ok(())
}
