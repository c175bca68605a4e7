pub mod alerts;
pub mod budgets;
pub mod demo;
pub mod goals;
pub mod init;
pub mod report;
pub mod serve;
pub mod status;
pub mod transactions;
pub mod users;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::error::{FintrackError, Result};
use crate::models::User;
use crate::service;
use crate::settings::db_path;
use crate::store::SqliteStore;

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Open the configured database, refusing to create one implicitly.
pub(crate) fn open_store() -> Result<SqliteStore> {
    let path = db_path();
    if !path.exists() {
        return Err(FintrackError::Other(
            "No database found. Run `fintrack init` first.".to_string(),
        ));
    }
    SqliteStore::open(&path)
}

/// Resolve `--user` to a stored user.
pub(crate) fn resolve_user(store: &SqliteStore, username: &str) -> Result<User> {
    service::user_by_name(store, username)
}

/// Use the given password or prompt for one without echo.
pub(crate) fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

#[derive(Parser)]
#[command(name = "fintrack", version, about = "Personal finance tracker: transactions, budgets, goals and alerts.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up FinTrack: choose a data directory and initialize the database.
    Init {
        /// Path for FinTrack data (default: ~/Documents/fintrack)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Run the REST API.
    Serve {
        /// Address to bind (default from settings: 127.0.0.1:5000)
        #[arg(long)]
        bind: Option<String>,
        /// Use a throwaway in-memory store instead of the database
        #[arg(long)]
        memory: bool,
        /// Do not seed the demo account into the in-memory store
        #[arg(long = "no-demo")]
        no_demo: bool,
    },
    /// Create a user.
    Register {
        username: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Check a username and password.
    Login {
        username: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Record and list transactions.
    Tx {
        #[command(subcommand)]
        command: TxCommands,
    },
    /// Manage monthly category budgets.
    Budget {
        #[command(subcommand)]
        command: BudgetCommands,
    },
    /// Manage savings goals.
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Budget threshold alerts.
    Alerts {
        #[command(subcommand)]
        command: AlertsCommands,
    },
    /// Balance and month-over-month changes.
    Summary {
        #[arg(long)]
        user: String,
    },
    /// Spending by category, income vs expense and the six-month trend.
    Report {
        #[arg(long)]
        user: String,
        /// week, month, quarter or year
        #[arg(long, default_value = "month")]
        timeframe: String,
    },
    /// Tips derived from this month's spending.
    Insights {
        #[arg(long)]
        user: String,
    },
    /// Load the demo account (demo / demo123) with sample data.
    Demo,
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Record a transaction.
    Add {
        #[arg(long)]
        user: String,
        /// income or expense
        #[arg(long = "type")]
        kind: String,
        amount: f64,
        /// Category label or key, e.g. 'Food & Dining' or food-dining
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List transactions, newest first.
    List {
        #[arg(long)]
        user: String,
        /// Show at most this many rows
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Add a monthly budget for a category.
    Add {
        #[arg(long)]
        user: String,
        category: String,
        amount: f64,
    },
    /// List budgets with this month's spend.
    List {
        #[arg(long)]
        user: String,
    },
    /// Overwrite the stored spend of a budget.
    SetSpent {
        /// Budget ID (shown in `fintrack budget list`)
        id: i64,
        spent: f64,
    },
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Add a savings goal.
    Add {
        #[arg(long)]
        user: String,
        name: String,
        #[arg(long)]
        target: f64,
        #[arg(long, default_value = "0")]
        current: f64,
        /// YYYY-MM-DD
        #[arg(long)]
        deadline: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// List goals with progress.
    List {
        #[arg(long)]
        user: String,
    },
    /// Set the amount saved so far.
    Progress {
        #[arg(long)]
        user: String,
        id: i64,
        amount: f64,
    },
    /// Mark a goal completed.
    Complete {
        #[arg(long)]
        user: String,
        id: i64,
    },
    /// Mark a goal as not completed.
    Reopen {
        #[arg(long)]
        user: String,
        id: i64,
    },
    /// Delete a goal.
    Delete {
        #[arg(long)]
        user: String,
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum AlertsCommands {
    /// Evaluate budgets and record new alerts.
    Check {
        #[arg(long)]
        user: String,
    },
    /// Show the alert log, newest first.
    List {
        #[arg(long)]
        user: String,
    },
    /// Mark one alert read.
    Read { id: i64 },
    /// Mark every alert read.
    ReadAll {
        #[arg(long)]
        user: String,
    },
    /// Delete every alert.
    Clear {
        #[arg(long)]
        user: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tx_add() {
        let cli = Cli::try_parse_from([
            "fintrack", "tx", "add", "--user", "demo", "--type", "expense", "12.5", "--category", "Shopping",
        ])
        .unwrap();
        match cli.command {
            Commands::Tx { command: TxCommands::Add { amount, date, .. } } => {
                assert_eq!(amount, 12.5);
                assert!(date.is_none());
            }
            _ => panic!("expected tx add"),
        }
    }
}
