mod alerts;
mod budget;
mod cli;
mod db;
mod demo;
mod error;
mod fmt;
mod goals;
mod insights;
mod models;
mod reports;
mod server;
mod service;
mod settings;
mod store;
mod summary;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cli::{AlertsCommands, BudgetCommands, Cli, Commands, GoalCommands, TxCommands};

/// Log to stderr; `FINTRACK_LOG` overrides the default filter.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env("FINTRACK_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();

    let serving = matches!(cli.command, Commands::Serve { .. });
    init_tracing(if serving { "info,tower_http=debug" } else { "warn" });

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Serve { bind, memory, no_demo } => cli::serve::run(bind, memory, no_demo),
        Commands::Register { username, password } => cli::users::register(&username, password),
        Commands::Login { username, password } => cli::users::login(&username, password),
        Commands::Tx { command } => match command {
            TxCommands::Add {
                user,
                kind,
                amount,
                category,
                description,
                date,
            } => cli::transactions::add(&user, &kind, amount, &category, &description, date.as_deref()),
            TxCommands::List { user, limit } => cli::transactions::list(&user, limit),
        },
        Commands::Budget { command } => match command {
            BudgetCommands::Add { user, category, amount } => cli::budgets::add(&user, &category, amount),
            BudgetCommands::List { user } => cli::budgets::list(&user),
            BudgetCommands::SetSpent { id, spent } => cli::budgets::set_spent(id, spent),
        },
        Commands::Goal { command } => match command {
            GoalCommands::Add {
                user,
                name,
                target,
                current,
                deadline,
                category,
                note,
            } => cli::goals::add(&user, &name, target, current, &deadline, &category, &note),
            GoalCommands::List { user } => cli::goals::list(&user),
            GoalCommands::Progress { user, id, amount } => cli::goals::progress(&user, id, amount),
            GoalCommands::Complete { user, id } => cli::goals::set_completed(&user, id, true),
            GoalCommands::Reopen { user, id } => cli::goals::set_completed(&user, id, false),
            GoalCommands::Delete { user, id } => cli::goals::delete(&user, id),
        },
        Commands::Alerts { command } => match command {
            AlertsCommands::Check { user } => cli::alerts::check(&user),
            AlertsCommands::List { user } => cli::alerts::list(&user),
            AlertsCommands::Read { id } => cli::alerts::read(id),
            AlertsCommands::ReadAll { user } => cli::alerts::read_all(&user),
            AlertsCommands::Clear { user } => cli::alerts::clear(&user),
        },
        Commands::Summary { user } => cli::report::summary(&user),
        Commands::Report { user, timeframe } => cli::report::report(&user, &timeframe),
        Commands::Insights { user } => cli::report::insights(&user),
        Commands::Demo => cli::demo::run(),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
