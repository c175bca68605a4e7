use colored::Colorize;

use crate::cli::{open_store, today};
use crate::demo::{self, DEMO_PASSWORD, DEMO_USERNAME};
use crate::error::Result;

pub fn run() -> Result<()> {
    let mut store = open_store()?;
    match demo::seed(&mut store, today())? {
        Some(seeded) => {
            println!("{}", "Demo account loaded.".green().bold());
            println!("  Transactions: {}", seeded.transactions);
            println!("  Budgets:      {}", seeded.budgets);
            println!("  Goals:        {}", seeded.goals);
            println!();
            println!("Log in as {DEMO_USERNAME} / {DEMO_PASSWORD}, or try:");
            println!("  fintrack summary --user {DEMO_USERNAME}");
            println!("  fintrack budget list --user {DEMO_USERNAME}");
        }
        None => println!("Demo account '{DEMO_USERNAME}' already exists."),
    }
    Ok(())
}
