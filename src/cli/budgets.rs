use colored::{ColoredString, Colorize};
use comfy_table::{Cell, Table};

use crate::budget::{usage_band, usage_percent, UsageBand};
use crate::cli::{open_store, resolve_user, today};
use crate::error::Result;
use crate::fmt::{money, progress_bar};
use crate::models::{Budget, Category, NewBudget};
use crate::service;

fn usage_cell(budget: &Budget) -> ColoredString {
    let pct = usage_percent(budget).unwrap_or(0.0);
    let text = format!("{} {:.0}%", progress_bar(pct, 20), pct);
    match usage_band(budget) {
        UsageBand::Healthy => text.green(),
        UsageBand::Elevated => text.yellow(),
        UsageBand::Warning => text.bright_red(),
        UsageBand::Over => text.red().bold(),
    }
}

pub fn add(user: &str, category: &str, amount: f64) -> Result<()> {
    let mut store = open_store()?;
    let user = resolve_user(&store, user)?;
    let category: Category = category.parse()?;
    let budget = service::add_budget(
        &mut store,
        NewBudget { user_id: user.id, category, amount },
        today(),
    )?;
    println!(
        "Added {} budget of {} per month (id {})",
        budget.category,
        money(budget.amount),
        budget.id
    );
    Ok(())
}

pub fn list(user: &str) -> Result<()> {
    let store = open_store()?;
    let user = resolve_user(&store, user)?;
    let budgets = service::budgets(&store, user.id, today())?;

    if budgets.is_empty() {
        println!("No budgets yet. Add one with `fintrack budget add`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Category", "Budget", "Spent", "Remaining", "Usage"]);
    for b in &budgets {
        let remaining = b.amount - b.spent();
        let remaining_cell = if remaining < 0.0 {
            money(remaining).red()
        } else {
            money(remaining).normal()
        };
        table.add_row(vec![
            Cell::new(b.id),
            Cell::new(b.category),
            Cell::new(money(b.amount)),
            Cell::new(money(b.spent())),
            Cell::new(remaining_cell),
            Cell::new(usage_cell(b)),
        ]);
    }
    println!("Budgets for {}\n{table}", today().format("%B %Y"));
    Ok(())
}

pub fn set_spent(id: i64, spent: f64) -> Result<()> {
    let mut store = open_store()?;
    let budget = service::set_budget_spent(&mut store, id, spent)?;
    println!("{} budget spend set to {}", budget.category, money(spent));
    Ok(())
}
