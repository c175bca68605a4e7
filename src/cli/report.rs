use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{open_store, resolve_user, today};
use crate::error::Result;
use crate::fmt::{change_arrow, change_label, money};
use crate::insights::InsightKind;
use crate::reports::TimeFrame;
use crate::service;

/// Arrow plus label, colored by whether the move is good news.
fn change_cell(percent: f64, higher_is_better: bool) -> Cell {
    let text = format!("{} {}", change_arrow(percent), change_label(percent));
    let good = (percent >= 0.0) == higher_is_better;
    if percent == 0.0 {
        Cell::new(text)
    } else if good {
        Cell::new(text.green())
    } else {
        Cell::new(text.red())
    }
}

pub fn summary(user: &str) -> Result<()> {
    let store = open_store()?;
    let user = resolve_user(&store, user)?;
    let s = service::summary(&store, user.id, today())?;

    let mut table = Table::new();
    table.set_header(vec!["", "This Month", "Last Month", "Change"]);
    table.add_row(vec![
        Cell::new("Income".green().bold()),
        Cell::new(money(s.monthly_income)),
        Cell::new(money(s.previous_income)),
        change_cell(s.income_change, true),
    ]);
    table.add_row(vec![
        Cell::new("Expenses".red().bold()),
        Cell::new(money(s.monthly_expenses)),
        Cell::new(money(s.previous_expenses)),
        change_cell(s.expense_change, false),
    ]);
    table.add_row(vec![
        Cell::new("Net".bold()),
        Cell::new(money(s.monthly_income - s.monthly_expenses)),
        Cell::new(money(s.previous_income - s.previous_expenses)),
        change_cell(s.balance_change, true),
    ]);

    let balance = if s.total_balance >= 0.0 {
        money(s.total_balance).green().bold()
    } else {
        money(s.total_balance).red().bold()
    };
    println!("Total balance: {balance}\n");
    println!("Summary\n{table}");
    Ok(())
}

pub fn report(user: &str, timeframe: &str) -> Result<()> {
    let frame: TimeFrame = timeframe.parse()?;
    let store = open_store()?;
    let user = resolve_user(&store, user)?;
    let report = service::report(&store, user.id, frame, today())?;

    let total: f64 = report.expenses_by_category.iter().map(|c| c.value).sum();
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%"]);
    for item in &report.expenses_by_category {
        let pct = if total > 0.0 { item.value / total * 100.0 } else { 0.0 };
        table.add_row(vec![
            Cell::new(item.name),
            Cell::new(money(item.value)),
            Cell::new(format!("{pct:.1}%")),
        ]);
    }
    table.add_row(vec![Cell::new("Total".bold()), Cell::new(money(total)), Cell::new("")]);
    println!("Expenses by Category ({frame})\n{table}");

    let ive = report.income_vs_expense;
    let mut totals = Table::new();
    totals.set_header(vec!["Income", "Expenses", "Net"]);
    totals.add_row(vec![
        Cell::new(money(ive.income).green()),
        Cell::new(money(ive.expenses).red()),
        Cell::new(money(ive.income - ive.expenses)),
    ]);
    println!("\nIncome vs Expense ({frame})\n{totals}");

    let mut trend = Table::new();
    trend.set_header(vec!["Month", "Income", "Expenses", "Net"]);
    for point in &report.trend {
        trend.add_row(vec![
            Cell::new(&point.name),
            Cell::new(money(point.income)),
            Cell::new(money(point.expenses)),
            Cell::new(money(point.income - point.expenses)),
        ]);
    }
    println!("\nMonthly Trend\n{trend}");
    Ok(())
}

pub fn insights(user: &str) -> Result<()> {
    let store = open_store()?;
    let user = resolve_user(&store, user)?;
    for insight in service::insights(&store, user.id, today())? {
        let title = match insight.kind {
            InsightKind::Warning => insight.title.red().bold(),
            InsightKind::Success => insight.title.green().bold(),
            InsightKind::Info => insight.title.blue().bold(),
        };
        println!("{title}");
        println!("  {}\n", insight.message);
    }
    Ok(())
}
