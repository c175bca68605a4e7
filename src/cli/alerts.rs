use chrono::Local;
use colored::{ColoredString, Colorize};
use comfy_table::{Cell, Table};

use crate::cli::{open_store, resolve_user};
use crate::error::Result;
use crate::models::{AlertStatus, BudgetAlert};
use crate::service;

fn status_cell(alert: &BudgetAlert) -> ColoredString {
    let label = alert.status.as_str();
    match alert.status {
        AlertStatus::Info => label.blue(),
        AlertStatus::Warning => label.yellow(),
        AlertStatus::Danger => label.red().bold(),
    }
}

fn print_alerts(title: &str, alerts: &[BudgetAlert]) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "When", "Status", "Message", "Read"]);
    for a in alerts {
        table.add_row(vec![
            Cell::new(a.id),
            Cell::new(a.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(status_cell(a)),
            Cell::new(&a.message),
            Cell::new(if a.read { "yes" } else { "" }),
        ]);
    }
    println!("{title}\n{table}");
}

pub fn check(user: &str) -> Result<()> {
    let mut store = open_store()?;
    let user = resolve_user(&store, user)?;
    let created = service::check_alerts(&mut store, user.id, Local::now().naive_local())?;
    if created.is_empty() {
        println!("No new alerts.");
    } else {
        print_alerts("New alerts", &created);
    }
    Ok(())
}

pub fn list(user: &str) -> Result<()> {
    let store = open_store()?;
    let user = resolve_user(&store, user)?;
    let feed = service::alert_feed(&store, user.id)?;
    if feed.alerts.is_empty() {
        println!("No alerts.");
        return Ok(());
    }
    print_alerts(&format!("Alerts ({} unread)", feed.unread_count), &feed.alerts);
    Ok(())
}

pub fn read(id: i64) -> Result<()> {
    let mut store = open_store()?;
    let alert = service::mark_alert_read(&mut store, id)?;
    println!("Marked alert {} read", alert.id);
    Ok(())
}

pub fn read_all(user: &str) -> Result<()> {
    let mut store = open_store()?;
    let user = resolve_user(&store, user)?;
    let n = service::mark_all_alerts_read(&mut store, user.id)?;
    println!("Marked {n} alert(s) read");
    Ok(())
}

pub fn clear(user: &str) -> Result<()> {
    let mut store = open_store()?;
    let user = resolve_user(&store, user)?;
    let n = service::clear_alerts(&mut store, user.id)?;
    println!("Cleared {n} alert(s)");
    Ok(())
}
