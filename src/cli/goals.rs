use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{open_store, resolve_user, today};
use crate::error::Result;
use crate::fmt::{money, progress_bar};
use crate::goals::{is_overdue, progress_percent};
use crate::models::{parse_date, NewGoal};
use crate::service;

#[allow(clippy::too_many_arguments)]
pub fn add(
    user: &str,
    name: &str,
    target: f64,
    current: f64,
    deadline: &str,
    category: &str,
    note: &str,
) -> Result<()> {
    let mut store = open_store()?;
    let user = resolve_user(&store, user)?;
    let goal = service::add_goal(
        &mut store,
        NewGoal {
            user_id: user.id,
            name: name.to_string(),
            target_amount: target,
            current_amount: current,
            deadline: parse_date(deadline, "deadline")?,
            category: category.to_string(),
            note: note.to_string(),
        },
    )?;
    println!("Added goal '{}' targeting {} by {} (id {})", goal.name, money(goal.target_amount), goal.deadline, goal.id);
    Ok(())
}

pub fn list(user: &str) -> Result<()> {
    let store = open_store()?;
    let user = resolve_user(&store, user)?;
    let goals = service::goals(&store, user.id)?;

    if goals.is_empty() {
        println!("No goals yet.");
        return Ok(());
    }

    let today = today();
    let mut table = Table::new();
    table.set_header(vec!["ID", "Goal", "Category", "Saved", "Target", "Progress", "Deadline", "Status"]);
    for g in &goals {
        let pct = progress_percent(g);
        let status = if g.is_completed {
            "Completed".green()
        } else if is_overdue(g, today) {
            "Overdue".red()
        } else {
            "In progress".normal()
        };
        table.add_row(vec![
            Cell::new(g.id),
            Cell::new(&g.name),
            Cell::new(&g.category),
            Cell::new(money(g.current_amount)),
            Cell::new(money(g.target_amount)),
            Cell::new(format!("{} {:.0}%", progress_bar(pct, 20), pct)),
            Cell::new(g.deadline),
            Cell::new(status),
        ]);
    }
    println!("Goals\n{table}");
    Ok(())
}

pub fn progress(user: &str, id: i64, amount: f64) -> Result<()> {
    let mut store = open_store()?;
    let user = resolve_user(&store, user)?;
    let goal = service::update_goal_progress(&mut store, user.id, id, amount)?;
    println!("'{}': {} of {} saved", goal.name, money(goal.current_amount), money(goal.target_amount));
    if goal.is_completed {
        println!("{}", "Goal reached!".green().bold());
    }
    Ok(())
}

pub fn set_completed(user: &str, id: i64, completed: bool) -> Result<()> {
    let mut store = open_store()?;
    let user = resolve_user(&store, user)?;
    let goal = service::set_goal_completed(&mut store, user.id, id, completed)?;
    let state = if goal.is_completed { "completed" } else { "reopened" };
    println!("Goal '{}' {state}", goal.name);
    Ok(())
}

pub fn delete(user: &str, id: i64) -> Result<()> {
    let mut store = open_store()?;
    let user = resolve_user(&store, user)?;
    service::delete_goal(&mut store, user.id, id)?;
    println!("Deleted goal {id}");
    Ok(())
}
