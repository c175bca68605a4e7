use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{open_store, resolve_user, today};
use crate::error::Result;
use crate::fmt::money;
use crate::models::{parse_date, Category, NewTransaction, TransactionType};
use crate::service;

pub fn add(
    user: &str,
    kind: &str,
    amount: f64,
    category: &str,
    description: &str,
    date: Option<&str>,
) -> Result<()> {
    let mut store = open_store()?;
    let user = resolve_user(&store, user)?;
    let kind: TransactionType = kind.parse()?;
    let category: Category = category.parse()?;
    let date = match date {
        Some(raw) => parse_date(raw, "date")?,
        None => today(),
    };

    let txn = service::add_transaction(
        &mut store,
        NewTransaction {
            user_id: user.id,
            kind,
            amount,
            category,
            description: description.to_string(),
            date,
        },
        today(),
    )?;
    println!(
        "Added {} {} in {} on {} (id {})",
        txn.kind,
        money(txn.amount),
        txn.category,
        txn.date,
        txn.id
    );
    Ok(())
}

pub fn list(user: &str, limit: Option<usize>) -> Result<()> {
    let store = open_store()?;
    let user = resolve_user(&store, user)?;
    let mut txns = service::transactions(&store, user.id)?;
    txns.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(n) = limit {
        txns.truncate(n);
    }

    if txns.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Category", "Amount"]);
    for t in &txns {
        let amount = match t.kind {
            TransactionType::Income => format!("+{}", money(t.amount)).green(),
            TransactionType::Expense => format!("-{}", money(t.amount)).red(),
        };
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(t.date),
            Cell::new(&t.description),
            Cell::new(t.category),
            Cell::new(amount),
        ]);
    }
    println!("Transactions\n{table}");
    Ok(())
}
