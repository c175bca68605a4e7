use chrono::NaiveDate;
use serde::Serialize;

use crate::budget::month_spend;
use crate::fmt::money;
use crate::models::{Budget, Category, Transaction};
use crate::summary::previous_month;

/// Monthly dining spend above which a savings tip is shown.
const DINING_TIP_THRESHOLD: f64 = 350.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

fn over_budget(budgets: &[Budget]) -> Option<Insight> {
    let worst = budgets
        .iter()
        .filter(|b| b.spent() > b.amount)
        .max_by(|a, b| (a.spent() - a.amount).total_cmp(&(b.spent() - b.amount)))?;
    Some(Insight {
        kind: InsightKind::Warning,
        title: format!("{} Budget Alert", worst.category),
        message: format!(
            "You've exceeded your {} budget by {} this month.",
            worst.category.label().to_lowercase(),
            money(worst.spent() - worst.amount)
        ),
    })
}

fn dining_savings(transactions: &[Transaction], today: NaiveDate) -> Option<Insight> {
    let spend = month_spend(transactions, Category::FoodDining, today);
    if spend <= DINING_TIP_THRESHOLD {
        return None;
    }
    let potential = (spend * 0.25).round();
    Some(Insight {
        kind: InsightKind::Success,
        title: "Savings Opportunity".to_string(),
        message: format!("You could save ${potential:.0} by reducing restaurant expenses."),
    })
}

fn utilities_trend(transactions: &[Transaction], today: NaiveDate) -> Option<Insight> {
    let (py, pm) = previous_month(today);
    let last_month = NaiveDate::from_ymd_opt(py, pm, 1)?;
    let current = month_spend(transactions, Category::Utilities, today);
    let previous = month_spend(transactions, Category::Utilities, last_month);
    if previous <= 0.0 || current >= previous {
        return None;
    }
    let decrease = ((previous - current) / previous * 100.0).round();
    Some(Insight {
        kind: InsightKind::Info,
        title: "Spending Pattern".to_string(),
        message: format!("Your utility bills have decreased {decrease:.0}% compared to last month."),
    })
}

/// Insights for a user's month; `budgets` must already carry derived spend.
pub fn generate(transactions: &[Transaction], budgets: &[Budget], today: NaiveDate) -> Vec<Insight> {
    let mut out: Vec<Insight> = [
        over_budget(budgets),
        dining_savings(transactions, today),
        utilities_trend(transactions, today),
    ]
    .into_iter()
    .flatten()
    .collect();

    if out.is_empty() {
        out.push(Insight {
            kind: InsightKind::Info,
            title: "Welcome to FinTrack".to_string(),
            message: "Add more transactions to see personalized financial insights here.".to_string(),
        });
    }
    out
}
