use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Transaction, TransactionType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthTotals {
    pub income: f64,
    pub expense: f64,
}

impl MonthTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_balance: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub previous_income: f64,
    pub previous_expenses: f64,
    pub balance_change: f64,
    pub income_change: f64,
    pub expense_change: f64,
}

/// (year, month) of the month before `date`'s month.
pub fn previous_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    }
}

pub fn month_totals(transactions: &[Transaction], year: i32, month: u32) -> MonthTotals {
    transactions
        .iter()
        .filter(|t| t.date.year() == year && t.date.month() == month)
        .fold(MonthTotals::default(), |mut acc, t| {
            match t.kind {
                TransactionType::Income => acc.income += t.amount,
                TransactionType::Expense => acc.expense += t.amount,
            }
            acc
        })
}

/// Percentage change from `previous` to `current`.
///
/// A zero baseline reports a fixed +/-100 when the current value is non-zero
/// and 0 when both are zero.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous != 0.0 {
        (current - previous) / previous.abs() * 100.0
    } else if current > 0.0 {
        100.0
    } else if current < 0.0 {
        -100.0
    } else {
        0.0
    }
}

pub fn summarize(transactions: &[Transaction], today: NaiveDate) -> Summary {
    let total_balance: f64 = transactions.iter().map(Transaction::signed_amount).sum();
    let current = month_totals(transactions, today.year(), today.month());
    let (py, pm) = previous_month(today);
    let previous = month_totals(transactions, py, pm);

    Summary {
        total_balance,
        monthly_income: current.income,
        monthly_expenses: current.expense,
        previous_income: previous.income,
        previous_expenses: previous.expense,
        balance_change: percent_change(previous.net(), current.net()),
        income_change: percent_change(previous.income, current.income),
        expense_change: percent_change(previous.expense, current.expense),
    }
}
