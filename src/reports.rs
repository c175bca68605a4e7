use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{FintrackError, Result};
use crate::models::{Category, Transaction, TransactionType};

fn round_cents(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Time frame filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl TimeFrame {
    /// First date (inclusive) covered by the frame, relative to `today`.
    ///
    /// Rolling frames end at `today`: a week is today and the six days
    /// before it, a quarter starts the day after the same date three months
    /// back.
    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        match self {
            TimeFrame::Week => today - chrono::Duration::days(6),
            TimeFrame::Month => today.with_day(1).unwrap_or(today),
            TimeFrame::Quarter => today
                .checked_sub_months(Months::new(3))
                .and_then(|d| d.succ_opt())
                .unwrap_or(today),
            TimeFrame::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeFrame::Week => "week",
            TimeFrame::Month => "month",
            TimeFrame::Quarter => "quarter",
            TimeFrame::Year => "year",
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFrame {
    type Err = FintrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(TimeFrame::Week),
            "month" => Ok(TimeFrame::Month),
            "quarter" => Ok(TimeFrame::Quarter),
            "year" => Ok(TimeFrame::Year),
            other => Err(FintrackError::validation(format!(
                "Unknown time frame: {other} (expected week, month, quarter or year)"
            ))),
        }
    }
}

pub fn in_time_frame<'a>(
    transactions: &'a [Transaction],
    frame: TimeFrame,
    today: NaiveDate,
) -> impl Iterator<Item = &'a Transaction> {
    let start = frame.start_date(today);
    transactions.iter().filter(move |t| t.date >= start)
}

// ---------------------------------------------------------------------------
// Expenses by category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: Category,
    pub value: f64,
}

pub fn expenses_by_category(
    transactions: &[Transaction],
    frame: TimeFrame,
    today: NaiveDate,
) -> Vec<CategoryTotal> {
    let mut totals: HashMap<Category, f64> = HashMap::new();
    for t in in_time_frame(transactions, frame, today).filter(|t| t.is_expense()) {
        *totals.entry(t.category).or_insert(0.0) += t.amount;
    }
    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(name, total)| CategoryTotal { name, value: round_cents(total) })
        .collect();
    out.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.name.cmp(&b.name)));
    out
}

// ---------------------------------------------------------------------------
// Income vs expense
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncomeVsExpense {
    pub income: f64,
    pub expenses: f64,
}

pub fn income_vs_expense(transactions: &[Transaction], frame: TimeFrame, today: NaiveDate) -> IncomeVsExpense {
    let mut income = 0.0;
    let mut expenses = 0.0;
    for t in in_time_frame(transactions, frame, today) {
        match t.kind {
            TransactionType::Income => income += t.amount,
            TransactionType::Expense => expenses += t.amount,
        }
    }
    IncomeVsExpense {
        income: round_cents(income),
        expenses: round_cents(expenses),
    }
}

// ---------------------------------------------------------------------------
// Monthly trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub name: String,
    pub income: f64,
    pub expenses: f64,
}

pub const TREND_MONTHS: u32 = 6;

/// Income and expense for the `months` calendar months ending with the
/// month of `today`, oldest first.
pub fn monthly_trend(transactions: &[Transaction], today: NaiveDate, months: u32) -> Vec<TrendPoint> {
    let first_of_month = today.with_day(1).unwrap_or(today);
    (0..months)
        .rev()
        .filter_map(|back| first_of_month.checked_sub_months(Months::new(back)))
        .map(|month_start| {
            let mut point = TrendPoint {
                name: month_start.format("%b %Y").to_string(),
                income: 0.0,
                expenses: 0.0,
            };
            for t in transactions
                .iter()
                .filter(|t| t.date.year() == month_start.year() && t.date.month() == month_start.month())
            {
                match t.kind {
                    TransactionType::Income => point.income += t.amount,
                    TransactionType::Expense => point.expenses += t.amount,
                }
            }
            point.income = round_cents(point.income);
            point.expenses = round_cents(point.expenses);
            point
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Combined report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub time_frame: TimeFrame,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub income_vs_expense: IncomeVsExpense,
    pub trend: Vec<TrendPoint>,
}

pub fn build_report(transactions: &[Transaction], frame: TimeFrame, today: NaiveDate) -> Report {
    Report {
        time_frame: frame,
        expenses_by_category: expenses_by_category(transactions, frame, today),
        income_vs_expense: income_vs_expense(transactions, frame, today),
        trend: monthly_trend(transactions, today, TREND_MONTHS),
    }
}
