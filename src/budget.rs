//! Month-scoped spend per budget category.
//!
//! Everything here is a pure function over slices; callers load the user's
//! transactions and budgets from a store and pass the evaluation date.

use chrono::{Datelike, NaiveDate};

use crate::models::{Budget, Category, Transaction};

/// True when both dates fall in the same calendar month of the same year.
pub fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

/// Sum of expense amounts in `category` dated in the month of `reference`.
pub fn month_spend(transactions: &[Transaction], category: Category, reference: NaiveDate) -> f64 {
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.category == category && same_month(t.date, reference))
        .map(|t| t.amount)
        .sum()
}

/// Budgets annotated with the spend derived from `transactions` for the
/// month containing `today`. Budgets with no matching expenses get 0.
pub fn with_spent(transactions: &[Transaction], budgets: &[Budget], today: NaiveDate) -> Vec<Budget> {
    budgets
        .iter()
        .map(|b| Budget {
            spent: Some(month_spend(transactions, b.category, today)),
            ..b.clone()
        })
        .collect()
}

/// Percentage of the cap used, or `None` when the cap is not positive.
pub fn usage_percent(budget: &Budget) -> Option<f64> {
    if budget.amount > 0.0 {
        Some(budget.spent() * 100.0 / budget.amount)
    } else {
        None
    }
}

/// Coarse display band for a budget's usage bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageBand {
    Healthy,
    Elevated,
    Warning,
    Over,
}

pub fn usage_band(budget: &Budget) -> UsageBand {
    match usage_percent(budget) {
        Some(p) if p >= 100.0 => UsageBand::Over,
        Some(p) if p >= 90.0 => UsageBand::Warning,
        Some(p) if p >= 70.0 => UsageBand::Elevated,
        _ => UsageBand::Healthy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(id: i64, kind: TransactionType, category: Category, amount: f64, on: NaiveDate) -> Transaction {
        Transaction {
            id,
            user_id: 1,
            kind,
            amount,
            category,
            description: String::new(),
            date: on,
        }
    }

    fn budget(id: i64, category: Category, amount: f64) -> Budget {
        Budget { id, user_id: 1, category, amount, spent: None }
    }

    #[test]
    fn test_income_does_not_count_toward_spend() {
        let today = date(2025, 6, 15);
        let txns = vec![
            txn(1, TransactionType::Expense, Category::FoodDining, 100.0, date(2025, 6, 2)),
            txn(2, TransactionType::Income, Category::FoodDining, 100.0, date(2025, 6, 3)),
        ];
        let budgets = vec![budget(1, Category::FoodDining, 200.0)];
        let out = with_spent(&txns, &budgets, today);
        assert_eq!(out[0].spent, Some(100.0));
    }

    #[test]
    fn test_other_months_are_excluded() {
        let today = date(2025, 6, 15);
        let txns = vec![
            txn(1, TransactionType::Expense, Category::Housing, 1200.0, date(2025, 5, 31)),
            txn(2, TransactionType::Expense, Category::Housing, 50.0, date(2024, 6, 10)),
            txn(3, TransactionType::Expense, Category::Housing, 25.0, date(2025, 6, 1)),
            txn(4, TransactionType::Expense, Category::Housing, 10.0, date(2025, 6, 30)),
        ];
        assert_eq!(month_spend(&txns, Category::Housing, today), 35.0);
    }

    #[test]
    fn test_unmatched_budget_gets_zero() {
        let today = date(2025, 6, 15);
        let txns = vec![txn(1, TransactionType::Expense, Category::Shopping, 40.0, today)];
        let budgets = vec![budget(1, Category::Utilities, 80.0)];
        let out = with_spent(&txns, &budgets, today);
        assert_eq!(out[0].spent, Some(0.0));
    }

    #[test]
    fn test_stale_stored_spent_is_replaced() {
        let today = date(2025, 6, 15);
        let mut b = budget(1, Category::Shopping, 300.0);
        b.spent = Some(380.0);
        let out = with_spent(&[], &[b], today);
        assert_eq!(out[0].spent(), 0.0);
    }

    #[test]
    fn test_spend_is_idempotent() {
        let today = date(2025, 6, 15);
        let txns = vec![
            txn(1, TransactionType::Expense, Category::Transportation, 45.82, today),
            txn(2, TransactionType::Expense, Category::Transportation, 12.10, today),
        ];
        let budgets = vec![budget(1, Category::Transportation, 350.0)];
        let first = with_spent(&txns, &budgets, today);
        let second = with_spent(&txns, &first, today);
        assert_eq!(first, second);
    }

    #[test]
    fn test_each_budget_sums_its_own_category() {
        let today = date(2025, 1, 20);
        let txns = vec![
            txn(1, TransactionType::Expense, Category::FoodDining, 10.0, today),
            txn(2, TransactionType::Expense, Category::Shopping, 20.0, today),
            txn(3, TransactionType::Expense, Category::FoodDining, 5.0, today),
        ];
        let budgets = vec![
            budget(1, Category::FoodDining, 100.0),
            budget(2, Category::Shopping, 100.0),
        ];
        let out = with_spent(&txns, &budgets, today);
        assert_eq!(out[0].spent(), 15.0);
        assert_eq!(out[1].spent(), 20.0);
    }

    #[test]
    fn test_usage_band_edges() {
        let mut b = budget(1, Category::Other, 100.0);
        b.spent = Some(69.0);
        assert_eq!(usage_band(&b), UsageBand::Healthy);
        b.spent = Some(70.0);
        assert_eq!(usage_band(&b), UsageBand::Elevated);
        b.spent = Some(90.0);
        assert_eq!(usage_band(&b), UsageBand::Warning);
        b.spent = Some(100.0);
        assert_eq!(usage_band(&b), UsageBand::Over);
        b.amount = 0.0;
        assert_eq!(usage_percent(&b), None);
    }
}
