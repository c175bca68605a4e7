//! Budget threshold alerts.
//!
//! A budget sits in at most one band (80/90/100 percent of its cap). An alert
//! for a `(budget, threshold)` pair is emitted at most once per calendar month.

use chrono::{Datelike, NaiveDateTime};

use crate::budget::usage_percent;
use crate::models::{AlertStatus, Budget, BudgetAlert, Category, NewAlert};

/// Band a budget currently falls in, highest first.
pub fn classify(budget: &Budget) -> Option<(u32, AlertStatus)> {
    let pct = usage_percent(budget)?;
    if pct >= 100.0 {
        Some((100, AlertStatus::Danger))
    } else if pct >= 90.0 {
        Some((90, AlertStatus::Warning))
    } else if pct >= 80.0 {
        Some((80, AlertStatus::Info))
    } else {
        None
    }
}

pub fn message(category: Category, status: AlertStatus, used_pct: f64) -> String {
    match status {
        AlertStatus::Danger => format!("You have exceeded your {category} budget!"),
        AlertStatus::Warning | AlertStatus::Info => format!(
            "You have used {}% of your {category} budget.",
            used_pct.floor() as i64
        ),
    }
}

fn same_month(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Whether `history` already holds an alert for this pair in the month of `now`.
pub fn already_alerted(history: &[BudgetAlert], budget_id: i64, threshold: u32, now: NaiveDateTime) -> bool {
    history
        .iter()
        .any(|a| a.budget_id == budget_id && a.threshold == threshold && same_month(a.created_at, now))
}

/// New alerts for `budgets` (already annotated with spend), skipping any pair
/// alerted earlier in the same month.
pub fn derive_alerts(
    user_id: i64,
    budgets: &[Budget],
    history: &[BudgetAlert],
    now: NaiveDateTime,
) -> Vec<NewAlert> {
    let mut out: Vec<NewAlert> = Vec::new();
    for budget in budgets {
        let Some((threshold, status)) = classify(budget) else {
            continue;
        };
        if already_alerted(history, budget.id, threshold, now) {
            continue;
        }
        let pct = usage_percent(budget).unwrap_or(0.0);
        out.push(NewAlert {
            user_id,
            budget_id: budget.id,
            category: budget.category,
            threshold,
            status,
            message: message(budget.category, status, pct),
            created_at: now,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    fn budget(id: i64, amount: f64, spent: f64) -> Budget {
        Budget { id, user_id: 1, category: Category::FoodDining, amount, spent: Some(spent) }
    }

    fn recorded(alerts: Vec<NewAlert>) -> Vec<BudgetAlert> {
        alerts
            .into_iter()
            .enumerate()
            .map(|(i, a)| BudgetAlert {
                id: i as i64 + 1,
                user_id: a.user_id,
                budget_id: a.budget_id,
                category: a.category,
                threshold: a.threshold,
                status: a.status,
                message: a.message,
                created_at: a.created_at,
                read: false,
            })
            .collect()
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(classify(&budget(1, 500.0, 399.99)), None);
        assert_eq!(classify(&budget(1, 500.0, 400.0)), Some((80, AlertStatus::Info)));
        assert_eq!(classify(&budget(1, 500.0, 450.0)), Some((90, AlertStatus::Warning)));
        assert_eq!(classify(&budget(1, 500.0, 500.0)), Some((100, AlertStatus::Danger)));
        assert_eq!(classify(&budget(1, 300.0, 380.0)), Some((100, AlertStatus::Danger)));
    }

    #[test]
    fn test_zero_cap_never_alerts() {
        assert_eq!(classify(&budget(1, 0.0, 50.0)), None);
        assert_eq!(classify(&budget(1, 0.0, 0.0)), None);
    }

    #[test]
    fn test_classification_is_monotonic() {
        let mut last = 0u32;
        for spent in (0..=1200).map(|s| s as f64) {
            let t = classify(&budget(1, 1000.0, spent)).map(|(t, _)| t).unwrap_or(0);
            assert!(t >= last, "band dropped from {last} to {t} at spent={spent}");
            last = t;
        }
    }

    #[test]
    fn test_84_percent_is_single_info_alert() {
        let now = at(2025, 6, 10);
        let alerts = derive_alerts(1, &[budget(3, 500.0, 420.0)], &[], now);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].threshold, 80);
        assert_eq!(alerts[0].status, AlertStatus::Info);
        assert_eq!(alerts[0].message, "You have used 84% of your Food & Dining budget.");
    }

    #[test]
    fn test_same_month_is_not_repeated() {
        let budgets = [budget(3, 500.0, 420.0)];
        let history = recorded(derive_alerts(1, &budgets, &[], at(2025, 6, 1)));
        let again = derive_alerts(1, &budgets, &history, at(2025, 6, 30));
        assert!(again.is_empty());
    }

    #[test]
    fn test_new_month_resets_eligibility() {
        let budgets = [budget(3, 500.0, 420.0)];
        let history = recorded(derive_alerts(1, &budgets, &[], at(2025, 6, 20)));
        let next = derive_alerts(1, &budgets, &history, at(2025, 7, 1));
        assert_eq!(next.len(), 1);

        let year_later = derive_alerts(1, &budgets, &history, at(2026, 6, 20));
        assert_eq!(year_later.len(), 1);
    }

    #[test]
    fn test_climbing_bands_emit_each_once() {
        let now = at(2025, 6, 5);
        let mut history = recorded(derive_alerts(1, &[budget(3, 100.0, 85.0)], &[], now));
        let warn = derive_alerts(1, &[budget(3, 100.0, 95.0)], &history, now);
        assert_eq!(warn.len(), 1);
        assert_eq!(warn[0].threshold, 90);
        history.extend(recorded(warn));

        // dropping back into the 80 band in the same month stays quiet
        assert!(derive_alerts(1, &[budget(3, 100.0, 85.0)], &history, now).is_empty());
    }

    #[test]
    fn test_danger_message() {
        let alerts = derive_alerts(1, &[budget(9, 300.0, 380.0)], &[], at(2025, 6, 5));
        assert_eq!(alerts[0].message, "You have exceeded your Food & Dining budget!");
    }
}
