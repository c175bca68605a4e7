//! Operations shared by the HTTP handlers and the CLI.
//!
//! Every function takes the store explicitly plus the evaluation date/time, so
//! callers decide what "today" is.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::alerts::derive_alerts;
use crate::budget::{month_spend, with_spent};
use crate::error::{FintrackError, Result};
use crate::goals::apply_progress;
use crate::insights::{self, Insight};
use crate::models::{
    Budget, BudgetAlert, Goal, NewBudget, NewGoal, NewTransaction, NewUser, Transaction, User,
};
use crate::reports::{build_report, Report, TimeFrame};
use crate::store::Store;
use crate::summary::{summarize, Summary};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub fn register(store: &mut dyn Store, new: NewUser) -> Result<User> {
    new.validate()?;
    let user = store.create_user(NewUser {
        username: new.username.trim().to_string(),
        password: new.password,
    })?;
    info!(user_id = user.id, username = %user.username, "registered user");
    Ok(user)
}

/// Check credentials. Unknown user and wrong password fail the same way.
pub fn login(store: &dyn Store, username: &str, password: &str) -> Result<User> {
    match store.find_user_by_username(username.trim())? {
        Some(user) if user.password == password => {
            info!(user_id = user.id, "login");
            Ok(user)
        }
        _ => {
            warn!(username, "failed login");
            Err(FintrackError::InvalidCredentials)
        }
    }
}

pub fn require_user(store: &dyn Store, user_id: i64) -> Result<User> {
    store
        .get_user(user_id)?
        .ok_or_else(|| FintrackError::not_found("User", user_id))
}

pub fn user_by_name(store: &dyn Store, username: &str) -> Result<User> {
    store
        .find_user_by_username(username)?
        .ok_or_else(|| FintrackError::UnknownUser(username.to_string()))
}

// ---------------------------------------------------------------------------
// Transactions and budgets
// ---------------------------------------------------------------------------

/// Record a transaction. An expense refreshes the stored spend of the
/// matching budget for the month of `today`.
pub fn add_transaction(store: &mut dyn Store, new: NewTransaction, today: NaiveDate) -> Result<Transaction> {
    require_user(store, new.user_id)?;
    new.validate()?;
    let txn = store.add_transaction(new)?;
    info!(
        user_id = txn.user_id,
        id = txn.id,
        kind = %txn.kind,
        category = %txn.category,
        amount = txn.amount,
        "added transaction"
    );

    if txn.is_expense() {
        let budget = store
            .list_budgets(txn.user_id)?
            .into_iter()
            .find(|b| b.category == txn.category);
        if let Some(budget) = budget {
            let transactions = store.list_transactions(txn.user_id)?;
            let spent = month_spend(&transactions, budget.category, today);
            store.update_budget_spent(budget.id, spent)?;
            debug!(budget_id = budget.id, spent, "refreshed budget spend");
        }
    }
    Ok(txn)
}

pub fn transactions(store: &dyn Store, user_id: i64) -> Result<Vec<Transaction>> {
    require_user(store, user_id)?;
    store.list_transactions(user_id)
}

pub fn add_budget(store: &mut dyn Store, new: NewBudget, today: NaiveDate) -> Result<Budget> {
    require_user(store, new.user_id)?;
    new.validate()?;
    let budget = store.add_budget(new)?;
    info!(user_id = budget.user_id, id = budget.id, category = %budget.category, "added budget");

    let transactions = store.list_transactions(budget.user_id)?;
    let spent = month_spend(&transactions, budget.category, today);
    Ok(Budget { spent: Some(spent), ..budget })
}

/// A user's budgets with spend derived for the month of `today`.
pub fn budgets(store: &dyn Store, user_id: i64, today: NaiveDate) -> Result<Vec<Budget>> {
    require_user(store, user_id)?;
    let transactions = store.list_transactions(user_id)?;
    let budgets = store.list_budgets(user_id)?;
    Ok(with_spent(&transactions, &budgets, today))
}

/// Overwrite the stored spend snapshot of a budget.
pub fn set_budget_spent(store: &mut dyn Store, budget_id: i64, spent: f64) -> Result<Budget> {
    if !spent.is_finite() || spent < 0.0 {
        return Err(FintrackError::validation("spent must be a non-negative number"));
    }
    let budget = store
        .update_budget_spent(budget_id, spent)?
        .ok_or_else(|| FintrackError::not_found("Budget", budget_id))?;
    info!(budget_id, spent, "set budget spend");
    Ok(budget)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FinanceData {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
}

pub fn finance_data(store: &dyn Store, user_id: i64, today: NaiveDate) -> Result<FinanceData> {
    Ok(FinanceData {
        transactions: transactions(store, user_id)?,
        budgets: budgets(store, user_id, today)?,
    })
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

pub fn add_goal(store: &mut dyn Store, new: NewGoal) -> Result<Goal> {
    require_user(store, new.user_id)?;
    new.validate()?;
    let goal = store.add_goal(NewGoal {
        name: new.name.trim().to_string(),
        category: new.category.trim().to_string(),
        ..new
    })?;
    info!(user_id = goal.user_id, id = goal.id, name = %goal.name, "added goal");
    Ok(goal)
}

pub fn goals(store: &dyn Store, user_id: i64) -> Result<Vec<Goal>> {
    require_user(store, user_id)?;
    store.list_goals(user_id)
}

/// A goal owned by `user_id`; someone else's goal reads as missing.
fn owned_goal(store: &dyn Store, user_id: i64, goal_id: i64) -> Result<Goal> {
    match store.get_goal(goal_id)? {
        Some(goal) if goal.user_id == user_id => Ok(goal),
        _ => Err(FintrackError::not_found("Goal", goal_id)),
    }
}

pub fn update_goal_progress(store: &mut dyn Store, user_id: i64, goal_id: i64, current_amount: f64) -> Result<Goal> {
    let mut goal = owned_goal(store, user_id, goal_id)?;
    apply_progress(&mut goal, current_amount)?;
    store.save_goal(&goal)?;
    info!(goal_id, current_amount, completed = goal.is_completed, "updated goal progress");
    Ok(goal)
}

pub fn set_goal_completed(store: &mut dyn Store, user_id: i64, goal_id: i64, completed: bool) -> Result<Goal> {
    let mut goal = owned_goal(store, user_id, goal_id)?;
    goal.is_completed = completed;
    store.save_goal(&goal)?;
    info!(goal_id, completed, "set goal completion");
    Ok(goal)
}

pub fn delete_goal(store: &mut dyn Store, user_id: i64, goal_id: i64) -> Result<()> {
    owned_goal(store, user_id, goal_id)?;
    store.delete_goal(goal_id)?;
    info!(goal_id, "deleted goal");
    Ok(())
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Evaluate every budget and record alerts not yet raised this month.
/// Returns only the alerts created by this call.
pub fn check_alerts(store: &mut dyn Store, user_id: i64, now: NaiveDateTime) -> Result<Vec<BudgetAlert>> {
    let budgets = budgets(store, user_id, now.date())?;
    let history = store.list_alerts(user_id)?;
    let mut created = Vec::new();
    for new in derive_alerts(user_id, &budgets, &history, now) {
        let alert = store.record_alert(new)?;
        info!(
            user_id,
            budget_id = alert.budget_id,
            threshold = alert.threshold,
            status = alert.status.as_str(),
            "budget alert"
        );
        created.push(alert);
    }
    Ok(created)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFeed {
    pub alerts: Vec<BudgetAlert>,
    pub unread_count: usize,
}

pub fn alert_feed(store: &dyn Store, user_id: i64) -> Result<AlertFeed> {
    require_user(store, user_id)?;
    let alerts = store.list_alerts(user_id)?;
    let unread_count = alerts.iter().filter(|a| !a.read).count();
    Ok(AlertFeed { alerts, unread_count })
}

pub fn mark_alert_read(store: &mut dyn Store, alert_id: i64) -> Result<BudgetAlert> {
    store
        .mark_alert_read(alert_id)?
        .ok_or_else(|| FintrackError::not_found("Alert", alert_id))
}

pub fn mark_all_alerts_read(store: &mut dyn Store, user_id: i64) -> Result<usize> {
    require_user(store, user_id)?;
    let n = store.mark_all_alerts_read(user_id)?;
    debug!(user_id, n, "marked alerts read");
    Ok(n)
}

pub fn clear_alerts(store: &mut dyn Store, user_id: i64) -> Result<usize> {
    require_user(store, user_id)?;
    let n = store.clear_alerts(user_id)?;
    info!(user_id, n, "cleared alerts");
    Ok(n)
}

// ---------------------------------------------------------------------------
// Summary, reports, insights
// ---------------------------------------------------------------------------

pub fn summary(store: &dyn Store, user_id: i64, today: NaiveDate) -> Result<Summary> {
    Ok(summarize(&transactions(store, user_id)?, today))
}

pub fn report(store: &dyn Store, user_id: i64, frame: TimeFrame, today: NaiveDate) -> Result<Report> {
    Ok(build_report(&transactions(store, user_id)?, frame, today))
}

pub fn insights(store: &dyn Store, user_id: i64, today: NaiveDate) -> Result<Vec<Insight>> {
    let transactions = transactions(store, user_id)?;
    let budgets = with_spent(&transactions, &store.list_budgets(user_id)?, today);
    Ok(insights::generate(&transactions, &budgets, today))
}
