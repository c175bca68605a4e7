//! Persistence behind a single trait so the aggregation and service code never
//! depend on a concrete backend.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::models::{
    Budget, BudgetAlert, Goal, NewAlert, NewBudget, NewGoal, NewTransaction, NewUser, Transaction, User,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub users: i64,
    pub transactions: i64,
    pub budgets: i64,
    pub goals: i64,
    pub alerts: i64,
}

pub trait Store: Send {
    // users
    fn create_user(&mut self, new: NewUser) -> Result<User>;
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    // transactions
    fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction>;
    fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>>;

    // budgets; `add_budget` enforces one budget per (user, category)
    fn add_budget(&mut self, new: NewBudget) -> Result<Budget>;
    fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>>;
    fn get_budget(&self, id: i64) -> Result<Option<Budget>>;
    fn update_budget_spent(&mut self, id: i64, spent: f64) -> Result<Option<Budget>>;

    // goals
    fn add_goal(&mut self, new: NewGoal) -> Result<Goal>;
    fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>>;
    fn get_goal(&self, id: i64) -> Result<Option<Goal>>;
    fn save_goal(&mut self, goal: &Goal) -> Result<()>;
    fn delete_goal(&mut self, id: i64) -> Result<bool>;

    // alert log, newest first
    fn record_alert(&mut self, new: NewAlert) -> Result<BudgetAlert>;
    fn list_alerts(&self, user_id: i64) -> Result<Vec<BudgetAlert>>;
    fn mark_alert_read(&mut self, id: i64) -> Result<Option<BudgetAlert>>;
    fn mark_all_alerts_read(&mut self, user_id: i64) -> Result<usize>;
    fn clear_alerts(&mut self, user_id: i64) -> Result<usize>;

    fn stats(&self) -> Result<StoreStats>;
}
