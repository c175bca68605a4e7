use std::collections::BTreeMap;

use crate::error::{FintrackError, Result};
use crate::models::{
    Budget, BudgetAlert, Goal, NewAlert, NewBudget, NewGoal, NewTransaction, NewUser, Transaction, User,
};
use crate::store::{Store, StoreStats};

/// Auto-increment counters, one per entity, starting at 1.
#[derive(Debug)]
struct Ids {
    user: i64,
    transaction: i64,
    budget: i64,
    goal: i64,
    alert: i64,
}

impl Default for Ids {
    fn default() -> Self {
        Self { user: 1, transaction: 1, budget: 1, goal: 1, alert: 1 }
    }
}

fn take(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: BTreeMap<i64, User>,
    transactions: BTreeMap<i64, Transaction>,
    budgets: BTreeMap<i64, Budget>,
    goals: BTreeMap<i64, Goal>,
    alerts: BTreeMap<i64, BudgetAlert>,
    ids: Ids,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn create_user(&mut self, new: NewUser) -> Result<User> {
        if self.users.values().any(|u| u.username == new.username) {
            return Err(FintrackError::UsernameTaken(new.username));
        }
        let user = User {
            id: take(&mut self.ids.user),
            username: new.username,
            password: new.password,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.get(&id).cloned())
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.values().find(|u| u.username == username).cloned())
    }

    fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction> {
        let txn = Transaction {
            id: take(&mut self.ids.transaction),
            user_id: new.user_id,
            kind: new.kind,
            amount: new.amount,
            category: new.category,
            description: new.description,
            date: new.date,
        };
        self.transactions.insert(txn.id, txn.clone());
        Ok(txn)
    }

    fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    fn add_budget(&mut self, new: NewBudget) -> Result<Budget> {
        if self
            .budgets
            .values()
            .any(|b| b.user_id == new.user_id && b.category == new.category)
        {
            return Err(FintrackError::DuplicateBudget(new.category.to_string()));
        }
        let budget = Budget {
            id: take(&mut self.ids.budget),
            user_id: new.user_id,
            category: new.category,
            amount: new.amount,
            spent: Some(0.0),
        };
        self.budgets.insert(budget.id, budget.clone());
        Ok(budget)
    }

    fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        Ok(self.budgets.values().filter(|b| b.user_id == user_id).cloned().collect())
    }

    fn get_budget(&self, id: i64) -> Result<Option<Budget>> {
        Ok(self.budgets.get(&id).cloned())
    }

    fn update_budget_spent(&mut self, id: i64, spent: f64) -> Result<Option<Budget>> {
        Ok(self.budgets.get_mut(&id).map(|b| {
            b.spent = Some(spent);
            b.clone()
        }))
    }

    fn add_goal(&mut self, new: NewGoal) -> Result<Goal> {
        let goal = Goal {
            id: take(&mut self.ids.goal),
            user_id: new.user_id,
            is_completed: new.current_amount >= new.target_amount,
            name: new.name,
            target_amount: new.target_amount,
            current_amount: new.current_amount,
            deadline: new.deadline,
            category: new.category,
            note: new.note,
        };
        self.goals.insert(goal.id, goal.clone());
        Ok(goal)
    }

    fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        Ok(self.goals.values().filter(|g| g.user_id == user_id).cloned().collect())
    }

    fn get_goal(&self, id: i64) -> Result<Option<Goal>> {
        Ok(self.goals.get(&id).cloned())
    }

    fn save_goal(&mut self, goal: &Goal) -> Result<()> {
        match self.goals.get_mut(&goal.id) {
            Some(slot) => {
                *slot = goal.clone();
                Ok(())
            }
            None => Err(FintrackError::not_found("Goal", goal.id)),
        }
    }

    fn delete_goal(&mut self, id: i64) -> Result<bool> {
        Ok(self.goals.remove(&id).is_some())
    }

    fn record_alert(&mut self, new: NewAlert) -> Result<BudgetAlert> {
        let alert = BudgetAlert {
            id: take(&mut self.ids.alert),
            user_id: new.user_id,
            budget_id: new.budget_id,
            category: new.category,
            threshold: new.threshold,
            status: new.status,
            message: new.message,
            created_at: new.created_at,
            read: false,
        };
        self.alerts.insert(alert.id, alert.clone());
        Ok(alert)
    }

    fn list_alerts(&self, user_id: i64) -> Result<Vec<BudgetAlert>> {
        Ok(self
            .alerts
            .values()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    fn mark_alert_read(&mut self, id: i64) -> Result<Option<BudgetAlert>> {
        Ok(self.alerts.get_mut(&id).map(|a| {
            a.read = true;
            a.clone()
        }))
    }

    fn mark_all_alerts_read(&mut self, user_id: i64) -> Result<usize> {
        let mut changed = 0;
        for a in self.alerts.values_mut().filter(|a| a.user_id == user_id && !a.read) {
            a.read = true;
            changed += 1;
        }
        Ok(changed)
    }

    fn clear_alerts(&mut self, user_id: i64) -> Result<usize> {
        let before = self.alerts.len();
        self.alerts.retain(|_, a| a.user_id != user_id);
        Ok(before - self.alerts.len())
    }

    fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            users: self.users.len() as i64,
            transactions: self.transactions.len() as i64,
            budgets: self.budgets.len() as i64,
            goals: self.goals.len() as i64,
            alerts: self.alerts.len() as i64,
        })
    }
}
