use std::path::Path;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row, ToSql};

use crate::db::{get_connection, init_db};
use crate::error::{FintrackError, Result};
use crate::models::{
    AlertStatus, Budget, BudgetAlert, Category, Goal, NewAlert, NewBudget, NewGoal, NewTransaction, NewUser,
    Transaction, TransactionType, User,
};
use crate::store::{Store, StoreStats};

// ---------------------------------------------------------------------------
// Column conversions
// ---------------------------------------------------------------------------

fn parse_text<T>(value: ValueRef<'_>) -> FromSqlResult<T>
where
    T: std::str::FromStr<Err = FintrackError>,
{
    value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.label()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_text(value)
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_text(value)
    }
}

impl ToSql for AlertStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AlertStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_text(value)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE)
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

const USER_COLS: &str = "id, username, password";
const TXN_COLS: &str = "id, user_id, type, amount, category, description, date";
const BUDGET_COLS: &str = "id, user_id, category, amount, spent";
const GOAL_COLS: &str =
    "id, user_id, name, target_amount, current_amount, deadline, category, note, is_completed";
const ALERT_COLS: &str = "id, user_id, budget_id, category, threshold, status, message, created_at, is_read";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
    })
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
    })
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        spent: row.get(4)?,
    })
}

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        deadline: row.get(5)?,
        category: row.get(6)?,
        note: row.get(7)?,
        is_completed: row.get(8)?,
    })
}

fn alert_from_row(row: &Row<'_>) -> rusqlite::Result<BudgetAlert> {
    Ok(BudgetAlert {
        id: row.get(0)?,
        user_id: row.get(1)?,
        budget_id: row.get(2)?,
        category: row.get(3)?,
        threshold: row.get(4)?,
        status: row.get(5)?,
        message: row.get(6)?,
        created_at: row.get(7)?,
        read: row.get(8)?,
    })
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// SQLite-backed store; one database file holds every user's data.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and apply the schema.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = get_connection(path)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    fn query_list<T>(
        &self,
        sql: &str,
        id: i64,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([id], map)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn query_one<T>(&self, sql: &str, id: i64, map: fn(&Row<'_>) -> rusqlite::Result<T>) -> Result<Option<T>> {
        Ok(self.conn.query_row(sql, [id], map).optional()?)
    }
}

impl Store for SqliteStore {
    fn create_user(&mut self, new: NewUser) -> Result<User> {
        match self.conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![new.username, new.password],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(FintrackError::UsernameTaken(new.username)),
            Err(e) => return Err(e.into()),
        }
        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: new.username,
            password: new.password,
        })
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.query_one(&format!("SELECT {USER_COLS} FROM users WHERE id = ?1"), id, user_from_row)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {USER_COLS} FROM users WHERE username = ?1"),
                [username],
                user_from_row,
            )
            .optional()?)
    }

    fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction> {
        self.conn.execute(
            "INSERT INTO transactions (user_id, type, amount, category, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![new.user_id, new.kind, new.amount, new.category, new.description, new.date],
        )?;
        Ok(Transaction {
            id: self.conn.last_insert_rowid(),
            user_id: new.user_id,
            kind: new.kind,
            amount: new.amount,
            category: new.category,
            description: new.description,
            date: new.date,
        })
    }

    fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        self.query_list(
            &format!("SELECT {TXN_COLS} FROM transactions WHERE user_id = ?1 ORDER BY id"),
            user_id,
            transaction_from_row,
        )
    }

    fn add_budget(&mut self, new: NewBudget) -> Result<Budget> {
        match self.conn.execute(
            "INSERT INTO budgets (user_id, category, amount, spent) VALUES (?1, ?2, ?3, 0)",
            params![new.user_id, new.category, new.amount],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(FintrackError::DuplicateBudget(new.category.to_string()))
            }
            Err(e) => return Err(e.into()),
        }
        Ok(Budget {
            id: self.conn.last_insert_rowid(),
            user_id: new.user_id,
            category: new.category,
            amount: new.amount,
            spent: Some(0.0),
        })
    }

    fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        self.query_list(
            &format!("SELECT {BUDGET_COLS} FROM budgets WHERE user_id = ?1 ORDER BY id"),
            user_id,
            budget_from_row,
        )
    }

    fn get_budget(&self, id: i64) -> Result<Option<Budget>> {
        self.query_one(&format!("SELECT {BUDGET_COLS} FROM budgets WHERE id = ?1"), id, budget_from_row)
    }

    fn update_budget_spent(&mut self, id: i64, spent: f64) -> Result<Option<Budget>> {
        let changed = self
            .conn
            .execute("UPDATE budgets SET spent = ?1 WHERE id = ?2", params![spent, id])?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_budget(id)
    }

    fn add_goal(&mut self, new: NewGoal) -> Result<Goal> {
        let is_completed = new.current_amount >= new.target_amount;
        self.conn.execute(
            "INSERT INTO goals (user_id, name, target_amount, current_amount, deadline, category, note, is_completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                new.user_id,
                new.name,
                new.target_amount,
                new.current_amount,
                new.deadline,
                new.category,
                new.note,
                is_completed,
            ],
        )?;
        Ok(Goal {
            id: self.conn.last_insert_rowid(),
            user_id: new.user_id,
            name: new.name,
            target_amount: new.target_amount,
            current_amount: new.current_amount,
            deadline: new.deadline,
            category: new.category,
            note: new.note,
            is_completed,
        })
    }

    fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        self.query_list(
            &format!("SELECT {GOAL_COLS} FROM goals WHERE user_id = ?1 ORDER BY id"),
            user_id,
            goal_from_row,
        )
    }

    fn get_goal(&self, id: i64) -> Result<Option<Goal>> {
        self.query_one(&format!("SELECT {GOAL_COLS} FROM goals WHERE id = ?1"), id, goal_from_row)
    }

    fn save_goal(&mut self, goal: &Goal) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE goals SET name = ?1, target_amount = ?2, current_amount = ?3, deadline = ?4,
                 category = ?5, note = ?6, is_completed = ?7
             WHERE id = ?8",
            params![
                goal.name,
                goal.target_amount,
                goal.current_amount,
                goal.deadline,
                goal.category,
                goal.note,
                goal.is_completed,
                goal.id,
            ],
        )?;
        if changed == 0 {
            return Err(FintrackError::not_found("Goal", goal.id));
        }
        Ok(())
    }

    fn delete_goal(&mut self, id: i64) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM goals WHERE id = ?1", [id])? > 0)
    }

    fn record_alert(&mut self, new: NewAlert) -> Result<BudgetAlert> {
        self.conn.execute(
            "INSERT INTO alerts (user_id, budget_id, category, threshold, status, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.user_id,
                new.budget_id,
                new.category,
                new.threshold,
                new.status,
                new.message,
                new.created_at,
            ],
        )?;
        Ok(BudgetAlert {
            id: self.conn.last_insert_rowid(),
            user_id: new.user_id,
            budget_id: new.budget_id,
            category: new.category,
            threshold: new.threshold,
            status: new.status,
            message: new.message,
            created_at: new.created_at,
            read: false,
        })
    }

    fn list_alerts(&self, user_id: i64) -> Result<Vec<BudgetAlert>> {
        self.query_list(
            &format!("SELECT {ALERT_COLS} FROM alerts WHERE user_id = ?1 ORDER BY id DESC"),
            user_id,
            alert_from_row,
        )
    }

    fn mark_alert_read(&mut self, id: i64) -> Result<Option<BudgetAlert>> {
        let changed = self.conn.execute("UPDATE alerts SET is_read = 1 WHERE id = ?1", [id])?;
        if changed == 0 {
            return Ok(None);
        }
        self.query_one(&format!("SELECT {ALERT_COLS} FROM alerts WHERE id = ?1"), id, alert_from_row)
    }

    fn mark_all_alerts_read(&mut self, user_id: i64) -> Result<usize> {
        Ok(self.conn.execute(
            "UPDATE alerts SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
            [user_id],
        )?)
    }

    fn clear_alerts(&mut self, user_id: i64) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM alerts WHERE user_id = ?1", [user_id])?)
    }

    fn stats(&self) -> Result<StoreStats> {
        let count = |table: &str| -> Result<i64> {
            Ok(self
                .conn
                .query_row(&format!("SELECT count(*) FROM {table}"), [], |r| r.get(0))?)
        };
        Ok(StoreStats {
            users: count("users")?,
            transactions: count("transactions")?,
            budgets: count("budgets")?,
            goals: count("goals")?,
            alerts: count("alerts")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    fn test_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_users_roundtrip() {
        let (_dir, mut store) = test_store();
        contract::users_roundtrip(&mut store);
    }

    #[test]
    fn test_transactions_are_user_scoped() {
        let (_dir, mut store) = test_store();
        contract::transactions_are_user_scoped(&mut store);
    }

    #[test]
    fn test_budget_category_unique_per_user() {
        let (_dir, mut store) = test_store();
        contract::budget_category_unique_per_user(&mut store);
    }

    #[test]
    fn test_budget_spent_updates() {
        let (_dir, mut store) = test_store();
        contract::budget_spent_updates(&mut store);
    }

    #[test]
    fn test_goals_crud() {
        let (_dir, mut store) = test_store();
        contract::goals_crud(&mut store);
    }

    #[test]
    fn test_alert_log() {
        let (_dir, mut store) = test_store();
        contract::alert_log(&mut store);
    }

    #[test]
    fn test_stats_count_everything() {
        let (_dir, mut store) = test_store();
        contract::stats_count_everything(&mut store);
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fintrack.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store
                .create_user(NewUser { username: "demo".into(), password: "demo123".into() })
                .unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert!(store.find_user_by_username("demo").unwrap().is_some());
    }

    #[test]
    fn test_category_stored_as_label() {
        let (_dir, mut store) = test_store();
        let u = store
            .create_user(NewUser { username: "a".into(), password: "x".into() })
            .unwrap();
        store
            .add_budget(NewBudget { user_id: u.id, category: Category::FoodDining, amount: 5.0 })
            .unwrap();
        let raw: String = store
            .conn
            .query_row("SELECT category FROM budgets", [], |r| r.get(0))
            .unwrap();
        assert_eq!(raw, "Food & Dining");
    }
}
