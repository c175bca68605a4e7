//! Request and response bodies for the REST API.
//!
//! Request fields are optional at the serde level so a missing field turns
//! into a readable 400 instead of an extractor rejection.

use serde::{Deserialize, Serialize};

use crate::error::{FintrackError, Result};
use crate::fmt::change_label;
use crate::insights::Insight;
use crate::models::{
    parse_date, Budget, BudgetAlert, Category, Goal, NewBudget, NewGoal, NewTransaction, NewUser, Transaction,
    TransactionType, User,
};
use crate::reports::TimeFrame;
use crate::summary::Summary;

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| FintrackError::validation(format!("{field} is required")))
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<i64>,
}

impl UserQuery {
    pub fn user_id(&self) -> Result<i64> {
        required(self.user_id, "userId")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub user_id: Option<i64>,
    pub timeframe: Option<String>,
}

impl ReportQuery {
    pub fn user_id(&self) -> Result<i64> {
        required(self.user_id, "userId")
    }

    pub fn time_frame(&self) -> Result<TimeFrame> {
        match self.timeframe.as_deref() {
            None | Some("") => Ok(TimeFrame::default()),
            Some(raw) => raw.parse(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsReq {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<CredentialsReq> for NewUser {
    type Error = FintrackError;

    fn try_from(req: CredentialsReq) -> Result<Self> {
        Ok(NewUser {
            username: required(req.username, "username")?,
            password: required(req.password, "password")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionReq {
    pub user_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

impl CreateTransactionReq {
    /// Body `userId` wins over the query string.
    pub fn into_new(self, query_user: Option<i64>) -> Result<NewTransaction> {
        let user_id = required(self.user_id.or(query_user), "userId")?;
        let kind: TransactionType = required(self.kind, "type")?.parse()?;
        let amount = required(self.amount, "amount")?;
        let category: Category = required(self.category, "category")?.parse()?;
        let date = parse_date(&required(self.date, "date")?, "date")?;
        Ok(NewTransaction {
            user_id,
            kind,
            amount,
            category,
            description: self.description.unwrap_or_default(),
            date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetReq {
    pub user_id: Option<i64>,
    pub category: Option<String>,
    pub amount: Option<f64>,
}

impl CreateBudgetReq {
    pub fn into_new(self, query_user: Option<i64>) -> Result<NewBudget> {
        Ok(NewBudget {
            user_id: required(self.user_id.or(query_user), "userId")?,
            category: required(self.category, "category")?.parse()?,
            amount: required(self.amount, "amount")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SpentReq {
    pub spent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalReq {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub deadline: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
}

impl CreateGoalReq {
    pub fn into_new(self, query_user: Option<i64>) -> Result<NewGoal> {
        Ok(NewGoal {
            user_id: required(self.user_id.or(query_user), "userId")?,
            name: required(self.name, "name")?,
            target_amount: required(self.target_amount, "targetAmount")?,
            current_amount: self.current_amount.unwrap_or(0.0),
            deadline: parse_date(&required(self.deadline, "deadline")?, "deadline")?,
            category: required(self.category, "category")?,
            note: self.note.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressReq {
    pub user_id: Option<i64>,
    pub current_amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCompleteReq {
    pub user_id: Option<i64>,
    pub is_completed: Option<bool>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
pub struct BudgetList {
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Serialize)]
pub struct GoalList {
    pub goals: Vec<Goal>,
}

#[derive(Debug, Serialize)]
pub struct InsightList {
    pub insights: Vec<Insight>,
}

#[derive(Debug, Serialize)]
pub struct AlertList {
    pub alerts: Vec<BudgetAlert>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

/// Summary numbers plus the display labels for each change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: Summary,
    pub balance_change_label: String,
    pub income_change_label: String,
    pub expense_change_label: String,
}

impl From<Summary> for SummaryResponse {
    fn from(summary: Summary) -> Self {
        Self {
            balance_change_label: change_label(summary.balance_change),
            income_change_label: change_label(summary.income_change),
            expense_change_label: change_label(summary.expense_change),
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_request_requires_fields() {
        let req: CreateTransactionReq =
            serde_json::from_str(r#"{"userId": 1, "type": "expense", "category": "Housing", "date": "2025-06-01"}"#)
                .unwrap();
        let err = req.into_new(None).unwrap_err();
        assert_eq!(err.to_string(), "amount is required");
    }

    #[test]
    fn test_transaction_request_uses_query_user() {
        let req: CreateTransactionReq = serde_json::from_str(
            r#"{"type": "income", "amount": 10, "category": "Income", "date": "2025-06-01"}"#,
        )
        .unwrap();
        let new = req.into_new(Some(7)).unwrap();
        assert_eq!(new.user_id, 7);
        assert_eq!(new.kind, TransactionType::Income);
        assert!(new.description.is_empty());
    }

    #[test]
    fn test_transaction_request_rejects_bad_values() {
        let bad_type: CreateTransactionReq = serde_json::from_str(
            r#"{"userId": 1, "type": "refund", "amount": 10, "category": "Income", "date": "2025-06-01"}"#,
        )
        .unwrap();
        assert_eq!(
            bad_type.into_new(None).unwrap_err().to_string(),
            "Type must be either 'income' or 'expense'"
        );

        let bad_date: CreateTransactionReq = serde_json::from_str(
            r#"{"userId": 1, "type": "expense", "amount": 10, "category": "Other", "date": "06/01/2025"}"#,
        )
        .unwrap();
        assert!(matches!(bad_date.into_new(None), Err(FintrackError::Validation(_))));

        let bad_category: CreateTransactionReq = serde_json::from_str(
            r#"{"userId": 1, "type": "expense", "amount": 10, "category": "Groceries", "date": "2025-06-01"}"#,
        )
        .unwrap();
        assert!(matches!(bad_category.into_new(None), Err(FintrackError::UnknownCategory(_))));
    }

    #[test]
    fn test_goal_request_defaults_current_amount() {
        let req: CreateGoalReq = serde_json::from_str(
            r#"{"userId": 1, "name": "Car", "targetAmount": 5000, "deadline": "2026-01-01", "category": "Vehicle"}"#,
        )
        .unwrap();
        let new = req.into_new(None).unwrap();
        assert_eq!(new.current_amount, 0.0);
        assert!(new.note.is_empty());
    }

    #[test]
    fn test_report_query_default_frame() {
        let q = ReportQuery { user_id: Some(1), timeframe: None };
        assert_eq!(q.time_frame().unwrap(), TimeFrame::Month);
        let q = ReportQuery { user_id: Some(1), timeframe: Some("decade".into()) };
        assert!(q.time_frame().is_err());
    }

    #[test]
    fn test_summary_response_labels() {
        let summary = Summary {
            total_balance: 0.0,
            monthly_income: 50.0,
            monthly_expenses: 0.0,
            previous_income: 0.0,
            previous_expenses: 0.0,
            balance_change: 100.0,
            income_change: 100.0,
            expense_change: 0.0,
        };
        let v = serde_json::to_value(SummaryResponse::from(summary)).unwrap();
        assert_eq!(v["incomeChange"], 100.0);
        assert_eq!(v["incomeChangeLabel"], "100.0%");
        assert_eq!(v["expenseChangeLabel"], "0.0%");
    }
}
