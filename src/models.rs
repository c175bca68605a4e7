use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{FintrackError, Result};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Spending/income category shared by transactions and budgets.
///
/// Serialized as its display label ("Food & Dining"). Parsing is
/// case-insensitive and also accepts the kebab/snake key (`food-dining`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    FoodDining,
    Housing,
    Transportation,
    Shopping,
    Utilities,
    Entertainment,
    Healthcare,
    Income,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::FoodDining,
        Category::Housing,
        Category::Transportation,
        Category::Shopping,
        Category::Utilities,
        Category::Entertainment,
        Category::Healthcare,
        Category::Income,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::FoodDining => "Food & Dining",
            Category::Housing => "Housing",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Income => "Income",
            Category::Other => "Other",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Category::FoodDining => "food-dining",
            Category::Housing => "housing",
            Category::Transportation => "transportation",
            Category::Shopping => "shopping",
            Category::Utilities => "utilities",
            Category::Entertainment => "entertainment",
            Category::Healthcare => "healthcare",
            Category::Income => "income",
            Category::Other => "other",
        }
    }

    /// Categories a monthly spending cap can be set on.
    pub fn is_budgetable(self) -> bool {
        self != Category::Income
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = FintrackError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        let normalized = wanted.to_lowercase().replace('_', "-");
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted) || c.key() == normalized)
            .ok_or_else(|| FintrackError::UnknownCategory(wanted.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = FintrackError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.label().to_string()
    }
}

// ---------------------------------------------------------------------------
// Transaction type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FintrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(FintrackError::validation(
                "Type must be either 'income' or 'expense'",
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Strict calendar date (`YYYY-MM-DD`) for transaction dates and goal deadlines.
pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        FintrackError::validation(format!("{field} must be a date in YYYY-MM-DD format, got '{}'", raw.trim()))
    })
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(FintrackError::validation("username is required"));
        }
        if self.password.is_empty() {
            return Err(FintrackError::validation("password is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Signed contribution to a running balance.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i64,
    pub kind: TransactionType,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(FintrackError::validation("amount must be greater than zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: Category,
    pub amount: f64,
    #[serde(default)]
    pub spent: Option<f64>,
}

impl Budget {
    /// Stored or derived spend; absent means nothing spent yet.
    pub fn spent(&self) -> f64 {
        self.spent.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub user_id: i64,
    pub category: Category,
    pub amount: f64,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        if !self.category.is_budgetable() {
            return Err(FintrackError::validation(format!(
                "{} cannot have a spending budget",
                self.category
            )));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(FintrackError::validation(
                "Please enter a valid amount greater than zero",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub note: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub user_id: i64,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: NaiveDate,
    pub category: String,
    pub note: String,
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().chars().count() < 2 {
            return Err(FintrackError::validation(
                "Goal name must be at least 2 characters",
            ));
        }
        if !self.target_amount.is_finite() || self.target_amount <= 0.0 {
            return Err(FintrackError::validation(
                "Target amount must be greater than 0",
            ));
        }
        if !self.current_amount.is_finite() || self.current_amount < 0.0 {
            return Err(FintrackError::validation("Current amount cannot be negative"));
        }
        if self.category.trim().is_empty() {
            return Err(FintrackError::validation("Category is required"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Info,
    Warning,
    Danger,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::Info => "info",
            AlertStatus::Warning => "warning",
            AlertStatus::Danger => "danger",
        }
    }
}

impl FromStr for AlertStatus {
    type Err = FintrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "info" => Ok(AlertStatus::Info),
            "warning" => Ok(AlertStatus::Warning),
            "danger" => Ok(AlertStatus::Danger),
            other => Err(FintrackError::Other(format!("Unknown alert status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub id: i64,
    pub user_id: i64,
    pub budget_id: i64,
    pub category: Category,
    pub threshold: u32,
    pub status: AlertStatus,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub user_id: i64,
    pub budget_id: i64,
    pub category: Category,
    pub threshold: u32,
    pub status: AlertStatus,
    pub message: String,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_is_strict() {
        assert_eq!(
            parse_date(" 2025-06-01 ", "date").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        for bad in ["06/01/2025", "2025-6-1x", "2025-02-30", ""] {
            let err = parse_date(bad, "deadline").unwrap_err();
            assert!(err.to_string().starts_with("deadline must be a date in YYYY-MM-DD format"));
        }
    }

    #[test]
    fn test_category_parses_labels_and_keys() {
        assert_eq!("Food & Dining".parse::<Category>().unwrap(), Category::FoodDining);
        assert_eq!("food & dining".parse::<Category>().unwrap(), Category::FoodDining);
        assert_eq!("food-dining".parse::<Category>().unwrap(), Category::FoodDining);
        assert_eq!("FOOD_DINING".parse::<Category>().unwrap(), Category::FoodDining);
        assert_eq!(" Housing ".parse::<Category>().unwrap(), Category::Housing);
    }

    #[test]
    fn test_category_rejects_unknown_label() {
        let err = "Groceries".parse::<Category>().unwrap_err();
        assert!(matches!(err, FintrackError::UnknownCategory(ref c) if c == "Groceries"));
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::FoodDining).unwrap();
        assert_eq!(json, "\"Food & Dining\"");
        let back: Category = serde_json::from_str("\"utilities\"").unwrap();
        assert_eq!(back, Category::Utilities);
        assert!(serde_json::from_str::<Category>("\"Groceries\"").is_err());
    }

    #[test]
    fn test_transaction_json_shape() {
        let t = Transaction {
            id: 7,
            user_id: 1,
            kind: TransactionType::Expense,
            amount: 12.5,
            category: Category::Shopping,
            description: "Socks".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
        };
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["type"], "expense");
        assert_eq!(v["userId"], 1);
        assert_eq!(v["category"], "Shopping");
        assert_eq!(v["date"], "2025-03-04");
    }

    #[test]
    fn test_user_password_not_serialized() {
        let u = User { id: 1, username: "demo".into(), password: "demo123".into() };
        let v = serde_json::to_value(&u).unwrap();
        assert!(v.get("password").is_none());
    }

    #[test]
    fn test_budget_null_spent_reads_as_zero() {
        let b: Budget = serde_json::from_str(
            r#"{"id": 1, "userId": 1, "category": "Housing", "amount": 100.0, "spent": null}"#,
        )
        .unwrap();
        assert_eq!(b.spent(), 0.0);
    }

    #[test]
    fn test_new_transaction_rejects_non_positive_amount() {
        let mut t = NewTransaction {
            user_id: 1,
            kind: TransactionType::Expense,
            amount: 0.0,
            category: Category::Other,
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };
        assert!(t.validate().is_err());
        t.amount = f64::NAN;
        assert!(t.validate().is_err());
        t.amount = 3.0;
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_income_category_is_not_budgetable() {
        let b = NewBudget { user_id: 1, category: Category::Income, amount: 100.0 };
        assert!(b.validate().is_err());
    }

    #[test]
    fn test_goal_validation_messages() {
        let goal = NewGoal {
            user_id: 1,
            name: "X".into(),
            target_amount: 100.0,
            current_amount: 0.0,
            deadline: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            category: "Savings".into(),
            note: String::new(),
        };
        let err = goal.validate().unwrap_err();
        assert_eq!(err.to_string(), "Goal name must be at least 2 characters");

        let ok = NewGoal { name: "Trip".into(), ..goal.clone() };
        assert!(ok.validate().is_ok());

        let negative = NewGoal { current_amount: -1.0, ..ok.clone() };
        assert!(negative.validate().is_err());

        let no_target = NewGoal { target_amount: 0.0, ..ok };
        assert!(no_target.validate().is_err());
    }
}
