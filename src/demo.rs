//! Sample account used by `fintrack demo` and the in-memory server.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::Result;
use crate::models::{Category, NewBudget, NewGoal, NewTransaction, NewUser, TransactionType};
use crate::service;
use crate::store::Store;

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo123";

/// Months of history generated, including the current one.
const MONTHS: u32 = 6;

struct DemoTxn {
    day: u32,
    kind: TransactionType,
    category: Category,
    description: &'static str,
    amount: f64,
}

const fn expense(day: u32, category: Category, description: &'static str, amount: f64) -> DemoTxn {
    DemoTxn { day, kind: TransactionType::Expense, category, description, amount }
}

/// Entries repeated every month.
const RECURRING: &[DemoTxn] = &[
    DemoTxn {
        day: 1,
        kind: TransactionType::Income,
        category: Category::Income,
        description: "Salary",
        amount: 2250.00,
    },
    DemoTxn {
        day: 15,
        kind: TransactionType::Income,
        category: Category::Income,
        description: "Salary",
        amount: 2250.00,
    },
    expense(2, Category::Housing, "Rent", 1250.00),
    expense(3, Category::FoodDining, "Grocery Store", 120.45),
    expense(12, Category::FoodDining, "Restaurant", 65.40),
    expense(6, Category::Transportation, "Gas Station", 48.20),
    expense(18, Category::Entertainment, "Streaming Services", 22.98),
];

/// One-off expenses; each month picks a subset by index.
const ROTATING: &[DemoTxn] = &[
    expense(8, Category::Shopping, "Online Shopping", 128.75),
    expense(20, Category::FoodDining, "Coffee Shop", 18.60),
    expense(22, Category::Healthcare, "Pharmacy", 34.10),
    expense(9, Category::Transportation, "Train Pass", 95.00),
    expense(25, Category::Shopping, "Department Store", 212.30),
    expense(14, Category::Entertainment, "Concert Tickets", 85.00),
    expense(27, Category::FoodDining, "Takeout", 42.80),
];

/// Utility bills per month, oldest first.
const UTILITIES: [f64; MONTHS as usize] = [142.30, 151.85, 138.40, 160.10, 155.00, 131.25];

const BUDGETS: &[(Category, f64)] = &[
    (Category::FoodDining, 500.0),
    (Category::Housing, 1300.0),
    (Category::Transportation, 350.0),
    (Category::Shopping, 300.0),
];

/// Clamp a day to the last valid day of the given year/month.
fn clamp_day(year: i32, month: u32, day: u32) -> u32 {
    let last_day = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28);
    day.min(last_day)
}

/// Date for `day` in the month of `month_start`. Days in the current month
/// never land after `today`.
fn make_date(month_start: NaiveDate, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let mut d = clamp_day(month_start.year(), month_start.month(), day);
    if month_start.year() == today.year() && month_start.month() == today.month() {
        d = d.min(today.day());
    }
    NaiveDate::from_ymd_opt(month_start.year(), month_start.month(), d)
}

fn generate_transactions(user_id: i64, today: NaiveDate) -> Vec<NewTransaction> {
    let first_of_month = today.with_day(1).unwrap_or(today);
    let mut txns = Vec::new();

    for i in 0..MONTHS {
        // i = 0 is the oldest month, i = MONTHS - 1 the current one
        let Some(month_start) = first_of_month.checked_sub_months(Months::new(MONTHS - 1 - i)) else {
            continue;
        };
        let idx = i as usize;

        let picks = (0..2).map(|j| &ROTATING[(idx * 2 + j) % ROTATING.len()]);
        for t in RECURRING.iter().chain(picks) {
            if let Some(date) = make_date(month_start, t.day, today) {
                txns.push(NewTransaction {
                    user_id,
                    kind: t.kind,
                    amount: t.amount,
                    category: t.category,
                    description: t.description.to_string(),
                    date,
                });
            }
        }

        if let Some(date) = make_date(month_start, 10, today) {
            txns.push(NewTransaction {
                user_id,
                kind: TransactionType::Expense,
                amount: UTILITIES[idx],
                category: Category::Utilities,
                description: "Electric & Water".to_string(),
                date,
            });
        }
    }

    txns
}

fn demo_goals(user_id: i64, today: NaiveDate) -> Vec<NewGoal> {
    let in_months = |n: u32| today.checked_add_months(Months::new(n)).unwrap_or(today);
    vec![
        NewGoal {
            user_id,
            name: "Emergency Fund".to_string(),
            target_amount: 10000.0,
            current_amount: 3500.0,
            deadline: in_months(12),
            category: "Savings".to_string(),
            note: "Six months of expenses".to_string(),
        },
        NewGoal {
            user_id,
            name: "Summer Vacation".to_string(),
            target_amount: 3000.0,
            current_amount: 1200.0,
            deadline: in_months(5),
            category: "Travel".to_string(),
            note: String::new(),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub user_id: i64,
    pub transactions: usize,
    pub budgets: usize,
    pub goals: usize,
}

/// Create the demo user with budgets, goals and several months of history.
/// Returns `None` when the demo user already exists.
pub fn seed(store: &mut dyn Store, today: NaiveDate) -> Result<Option<SeedSummary>> {
    if store.find_user_by_username(DEMO_USERNAME)?.is_some() {
        return Ok(None);
    }

    let user = service::register(
        store,
        NewUser {
            username: DEMO_USERNAME.to_string(),
            password: DEMO_PASSWORD.to_string(),
        },
    )?;

    for (category, amount) in BUDGETS {
        service::add_budget(
            store,
            NewBudget { user_id: user.id, category: *category, amount: *amount },
            today,
        )?;
    }

    let txns = generate_transactions(user.id, today);
    let txn_count = txns.len();
    for txn in txns {
        service::add_transaction(store, txn, today)?;
    }

    let goals = demo_goals(user.id, today);
    let goal_count = goals.len();
    for goal in goals {
        service::add_goal(store, goal)?;
    }

    Ok(Some(SeedSummary {
        user_id: user.id,
        transactions: txn_count,
        budgets: BUDGETS.len(),
        goals: goal_count,
    }))
}
