use chrono::NaiveDate;

use crate::error::{FintrackError, Result};
use crate::models::Goal;

/// Share of the target reached, capped at 100. A zero target reports 0.
pub fn progress_percent(goal: &Goal) -> f64 {
    if goal.target_amount <= 0.0 {
        return 0.0;
    }
    (goal.current_amount / goal.target_amount * 100.0).min(100.0)
}

pub fn is_overdue(goal: &Goal, today: NaiveDate) -> bool {
    !goal.is_completed && today > goal.deadline
}

/// Set the saved amount, completing the goal once it reaches the target.
pub fn apply_progress(goal: &mut Goal, current_amount: f64) -> Result<()> {
    if !current_amount.is_finite() || current_amount < 0.0 {
        return Err(FintrackError::validation("Current amount cannot be negative"));
    }
    goal.current_amount = current_amount;
    if goal.current_amount >= goal.target_amount {
        goal.is_completed = true;
    }
    Ok(())
}
