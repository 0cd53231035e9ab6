//! Goal progress tracker

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregation::percentage;
use crate::models::Goal;

/// Goals with fewer days left than this are flagged as urgent
pub const URGENT_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Derived progress figures for one goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalView {
    /// `completion_ratio` clamped to 100 for display
    pub progress: Decimal,
    /// `current / target * 100`, unclamped
    pub completion_ratio: Decimal,
    /// Whole days until the start of the deadline date, rounded up
    pub days_remaining: i64,
    pub overdue: bool,
    pub urgent: bool,
    pub remaining_amount: Decimal,
    /// Amount to save per day to finish on time; absent once overdue or done
    pub daily_savings_needed: Option<Decimal>,
}

/// A goal together with its derived view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalWithView {
    #[serde(flatten)]
    pub goal: Goal,
    #[serde(flatten)]
    pub view: GoalView,
}

/// The instant a goal's deadline passes: midnight UTC at the start of the deadline date
pub fn deadline_instant(goal: &Goal) -> DateTime<Utc> {
    goal.deadline.and_time(NaiveTime::MIN).and_utc()
}

/// Days from `now` to the deadline instant, rounded up
///
/// Any part of a day left counts as a whole day; once the instant has passed
/// the result is zero or negative.
pub fn days_remaining(goal: &Goal, now: DateTime<Utc>) -> i64 {
    let millis = (deadline_instant(goal) - now).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}

pub fn goal_view(goal: &Goal, now: DateTime<Utc>) -> GoalView {
    let completion_ratio = percentage(goal.current_amount, goal.target_amount);
    let days = days_remaining(goal, now);
    let overdue = days <= 0;
    let remaining_amount = (goal.target_amount - goal.current_amount).max(Decimal::ZERO);

    let daily_savings_needed = if !overdue && remaining_amount > Decimal::ZERO {
        Some(remaining_amount / Decimal::from(days))
    } else {
        None
    };

    GoalView {
        progress: completion_ratio.min(Decimal::ONE_HUNDRED),
        completion_ratio,
        days_remaining: days,
        overdue,
        urgent: days < URGENT_DAYS,
        remaining_amount,
        daily_savings_needed,
    }
}

/// Attach views to goals, keeping their order
pub fn goal_views(goals: &[Goal], now: DateTime<Utc>) -> Vec<GoalWithView> {
    goals
        .iter()
        .map(|g| GoalWithView {
            goal: g.clone(),
            view: goal_view(g, now),
        })
        .collect()
}
