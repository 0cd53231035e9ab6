//! Shared builders for unit tests

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::{Category, CategoryLimit, Goal, Mood, Transaction, TransactionKind};

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Build a transaction; ids are assigned by the caller to control insertion order
pub fn tx(
    id: i64,
    kind: TransactionKind,
    amount: Decimal,
    category: Category,
    mood: Mood,
    occurred_at: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id,
        owner: "alice".into(),
        amount,
        category,
        description: format!("{} #{}", category, id),
        kind,
        mood,
        occurred_at,
        created_at: occurred_at,
    }
}

pub fn expense(id: i64, amount: Decimal, category: Category, mood: Mood) -> Transaction {
    tx(
        id,
        TransactionKind::Expense,
        amount,
        category,
        mood,
        at(2024, 6, 10, 12),
    )
}

pub fn income(id: i64, amount: Decimal) -> Transaction {
    tx(
        id,
        TransactionKind::Income,
        amount,
        Category::Salary,
        Mood::Unset,
        at(2024, 6, 1, 9),
    )
}

pub fn limit(category: Category, limit: Decimal) -> CategoryLimit {
    CategoryLimit { category, limit }
}

pub fn goal(target: Decimal, current: Decimal, deadline: NaiveDate) -> Goal {
    Goal {
        id: 1,
        owner: "alice".into(),
        title: "Emergency fund".into(),
        target_amount: target,
        current_amount: current,
        deadline,
        created_at: at(2024, 1, 1, 0),
    }
}

/// Scenario A ledger: one salary and two food expenses with moods
pub fn scenario_a() -> Vec<Transaction> {
    use rust_decimal_macros::dec;
    vec![
        income(1, dec!(50000)),
        expense(2, dec!(1200), Category::FoodAndDining, Mood::Happy),
        expense(3, dec!(300), Category::FoodAndDining, Mood::Stressed),
    ]
}
