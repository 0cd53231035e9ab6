//! Aggregation engine
//!
//! Reduces a ledger snapshot to balance, totals, per-category expense sums and
//! a recency window. Every function here is pure: same input, same output.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Category, Transaction, TransactionKind};

/// Number of transactions kept in `Stats::recent_transactions`
pub const RECENT_COUNT: usize = 5;

/// Aggregate figures for one snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`; may be negative
    pub balance: Decimal,
    pub transaction_count: usize,
    /// Expense sum per category; categories without expenses are absent
    pub category_spending: BTreeMap<Category, Decimal>,
    pub recent_transactions: Vec<Transaction>,
}

impl Stats {
    /// Categories by spend, largest first (ties keep category order)
    pub fn top_categories(&self, n: usize) -> Vec<(Category, Decimal)> {
        let mut ranked: Vec<(Category, Decimal)> = self
            .category_spending
            .iter()
            .map(|(c, a)| (*c, *a))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }
}

/// Compute balance, totals, category spending and the recent window
pub fn compute_stats(transactions: &[Transaction]) -> Stats {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;

    for tx in transactions {
        match tx.kind {
            TransactionKind::Income => total_income += tx.amount,
            TransactionKind::Expense => total_expenses += tx.amount,
        }
    }

    Stats {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        transaction_count: transactions.len(),
        category_spending: category_spending(transactions.iter()),
        recent_transactions: recent_window(transactions, RECENT_COUNT),
    }
}

/// Sum expense amounts per category
///
/// Income is ignored. A category only appears once it has spend, so the map
/// never carries zero entries.
pub fn category_spending<'a, I>(transactions: I) -> BTreeMap<Category, Decimal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut spending = BTreeMap::new();
    for tx in transactions.into_iter().filter(|t| t.is_expense()) {
        *spending.entry(tx.category).or_insert(Decimal::ZERO) += tx.amount;
    }
    spending
}

/// The `n` most recent transactions, newest first
///
/// Ties on `occurred_at` go to the later insertion (higher id).
pub fn recent_window(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    sorted.into_iter().take(n).cloned().collect()
}

/// `value / total * 100` at full precision, or zero when `total` is zero
pub fn percentage(value: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    value / total * Decimal::ONE_HUNDRED
}

/// `percentage` rounded to one decimal place for display
pub fn display_percentage(value: Decimal, total: Decimal) -> Decimal {
    percentage(value, total).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// One row of the spending-by-category chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: Decimal,
    /// Share of total expenses
    pub share: Decimal,
    /// Width relative to the largest category (largest = 100)
    pub bar_width: Decimal,
}

/// Category rows sorted by amount, largest first
pub fn category_breakdown(stats: &Stats) -> Vec<CategoryShare> {
    let ranked = stats.top_categories(stats.category_spending.len());
    let max = ranked.first().map(|(_, a)| *a).unwrap_or(Decimal::ZERO);

    ranked
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            share: percentage(amount, stats.total_expenses),
            bar_width: percentage(amount, max),
        })
        .collect()
}

/// Income vs expense split of total money moved
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CashFlowSplit {
    pub income_share: Decimal,
    pub expense_share: Decimal,
}

pub fn cash_flow_split(stats: &Stats) -> CashFlowSplit {
    let moved = stats.total_income + stats.total_expenses;
    CashFlowSplit {
        income_share: percentage(stats.total_income, moved),
        expense_share: percentage(stats.total_expenses, moved),
    }
}
