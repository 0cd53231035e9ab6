//! Budget limit checker
//!
//! Compares this calendar month's expense spend per category against the
//! owner's configured limits. "This month" is derived from the `now` argument
//! so results are reproducible for any clock value.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, Months, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregation::{category_spending, percentage};
use crate::models::{Category, CategoryLimit, Transaction};

/// Percentage of a limit at which a warning is raised
pub const WARNING_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// A category whose monthly spend has reached its limit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitWarning {
    pub category: Category,
    pub spent: Decimal,
    pub limit: Decimal,
    /// `spent / limit * 100`, full precision
    pub percentage: Decimal,
}

/// Spend against one configured limit, warning or not
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitStatus {
    pub category: Category,
    pub spent: Decimal,
    pub limit: Decimal,
    pub percentage: Decimal,
    pub exceeded: bool,
}

/// Result of a limit check
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LimitCheck {
    /// Expense spend per category within the current month
    pub month_spending: BTreeMap<Category, Decimal>,
    /// One entry per configured limit, in category order
    pub statuses: Vec<LimitStatus>,
    /// Highest percentage first
    pub warnings: Vec<LimitWarning>,
}

/// `[start of now's month, start of the following month)` in UTC
pub fn month_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = now.date_naive() - Days::new(u64::from(now.day0()));
    let next = first + Months::new(1);
    (
        first.and_time(NaiveTime::MIN).and_utc(),
        next.and_time(NaiveTime::MIN).and_utc(),
    )
}

/// Check the current month's spending against `limits`
pub fn check_limits(
    transactions: &[Transaction],
    limits: &[CategoryLimit],
    now: DateTime<Utc>,
) -> LimitCheck {
    let (start, end) = month_window(now);
    let month_spending = category_spending(
        transactions
            .iter()
            .filter(|t| t.occurred_at >= start && t.occurred_at < end),
    );

    let mut statuses: Vec<LimitStatus> = limits
        .iter()
        .map(|l| {
            let spent = month_spending
                .get(&l.category)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let pct = percentage(spent, l.limit);
            LimitStatus {
                category: l.category,
                spent,
                limit: l.limit,
                percentage: pct,
                exceeded: !spent.is_zero() && pct >= WARNING_THRESHOLD,
            }
        })
        .collect();
    statuses.sort_by_key(|s| s.category);

    let mut warnings: Vec<LimitWarning> = statuses
        .iter()
        .filter(|s| s.exceeded)
        .map(|s| LimitWarning {
            category: s.category,
            spent: s.spent,
            limit: s.limit,
            percentage: s.percentage,
        })
        .collect();
    warnings.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then(a.category.cmp(&b.category))
    });

    LimitCheck {
        month_spending,
        statuses,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mood, TransactionKind, MAX_AMOUNT};
    use crate::test_fixtures::{at, expense, limit, tx};
    use rust_decimal_macros::dec;

    fn june() -> DateTime<Utc> {
        at(2024, 6, 20, 15)
    }

    #[test]
    fn test_month_window_bounds() {
        let (start, end) = month_window(june());
        assert_eq!(start, at(2024, 6, 1, 0));
        assert_eq!(end, at(2024, 7, 1, 0));

        let (start, end) = month_window(at(2023, 12, 31, 23));
        assert_eq!(start, at(2023, 12, 1, 0));
        assert_eq!(end, at(2024, 1, 1, 0));
    }

    #[test]
    fn test_scenario_b_single_warning() {
        let ledger = vec![
            expense(1, dec!(1200), Category::FoodAndDining, Mood::Happy),
            expense(2, dec!(300), Category::FoodAndDining, Mood::Stressed),
        ];
        let check = check_limits(
            &ledger,
            &[limit(Category::FoodAndDining, dec!(1000))],
            june(),
        );

        assert_eq!(
            check.warnings,
            vec![LimitWarning {
                category: Category::FoodAndDining,
                spent: dec!(1500),
                limit: dec!(1000),
                percentage: dec!(150.0),
            }]
        );
    }

    #[test]
    fn test_exactly_at_limit_warns() {
        let ledger = vec![expense(1, dec!(500), Category::Travel, Mood::Unset)];
        let check = check_limits(&ledger, &[limit(Category::Travel, dec!(500))], june());
        assert_eq!(check.warnings.len(), 1);
        assert_eq!(check.warnings[0].percentage, dec!(100));
    }

    #[test]
    fn test_below_limit_and_unlimited_categories_do_not_warn() {
        let ledger = vec![
            expense(1, dec!(99.99), Category::Travel, Mood::Unset),
            expense(2, dec!(5000), Category::Shopping, Mood::Unset),
        ];
        let check = check_limits(&ledger, &[limit(Category::Travel, dec!(100))], june());

        assert!(check.warnings.is_empty());
        assert_eq!(check.statuses.len(), 1);
        assert!(!check.statuses[0].exceeded);
        assert_eq!(check.month_spending[&Category::Shopping], dec!(5000));
    }

    #[test]
    fn test_only_current_month_counts() {
        let ledger = vec![
            tx(1, TransactionKind::Expense, dec!(900), Category::Travel, Mood::Unset, at(2024, 5, 31, 23)),
            tx(2, TransactionKind::Expense, dec!(200), Category::Travel, Mood::Unset, at(2024, 6, 1, 0)),
            tx(3, TransactionKind::Expense, dec!(900), Category::Travel, Mood::Unset, at(2024, 7, 1, 0)),
        ];
        let check = check_limits(&ledger, &[limit(Category::Travel, dec!(1000))], june());

        assert_eq!(check.month_spending[&Category::Travel], dec!(200));
        assert!(check.warnings.is_empty());
    }

    #[test]
    fn test_income_is_not_spend() {
        let ledger = vec![tx(
            1,
            TransactionKind::Income,
            dec!(5000),
            Category::Salary,
            Mood::Unset,
            june(),
        )];
        let check = check_limits(&ledger, &[limit(Category::Salary, dec!(10))], june());
        assert!(check.warnings.is_empty());
        assert!(check.month_spending.is_empty());
    }

    #[test]
    fn test_warnings_sorted_by_percentage_then_category() {
        let ledger = vec![
            expense(1, dec!(300), Category::Travel, Mood::Unset),
            expense(2, dec!(200), Category::Shopping, Mood::Unset),
            expense(3, dec!(400), Category::Education, Mood::Unset),
        ];
        let limits = vec![
            limit(Category::Travel, dec!(100)),
            limit(Category::Shopping, dec!(100)),
            limit(Category::Education, dec!(200)),
        ];
        let check = check_limits(&ledger, &limits, june());

        let order: Vec<Category> = check.warnings.iter().map(|w| w.category).collect();
        // Travel 300%, then Shopping and Education tie at 200%
        assert_eq!(
            order,
            vec![Category::Travel, Category::Shopping, Category::Education]
        );
    }

    #[test]
    fn test_empty_limit_set_gives_no_warnings() {
        let ledger = vec![expense(1, dec!(10000), Category::Travel, Mood::Unset)];
        let check = check_limits(&ledger, &[], june());
        assert!(check.warnings.is_empty());
        assert!(check.statuses.is_empty());
    }

    #[test]
    fn test_monotone_warnings() {
        let limits = vec![limit(Category::Shopping, dec!(250))];
        let mut ledger = Vec::new();
        let mut warned = false;

        for id in 1..=10 {
            ledger.push(expense(id, dec!(40), Category::Shopping, Mood::Unset));
            let check = check_limits(&ledger, &limits, june());
            let has_warning = check
                .warnings
                .iter()
                .any(|w| w.category == Category::Shopping);

            if warned {
                assert!(has_warning, "warning disappeared after {} expenses", id);
            }
            let spent = dec!(40) * Decimal::from(id);
            assert_eq!(has_warning, spent >= dec!(250));
            warned = has_warning;
        }
        assert!(warned);
    }

    #[test]
    fn test_smallest_limit_against_largest_spend() {
        let ledger: Vec<Transaction> = (1..=100)
            .map(|id| expense(id, MAX_AMOUNT, Category::Shopping, Mood::Unset))
            .collect();
        let limits = vec![limit(Category::Shopping, dec!(0.0001))];

        let check = check_limits(&ledger, &limits, june());
        assert_eq!(check.warnings.len(), 1);
        assert!(check.warnings[0].percentage > dec!(100));
    }
}
