//! Mood-spending correlation

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregation::percentage;
use crate::models::{Mood, Transaction};

/// Expense sum per named mood
///
/// Transactions without a mood tag are skipped, not counted as neutral.
pub fn mood_spending(transactions: &[Transaction]) -> BTreeMap<Mood, Decimal> {
    let mut spending = BTreeMap::new();
    for tx in transactions
        .iter()
        .filter(|t| t.is_expense() && t.mood.is_set())
    {
        *spending.entry(tx.mood).or_insert(Decimal::ZERO) += tx.amount;
    }
    spending
}

/// One bar of the mood chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodBar {
    pub mood: Mood,
    pub amount: Decimal,
    /// Relative to the largest mood bucket (largest = 100)
    pub percent_of_max: Decimal,
}

pub fn mood_bars(spending: &BTreeMap<Mood, Decimal>) -> Vec<MoodBar> {
    let Some(max) = spending.values().max().copied() else {
        return Vec::new();
    };
    spending
        .iter()
        .map(|(mood, amount)| MoodBar {
            mood: *mood,
            amount: *amount,
            percent_of_max: percentage(*amount, max),
        })
        .collect()
}

/// Mood breakdown of a ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoodAnalysis {
    pub mood_spending: BTreeMap<Mood, Decimal>,
    pub bars: Vec<MoodBar>,
    /// Expense total carrying no mood tag
    pub untagged_spending: Decimal,
}

pub fn analyze(transactions: &[Transaction]) -> MoodAnalysis {
    let mood_spending = mood_spending(transactions);
    let bars = mood_bars(&mood_spending);
    let untagged_spending = transactions
        .iter()
        .filter(|t| t.is_expense() && !t.mood.is_set())
        .map(|t| t.amount)
        .sum();

    MoodAnalysis {
        mood_spending,
        bars,
        untagged_spending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::test_fixtures::{expense, income, scenario_a};
    use rust_decimal_macros::dec;

    #[test]
    fn test_scenario_a_mood_map() {
        let map = mood_spending(&scenario_a());

        assert_eq!(map.len(), 2);
        assert_eq!(map[&Mood::Happy], dec!(1200));
        assert_eq!(map[&Mood::Stressed], dec!(300));
    }

    #[test]
    fn test_unset_mood_is_excluded_not_neutral() {
        let ledger = vec![
            expense(1, dec!(50), Category::Shopping, Mood::Unset),
            expense(2, dec!(20), Category::Shopping, Mood::Neutral),
        ];
        let analysis = analyze(&ledger);

        assert_eq!(analysis.mood_spending.len(), 1);
        assert_eq!(analysis.mood_spending[&Mood::Neutral], dec!(20));
        assert!(!analysis.mood_spending.contains_key(&Mood::Unset));
        assert_eq!(analysis.untagged_spending, dec!(50));
    }

    #[test]
    fn test_income_moods_ignored() {
        let mut salary = income(1, dec!(3000));
        salary.mood = Mood::Happy;
        assert!(mood_spending(&[salary]).is_empty());
    }

    #[test]
    fn test_bars_relative_to_max() {
        let bars = mood_bars(&mood_spending(&scenario_a()));

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].mood, Mood::Happy);
        assert_eq!(bars[0].percent_of_max, dec!(100));
        assert_eq!(bars[1].mood, Mood::Stressed);
        assert_eq!(bars[1].percent_of_max, dec!(25));
    }

    #[test]
    fn test_empty_map_gives_no_bars() {
        assert!(mood_bars(&BTreeMap::new()).is_empty());
        assert_eq!(analyze(&[]), MoodAnalysis::default());
    }

    #[test]
    fn test_mood_map_serializes_with_lowercase_keys() {
        let json = serde_json::to_value(mood_spending(&scenario_a())).unwrap();
        assert_eq!(json["happy"], "1200");
        assert_eq!(json["stressed"], "300");
    }
}
