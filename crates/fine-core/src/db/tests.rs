//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn new_tx(kind: TransactionKind, amount: Decimal, category: Category) -> NewTransaction {
        NewTransaction {
            amount,
            category,
            description: "test".into(),
            kind,
            mood: Mood::Unset,
            occurred_at: None,
        }
    }

    fn new_goal(title: &str) -> NewGoal {
        NewGoal {
            title: title.into(),
            target_amount: dec!(1000),
            current_amount: dec!(100),
            deadline: NaiveDate::from_ymd_opt(2030, 6, 30).unwrap(),
        }
    }

    #[test]
    fn test_in_memory_db_is_empty() {
        let db = Database::in_memory().unwrap();
        let snapshot = db.snapshot("alice").unwrap();

        assert!(snapshot.transactions.is_empty());
        assert!(snapshot.goals.is_empty());
        assert!(snapshot.limits.is_empty());
        assert!(snapshot.profile.is_none());
    }

    #[test]
    fn test_schema_tables_exist() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('transactions', 'goals', 'category_limits', 'profiles')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_transaction_round_trip_keeps_exact_amount() {
        let db = Database::in_memory().unwrap();
        let mut tx = new_tx(TransactionKind::Expense, dec!(19.99), Category::FoodAndDining);
        tx.mood = Mood::Stressed;
        tx.occurred_at = Some(Utc.with_ymd_and_hms(2024, 6, 10, 12, 30, 0).unwrap());

        let created = db.insert_transaction("alice", &tx).unwrap();
        let loaded = db.get_transaction("alice", created.id).unwrap().unwrap();

        assert_eq!(loaded, created);
        assert_eq!(loaded.amount, dec!(19.99));
        assert_eq!(loaded.mood, Mood::Stressed);
        assert_eq!(loaded.category, Category::FoodAndDining);
    }

    #[test]
    fn test_unset_mood_stored_as_null() {
        let db = Database::in_memory().unwrap();
        let created = db
            .insert_transaction("alice", &new_tx(TransactionKind::Income, dec!(5), Category::Salary))
            .unwrap();

        let conn = db.conn().unwrap();
        let mood: Option<String> = conn
            .query_row(
                "SELECT mood FROM transactions WHERE id = ?",
                [created.id],
                |row| row.get(0),
            )
            .unwrap();
        assert!(mood.is_none());
    }

    #[test]
    fn test_invalid_transaction_is_not_written() {
        let db = Database::in_memory().unwrap();
        let err = db
            .insert_transaction("alice", &new_tx(TransactionKind::Expense, dec!(0), Category::Other))
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(db.count_transactions("alice").unwrap(), 0);
    }

    #[test]
    fn test_blank_owner_rejected() {
        let db = Database::in_memory().unwrap();
        let result = db.insert_transaction("  ", &new_tx(TransactionKind::Income, dec!(1), Category::Salary));
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_list_newest_first_with_id_tiebreak() {
        let db = Database::in_memory().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();

        let mut ids = Vec::new();
        for _ in 0..3 {
            let mut tx = new_tx(TransactionKind::Expense, dec!(1), Category::Other);
            tx.occurred_at = Some(at);
            ids.push(db.insert_transaction("alice", &tx).unwrap().id);
        }
        let mut earlier = new_tx(TransactionKind::Expense, dec!(1), Category::Other);
        earlier.occurred_at = Some(at - chrono::Duration::days(1));
        let earlier_id = db.insert_transaction("alice", &earlier).unwrap().id;

        let listed: Vec<i64> = db
            .list_transactions("alice")
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(listed, vec![ids[2], ids[1], ids[0], earlier_id]);
    }

    #[test]
    fn test_owners_are_isolated() {
        let db = Database::in_memory().unwrap();
        let created = db
            .insert_transaction("alice", &new_tx(TransactionKind::Income, dec!(10), Category::Salary))
            .unwrap();

        assert!(db.list_transactions("bob").unwrap().is_empty());
        assert!(db.get_transaction("bob", created.id).unwrap().is_none());
        assert!(!db.delete_transaction("bob", created.id).unwrap());
        assert_eq!(db.count_transactions("alice").unwrap(), 1);
    }

    #[test]
    fn test_delete_transaction() {
        let db = Database::in_memory().unwrap();
        let created = db
            .insert_transaction("alice", &new_tx(TransactionKind::Income, dec!(10), Category::Salary))
            .unwrap();

        assert!(db.delete_transaction("alice", created.id).unwrap());
        assert!(!db.delete_transaction("alice", created.id).unwrap());
    }

    #[test]
    fn test_goal_crud() {
        let db = Database::in_memory().unwrap();
        let goal = db.create_goal("alice", &new_goal("  Laptop ")).unwrap();
        assert_eq!(goal.title, "Laptop");

        let updated = db
            .update_goal_amount("alice", goal.id, dec!(1250.50))
            .unwrap()
            .unwrap();
        assert_eq!(updated.current_amount, dec!(1250.50));

        assert!(db.update_goal_amount("alice", 9999, dec!(1)).unwrap().is_none());
        assert!(db
            .update_goal_amount("alice", goal.id, dec!(-1))
            .unwrap_err()
            .is_validation());

        let goals = db.list_goals("alice").unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].deadline, NaiveDate::from_ymd_opt(2030, 6, 30).unwrap());

        assert!(db.delete_goal("alice", goal.id).unwrap());
        assert!(db.list_goals("alice").unwrap().is_empty());
    }

    #[test]
    fn test_replace_limits_and_upsert() {
        let db = Database::in_memory().unwrap();
        let stored = db
            .replace_limits(
                "alice",
                &[
                    CategoryLimit {
                        category: Category::Travel,
                        limit: dec!(300),
                    },
                    CategoryLimit {
                        category: Category::FoodAndDining,
                        limit: dec!(1000),
                    },
                ],
            )
            .unwrap();
        // Returned in category order
        assert_eq!(stored[0].category, Category::FoodAndDining);
        assert_eq!(stored[1].category, Category::Travel);

        db.upsert_limit(
            "alice",
            &CategoryLimit {
                category: Category::Travel,
                limit: dec!(450),
            },
        )
        .unwrap();
        let limits = db.list_limits("alice").unwrap();
        assert_eq!(limits.len(), 2);
        assert_eq!(limits[1].limit, dec!(450));

        // Replacing drops anything not in the new set
        db.replace_limits(
            "alice",
            &[CategoryLimit {
                category: Category::Shopping,
                limit: dec!(50),
            }],
        )
        .unwrap();
        let limits = db.list_limits("alice").unwrap();
        assert_eq!(limits.len(), 1);
        assert_eq!(limits[0].category, Category::Shopping);

        assert!(db.remove_limit("alice", Category::Shopping).unwrap());
        assert!(!db.remove_limit("alice", Category::Shopping).unwrap());
    }

    #[test]
    fn test_replace_limits_rejects_duplicates_without_writing() {
        let db = Database::in_memory().unwrap();
        let food = CategoryLimit {
            category: Category::FoodAndDining,
            limit: dec!(100),
        };
        db.replace_limits("alice", &[food]).unwrap();

        let result = db.replace_limits("alice", &[food, food]);
        assert!(result.unwrap_err().is_validation());
        assert_eq!(db.list_limits("alice").unwrap(), vec![food]);
    }

    #[test]
    fn test_profile_absent_then_upserted() {
        let db = Database::in_memory().unwrap();
        assert!(db.get_profile("alice").unwrap().is_none());

        let profile = Profile {
            monthly_income: Some(dec!(50000)),
            primary_goal: Some(PrimaryGoal::Emergency),
            spending_triggers: [SpendingTrigger::Social, SpendingTrigger::Stress]
                .into_iter()
                .collect(),
            risk_tolerance: Some("  moderate ".into()),
            financial_experience: Some(ExperienceLevel::Intermediate),
            ..Default::default()
        };
        let saved = db.upsert_profile("alice", &profile).unwrap();
        assert_eq!(saved.risk_tolerance.as_deref(), Some("moderate"));

        let loaded = db.get_profile("alice").unwrap().unwrap();
        assert_eq!(loaded.monthly_income, Some(dec!(50000)));
        assert_eq!(loaded.savings_goal, None);
        assert_eq!(loaded.spending_triggers.len(), 2);
        assert!(loaded.spending_triggers.contains(&SpendingTrigger::Social));
        assert_eq!(loaded.financial_experience, Some(ExperienceLevel::Intermediate));
        assert!(loaded.updated_at.is_some());

        // Upsert replaces, it does not merge
        db.upsert_profile("alice", &Profile::default()).unwrap();
        let loaded = db.get_profile("alice").unwrap().unwrap();
        assert_eq!(loaded.monthly_income, None);
        assert!(loaded.spending_triggers.is_empty());
    }

    #[test]
    fn test_snapshot_collects_everything() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction("alice", &new_tx(TransactionKind::Income, dec!(10), Category::Salary))
            .unwrap();
        db.create_goal("alice", &new_goal("Bike")).unwrap();
        db.upsert_limit(
            "alice",
            &CategoryLimit {
                category: Category::Travel,
                limit: dec!(300),
            },
        )
        .unwrap();
        db.upsert_profile("alice", &Profile::default()).unwrap();

        let snapshot = db.snapshot("alice").unwrap();
        assert_eq!(snapshot.owner, "alice");
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.goals.len(), 1);
        assert_eq!(snapshot.limits.len(), 1);
        assert!(snapshot.profile.is_some());
    }
}
