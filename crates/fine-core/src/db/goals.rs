//! Goal operations

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use super::{
    check_owner, conversion_error, format_datetime, now, parse_datetime, parse_decimal, Database,
};
use crate::error::Result;
use crate::models::{validate_goal_amount, Goal, NewGoal};

const GOAL_COLUMNS: &str = "id, owner, title, target_amount, current_amount, deadline, created_at";

impl Database {
    /// Validate and create a goal
    pub fn create_goal(&self, owner: &str, goal: &NewGoal) -> Result<Goal> {
        check_owner(owner)?;
        goal.validate()?;

        let now = now();
        let title = goal.title.trim().to_string();
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goals (owner, title, target_amount, current_amount, deadline, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                owner,
                title,
                goal.target_amount.to_string(),
                goal.current_amount.to_string(),
                goal.deadline.to_string(),
                format_datetime(&now),
            ],
        )?;

        Ok(Goal {
            id: conn.last_insert_rowid(),
            owner: owner.to_string(),
            title,
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            deadline: goal.deadline,
            created_at: now,
        })
    }

    /// All of an owner's goals, oldest first
    pub fn list_goals(&self, owner: &str) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        query_goals(&conn, owner)
    }

    /// Get a single goal by ID
    pub fn get_goal(&self, owner: &str, id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                &format!("SELECT {} FROM goals WHERE owner = ? AND id = ?", GOAL_COLUMNS),
                params![owner, id],
                row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    /// Set a goal's saved amount; returns the updated goal, or None if absent
    pub fn update_goal_amount(
        &self,
        owner: &str,
        id: i64,
        current_amount: Decimal,
    ) -> Result<Option<Goal>> {
        validate_goal_amount(current_amount)?;

        let updated = {
            let conn = self.conn()?;
            conn.execute(
                "UPDATE goals SET current_amount = ? WHERE owner = ? AND id = ?",
                params![current_amount.to_string(), owner, id],
            )?
        };

        if updated == 0 {
            return Ok(None);
        }
        self.get_goal(owner, id)
    }

    /// Delete a goal; returns false when it does not exist
    pub fn delete_goal(&self, owner: &str, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM goals WHERE owner = ? AND id = ?",
            params![owner, id],
        )?;
        Ok(deleted > 0)
    }
}

pub(super) fn query_goals(conn: &Connection, owner: &str) -> Result<Vec<Goal>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM goals WHERE owner = ? ORDER BY id",
        GOAL_COLUMNS
    ))?;
    let rows = stmt
        .query_map(params![owner], row_to_goal)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    let target: String = row.get(3)?;
    let current: String = row.get(4)?;
    let deadline: String = row.get(5)?;
    let created_at: String = row.get(6)?;

    Ok(Goal {
        id: row.get(0)?,
        owner: row.get(1)?,
        title: row.get(2)?,
        target_amount: parse_decimal(3, &target)?,
        current_amount: parse_decimal(4, &current)?,
        deadline: NaiveDate::parse_from_str(&deadline, "%Y-%m-%d")
            .map_err(|e| conversion_error(5, format!("bad deadline {:?}: {}", deadline, e)))?,
        created_at: parse_datetime(6, &created_at)?,
    })
}
