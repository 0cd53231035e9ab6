//! Category limit operations

use rusqlite::{params, Connection};

use super::{check_owner, format_datetime, now, parse_decimal, parse_enum, Database};
use crate::error::Result;
use crate::models::{validate_limit_set, Category, CategoryLimit};

impl Database {
    /// All of an owner's limits, in category order
    pub fn list_limits(&self, owner: &str) -> Result<Vec<CategoryLimit>> {
        let conn = self.conn()?;
        query_limits(&conn, owner)
    }

    /// Replace the whole limit set atomically
    pub fn replace_limits(
        &self,
        owner: &str,
        limits: &[CategoryLimit],
    ) -> Result<Vec<CategoryLimit>> {
        check_owner(owner)?;
        validate_limit_set(limits)?;

        let now = format_datetime(&now());
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM category_limits WHERE owner = ?", params![owner])?;
        for limit in limits {
            tx.execute(
                "INSERT INTO category_limits (owner, category, amount, updated_at) VALUES (?, ?, ?, ?)",
                params![owner, limit.category.as_str(), limit.limit.to_string(), now],
            )?;
        }
        let stored = query_limits(&tx, owner)?;
        tx.commit()?;

        Ok(stored)
    }

    /// Set one category's limit, replacing any existing one
    pub fn upsert_limit(&self, owner: &str, limit: &CategoryLimit) -> Result<()> {
        check_owner(owner)?;
        limit.validate()?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO category_limits (owner, category, amount, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(owner, category) DO UPDATE SET
                amount = excluded.amount,
                updated_at = excluded.updated_at
            "#,
            params![
                owner,
                limit.category.as_str(),
                limit.limit.to_string(),
                format_datetime(&now()),
            ],
        )?;
        Ok(())
    }

    /// Remove one category's limit; returns false when none was set
    pub fn remove_limit(&self, owner: &str, category: Category) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM category_limits WHERE owner = ? AND category = ?",
            params![owner, category.as_str()],
        )?;
        Ok(deleted > 0)
    }
}

pub(super) fn query_limits(conn: &Connection, owner: &str) -> Result<Vec<CategoryLimit>> {
    let mut stmt =
        conn.prepare("SELECT category, amount FROM category_limits WHERE owner = ?")?;
    let mut limits = stmt
        .query_map(params![owner], |row| {
            let category: String = row.get(0)?;
            let amount: String = row.get(1)?;
            Ok(CategoryLimit {
                category: parse_enum(0, &category)?,
                limit: parse_decimal(1, &amount)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    // Stored as display strings; order by the enum, not the text
    limits.sort_by_key(|l| l.category);
    Ok(limits)
}
