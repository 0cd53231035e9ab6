//! Transaction operations

use chrono::SubsecRound;
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    check_owner, format_datetime, now, parse_datetime, parse_decimal, parse_enum, Database,
};
use crate::error::Result;
use crate::models::{Mood, NewTransaction, Transaction};

const TRANSACTION_COLUMNS: &str =
    "id, owner, amount, category, description, kind, mood, occurred_at, created_at";

impl Database {
    /// Validate and record a transaction
    ///
    /// `occurred_at` defaults to now when not supplied.
    pub fn insert_transaction(&self, owner: &str, tx: &NewTransaction) -> Result<Transaction> {
        check_owner(owner)?;
        tx.validate()?;

        let now = now();
        let occurred_at = tx.occurred_at.map(|t| t.trunc_subsecs(6)).unwrap_or(now);
        let description = tx.description.trim().to_string();
        let mood = tx.mood.is_set().then(|| tx.mood.as_str());

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (owner, amount, category, description, kind, mood, occurred_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                owner,
                tx.amount.to_string(),
                tx.category.as_str(),
                description,
                tx.kind.as_str(),
                mood,
                format_datetime(&occurred_at),
                format_datetime(&now),
            ],
        )?;

        Ok(Transaction {
            id: conn.last_insert_rowid(),
            owner: owner.to_string(),
            amount: tx.amount,
            category: tx.category,
            description,
            kind: tx.kind,
            mood: tx.mood,
            occurred_at,
            created_at: now,
        })
    }

    /// All of an owner's transactions, newest first
    pub fn list_transactions(&self, owner: &str) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        query_transactions(&conn, owner)
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, owner: &str, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                &format!(
                    "SELECT {} FROM transactions WHERE owner = ? AND id = ?",
                    TRANSACTION_COLUMNS
                ),
                params![owner, id],
                row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// Delete a transaction; returns false when it does not exist
    pub fn delete_transaction(&self, owner: &str, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transactions WHERE owner = ? AND id = ?",
            params![owner, id],
        )?;
        Ok(deleted > 0)
    }

    /// Count an owner's transactions
    pub fn count_transactions(&self, owner: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE owner = ?",
            params![owner],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

pub(super) fn query_transactions(conn: &Connection, owner: &str) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions WHERE owner = ? ORDER BY occurred_at DESC, id DESC",
        TRANSACTION_COLUMNS
    ))?;
    let rows = stmt
        .query_map(params![owner], row_to_transaction)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let amount: String = row.get(2)?;
    let category: String = row.get(3)?;
    let kind: String = row.get(5)?;
    let mood: Option<String> = row.get(6)?;
    let occurred_at: String = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(Transaction {
        id: row.get(0)?,
        owner: row.get(1)?,
        amount: parse_decimal(2, &amount)?,
        category: parse_enum(3, &category)?,
        description: row.get(4)?,
        kind: parse_enum(5, &kind)?,
        mood: match mood {
            Some(m) => parse_enum(6, &m)?,
            None => Mood::Unset,
        },
        occurred_at: parse_datetime(7, &occurred_at)?,
        created_at: parse_datetime(8, &created_at)?,
    })
}
