//! Transaction command implementations

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use fine_core::db::Database;
use fine_core::models::{Category, Mood, NewTransaction, TransactionKind};

use super::{colored_amount, parse_amount, truncate};

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp
pub fn parse_occurred_at(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid date: {} (expected YYYY-MM-DD)", raw))
}

/// Parse a mood tag, listing the accepted names on failure
pub fn parse_mood(raw: &str) -> Result<Mood> {
    raw.parse().map_err(|e: String| {
        let names: Vec<&str> = Mood::NAMED.iter().map(|m| m.as_str()).collect();
        anyhow!("{} (expected one of: {})", e, names.join(", "))
    })
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_tx_add(
    db: &Database,
    owner: &str,
    amount: &str,
    category: &str,
    kind: &str,
    description: &str,
    mood: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let category: Category = category.parse().map_err(|e: String| anyhow!(e))?;
    let kind: TransactionKind = kind.parse().map_err(|e: String| anyhow!(e))?;
    let mood = match mood {
        Some(m) => parse_mood(m)?,
        None => Mood::Unset,
    };
    let occurred_at = date.map(parse_occurred_at).transpose()?;

    let new_tx = NewTransaction {
        amount: parse_amount(amount, "amount")?,
        category,
        description: description.to_string(),
        kind,
        mood,
        occurred_at,
    };

    let tx = db
        .insert_transaction(owner, &new_tx)
        .context("Failed to record transaction")?;

    println!(
        "✅ Recorded #{}: {} {} │ {}",
        tx.id,
        colored_amount(tx.amount, tx.is_income()),
        tx.category,
        tx.occurred_at.format("%Y-%m-%d")
    );

    Ok(())
}

pub fn cmd_tx_list(db: &Database, owner: &str, limit: usize) -> Result<()> {
    let transactions = db.list_transactions(owner)?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  fine tx add 12.50 -c food -d \"Lunch\"");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions.iter().take(limit) {
        let mood = if tx.mood.is_set() { tx.mood.as_str() } else { "" };
        println!(
            "   [{}] {} │ {:>12} │ {:<18} │ {:<8} │ {}",
            tx.id,
            tx.occurred_at.format("%Y-%m-%d"),
            colored_amount(tx.amount, tx.is_income()),
            tx.category,
            mood,
            truncate(&tx.description, 35)
        );
    }

    if transactions.len() > limit {
        println!();
        println!(
            "   Showing {} of {}. Use --limit to see more.",
            limit,
            transactions.len()
        );
    }

    Ok(())
}

pub fn cmd_tx_delete(db: &Database, owner: &str, id: i64) -> Result<()> {
    if !db.delete_transaction(owner, id)? {
        return Err(anyhow!("Transaction {} not found", id));
    }
    println!("🗑️  Deleted transaction #{}", id);
    Ok(())
}
