//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `assistant` - Assistant commands (chat, insights)
//! - `core` - Core commands (init) and shared utilities (open_db, open_service)
//! - `goals` - Savings goal commands (add, list, update, delete)
//! - `limits` - Category limit commands (set, list, remove, check)
//! - `profile` - Onboarding profile commands (set, show, clear)
//! - `reports` - Report commands (stats, moods)
//! - `serve` - Web server command
//! - `transactions` - Transaction commands (add, list, delete)

pub mod assistant;
pub mod core;
pub mod goals;
pub mod limits;
pub mod profile;
pub mod reports;
pub mod serve;
pub mod transactions;

// Re-export command functions for main.rs
pub use assistant::*;
pub use core::*;
pub use goals::*;
pub use limits::*;
pub use profile::*;
pub use reports::*;
pub use serve::*;
pub use transactions::*;

use anyhow::{bail, Context, Result};
use fine_core::context::format_amount;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a money amount given on the command line
pub fn parse_amount(raw: &str, field: &str) -> Result<Decimal> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid {}: {}", field, raw))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        bail!("{} cannot be negative: {}", field, raw);
    }
    Ok(amount)
}

/// Amount colored by direction: red for money out, green for money in
pub fn colored_amount(amount: Decimal, income: bool) -> String {
    if income {
        format!("\x1b[32m+{}\x1b[0m", format_amount(amount))
    } else {
        format!("\x1b[31m-{}\x1b[0m", format_amount(amount))
    }
}

/// Text bar of `percent` (0..=100) over `width` cells
pub fn bar(percent: Decimal, width: usize) -> String {
    let clamped = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (clamped * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
