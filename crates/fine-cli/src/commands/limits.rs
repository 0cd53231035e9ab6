//! Category limit command implementations

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use fine_core::context::format_amount;
use fine_core::db::Database;
use fine_core::models::{Category, CategoryLimit};
use fine_core::FinanceService;

use super::{bar, parse_amount};

fn parse_category(raw: &str) -> Result<Category> {
    raw.parse().map_err(|e: String| anyhow!(e))
}

pub fn cmd_limits_set(db: &Database, owner: &str, category: &str, amount: &str) -> Result<()> {
    let limit = CategoryLimit {
        category: parse_category(category)?,
        limit: parse_amount(amount, "limit")?,
    };
    db.upsert_limit(owner, &limit)
        .context("Failed to save limit")?;

    println!(
        "✅ {} limit set to {} per month",
        limit.category,
        format_amount(limit.limit)
    );
    Ok(())
}

pub fn cmd_limits_list(db: &Database, owner: &str) -> Result<()> {
    let limits = db.list_limits(owner)?;

    if limits.is_empty() {
        println!("No category limits set. Add one with:");
        println!("  fine limits set food 400");
        return Ok(());
    }

    println!();
    println!("📏 Monthly Category Limits");
    println!("   ─────────────────────────────────────");
    for limit in limits {
        println!(
            "   {:<20} {:>12}",
            limit.category.as_str(),
            format_amount(limit.limit)
        );
    }
    Ok(())
}

pub fn cmd_limits_remove(db: &Database, owner: &str, category: &str) -> Result<()> {
    let category = parse_category(category)?;
    if !db.remove_limit(owner, category)? {
        return Err(anyhow!("No limit set for {}", category));
    }
    println!("🗑️  Removed {} limit", category);
    Ok(())
}

pub fn cmd_limits_check(
    service: &FinanceService,
    owner: &str,
    now: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let check = service.check_limits(owner, now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&check)?);
        return Ok(());
    }

    if check.statuses.is_empty() {
        println!("No category limits set. Add one with:");
        println!("  fine limits set food 400");
        return Ok(());
    }

    println!();
    println!("📏 Spending vs Limits ({})", now.format("%B %Y"));
    println!("   ─────────────────────────────────────────────────────────────");
    for status in &check.statuses {
        let marker = if status.exceeded { "🚨" } else { "  " };
        println!(
            "{} {:<20} {} {:>10} / {:<10} {:>6}%",
            marker,
            status.category.as_str(),
            bar(status.percentage, 20),
            format_amount(status.spent),
            format_amount(status.limit),
            status.percentage.round_dp(1)
        );
    }

    println!();
    if check.warnings.is_empty() {
        println!("✅ All categories within budget this month.");
    } else {
        println!(
            "⚠️  {} {} over limit this month:",
            check.warnings.len(),
            if check.warnings.len() == 1 {
                "category"
            } else {
                "categories"
            }
        );
        for warning in &check.warnings {
            println!(
                "   {}: spent {} of {} ({}%)",
                warning.category,
                format_amount(warning.spent),
                format_amount(warning.limit),
                warning.percentage.round_dp(1)
            );
        }
    }

    Ok(())
}
