//! Savings goal command implementations

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use fine_core::context::format_amount;
use fine_core::db::Database;
use fine_core::goals::goal_views;
use fine_core::models::NewGoal;

use super::{bar, parse_amount, truncate};

pub fn cmd_goals_add(
    db: &Database,
    owner: &str,
    title: &str,
    target: &str,
    current: &str,
    deadline: &str,
) -> Result<()> {
    let deadline = NaiveDate::parse_from_str(deadline, "%Y-%m-%d")
        .with_context(|| format!("Invalid deadline: {} (expected YYYY-MM-DD)", deadline))?;

    let goal = db
        .create_goal(
            owner,
            &NewGoal {
                title: title.to_string(),
                target_amount: parse_amount(target, "target")?,
                current_amount: parse_amount(current, "current amount")?,
                deadline,
            },
        )
        .context("Failed to create goal")?;

    println!(
        "🎯 Created goal #{}: {} ({} by {})",
        goal.id,
        goal.title,
        format_amount(goal.target_amount),
        goal.deadline
    );
    Ok(())
}

pub fn cmd_goals_list(db: &Database, owner: &str) -> Result<()> {
    let goals = db.list_goals(owner)?;

    if goals.is_empty() {
        println!("No goals yet. Create one with:");
        println!("  fine goals add \"Emergency fund\" -t 5000 -d 2027-06-30");
        return Ok(());
    }

    println!();
    println!("🎯 Savings Goals");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in goal_views(&goals, Utc::now()) {
        let (goal, view) = (&entry.goal, &entry.view);
        println!(
            "   [{}] {:<30} {} {:>5}%",
            goal.id,
            truncate(&goal.title, 30),
            bar(view.progress, 20),
            view.progress.round_dp(0)
        );
        println!(
            "       {} of {} saved, {} to go",
            format_amount(goal.current_amount),
            format_amount(goal.target_amount),
            format_amount(view.remaining_amount)
        );

        let status = if view.remaining_amount.is_zero() {
            "✅ Complete".to_string()
        } else if view.overdue {
            format!("⏰ Overdue since {}", goal.deadline)
        } else if view.urgent {
            format!("⚠️  {} days left", view.days_remaining)
        } else {
            format!("{} days left", view.days_remaining)
        };
        match view.daily_savings_needed {
            Some(daily) => println!("       {} │ {}/day needed", status, format_amount(daily)),
            None => println!("       {}", status),
        }
    }

    Ok(())
}

pub fn cmd_goals_update(db: &Database, owner: &str, id: i64, amount: &str) -> Result<()> {
    let goal = db
        .update_goal_amount(owner, id, parse_amount(amount, "amount")?)?
        .ok_or_else(|| anyhow!("Goal {} not found", id))?;

    println!(
        "✅ {}: {} of {} saved",
        goal.title,
        format_amount(goal.current_amount),
        format_amount(goal.target_amount)
    );
    Ok(())
}

pub fn cmd_goals_delete(db: &Database, owner: &str, id: i64) -> Result<()> {
    if !db.delete_goal(owner, id)? {
        return Err(anyhow!("Goal {} not found", id));
    }
    println!("🗑️  Deleted goal #{}", id);
    Ok(())
}
