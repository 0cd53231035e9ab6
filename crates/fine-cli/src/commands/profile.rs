//! Onboarding profile command implementations

use std::collections::BTreeSet;

use anyhow::{anyhow, Context, Result};
use fine_core::context::format_amount;
use fine_core::db::Database;
use fine_core::models::{Profile, SpendingTrigger};

use super::parse_amount;

/// Profile fields as given on the command line
#[derive(Debug, Default)]
pub struct ProfileArgs {
    pub income: Option<String>,
    pub savings: Option<String>,
    pub goal: Option<String>,
    pub triggers: Option<String>,
    pub priority: Option<String>,
    pub risk: Option<String>,
    pub experience: Option<String>,
}

impl ProfileArgs {
    pub fn to_profile(&self) -> Result<Profile> {
        let triggers = match &self.triggers {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<SpendingTrigger>().map_err(|e| anyhow!(e)))
                .collect::<Result<BTreeSet<_>>>()?,
            None => BTreeSet::new(),
        };

        Ok(Profile {
            monthly_income: self
                .income
                .as_deref()
                .map(|v| parse_amount(v, "monthly income"))
                .transpose()?,
            savings_goal: self
                .savings
                .as_deref()
                .map(|v| parse_amount(v, "savings goal"))
                .transpose()?,
            primary_goal: self
                .goal
                .as_deref()
                .map(|v| v.parse().map_err(|e: String| anyhow!(e)))
                .transpose()?,
            spending_triggers: triggers,
            budget_priority: self
                .priority
                .as_deref()
                .map(|v| v.parse().map_err(|e: String| anyhow!(e)))
                .transpose()?,
            risk_tolerance: self.risk.clone().filter(|r| !r.trim().is_empty()),
            financial_experience: self
                .experience
                .as_deref()
                .map(|v| v.parse().map_err(|e: String| anyhow!(e)))
                .transpose()?,
            updated_at: None,
        })
    }
}

pub fn cmd_profile_set(db: &Database, owner: &str, args: &ProfileArgs) -> Result<()> {
    let profile = args.to_profile()?;
    db.upsert_profile(owner, &profile)
        .context("Failed to save profile")?;
    println!("✅ Profile saved");
    Ok(())
}

pub fn cmd_profile_show(db: &Database, owner: &str) -> Result<()> {
    let Some(profile) = db.get_profile(owner)? else {
        println!("No profile yet. Create one with:");
        println!("  fine profile set --income 4000 --savings 500 --goal save");
        return Ok(());
    };

    let or_unset = |v: Option<String>| v.unwrap_or_else(|| "not set".to_string());

    println!();
    println!("👤 Profile");
    println!("   ─────────────────────────────────────");
    println!(
        "   Monthly income:   {}",
        or_unset(profile.monthly_income.map(format_amount))
    );
    println!(
        "   Savings goal:     {}",
        or_unset(profile.savings_goal.map(format_amount))
    );
    println!(
        "   Primary goal:     {}",
        or_unset(profile.primary_goal.map(|g| g.label().to_string()))
    );
    let triggers: Vec<&str> = profile
        .spending_triggers
        .iter()
        .map(|t| t.as_str())
        .collect();
    println!(
        "   Triggers:         {}",
        if triggers.is_empty() {
            "not set".to_string()
        } else {
            triggers.join(", ")
        }
    );
    println!(
        "   Budget priority:  {}",
        or_unset(profile.budget_priority.map(|p| p.as_str().to_string()))
    );
    println!("   Risk tolerance:   {}", or_unset(profile.risk_tolerance));
    println!(
        "   Experience:       {}",
        or_unset(profile.financial_experience.map(|e| e.as_str().to_string()))
    );
    if let Some(updated) = profile.updated_at {
        println!("   Updated:          {}", updated.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}

pub fn cmd_profile_clear(db: &Database, owner: &str) -> Result<()> {
    if db.delete_profile(owner)? {
        println!("🗑️  Profile deleted");
    } else {
        println!("No profile to delete");
    }
    Ok(())
}
