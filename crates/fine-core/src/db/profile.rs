//! Profile operations

use std::collections::BTreeSet;

use rusqlite::{params, Connection, OptionalExtension};

use super::{
    check_owner, conversion_error, format_datetime, now, parse_datetime, parse_decimal,
    parse_enum, Database,
};
use crate::error::Result;
use crate::models::{Profile, SpendingTrigger};

impl Database {
    /// The owner's profile, if one was ever saved
    pub fn get_profile(&self, owner: &str) -> Result<Option<Profile>> {
        let conn = self.conn()?;
        query_profile(&conn, owner)
    }

    /// Create or replace the owner's profile
    pub fn upsert_profile(&self, owner: &str, profile: &Profile) -> Result<Profile> {
        check_owner(owner)?;
        profile.validate()?;

        let now = now();
        let triggers: Vec<&str> = profile.spending_triggers.iter().map(|t| t.as_str()).collect();
        let risk = profile
            .risk_tolerance
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO profiles (owner, monthly_income, savings_goal, primary_goal, spending_triggers,
                                  budget_priority, risk_tolerance, financial_experience, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(owner) DO UPDATE SET
                monthly_income = excluded.monthly_income,
                savings_goal = excluded.savings_goal,
                primary_goal = excluded.primary_goal,
                spending_triggers = excluded.spending_triggers,
                budget_priority = excluded.budget_priority,
                risk_tolerance = excluded.risk_tolerance,
                financial_experience = excluded.financial_experience,
                updated_at = excluded.updated_at
            "#,
            params![
                owner,
                profile.monthly_income.map(|d| d.to_string()),
                profile.savings_goal.map(|d| d.to_string()),
                profile.primary_goal.map(|g| g.as_str()),
                serde_json::to_string(&triggers)?,
                profile.budget_priority.map(|p| p.as_str()),
                risk,
                profile.financial_experience.map(|e| e.as_str()),
                format_datetime(&now),
            ],
        )?;

        Ok(Profile {
            risk_tolerance: risk.map(str::to_string),
            updated_at: Some(now),
            ..profile.clone()
        })
    }

    /// Remove the owner's profile; returns false when none existed
    pub fn delete_profile(&self, owner: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM profiles WHERE owner = ?", params![owner])?;
        Ok(deleted > 0)
    }
}

pub(super) fn query_profile(conn: &Connection, owner: &str) -> Result<Option<Profile>> {
    let profile = conn
        .query_row(
            r#"
            SELECT monthly_income, savings_goal, primary_goal, spending_triggers,
                   budget_priority, risk_tolerance, financial_experience, updated_at
            FROM profiles WHERE owner = ?
            "#,
            params![owner],
            row_to_profile,
        )
        .optional()?;
    Ok(profile)
}

fn row_to_profile(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
    let income: Option<String> = row.get(0)?;
    let savings: Option<String> = row.get(1)?;
    let primary: Option<String> = row.get(2)?;
    let triggers: String = row.get(3)?;
    let priority: Option<String> = row.get(4)?;
    let experience: Option<String> = row.get(6)?;
    let updated_at: String = row.get(7)?;

    let trigger_names: Vec<String> = serde_json::from_str(&triggers)
        .map_err(|e| conversion_error(3, format!("bad spending_triggers: {}", e)))?;
    let spending_triggers = trigger_names
        .iter()
        .map(|t| parse_enum::<SpendingTrigger>(3, t))
        .collect::<rusqlite::Result<BTreeSet<_>>>()?;

    Ok(Profile {
        monthly_income: income.map(|s| parse_decimal(0, &s)).transpose()?,
        savings_goal: savings.map(|s| parse_decimal(1, &s)).transpose()?,
        primary_goal: primary.map(|s| parse_enum(2, &s)).transpose()?,
        spending_triggers,
        budget_priority: priority.map(|s| parse_enum(4, &s)).transpose()?,
        risk_tolerance: row.get(5)?,
        financial_experience: experience.map(|s| parse_enum(6, &s)).transpose()?,
        updated_at: Some(parse_datetime(7, &updated_at)?),
    })
}
