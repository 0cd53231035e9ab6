//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `open_service` / `offline_service` - Build a `FinanceService` over it
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use fine_core::{AIClient, AssistantSettings, Database, FinanceService};

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Service with the assistant configured from the environment
pub fn open_service(db_path: &Path) -> Result<FinanceService> {
    let db = open_db(db_path)?;
    let settings = AssistantSettings::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load assistant settings, using defaults");
        AssistantSettings::default()
    });
    Ok(FinanceService::new(db, AIClient::from_env(), settings))
}

/// Service for commands that never reach the assistant
pub fn offline_service(db: Database) -> FinanceService {
    FinanceService::new(db, None, AssistantSettings::default())
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    println!("   Schema ready at {}", db.path());

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record a transaction: fine tx add 12.50 -c food -m happy");
    println!("  2. Set a budget: fine limits set food 400");
    println!("  3. Start web UI: fine serve");

    Ok(())
}
