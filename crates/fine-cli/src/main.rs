//! FINE CLI - Personal finance ledger with budget alerts
//!
//! Usage:
//!   fine init                          Initialize database
//!   fine tx add 12.50 -c food -m happy Record an expense
//!   fine stats                         Balance and spending by category
//!   fine limits check                  This month's spending against limits
//!   fine chat "How am I doing?"        Ask the assistant
//!   fine serve --port 8001             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let owner = cli.user.as_str();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Tx { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_tx_list(&db, owner, 20),
                Some(TxAction::List { limit }) => commands::cmd_tx_list(&db, owner, limit),
                Some(TxAction::Add {
                    amount,
                    category,
                    kind,
                    description,
                    mood,
                    date,
                }) => commands::cmd_tx_add(
                    &db,
                    owner,
                    &amount,
                    &category,
                    &kind,
                    &description,
                    mood.as_deref(),
                    date.as_deref(),
                ),
                Some(TxAction::Delete { id }) => commands::cmd_tx_delete(&db, owner, id),
            }
        }
        Commands::Goals { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(GoalsAction::List) => commands::cmd_goals_list(&db, owner),
                Some(GoalsAction::Add {
                    title,
                    target,
                    current,
                    deadline,
                }) => commands::cmd_goals_add(&db, owner, &title, &target, &current, &deadline),
                Some(GoalsAction::Update { id, amount }) => {
                    commands::cmd_goals_update(&db, owner, id, &amount)
                }
                Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&db, owner, id),
            }
        }
        Commands::Limits { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(LimitsAction::List) => commands::cmd_limits_list(&db, owner),
                Some(LimitsAction::Set { category, amount }) => {
                    commands::cmd_limits_set(&db, owner, &category, &amount)
                }
                Some(LimitsAction::Remove { category }) => {
                    commands::cmd_limits_remove(&db, owner, &category)
                }
                Some(LimitsAction::Check { json }) => {
                    let service = commands::offline_service(db);
                    commands::cmd_limits_check(&service, owner, chrono::Utc::now(), json)
                }
            }
        }
        Commands::Profile { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(ProfileAction::Show) => commands::cmd_profile_show(&db, owner),
                Some(ProfileAction::Set {
                    income,
                    savings,
                    goal,
                    triggers,
                    priority,
                    risk,
                    experience,
                }) => {
                    let args = commands::ProfileArgs {
                        income,
                        savings,
                        goal,
                        triggers,
                        priority,
                        risk,
                        experience,
                    };
                    commands::cmd_profile_set(&db, owner, &args)
                }
                Some(ProfileAction::Clear) => commands::cmd_profile_clear(&db, owner),
            }
        }
        Commands::Stats { json } => {
            let service = commands::offline_service(commands::open_db(&cli.db)?);
            commands::cmd_stats(&service, owner, json)
        }
        Commands::Moods => {
            let service = commands::offline_service(commands::open_db(&cli.db)?);
            commands::cmd_moods(&service, owner)
        }
        Commands::Insights { note } => {
            let service = commands::open_service(&cli.db)?;
            commands::cmd_insights(&service, owner, note.as_deref()).await
        }
        Commands::Chat { message } => {
            let service = commands::open_service(&cli.db)?;
            commands::cmd_chat(&service, owner, &message).await
        }
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, static_dir.as_deref()).await,
    }
}
