//! FINE Core Library
//!
//! Shared functionality for the FINE personal finance engine:
//! - Ledger store (transactions, goals, category limits, profile)
//! - Aggregation of balances, totals and category spending
//! - Monthly category limit checks
//! - Savings goal progress and deadline math
//! - Mood-tagged spending analysis
//! - Assistant context assembly and pluggable chat backends

pub mod aggregation;
pub mod ai;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod goals;
pub mod limits;
pub mod models;
pub mod mood;
pub mod service;

/// Test utilities including a mock assistant server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod test_fixtures;

pub use aggregation::{CashFlowSplit, CategoryShare, Stats};
pub use ai::{
    AIBackend, AIClient, AssistantRequest, ChatRole, ChatTurn, MockBackend, OllamaBackend,
    OpenAICompatibleBackend,
};
pub use config::AssistantSettings;
pub use context::AssistantContext;
pub use db::Database;
pub use error::{Error, Result};
pub use goals::{GoalView, GoalWithView};
pub use limits::{LimitCheck, LimitStatus, LimitWarning};
pub use mood::{MoodAnalysis, MoodBar};
pub use service::{AssistantReply, AssistantStatus, Dashboard, FinanceService, InsightReport};
