//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// FINE - Track spending, goals and budgets, with an assistant that knows your numbers
#[derive(Parser)]
#[command(name = "fine")]
#[command(about = "Personal finance ledger with budget alerts and an assistant", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "fine.db", global = true)]
    pub db: PathBuf,

    /// Ledger owner
    #[arg(long, env = "FINE_USER", default_value = "local-dev", global = true)]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record, list and delete transactions
    Tx {
        #[command(subcommand)]
        action: Option<TxAction>,
    },

    /// Manage savings goals
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Manage monthly category limits
    Limits {
        #[command(subcommand)]
        action: Option<LimitsAction>,
    },

    /// Show or update the onboarding profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// Show balance, totals and spending by category
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show expense totals per mood
    Moods,

    /// Ask the assistant for spending and mood insights
    Insights {
        /// Extra context for the assistant
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Ask the assistant a question about your finances
    Chat {
        /// The question
        message: String,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8001")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires an API key from FINE_API_KEYS.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum TxAction {
    /// Record a transaction
    Add {
        /// Amount (positive)
        amount: String,

        /// Category (e.g. "Food & Dining", food, transport, salary)
        #[arg(short, long)]
        category: String,

        /// income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Mood: happy, calm, sad, stressed, neutral
        #[arg(short, long)]
        mood: Option<String>,

        /// Date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// Create a savings goal
    Add {
        /// Goal title
        title: String,

        /// Target amount
        #[arg(short, long)]
        target: String,

        /// Amount saved so far
        #[arg(short, long, default_value = "0")]
        current: String,

        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: String,
    },

    /// List goals with progress
    List,

    /// Set the amount saved toward a goal
    Update {
        /// Goal ID
        id: i64,

        /// New current amount
        amount: String,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum LimitsAction {
    /// Set one category's monthly limit
    Set {
        /// Category
        category: String,

        /// Monthly limit
        amount: String,
    },

    /// List configured limits
    List,

    /// Remove one category's limit
    Remove {
        /// Category
        category: String,
    },

    /// Check this month's spending against limits
    Check {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Save the profile (replaces any existing one)
    Set {
        /// Monthly income
        #[arg(long)]
        income: Option<String>,

        /// Monthly savings goal
        #[arg(long)]
        savings: Option<String>,

        /// Primary goal: save, debt, invest, purchase, emergency
        #[arg(long)]
        goal: Option<String>,

        /// Spending triggers, comma-separated: stress, boredom, celebration, sadness, social, none
        #[arg(long)]
        triggers: Option<String>,

        /// Budget priority: savings, balance, experiences, security, freedom
        #[arg(long)]
        priority: Option<String>,

        /// Risk tolerance (free text)
        #[arg(long)]
        risk: Option<String>,

        /// Experience: beginner, intermediate, advanced
        #[arg(long)]
        experience: Option<String>,
    },

    /// Show the profile
    Show,

    /// Delete the profile
    Clear,
}
