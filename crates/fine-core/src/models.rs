//! Domain models for FINE
//!
//! Entities are validated at construction (`validate()` on the `New*` input
//! types and on `CategoryLimit`/`Profile`) so the engine modules can rely on
//! their invariants without re-checking them.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Maximum stored description length (characters)
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Maximum goal title length (characters)
pub const MAX_TITLE_LEN: usize = 200;

/// Largest accepted amount, target or limit (10^15)
///
/// Keeps every sum, ratio and percentage the engine derives well inside
/// `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Most decimal places an accepted amount may carry
pub const MAX_AMOUNT_SCALE: u32 = 4;

/// Bounds shared by every stored money value: at most `MAX_AMOUNT` in
/// magnitude and `MAX_AMOUNT_SCALE` significant decimal places
pub fn validate_money(field: &str, amount: Decimal) -> Result<()> {
    if amount.abs() > MAX_AMOUNT {
        return Err(Error::Validation(format!(
            "{} exceeds the maximum of {}, got {}",
            field, MAX_AMOUNT, amount
        )));
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(Error::Validation(format!(
            "{} allows at most {} decimal places, got {}",
            field, MAX_AMOUNT_SCALE, amount
        )));
    }
    Ok(())
}

/// Spending category
///
/// A closed set shared by transactions and category limits. The stored form is
/// the display name (e.g. "Food & Dining").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Bills & Utilities")]
    BillsAndUtilities,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Travel")]
    Travel,
    #[serde(rename = "Salary")]
    Salary,
    #[serde(rename = "Investment")]
    Investment,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Self::FoodAndDining,
        Self::Transportation,
        Self::Shopping,
        Self::Entertainment,
        Self::BillsAndUtilities,
        Self::Healthcare,
        Self::Education,
        Self::Travel,
        Self::Salary,
        Self::Investment,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodAndDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::BillsAndUtilities => "Bills & Utilities",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::Salary => "Salary",
            Self::Investment => "Investment",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food & dining" | "food" | "dining" | "food_dining" => Ok(Self::FoodAndDining),
            "transportation" | "transport" => Ok(Self::Transportation),
            "shopping" => Ok(Self::Shopping),
            "entertainment" => Ok(Self::Entertainment),
            "bills & utilities" | "bills" | "utilities" | "bills_utilities" => {
                Ok(Self::BillsAndUtilities)
            }
            "healthcare" | "health" => Ok(Self::Healthcare),
            "education" => Ok(Self::Education),
            "travel" => Ok(Self::Travel),
            "salary" => Ok(Self::Salary),
            "investment" | "investments" => Ok(Self::Investment),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a transaction (the amount itself is always positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Self-reported emotional tag on a transaction
///
/// `Unset` means no tag was chosen. It is not a mood and never compares equal
/// to `Neutral`. On the wire it is `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Mood {
    Happy,
    Calm,
    Sad,
    Stressed,
    Neutral,
    #[default]
    Unset,
}

impl Mood {
    /// The named moods, in display order
    pub const NAMED: [Mood; 5] = [
        Self::Happy,
        Self::Calm,
        Self::Sad,
        Self::Stressed,
        Self::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Calm => "calm",
            Self::Sad => "sad",
            Self::Stressed => "stressed",
            Self::Neutral => "neutral",
            Self::Unset => "unset",
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Self::Happy),
            "calm" => Ok(Self::Calm),
            "sad" => Ok(Self::Sad),
            "stressed" => Ok(Self::Stressed),
            "neutral" => Ok(Self::Neutral),
            "" | "unset" => Ok(Self::Unset),
            _ => Err(format!("Unknown mood: {}", s)),
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Mood {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Mood::Unset => serializer.serialize_none(),
            mood => serializer.serialize_str(mood.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Mood::Unset),
            Some(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Monotonic row id; also the insertion order
    pub id: i64,
    pub owner: String,
    /// Always > 0; direction lives in `kind`
    pub amount: Decimal,
    pub category: Category,
    pub description: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub mood: Mood,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}

/// A transaction to be recorded (before DB insertion)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub mood: Mood,
    /// Defaults to the time of insertion
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Transaction amount must be positive, got {}",
                self.amount
            )));
        }
        validate_money("Transaction amount", self.amount)?;
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(Error::Validation(format!(
                "Description exceeds {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        Ok(())
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub owner: String,
    pub title: String,
    /// Always > 0
    pub target_amount: Decimal,
    /// Always >= 0; may exceed the target
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A goal to be created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    pub title: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Goal title is required".into()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(Error::Validation(format!(
                "Goal title exceeds {} characters",
                MAX_TITLE_LEN
            )));
        }
        if self.target_amount <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Goal target must be positive, got {}",
                self.target_amount
            )));
        }
        validate_money("Goal target", self.target_amount)?;
        validate_goal_amount(self.current_amount)
    }
}

/// Check a goal's saved amount (used on create and on progress updates)
pub fn validate_goal_amount(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(Error::Validation(format!(
            "Goal amount cannot be negative, got {}",
            amount
        )));
    }
    validate_money("Goal amount", amount)
}

/// Monthly spending cap for one category (at most one per owner and category)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLimit {
    pub category: Category,
    pub limit: Decimal,
}

impl CategoryLimit {
    pub fn validate(&self) -> Result<()> {
        if self.limit <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Limit for {} must be positive, got {}",
                self.category, self.limit
            )));
        }
        validate_money("Limit", self.limit)
    }
}

/// Validate a full limit set: each limit positive, no category twice
pub fn validate_limit_set(limits: &[CategoryLimit]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for limit in limits {
        limit.validate()?;
        if !seen.insert(limit.category) {
            return Err(Error::Validation(format!(
                "Duplicate limit for {}",
                limit.category
            )));
        }
    }
    Ok(())
}

/// What the user mainly wants from their money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryGoal {
    Save,
    Debt,
    Invest,
    Purchase,
    Emergency,
}

impl PrimaryGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Debt => "debt",
            Self::Invest => "invest",
            Self::Purchase => "purchase",
            Self::Emergency => "emergency",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Save => "Build Savings",
            Self::Debt => "Pay Off Debt",
            Self::Invest => "Start Investing",
            Self::Purchase => "Major Purchase",
            Self::Emergency => "Emergency Fund",
        }
    }
}

impl std::str::FromStr for PrimaryGoal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "save" => Ok(Self::Save),
            "debt" => Ok(Self::Debt),
            "invest" => Ok(Self::Invest),
            "purchase" => Ok(Self::Purchase),
            "emergency" => Ok(Self::Emergency),
            _ => Err(format!("Unknown primary goal: {}", s)),
        }
    }
}

/// Situations that tend to trigger spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingTrigger {
    Stress,
    Boredom,
    Celebration,
    Sadness,
    Social,
    None,
}

impl SpendingTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stress => "stress",
            Self::Boredom => "boredom",
            Self::Celebration => "celebration",
            Self::Sadness => "sadness",
            Self::Social => "social",
            Self::None => "none",
        }
    }
}

impl std::str::FromStr for SpendingTrigger {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stress" => Ok(Self::Stress),
            "boredom" => Ok(Self::Boredom),
            "celebration" => Ok(Self::Celebration),
            "sadness" => Ok(Self::Sadness),
            "social" => Ok(Self::Social),
            "none" => Ok(Self::None),
            _ => Err(format!("Unknown spending trigger: {}", s)),
        }
    }
}

/// How the user balances saving against spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPriority {
    Savings,
    Balance,
    Experiences,
    Security,
    Freedom,
}

impl BudgetPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::Balance => "balance",
            Self::Experiences => "experiences",
            Self::Security => "security",
            Self::Freedom => "freedom",
        }
    }
}

impl std::str::FromStr for BudgetPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "savings" => Ok(Self::Savings),
            "balance" => Ok(Self::Balance),
            "experiences" => Ok(Self::Experiences),
            "security" => Ok(Self::Security),
            "freedom" => Ok(Self::Freedom),
            _ => Err(format!("Unknown budget priority: {}", s)),
        }
    }
}

/// Self-assessed financial literacy, used to pitch assistant explanations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("Unknown experience level: {}", s)),
        }
    }
}

/// Onboarding profile (zero or one per owner)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub monthly_income: Option<Decimal>,
    #[serde(default)]
    pub savings_goal: Option<Decimal>,
    #[serde(default)]
    pub primary_goal: Option<PrimaryGoal>,
    #[serde(default)]
    pub spending_triggers: BTreeSet<SpendingTrigger>,
    #[serde(default)]
    pub budget_priority: Option<BudgetPriority>,
    #[serde(default)]
    pub risk_tolerance: Option<String>,
    #[serde(default)]
    pub financial_experience: Option<ExperienceLevel>,
    /// Set by the store on every upsert; ignored on input
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("monthly_income", self.monthly_income),
            ("savings_goal", self.savings_goal),
        ] {
            if let Some(v) = value {
                if v < Decimal::ZERO {
                    return Err(Error::Validation(format!(
                        "{} cannot be negative, got {}",
                        field, v
                    )));
                }
                validate_money(field, v)?;
            }
        }
        Ok(())
    }
}

/// Profile lookup result; `has_profile` separates "none" from "all empty"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub has_profile: bool,
    pub profile: Option<Profile>,
}

impl From<Option<Profile>> for ProfileResponse {
    fn from(profile: Option<Profile>) -> Self {
        Self {
            has_profile: profile.is_some(),
            profile,
        }
    }
}

/// Everything one computation reads, taken at a single point in time
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub owner: String,
    pub transactions: Vec<Transaction>,
    pub goals: Vec<Goal>,
    pub limits: Vec<CategoryLimit>,
    pub profile: Option<Profile>,
}
