//! Assistant context builder
//!
//! Turns aggregated figures and the optional profile into a compact text block
//! for the conversational assistant. The block is bounded: a fixed number of
//! categories and transactions, and descriptions cut to a character budget.
//! Formatting only touches the text; the `Stats` it reads are unchanged.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::aggregation::Stats;
use crate::ai::ChatTurn;
use crate::models::{Mood, Profile, Transaction};

/// Categories listed in the summary
pub const TOP_CATEGORY_COUNT: usize = 3;

/// Transactions listed in the chat context
pub const RECENT_LINE_COUNT: usize = 5;

/// Conversation turns forwarded by default
pub const DEFAULT_HISTORY_TURNS: usize = 6;

/// Maximum characters of a description shown in a transaction line
pub const DESCRIPTION_BUDGET: usize = 80;

/// Transactions included in an insight request
pub const INSIGHT_WINDOW: usize = 20;

pub const CHAT_SYSTEM_PROMPT: &str = "You are a friendly and helpful financial assistant. \
You help users understand their finances, provide budgeting advice, and answer questions \
about their spending habits. Be conversational, supportive, and give actionable advice. \
Keep responses concise but helpful. If the user's data shows concerning patterns, gently \
point them out.";

pub const INSIGHT_SYSTEM_PROMPT: &str = "You are a helpful financial advisor focused on \
emotional intelligence and smart money management.";

const PROFILE_INSTRUCTION: &str = "Tailor your advice based on their experience level and goals. \
If they're a beginner, keep explanations simple. If advanced, provide detailed analysis.";

const NOT_SET: &str = "Not set";

/// Context handed to the assistant alongside a user message
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantContext {
    /// Financial summary and recent transactions
    pub summary: String,
    /// Profile block; `None` when the owner has no profile
    pub profile: Option<String>,
    /// Most recent conversation turns, oldest first
    pub history: Vec<ChatTurn>,
}

impl AssistantContext {
    /// Build with the default history window
    pub fn build(stats: &Stats, profile: Option<&Profile>, history: &[ChatTurn]) -> Self {
        Self::build_with_turns(stats, profile, history, DEFAULT_HISTORY_TURNS)
    }

    pub fn build_with_turns(
        stats: &Stats,
        profile: Option<&Profile>,
        history: &[ChatTurn],
        turns: usize,
    ) -> Self {
        let start = history.len().saturating_sub(turns);
        Self {
            summary: render_summary(stats),
            profile: profile.map(render_profile),
            history: history[start..].to_vec(),
        }
    }

    /// The full context block (summary followed by the profile, if any)
    pub fn text(&self) -> String {
        match &self.profile {
            Some(profile) => format!("{}\n\n{}", self.summary, profile),
            None => self.summary.clone(),
        }
    }

    /// Messages for a chat turn: instructions, data, history, then the new message
    pub fn chat_messages(&self, message: &str) -> Vec<ChatTurn> {
        let mut messages = Vec::with_capacity(self.history.len() + 3);
        messages.push(ChatTurn::system(CHAT_SYSTEM_PROMPT));
        messages.push(ChatTurn::system(format!(
            "Here's the user's financial data:\n{}",
            self.text()
        )));
        messages.extend(self.history.iter().cloned());
        messages.push(ChatTurn::user(message));
        messages
    }
}

/// Messages for an insight request over the most recent transactions
pub fn insight_prompt(
    recent: &[Transaction],
    mood_spending: &BTreeMap<Mood, Decimal>,
    context: &AssistantContext,
    note: Option<&str>,
) -> Vec<ChatTurn> {
    let lines = if recent.is_empty() {
        "No transactions recorded yet.".to_string()
    } else {
        recent
            .iter()
            .take(INSIGHT_WINDOW)
            .map(transaction_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let moods = if mood_spending.is_empty() {
        "No mood-tagged spending.".to_string()
    } else {
        mood_spending
            .iter()
            .map(|(mood, amount)| format!("{} {}", mood, format_amount(*amount)))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut context_text = context.text();
    if let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) {
        context_text.push_str("\n\nUser note: ");
        context_text.push_str(note);
    }

    let prompt = format!(
        "You are a financial advisor analyzing spending patterns and emotional well-being.\n\n\
User's recent transactions:\n{lines}\n\n\
Spending by mood: {moods}\n\n\
Context: {context_text}\n\n\
Provide:\n\
1. Key spending patterns\n\
2. Emotional spending insights (how mood affects spending)\n\
3. 2-3 actionable recommendations\n\n\
Keep response concise and friendly."
    );

    vec![ChatTurn::system(INSIGHT_SYSTEM_PROMPT), ChatTurn::user(prompt)]
}

/// Two-decimal rendering of an amount
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// `- kind: amount on category - description (Mood: mood)`
pub fn transaction_line(tx: &Transaction) -> String {
    let mood = if tx.mood.is_set() {
        tx.mood.as_str()
    } else {
        "N/A"
    };
    format!(
        "- {}: {} on {} - {} (Mood: {})",
        tx.kind,
        format_amount(tx.amount),
        tx.category,
        truncate(&tx.description, DESCRIPTION_BUDGET),
        mood
    )
}

fn truncate(text: &str, budget: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let cut: String = text.chars().take(budget).collect();
    format!("{}...", cut.trim_end())
}

fn render_summary(stats: &Stats) -> String {
    let top = stats.top_categories(TOP_CATEGORY_COUNT);
    let top_line = if top.is_empty() {
        "None".to_string()
    } else {
        top.iter()
            .map(|(category, amount)| format!("{} ({})", category, format_amount(*amount)))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let recent = if stats.recent_transactions.is_empty() {
        "No transactions recorded yet.".to_string()
    } else {
        stats
            .recent_transactions
            .iter()
            .take(RECENT_LINE_COUNT)
            .map(transaction_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "User's Financial Summary:\n\
- Balance: {}\n\
- Total Income: {}\n\
- Total Expenses: {}\n\
- Number of Transactions: {}\n\
- Top Spending Categories: {}\n\n\
Recent Transactions:\n{}",
        format_amount(stats.balance),
        format_amount(stats.total_income),
        format_amount(stats.total_expenses),
        stats.transaction_count,
        top_line,
        recent
    )
}

fn render_profile(profile: &Profile) -> String {
    let amount = |value: Option<Decimal>| value.map(format_amount).unwrap_or_else(|| NOT_SET.into());
    let triggers = if profile.spending_triggers.is_empty() {
        NOT_SET.to_string()
    } else {
        profile
            .spending_triggers
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let risk = profile
        .risk_tolerance
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(NOT_SET);

    format!(
        "User's Personal Profile:\n\
- Monthly Income: {}\n\
- Savings Goal: {}\n\
- Primary Goal: {}\n\
- Spending Triggers: {}\n\
- Budget Priority: {}\n\
- Risk Tolerance: {}\n\
- Financial Experience: {}\n\n\
{}",
        amount(profile.monthly_income),
        amount(profile.savings_goal),
        profile.primary_goal.map(|g| g.as_str()).unwrap_or(NOT_SET),
        triggers,
        profile.budget_priority.map(|p| p.as_str()).unwrap_or(NOT_SET),
        risk,
        profile
            .financial_experience
            .map(|e| e.as_str())
            .unwrap_or(NOT_SET),
        PROFILE_INSTRUCTION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::compute_stats;
    use crate::ai::ChatRole;
    use crate::models::{Category, ExperienceLevel, PrimaryGoal, SpendingTrigger};
    use crate::mood::mood_spending;
    use crate::test_fixtures::{expense, scenario_a};
    use rust_decimal_macros::dec;

    #[test]
    fn test_scenario_d_omits_profile_block() {
        let context = AssistantContext::build(&compute_stats(&[]), None, &[]);

        assert!(context.profile.is_none());
        let text = context.text();
        assert!(!text.contains("Personal Profile"));
        assert!(!text.contains(NOT_SET));
        assert!(text.contains("- Balance: 0.00"));
        assert!(text.contains("- Top Spending Categories: None"));
        assert!(text.contains("No transactions recorded yet."));
    }

    #[test]
    fn test_summary_figures_and_lines() {
        let context = AssistantContext::build(&compute_stats(&scenario_a()), None, &[]);
        let text = context.text();

        assert!(text.contains("- Balance: 48500.00"));
        assert!(text.contains("- Total Income: 50000.00"));
        assert!(text.contains("- Total Expenses: 1500.00"));
        assert!(text.contains("- Number of Transactions: 3"));
        assert!(text.contains("- Top Spending Categories: Food & Dining (1500.00)"));
        assert!(text.contains("- expense: 1200.00 on Food & Dining - Food & Dining #2 (Mood: happy)"));
        assert!(text.contains("- income: 50000.00 on Salary - Salary #1 (Mood: N/A)"));
    }

    #[test]
    fn test_top_three_categories_only() {
        let ledger = vec![
            expense(1, dec!(10), Category::Travel, Mood::Unset),
            expense(2, dec!(40), Category::Shopping, Mood::Unset),
            expense(3, dec!(30), Category::Education, Mood::Unset),
            expense(4, dec!(20), Category::Healthcare, Mood::Unset),
        ];
        let text = AssistantContext::build(&compute_stats(&ledger), None, &[]).text();

        assert!(text.contains(
            "- Top Spending Categories: Shopping (40.00), Education (30.00), Healthcare (20.00)"
        ));
    }

    #[test]
    fn test_recent_lines_bounded() {
        let ledger: Vec<_> = (1..=12)
            .map(|id| expense(id, dec!(1), Category::Other, Mood::Unset))
            .collect();
        let text = AssistantContext::build(&compute_stats(&ledger), None, &[]).text();

        let lines = text.lines().filter(|l| l.starts_with("- expense:")).count();
        assert_eq!(lines, RECENT_LINE_COUNT);
    }

    #[test]
    fn test_long_description_truncated() {
        let mut tx = expense(1, dec!(5), Category::Other, Mood::Unset);
        tx.description = "x".repeat(500);
        let line = transaction_line(&tx);

        assert!(line.contains(&format!("{}...", "x".repeat(DESCRIPTION_BUDGET))));
        assert!(!line.contains(&"x".repeat(DESCRIPTION_BUDGET + 1)));
    }

    #[test]
    fn test_amount_formatting_two_decimals() {
        assert_eq!(format_amount(dec!(1500)), "1500.00");
        assert_eq!(format_amount(dec!(-150.5)), "-150.50");
        assert_eq!(format_amount(dec!(0.125)), "0.13");
    }

    #[test]
    fn test_profile_block_with_defaults() {
        let profile = Profile {
            monthly_income: Some(dec!(50000)),
            primary_goal: Some(PrimaryGoal::Save),
            spending_triggers: [SpendingTrigger::Stress, SpendingTrigger::Boredom]
                .into_iter()
                .collect(),
            financial_experience: Some(ExperienceLevel::Beginner),
            ..Default::default()
        };
        let context = AssistantContext::build(&compute_stats(&[]), Some(&profile), &[]);
        let block = context.profile.clone().unwrap();

        assert!(block.contains("- Monthly Income: 50000.00"));
        assert!(block.contains("- Savings Goal: Not set"));
        assert!(block.contains("- Primary Goal: save"));
        assert!(block.contains("- Spending Triggers: stress, boredom"));
        assert!(block.contains("- Budget Priority: Not set"));
        assert!(block.contains("- Risk Tolerance: Not set"));
        assert!(block.contains("- Financial Experience: beginner"));
        assert!(block.contains("If they're a beginner"));
        assert!(context.text().ends_with(&block));
    }

    #[test]
    fn test_history_passes_last_six_unmodified() {
        let history: Vec<ChatTurn> = (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    ChatTurn::user(format!("question {}", i))
                } else {
                    ChatTurn::assistant(format!("answer {}", i))
                }
            })
            .collect();
        let context = AssistantContext::build(&compute_stats(&[]), None, &history);

        assert_eq!(context.history, history[4..].to_vec());
    }

    #[test]
    fn test_short_history_kept_whole() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        let context = AssistantContext::build(&compute_stats(&[]), None, &history);
        assert_eq!(context.history, history);
    }

    #[test]
    fn test_chat_messages_order() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        let context = AssistantContext::build(&compute_stats(&scenario_a()), None, &history);
        let messages = context.chat_messages("Can I afford a trip?");

        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].content, CHAT_SYSTEM_PROMPT);
        assert_eq!(messages[1].role, ChatRole::System);
        assert!(messages[1].content.contains("Balance: 48500.00"));
        assert_eq!(messages[2], history[0]);
        assert_eq!(messages[4], ChatTurn::user("Can I afford a trip?"));
    }

    #[test]
    fn test_insight_prompt_includes_moods_and_note() {
        let ledger = scenario_a();
        let stats = compute_stats(&ledger);
        let context = AssistantContext::build(&stats, None, &[]);
        let messages = insight_prompt(&ledger, &mood_spending(&ledger), &context, Some("New job"));

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, INSIGHT_SYSTEM_PROMPT);
        let prompt = &messages[1].content;
        assert!(prompt.contains("Spending by mood: happy 1200.00, stressed 300.00"));
        assert!(prompt.contains("User note: New job"));
        assert!(prompt.contains("2-3 actionable recommendations"));
    }

    #[test]
    fn test_context_build_does_not_alter_stats() {
        let stats = compute_stats(&scenario_a());
        let before = stats.clone();
        let _ = AssistantContext::build(&stats, None, &[]);
        assert_eq!(stats, before);
    }
}
