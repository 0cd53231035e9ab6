//! Report command implementations (stats, moods)

use anyhow::Result;
use fine_core::aggregation::display_percentage;
use fine_core::context::format_amount;
use fine_core::FinanceService;

use super::{bar, colored_amount, truncate};

pub fn cmd_stats(service: &FinanceService, owner: &str, json: bool) -> Result<()> {
    let dashboard = service.dashboard(owner)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    let stats = &dashboard.stats;
    println!();
    println!("📊 Financial Summary");
    println!("   ─────────────────────────────────────");
    println!("   Balance:        {:>12}", format_amount(stats.balance));
    println!("   Total income:   {:>12}", format_amount(stats.total_income));
    println!("   Total expenses: {:>12}", format_amount(stats.total_expenses));
    println!("   Transactions:   {:>12}", stats.transaction_count);

    if stats.transaction_count > 0 {
        println!(
            "   Cash flow:      {}% in / {}% out",
            dashboard.cash_flow.income_share.round_dp(1),
            dashboard.cash_flow.expense_share.round_dp(1)
        );
    }

    if !dashboard.category_breakdown.is_empty() {
        println!();
        println!("💸 Spending by Category");
        println!("   ─────────────────────────────────────────────────────────────");
        for row in &dashboard.category_breakdown {
            println!(
                "   {:<20} {} {:>12} {:>6}%",
                row.category.as_str(),
                bar(row.bar_width, 20),
                format_amount(row.amount),
                row.share.round_dp(1)
            );
        }
    }

    if !stats.recent_transactions.is_empty() {
        println!();
        println!("🕒 Recent");
        for tx in &stats.recent_transactions {
            println!(
                "   {} │ {:>12} │ {}",
                tx.occurred_at.format("%Y-%m-%d"),
                colored_amount(tx.amount, tx.is_income()),
                truncate(&tx.description, 40)
            );
        }
    }

    Ok(())
}

pub fn cmd_moods(service: &FinanceService, owner: &str) -> Result<()> {
    let analysis = service.mood_analysis(owner)?;

    if analysis.bars.is_empty() {
        println!("No mood-tagged spending yet. Tag an expense with:");
        println!("  fine tx add 30 -c shopping -m stressed");
        return Ok(());
    }

    let tagged_total: rust_decimal::Decimal = analysis.mood_spending.values().sum();

    println!();
    println!("🧠 Spending by Mood");
    println!("   ─────────────────────────────────────────────────────────────");
    for mood_bar in &analysis.bars {
        println!(
            "   {:<10} {} {:>12} {:>6}%",
            mood_bar.mood.as_str(),
            bar(mood_bar.percent_of_max, 20),
            format_amount(mood_bar.amount),
            display_percentage(mood_bar.amount, tagged_total)
        );
    }

    if !analysis.untagged_spending.is_zero() {
        println!();
        println!(
            "   Untagged spending: {}",
            format_amount(analysis.untagged_spending)
        );
    }

    Ok(())
}
