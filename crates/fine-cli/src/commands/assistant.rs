//! Assistant command implementations (chat, insights)

use anyhow::Result;
use fine_core::context::format_amount;
use fine_core::FinanceService;

fn print_setup_tip(service: &FinanceService) {
    if service.ai().is_none() {
        println!();
        println!("   💡 Tip: Set OLLAMA_HOST (or AI_BACKEND=openai_compatible with OPENAI_COMPATIBLE_HOST)");
        println!("      to enable the assistant");
    }
}

pub async fn cmd_chat(service: &FinanceService, owner: &str, message: &str) -> Result<()> {
    let reply = service.build_assistant_reply(owner, message, &[]).await?;

    println!();
    println!("💬 {}", reply.reply);
    println!();
    println!(
        "   Balance {} │ Income {} │ Expenses {}",
        format_amount(reply.stats.balance),
        format_amount(reply.stats.total_income),
        format_amount(reply.stats.total_expenses)
    );

    if reply.degraded {
        print_setup_tip(service);
    }
    Ok(())
}

pub async fn cmd_insights(service: &FinanceService, owner: &str, note: Option<&str>) -> Result<()> {
    println!("🤖 Analyzing your spending...");
    let report = service.generate_insight(owner, note).await?;

    println!();
    println!("💡 Insights ({} transactions analyzed)", report.transactions_analyzed);
    println!("   ─────────────────────────────────────────────────────────────");
    for line in report.insight.lines() {
        println!("   {}", line);
    }

    if report.degraded {
        print_setup_tip(service);
    }
    Ok(())
}
