use anyhow::Context;
use clap::Parser;
use investor_dashboard_core::{
    models::{
        analysis::{EquityReport, TickerOutcome},
        config::ScoringConfig,
        holding::{ManualHoldings, NetWorthSummary},
    },
    InvestorDashboard,
};
use tracing_subscriber::EnvFilter;

mod cli;

fn format_money(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-£{grouped}")
    } else {
        format!("£{grouped}")
    }
}

fn format_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn print_portfolio(summary: &NetWorthSummary) {
    println!("Portfolio Summary");
    for item in &summary.line_items {
        println!("  - {:<16} {:>12}", item.name, format_money(item.value));
    }
    println!("  Net worth: {}", format_money(summary.net_worth));
    println!();
}

fn print_report(report: &EquityReport) {
    println!("Stock Analysis");
    for outcome in &report.outcomes {
        match outcome {
            TickerOutcome::Scored(analysis) => {
                let f = &analysis.fundamentals;
                let i = &analysis.indicators;
                println!("  {}", analysis.equity);
                println!(
                    "    P/E {}  D/E {}  margin {}",
                    format_opt(f.trailing_pe),
                    format_opt(f.debt_to_equity),
                    format_opt(f.profit_margin)
                );
                println!(
                    "    RSI {}  MACD hist {}  golden cross {}",
                    format_opt(i.rsi),
                    format_opt(i.macd_histogram),
                    if i.golden_cross { "yes" } else { "no" }
                );
                println!(
                    "    score {:.3} ({} mode)",
                    analysis.breakdown.total, analysis.breakdown.mode
                );
            }
            TickerOutcome::Failed { equity, reason } => {
                println!("  {equity}");
                println!("    error fetching data: {reason}");
            }
        }
    }
    println!();

    let allocation = &report.allocation;
    println!(
        "Suggested Allocation ({:.0}% Stock Portion)",
        allocation.stock_budget
    );
    for a in &allocation.allocations {
        println!(
            "  - {:<20} score {:.3}  {:>6.2}%",
            a.equity.name, a.score, a.percentage
        );
    }
    println!(
        "  - {:<20} {:>19.2}%",
        "Index fund", allocation.index_fund_percentage
    );
    if allocation.equal_split {
        println!("  (no ticker scored above zero; stock portion split equally)");
    }
}

fn load_config(opts: &cli::Cli) -> anyhow::Result<ScoringConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {path:?}"))?;
            ScoringConfig::from_json_str(&json)
                .with_context(|| format!("Invalid config file {path:?}"))?
        }
        None => ScoringConfig::default(),
    };
    if let Some(mode) = opts.mode {
        config.mode = mode.into();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let opts = cli::Cli::parse();

    let holdings = ManualHoldings::new(opts.cash, opts.isa, opts.gold, opts.mortgage);
    holdings.validate()?;

    let config = load_config(&opts)?;
    let dashboard = InvestorDashboard::new(config)?;

    print_portfolio(&dashboard.compute_net_worth(&holdings));

    if opts.skip_equities {
        return Ok(());
    }

    let report = dashboard.analyze_equities().await?;
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
