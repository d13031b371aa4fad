use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use investor_dashboard_core::models::config::ScoringMode;

#[derive(Parser, Debug)]
#[command(name = "investor-dashboard", about = "Net worth and equity allocation dashboard")]
pub(crate) struct Cli {
    #[arg(long, default_value_t = 30_000.0, help = "Cash (GBP)")]
    pub cash: f64,
    #[arg(long, default_value_t = 19_200.0, help = "ISA (GBP)")]
    pub isa: f64,
    #[arg(long, default_value_t = 2_000.0, help = "Gold (GBP)")]
    pub gold: f64,
    #[arg(long, default_value_t = 200_000.0, help = "Outstanding mortgage (GBP)")]
    pub mortgage: f64,
    #[arg(short, long, help = "Scoring config (JSON); built-in defaults when omitted")]
    pub config: Option<PathBuf>,
    #[arg(short, long, value_enum, help = "Override the configured scoring mode")]
    pub mode: Option<Mode>,
    #[arg(long, help = "Only show the portfolio summary, skip market data")]
    pub skip_equities: bool,
    #[arg(long, help = "Print the equity report as JSON instead of tables")]
    pub json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub(crate) enum Mode {
    Continuous,
    Threshold,
}

impl From<Mode> for ScoringMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Continuous => ScoringMode::Continuous,
            Mode::Threshold => ScoringMode::Threshold,
        }
    }
}
