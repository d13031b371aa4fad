// ═══════════════════════════════════════════════════════════════════
// Model Tests — Equity, holdings, price series, fundamentals, config
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::collections::HashSet;

use investor_dashboard_core::errors::CoreError;
use investor_dashboard_core::models::analysis::{
    Allocation, AllocationResult, ScoreBreakdown, TickerAnalysis, TickerOutcome,
};
use investor_dashboard_core::models::asset::Equity;
use investor_dashboard_core::models::config::{Bounds, ScoringConfig, ScoringMode};
use investor_dashboard_core::models::fundamentals::FundamentalsSnapshot;
use investor_dashboard_core::models::holding::{Holding, HoldingKind, ManualHoldings};
use investor_dashboard_core::models::indicators::{IndicatorSet, IndicatorWindows};
use investor_dashboard_core::models::price::{HistoryPeriod, PriceBar, PriceSeries};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn bar(date: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        date,
        open: close,
        high: close,
        low: close,
        close,
        volume: 1_000,
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Equity
// ═══════════════════════════════════════════════════════════════════

mod equity {
    use super::*;

    #[test]
    fn symbol_is_uppercased_and_trimmed() {
        let e = Equity::new(" ont.l ", "Oxford Nanopore");
        assert_eq!(e.symbol, "ONT.L");
        assert_eq!(e.name, "Oxford Nanopore");
    }

    #[test]
    fn equality_ignores_name() {
        assert_eq!(Equity::new("TSLA", "Tesla"), Equity::new("tsla", "Tesla Inc."));
        assert_ne!(Equity::new("TSLA", "Tesla"), Equity::new("NVDA", "Tesla"));
    }

    #[test]
    fn hash_ignores_name() {
        let mut set = HashSet::new();
        set.insert(Equity::new("NVDA", "Nvidia"));
        set.insert(Equity::new("NVDA", "NVIDIA Corp"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn display_shows_name_and_symbol() {
        assert_eq!(Equity::new("NVDA", "Nvidia").to_string(), "Nvidia (NVDA)");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Holdings
// ═══════════════════════════════════════════════════════════════════

mod holdings {
    use super::*;

    #[test]
    fn defaults_match_dashboard_inputs() {
        let h = ManualHoldings::default();
        assert_eq!(h.cash, 30_000.0);
        assert_eq!(h.isa, 19_200.0);
        assert_eq!(h.gold, 2_000.0);
        assert_eq!(h.mortgage, 200_000.0);
    }

    #[test]
    fn validate_accepts_zero_and_positive() {
        assert!(ManualHoldings::new(0.0, 0.0, 0.0, 0.0).validate().is_ok());
        assert!(ManualHoldings::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative() {
        let err = ManualHoldings::new(10.0, -1.0, 0.0, 0.0)
            .validate()
            .unwrap_err();
        match err {
            CoreError::Validation(msg) => assert!(msg.contains("isa")),
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_non_finite() {
        assert!(ManualHoldings::new(f64::NAN, 0.0, 0.0, 0.0).validate().is_err());
        assert!(ManualHoldings::new(0.0, 0.0, 0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn holding_name_follows_kind() {
        assert_eq!(Holding::new(HoldingKind::Isa, 1.0).name, "ISA");
        assert_eq!(Holding::new(HoldingKind::Mortgage, -1.0).name, "Mortgage (debt)");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PriceSeries / HistoryPeriod
// ═══════════════════════════════════════════════════════════════════

mod price_series {
    use super::*;

    #[test]
    fn new_sorts_bars_by_date() {
        let series = PriceSeries::new(
            "TSLA",
            vec![bar(d(2025, 1, 3), 3.0), bar(d(2025, 1, 1), 1.0), bar(d(2025, 1, 2), 2.0)],
        );
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.last_close(), Some(3.0));
    }

    #[test]
    fn new_keeps_last_bar_for_duplicate_date() {
        let series = PriceSeries::new(
            "TSLA",
            vec![bar(d(2025, 1, 1), 1.0), bar(d(2025, 1, 1), 1.5)],
        );
        assert_eq!(series.len(), 1);
        assert_eq!(series.closes(), vec![1.5]);
    }

    #[test]
    fn empty_series() {
        let series = PriceSeries::new("TSLA", vec![]);
        assert!(series.is_empty());
        assert_eq!(series.last_close(), None);
    }

    #[test]
    fn period_strings() {
        assert_eq!(HistoryPeriod::SixMonths.to_string(), "6mo");
        assert_eq!(HistoryPeriod::OneYear.to_string(), "1y");
        assert_eq!(HistoryPeriod::default(), HistoryPeriod::OneYear);
    }

    #[test]
    fn period_parse() {
        assert_eq!("6mo".parse::<HistoryPeriod>().unwrap(), HistoryPeriod::SixMonths);
        assert_eq!(" 1Y ".parse::<HistoryPeriod>().unwrap(), HistoryPeriod::OneYear);
        assert!(matches!(
            "5d".parse::<HistoryPeriod>(),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn period_start_date() {
        assert_eq!(HistoryPeriod::OneYear.start_date(d(2025, 6, 30)), d(2024, 6, 30));
    }

    #[test]
    fn period_serde_uses_provider_strings() {
        let json = serde_json::to_string(&HistoryPeriod::SixMonths).unwrap();
        assert_eq!(json, "\"6mo\"");
        let back: HistoryPeriod = serde_json::from_str("\"1y\"").unwrap();
        assert_eq!(back, HistoryPeriod::OneYear);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  FundamentalsSnapshot
// ═══════════════════════════════════════════════════════════════════

mod fundamentals {
    use super::*;

    #[test]
    fn non_finite_values_become_missing() {
        let f = FundamentalsSnapshot::new(Some(f64::NAN), Some(f64::INFINITY), Some(0.2));
        assert_eq!(f.trailing_pe, None);
        assert_eq!(f.debt_to_equity, None);
        assert_eq!(f.profit_margin, Some(0.2));
        assert_eq!(f.reported_fields(), 1);
    }

    #[test]
    fn default_reports_nothing() {
        assert_eq!(FundamentalsSnapshot::default().reported_fields(), 0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  IndicatorWindows / ScoringConfig
// ═══════════════════════════════════════════════════════════════════

mod config {
    use super::*;

    #[test]
    fn default_windows() {
        let w = IndicatorWindows::default();
        assert_eq!((w.ma_short, w.ma_long, w.rsi), (50, 200, 14));
        assert_eq!((w.macd_fast, w.macd_slow, w.macd_signal), (12, 26, 9));
    }

    #[test]
    fn default_config_is_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stock_budget, 60.0);
        assert_eq!(config.mode, ScoringMode::Continuous);
        let symbols: Vec<&str> = config.equities.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["TSLA", "NVDA", "ONT.L"]);
    }

    #[test]
    fn default_weights_sum_to_one() {
        let c = ScoringConfig::default();
        let cw = &c.continuous_weights;
        let tw = &c.threshold_weights;
        let continuous = cw.rsi + cw.macd + cw.pe_ratio + cw.debt_to_equity + cw.profit_margin;
        let threshold = tw.pe_ratio + tw.debt_to_equity + tw.profit_margin + tw.golden_cross + tw.rsi;
        assert!((continuous - 1.0).abs() < 1e-9);
        assert!((threshold - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_equities_rejected() {
        let config = ScoringConfig {
            equities: vec![],
            ..ScoringConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn duplicate_symbols_rejected() {
        let config = ScoringConfig {
            equities: vec![Equity::new("TSLA", "Tesla"), Equity::new("tsla", "Tesla again")],
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn budget_out_of_range_rejected() {
        for budget in [-1.0, 100.5, f64::NAN] {
            let config = ScoringConfig {
                stock_budget: budget,
                ..ScoringConfig::default()
            };
            assert!(config.validate().is_err(), "budget {budget} accepted");
        }
    }

    #[test]
    fn inverted_bounds_rejected() {
        let mut config = ScoringConfig::default();
        config.bounds.rsi = Bounds::new(70.0, 30.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn weights_not_summing_to_one_rejected() {
        let mut config = ScoringConfig::default();
        config.threshold_weights.rsi = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("threshold_weights"));
    }

    #[test]
    fn zero_window_rejected() {
        let mut config = ScoringConfig::default();
        config.windows.rsi = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let json = r#"{
            "equities": [{"symbol": "aapl", "name": "Apple"}],
            "mode": "threshold",
            "stock_budget": 100.0
        }"#;
        let config = ScoringConfig::from_json_str(json).unwrap();
        assert_eq!(config.equities, vec![Equity::new("AAPL", "Apple")]);
        assert_eq!(config.equities[0].symbol, "AAPL");
        assert_eq!(config.mode, ScoringMode::Threshold);
        assert_eq!(config.stock_budget, 100.0);
        assert_eq!(config.windows, IndicatorWindows::default());
        assert_eq!(config.history_period, HistoryPeriod::OneYear);
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = ScoringConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(ScoringConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn invalid_json_is_deserialization_error() {
        assert!(matches!(
            ScoringConfig::from_json_str("{not json"),
            Err(CoreError::Deserialization(_))
        ));
    }

    #[test]
    fn json_with_empty_equities_is_rejected() {
        assert!(matches!(
            ScoringConfig::from_json_str(r#"{"equities": []}"#),
            Err(CoreError::InvalidConfig(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Outcomes / allocation results
// ═══════════════════════════════════════════════════════════════════

mod outcomes {
    use super::*;

    fn breakdown(total: f64) -> ScoreBreakdown {
        ScoreBreakdown {
            mode: ScoringMode::Continuous,
            rsi: total,
            macd: 0.0,
            pe_ratio: 0.0,
            debt_to_equity: 0.0,
            profit_margin: 0.0,
            golden_cross: 0.0,
            total,
        }
    }

    #[test]
    fn failed_outcome_scores_zero() {
        let outcome = TickerOutcome::Failed {
            equity: Equity::new("TSLA", "Tesla"),
            reason: "timeout".into(),
        };
        assert_eq!(outcome.score(), 0.0);
        assert!(outcome.is_failed());
        assert_eq!(outcome.equity().symbol, "TSLA");
    }

    #[test]
    fn scored_outcome_reports_total() {
        let outcome = TickerOutcome::Scored(TickerAnalysis {
            equity: Equity::new("NVDA", "Nvidia"),
            fundamentals: FundamentalsSnapshot::default(),
            indicators: IndicatorSet::default(),
            breakdown: breakdown(0.42),
            chart: vec![],
        });
        assert_eq!(outcome.score(), 0.42);
        assert!(!outcome.is_failed());
    }

    #[test]
    fn allocation_result_lookup_is_case_insensitive() {
        let result = AllocationResult {
            stock_budget: 60.0,
            index_fund_percentage: 40.0,
            allocations: vec![
                Allocation {
                    equity: Equity::new("ONT.L", "Oxford Nanopore"),
                    score: 1.0,
                    percentage: 45.0,
                },
                Allocation {
                    equity: Equity::new("TSLA", "Tesla"),
                    score: 0.0,
                    percentage: 15.0,
                },
            ],
            equal_split: false,
        };
        assert_eq!(result.percentage_for("ont.l"), Some(45.0));
        assert_eq!(result.percentage_for("NVDA"), None);
        assert_eq!(result.total_percentage(), 60.0);
    }
}
