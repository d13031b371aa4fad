use serde::{Deserialize, Serialize};

/// Fundamental ratios for one ticker at retrieval time.
///
/// Any field may be absent when the provider did not report it.
/// Non-finite provider values are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsSnapshot {
    /// Trailing twelve-month price / earnings
    pub trailing_pe: Option<f64>,

    /// Debt to equity, in percent (Yahoo reports 150.0 for 1.5x)
    pub debt_to_equity: Option<f64>,

    /// Net profit margin as a fraction (0.25 = 25%)
    pub profit_margin: Option<f64>,
}

impl FundamentalsSnapshot {
    pub fn new(
        trailing_pe: Option<f64>,
        debt_to_equity: Option<f64>,
        profit_margin: Option<f64>,
    ) -> Self {
        Self {
            trailing_pe: trailing_pe.filter(|v| v.is_finite()),
            debt_to_equity: debt_to_equity.filter(|v| v.is_finite()),
            profit_margin: profit_margin.filter(|v| v.is_finite()),
        }
    }

    /// Number of fields the provider actually reported.
    pub fn reported_fields(&self) -> usize {
        [self.trailing_pe, self.debt_to_equity, self.profit_margin]
            .iter()
            .filter(|v| v.is_some())
            .count()
    }
}
