use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// The four fixed line items of the manual portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldingKind {
    Cash,
    Isa,
    Gold,
    /// Debt; its line item value is always negative.
    Mortgage,
}

impl std::fmt::Display for HoldingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoldingKind::Cash => write!(f, "Cash"),
            HoldingKind::Isa => write!(f, "ISA"),
            HoldingKind::Gold => write!(f, "Gold"),
            HoldingKind::Mortgage => write!(f, "Mortgage (debt)"),
        }
    }
}

/// One signed row of the portfolio table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub kind: HoldingKind,

    /// Display label for the row (e.g., "ISA", "Mortgage (debt)")
    pub name: String,

    /// Signed currency amount; negative for debt
    pub value: f64,
}

impl Holding {
    pub fn new(kind: HoldingKind, value: f64) -> Self {
        Self {
            kind,
            name: kind.to_string(),
            value,
        }
    }
}

/// Manually entered portfolio values. All four are non-negative amounts;
/// `mortgage` is the outstanding debt, not a negated value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualHoldings {
    pub cash: f64,
    pub isa: f64,
    pub gold: f64,
    pub mortgage: f64,
}

impl Default for ManualHoldings {
    fn default() -> Self {
        Self {
            cash: 30_000.0,
            isa: 19_200.0,
            gold: 2_000.0,
            mortgage: 200_000.0,
        }
    }
}

impl ManualHoldings {
    pub fn new(cash: f64, isa: f64, gold: f64, mortgage: f64) -> Self {
        Self {
            cash,
            isa,
            gold,
            mortgage,
        }
    }

    /// Boundary check: every input must be finite and non-negative.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("cash", self.cash),
            ("isa", self.isa),
            ("gold", self.gold),
            ("mortgage", self.mortgage),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Validation(format!(
                    "{field} must be a finite, non-negative amount (got {value})"
                )));
            }
        }
        Ok(())
    }
}

/// Net worth plus the signed table it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetWorthSummary {
    /// Cash, ISA, Gold, Mortgage, in that order
    pub line_items: Vec<Holding>,

    /// cash + isa + gold - mortgage
    pub net_worth: f64,
}
