use serde::{Deserialize, Serialize};

/// An equity tracked by the scoring engine.
///
/// **Equality and hashing** are based solely on `symbol`, NOT on `name`,
/// so lookups stay consistent regardless of the display name used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equity {
    /// Exchange ticker, uppercased (e.g., "TSLA", "ONT.L")
    pub symbol: String,

    /// Human-readable name (e.g., "Tesla", "Oxford Nanopore")
    pub name: String,
}

impl PartialEq for Equity {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Equity {}

impl std::hash::Hash for Equity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl std::fmt::Display for Equity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}

impl Equity {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            name: name.into(),
        }
    }
}
