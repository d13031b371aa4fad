use crate::models::holding::{Holding, HoldingKind, ManualHoldings, NetWorthSummary};

/// Aggregates the manual portfolio into a signed table and a net worth.
///
/// Pure business logic: no I/O, no API calls. Inputs are validated at the
/// boundary (`ManualHoldings::validate`).
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Four line items (mortgage negated) and
    /// `net_worth = cash + isa + gold - mortgage`.
    pub fn compute_net_worth(&self, holdings: &ManualHoldings) -> NetWorthSummary {
        let line_items = vec![
            Holding::new(HoldingKind::Cash, holdings.cash),
            Holding::new(HoldingKind::Isa, holdings.isa),
            Holding::new(HoldingKind::Gold, holdings.gold),
            Holding::new(HoldingKind::Mortgage, -holdings.mortgage),
        ];
        let net_worth = line_items.iter().map(|h| h.value).sum();

        NetWorthSummary {
            line_items,
            net_worth,
        }
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
