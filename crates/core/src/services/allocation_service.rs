use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::analysis::{Allocation, AllocationResult};
use crate::models::asset::Equity;
use crate::models::config::validate_budget;

/// Converts per-ticker scores into percentages of the stock budget.
///
/// Invariant: the percentages always sum to the budget and none is negative.
pub struct AllocationService;

impl AllocationService {
    pub fn new() -> Self {
        Self
    }

    /// Split `budget` proportionally to `scores`.
    ///
    /// Negative or non-finite scores count as 0. When nothing is left to
    /// weight by (every score is 0), the budget is split equally.
    pub fn allocate(
        &self,
        scores: &[(Equity, f64)],
        budget: f64,
    ) -> Result<AllocationResult, CoreError> {
        if scores.is_empty() {
            return Err(CoreError::InvalidConfig(
                "Cannot allocate across an empty set of tickers".into(),
            ));
        }
        validate_budget(budget)?;

        let raw: Vec<f64> = scores
            .iter()
            .map(|(_, s)| if s.is_finite() && *s > 0.0 { *s } else { 0.0 })
            .collect();
        // Scaled by the largest score so the sum stays finite.
        let max = raw.iter().copied().fold(0.0, f64::max);
        let weights: Vec<f64> = if max > 0.0 {
            raw.iter().map(|w| w / max).collect()
        } else {
            raw
        };
        let total: f64 = weights.iter().sum();
        let equal_split = total <= 0.0;

        if equal_split {
            warn!(
                tickers = scores.len(),
                "all scores are zero, splitting the stock budget equally"
            );
        }

        let count = scores.len() as f64;
        let allocations = scores
            .iter()
            .zip(&weights)
            .map(|((equity, score), weight)| Allocation {
                equity: equity.clone(),
                score: *score,
                percentage: if equal_split {
                    budget / count
                } else {
                    weight / total * budget
                },
            })
            .collect::<Vec<_>>();

        debug!(budget, total_weight = total, "allocated stock budget");

        Ok(AllocationResult {
            stock_budget: budget,
            index_fund_percentage: 100.0 - budget,
            allocations,
            equal_split,
        })
    }
}

impl Default for AllocationService {
    fn default() -> Self {
        Self::new()
    }
}
