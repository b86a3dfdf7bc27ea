//! Portfolio aggregates derived from a batch: totals, a guarded average and
//! the defensive cash floor.
//!
//! Nothing here is stored. An empty portfolio has no average rather than 0/0.

use serde::Serialize;

use crate::limits::resolve_min_cash;
use crate::{ClassificationResult, EngineError, LimitsConfig, Position, PositionStatus};

/// Derived portfolio aggregates. Never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub position_count: usize,
    /// Σ allocation, percent.
    pub total_allocation: f64,
    /// `None` for an empty portfolio (no 0/0).
    pub average_position_size: Option<f64>,
}

impl PortfolioSummary {
    /// Uninvested share of the portfolio, floored at 0.
    pub fn cash_allocation(&self) -> f64 {
        (100.0 - self.total_allocation).max(0.0)
    }
}

pub fn summarize(positions: &[Position]) -> PortfolioSummary {
    let total_allocation: f64 = positions.iter().map(|p| p.allocation).sum();
    let position_count = positions.len();
    let average_position_size = if position_count > 0 {
        Some(total_allocation / position_count as f64)
    } else {
        None
    };

    PortfolioSummary {
        position_count,
        total_allocation,
        average_position_size,
    }
}

/// Cash reserve check against the defensive `minCash` floor.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashReserve {
    pub required: f64,
    pub actual: f64,
    /// `max(0, required - actual)`.
    pub shortfall: f64,
}

impl CashReserve {
    pub fn is_breached(&self) -> bool {
        self.shortfall > 0.0
    }
}

/// `Ok(None)` while defensive mode is off: the floor only applies risk-off.
pub fn cash_reserve(
    summary: &PortfolioSummary,
    cfg: &LimitsConfig,
) -> Result<Option<CashReserve>, EngineError> {
    if !cfg.defensive_mode_active {
        return Ok(None);
    }
    let required = resolve_min_cash(cfg)?;
    let actual = summary.cash_allocation();
    Ok(Some(CashReserve {
        required,
        actual,
        shortfall: (required - actual).max(0.0),
    }))
}

/// Tally of outcomes across a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub ok: usize,
    pub near_limit: usize,
    pub over_limit: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn record(&mut self, outcome: &Result<ClassificationResult, EngineError>) {
        match outcome {
            Ok(r) => match r.status {
                PositionStatus::Ok => self.ok += 1,
                PositionStatus::NearLimit => self.near_limit += 1,
                PositionStatus::OverLimit => self.over_limit += 1,
            },
            Err(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.ok + self.near_limit + self.over_limit + self.failed
    }
}
