//! Position classification against its resolved ceiling.
//!
//! Precedence (first match wins):
//! 1. `allocation >  limit`              => OVER_LIMIT
//! 2. `allocation >= limit * 0.8`        => NEAR_LIMIT
//! 3. otherwise                          => OK
//!
//! `allocation == limit` is NOT over the limit.

use crate::limits::resolve_limit;
use crate::{ClassificationResult, EngineError, LimitsConfig, Position, PositionStatus};

/// Fraction of the ceiling at which a position is flagged as near its limit.
pub const NEAR_LIMIT_FRACTION: f64 = 0.8;

/// Classify one position under `cfg`.
pub fn classify(position: &Position, cfg: &LimitsConfig) -> Result<ClassificationResult, EngineError> {
    check_allocation(&position.ticker, position.allocation)?;
    let limit = resolve_limit(position.asset_type, cfg)?;
    classify_against(position.allocation, limit)
}

/// Allocations are percentages of the portfolio: finite and `>= 0`.
pub(crate) fn check_allocation(ticker: &str, allocation: f64) -> Result<(), EngineError> {
    if allocation.is_finite() && allocation >= 0.0 {
        return Ok(());
    }
    Err(EngineError::InvalidPosition {
        ticker: ticker.to_string(),
        reason: format!("allocation {allocation} must be a finite value >= 0"),
    })
}

/// Classify an allocation against an already-resolved ceiling.
///
/// A zero (or otherwise non-positive) ceiling is a config error, not a
/// division. A NaN, infinite or negative allocation is `InvalidPosition`.
pub fn classify_against(allocation: f64, limit: f64) -> Result<ClassificationResult, EngineError> {
    check_allocation("", allocation)?;
    if !(limit.is_finite() && limit > 0.0) {
        return Err(EngineError::InvalidConfig {
            field: "limit",
            value: Some(limit),
        });
    }

    let status = status_for(allocation, limit);

    Ok(ClassificationResult {
        limit,
        progress_ratio: progress_ratio(allocation, limit),
        status,
        is_over_limit: status == PositionStatus::OverLimit,
    })
}

/// Status decision only. Caller guarantees `limit > 0` and a checked allocation.
fn status_for(allocation: f64, limit: f64) -> PositionStatus {
    if allocation > limit {
        PositionStatus::OverLimit
    } else if allocation >= limit * NEAR_LIMIT_FRACTION {
        PositionStatus::NearLimit
    } else {
        PositionStatus::Ok
    }
}

/// `allocation / limit` clamped to `[0, 1]`. NaN collapses to 0.
fn progress_ratio(allocation: f64, limit: f64) -> f64 {
    let r = allocation / limit;
    if r.is_nan() {
        0.0
    } else {
        r.clamp(0.0, 1.0)
    }
}

/// Classify every position, one result per input in input order.
///
/// Items are independent: an error on one does not affect the others.
pub fn classify_all(
    positions: &[Position],
    cfg: &LimitsConfig,
) -> Vec<Result<ClassificationResult, EngineError>> {
    positions.iter().map(|p| classify(p, cfg)).collect()
}
