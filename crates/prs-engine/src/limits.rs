//! Limit resolution: which ceiling applies to a position right now.
//!
//! Pure, O(1). The active block is chosen solely by
//! `LimitsConfig::defensive_mode_active`; the missing-limit policy decides
//! what an absent field means.

use crate::{AssetType, EngineError, LimitPolicy, LimitsConfig};

/// Documented fallback table (percent of portfolio).
pub mod defaults {
    pub const MAX_STOCK_POSITION: f64 = 10.0;
    pub const MAX_CRYPTO_POSITION: f64 = 5.0;
    pub const SINGLE_STOCK_MAX: f64 = 5.0;
    pub const SINGLE_CRYPTO_MAX: f64 = 2.5;
    pub const MIN_CASH: f64 = 30.0;
}

/// Resolve the allocation ceiling for `asset_type` under the active block.
pub fn resolve_limit(asset_type: AssetType, cfg: &LimitsConfig) -> Result<f64, EngineError> {
    let (field, value, default) = match (cfg.defensive_mode_active, asset_type) {
        (false, AssetType::Stock) => (
            "positionLimits.maxStockPosition",
            cfg.position_limits.max_stock_position,
            defaults::MAX_STOCK_POSITION,
        ),
        (false, AssetType::Crypto) => (
            "positionLimits.maxCryptoPosition",
            cfg.position_limits.max_crypto_position,
            defaults::MAX_CRYPTO_POSITION,
        ),
        (true, AssetType::Stock) => (
            "defensiveLimits.singleStockMax",
            cfg.defensive_limits.single_stock_max,
            defaults::SINGLE_STOCK_MAX,
        ),
        (true, AssetType::Crypto) => (
            "defensiveLimits.singleCryptoMax",
            cfg.defensive_limits.single_crypto_max,
            defaults::SINGLE_CRYPTO_MAX,
        ),
    };

    require_positive(field, value, default, cfg.missing_limits)
}

/// Resolve the asset type from its wire string first, then the ceiling.
pub fn resolve_limit_str(asset_type: &str, cfg: &LimitsConfig) -> Result<f64, EngineError> {
    resolve_limit(asset_type.parse()?, cfg)
}

/// Minimum cash reserve (percent) while defensive mode is active.
pub fn resolve_min_cash(cfg: &LimitsConfig) -> Result<f64, EngineError> {
    require_positive(
        "defensiveLimits.minCash",
        cfg.defensive_limits.min_cash,
        defaults::MIN_CASH,
        cfg.missing_limits,
    )
}

/// Zero is a present value, not a missing one: it fails under either policy.
fn require_positive(
    field: &'static str,
    value: Option<f64>,
    default: f64,
    policy: LimitPolicy,
) -> Result<f64, EngineError> {
    match (value, policy) {
        (Some(v), _) if v.is_finite() && v > 0.0 => Ok(v),
        (Some(v), _) => Err(EngineError::InvalidConfig {
            field,
            value: Some(v),
        }),
        (None, LimitPolicy::Fallback) => Ok(default),
        (None, LimitPolicy::Strict) => Err(EngineError::InvalidConfig { field, value: None }),
    }
}
