use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::classify::check_allocation;
use crate::signal::SignalLabel;
use crate::EngineError;

// ---------------------------------------------------------------------------
// Asset type / regime
// ---------------------------------------------------------------------------

/// Closed set of asset classes the limit table knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Stock,
    Crypto,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "stock",
            AssetType::Crypto => "crypto",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = EngineError;

    /// Unknown values are rejected, never defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stock" => Ok(AssetType::Stock),
            "crypto" => Ok(AssetType::Crypto),
            other => Err(EngineError::InvalidAssetType(other.to_string())),
        }
    }
}

/// Externally determined market regime. The engine only consumes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketRegime {
    RiskOn,
    RiskOff,
}

impl MarketRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketRegime::RiskOn => "RISK_ON",
            MarketRegime::RiskOff => "RISK_OFF",
        }
    }

    /// Defensive limits apply in a risk-off regime.
    pub fn is_defensive(&self) -> bool {
        matches!(self, MarketRegime::RiskOff)
    }
}

impl FromStr for MarketRegime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Case-sensitive, same as the serde wire names.
        match s.trim() {
            "RISK_ON" => Ok(MarketRegime::RiskOn),
            "RISK_OFF" => Ok(MarketRegime::RiskOff),
            other => Err(format!(
                "invalid regime '{other}'. expected one of: RISK_ON | RISK_OFF"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Limits configuration
// ---------------------------------------------------------------------------

/// What the resolver does when a limit field is absent.
///
/// Present-but-invalid values (zero, negative, NaN) fail under both policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitPolicy {
    /// Absent field => `InvalidConfig`.
    #[default]
    Strict,
    /// Absent field => documented default.
    Fallback,
}

/// Base (risk-on) per-position ceilings, in percent of portfolio.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PositionLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stock_position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_crypto_position: Option<f64>,
}

impl PositionLimits {
    pub fn new(max_stock_position: f64, max_crypto_position: f64) -> Self {
        Self {
            max_stock_position: Some(max_stock_position),
            max_crypto_position: Some(max_crypto_position),
        }
    }
}

/// Reduced ceilings used only while defensive mode is active.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DefensiveLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_stock_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_crypto_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_cash: Option<f64>,
}

impl DefensiveLimits {
    pub fn new(single_stock_max: f64, single_crypto_max: f64, min_cash: f64) -> Self {
        Self {
            single_stock_max: Some(single_stock_max),
            single_crypto_max: Some(single_crypto_max),
            min_cash: Some(min_cash),
        }
    }
}

/// The only externally tunable engine input.
///
/// Defensive limits are conventionally half the base limits, but nothing here
/// relies on that: whichever block is active is used as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LimitsConfig {
    #[serde(default)]
    pub position_limits: PositionLimits,
    #[serde(default)]
    pub defensive_limits: DefensiveLimits,
    #[serde(default)]
    pub defensive_mode_active: bool,
    #[serde(default)]
    pub missing_limits: LimitPolicy,
}

impl LimitsConfig {
    pub fn new(position_limits: PositionLimits, defensive_limits: DefensiveLimits) -> Self {
        Self {
            position_limits,
            defensive_limits,
            defensive_mode_active: false,
            missing_limits: LimitPolicy::Strict,
        }
    }

    /// Every field populated with the documented default table.
    pub fn documented_defaults() -> Self {
        use crate::limits::defaults;
        Self::new(
            PositionLimits::new(defaults::MAX_STOCK_POSITION, defaults::MAX_CRYPTO_POSITION),
            DefensiveLimits::new(
                defaults::SINGLE_STOCK_MAX,
                defaults::SINGLE_CRYPTO_MAX,
                defaults::MIN_CASH,
            ),
        )
    }

    pub fn with_defensive_mode(mut self, active: bool) -> Self {
        self.defensive_mode_active = active;
        self
    }

    pub fn with_regime(self, regime: MarketRegime) -> Self {
        self.with_defensive_mode(regime.is_defensive())
    }

    pub fn with_policy(mut self, policy: LimitPolicy) -> Self {
        self.missing_limits = policy;
        self
    }

    /// Regime implied by the defensive flag.
    pub fn regime(&self) -> MarketRegime {
        if self.defensive_mode_active {
            MarketRegime::RiskOff
        } else {
            MarketRegime::RiskOn
        }
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// A validated position as the engine sees it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub ticker: String,
    pub asset_type: AssetType,
    /// Percent of portfolio held.
    pub allocation: f64,
    /// Model output in `[0, 100]`; `None` means no signal available.
    pub score: Option<f64>,
    /// Precomputed label; takes precedence over `score`.
    pub signal: Option<SignalLabel>,
}

impl Position {
    pub fn new(ticker: impl Into<String>, asset_type: AssetType, allocation: f64) -> Self {
        Self {
            ticker: ticker.into(),
            asset_type,
            allocation,
            score: None,
            signal: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_signal(mut self, signal: SignalLabel) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// Host wire shape for a position. String-typed where the host may send
/// values outside the closed sets, so one bad record cannot fail a whole batch
/// at deserialization time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub ticker: String,
    pub asset_type: String,
    pub allocation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
}

impl TryFrom<&PositionRecord> for Position {
    type Error = EngineError;

    fn try_from(rec: &PositionRecord) -> Result<Self, Self::Error> {
        let ticker = rec.ticker.trim();
        if ticker.is_empty() {
            return Err(EngineError::InvalidPosition {
                ticker: rec.ticker.clone(),
                reason: "ticker must be non-empty".to_string(),
            });
        }

        let asset_type: AssetType = rec.asset_type.parse()?;

        check_allocation(ticker, rec.allocation)?;

        let signal = match rec.signal.as_deref() {
            None => None,
            Some(raw) => Some(raw.parse::<SignalLabel>().map_err(|_| {
                EngineError::InvalidPosition {
                    ticker: ticker.to_string(),
                    reason: format!("unknown signal label '{raw}'"),
                }
            })?),
        };

        Ok(Position {
            ticker: ticker.to_string(),
            asset_type,
            allocation: rec.allocation,
            score: rec.score,
            signal,
        })
    }
}

impl TryFrom<PositionRecord> for Position {
    type Error = EngineError;

    fn try_from(rec: PositionRecord) -> Result<Self, Self::Error> {
        Position::try_from(&rec)
    }
}

// ---------------------------------------------------------------------------
// Classification output
// ---------------------------------------------------------------------------

/// Position status, ordered `Ok < NearLimit < OverLimit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Ok,
    NearLimit,
    OverLimit,
}

impl PositionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionStatus::Ok => "OK",
            PositionStatus::NearLimit => "NEAR_LIMIT",
            PositionStatus::OverLimit => "OVER_LIMIT",
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-position engine output. Built fresh on every evaluation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// Resolved ceiling applied to this position.
    pub limit: f64,
    /// `allocation / limit` clamped to `[0, 1]`.
    pub progress_ratio: f64,
    pub status: PositionStatus,
    pub is_over_limit: bool,
}
