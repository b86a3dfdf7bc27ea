use std::fmt;

/// Local validation failures raised by the engine.
///
/// Every variant is scoped to a single evaluation: a batch caller records the
/// error against that position and keeps going.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    /// Asset type outside the closed `{stock, crypto}` set.
    InvalidAssetType(String),
    /// A limit field is missing (under the strict policy) or not a positive,
    /// finite number. `value` is `None` when the field was absent.
    InvalidConfig { field: &'static str, value: Option<f64> },
    /// Score outside `[0, 100]` or not finite.
    InvalidScore(f64),
    /// Position failed shape validation. `ticker` is empty when the caller
    /// classified a bare allocation.
    InvalidPosition { ticker: String, reason: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidAssetType(raw) => {
                write!(f, "invalid asset type '{raw}' (expected stock | crypto)")
            }
            EngineError::InvalidConfig { field, value: None } => {
                write!(f, "invalid config: {field} is missing")
            }
            EngineError::InvalidConfig {
                field,
                value: Some(v),
            } => {
                write!(f, "invalid config: {field}={v} must be a positive number")
            }
            EngineError::InvalidScore(score) => {
                write!(f, "invalid score {score} (expected a finite value in [0, 100])")
            }
            EngineError::InvalidPosition { ticker, reason } if ticker.is_empty() => {
                write!(f, "invalid position: {reason}")
            }
            EngineError::InvalidPosition { ticker, reason } => {
                write!(f, "invalid position '{ticker}': {reason}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_vs_non_positive_config() {
        let missing = EngineError::InvalidConfig {
            field: "positionLimits.maxStockPosition",
            value: None,
        };
        assert_eq!(
            missing.to_string(),
            "invalid config: positionLimits.maxStockPosition is missing"
        );

        let zero = EngineError::InvalidConfig {
            field: "defensiveLimits.singleCryptoMax",
            value: Some(0.0),
        };
        assert_eq!(
            zero.to_string(),
            "invalid config: defensiveLimits.singleCryptoMax=0 must be a positive number"
        );
    }

    #[test]
    fn display_asset_type_names_the_raw_value() {
        let err = EngineError::InvalidAssetType("bond".to_string());
        assert_eq!(
            err.to_string(),
            "invalid asset type 'bond' (expected stock | crypto)"
        );
    }

    #[test]
    fn display_position_omits_empty_ticker() {
        let named = EngineError::InvalidPosition {
            ticker: "AAPL".to_string(),
            reason: "ticker must be non-empty".to_string(),
        };
        assert_eq!(named.to_string(), "invalid position 'AAPL': ticker must be non-empty");

        let bare = EngineError::InvalidPosition {
            ticker: String::new(),
            reason: "allocation NaN must be a finite value >= 0".to_string(),
        };
        assert_eq!(bare.to_string(), "invalid position: allocation NaN must be a finite value >= 0");
    }
}
