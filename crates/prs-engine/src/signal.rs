//! Score -> discrete signal label.
//!
//! Threshold table, evaluated top-down, lower edge inclusive:
//!
//! | score      | label            |
//! |------------|------------------|
//! | >= 65      | STRONG_BUY       |
//! | >= 55      | BUY              |
//! | >= 45      | HOLD             |
//! | >= 35      | CONSIDER_SELLING |
//! | <  35      | SELL             |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{EngineError, Position};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalLabel {
    StrongBuy,
    Buy,
    Hold,
    ConsiderSelling,
    Sell,
}

/// Lower bounds in evaluation order. Anything below the last bound is SELL.
const THRESHOLDS: [(f64, SignalLabel); 4] = [
    (65.0, SignalLabel::StrongBuy),
    (55.0, SignalLabel::Buy),
    (45.0, SignalLabel::Hold),
    (35.0, SignalLabel::ConsiderSelling),
];

impl SignalLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalLabel::StrongBuy => "STRONG_BUY",
            SignalLabel::Buy => "BUY",
            SignalLabel::Hold => "HOLD",
            SignalLabel::ConsiderSelling => "CONSIDER_SELLING",
            SignalLabel::Sell => "SELL",
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "STRONG_BUY" => Ok(SignalLabel::StrongBuy),
            "BUY" => Ok(SignalLabel::Buy),
            "HOLD" => Ok(SignalLabel::Hold),
            "CONSIDER_SELLING" => Ok(SignalLabel::ConsiderSelling),
            "SELL" => Ok(SignalLabel::Sell),
            other => Err(format!("unknown signal label '{other}'")),
        }
    }
}

/// Map a model score in `[0, 100]` to its label.
pub fn classify_signal(score: f64) -> Result<SignalLabel, EngineError> {
    if !score.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&score) {
        return Err(EngineError::InvalidScore(score));
    }

    Ok(THRESHOLDS
        .iter()
        .find(|(lower, _)| score >= *lower)
        .map(|(_, label)| *label)
        .unwrap_or(SignalLabel::Sell))
}

/// Signal to show for a position.
///
/// A precomputed label wins; otherwise the score is classified. `Ok(None)`
/// means no signal is available, which is distinct from SELL.
pub fn resolve_signal(position: &Position) -> Result<Option<SignalLabel>, EngineError> {
    if let Some(label) = position.signal {
        return Ok(Some(label));
    }
    position.score.map(classify_signal).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssetType;

    #[test]
    fn boundaries_are_lower_inclusive() {
        assert_eq!(classify_signal(65.0), Ok(SignalLabel::StrongBuy));
        assert_eq!(classify_signal(64.999), Ok(SignalLabel::Buy));
        assert_eq!(classify_signal(55.0), Ok(SignalLabel::Buy));
        assert_eq!(classify_signal(54.999), Ok(SignalLabel::Hold));
        assert_eq!(classify_signal(45.0), Ok(SignalLabel::Hold));
        assert_eq!(classify_signal(44.999), Ok(SignalLabel::ConsiderSelling));
        assert_eq!(classify_signal(35.0), Ok(SignalLabel::ConsiderSelling));
        assert_eq!(classify_signal(34.999), Ok(SignalLabel::Sell));
    }

    #[test]
    fn range_edges_are_valid() {
        assert_eq!(classify_signal(0.0), Ok(SignalLabel::Sell));
        assert_eq!(classify_signal(100.0), Ok(SignalLabel::StrongBuy));
    }

    #[test]
    fn out_of_range_and_non_finite_scores_rejected() {
        assert_eq!(classify_signal(-1.0), Err(EngineError::InvalidScore(-1.0)));
        assert_eq!(classify_signal(101.0), Err(EngineError::InvalidScore(101.0)));
        assert!(matches!(
            classify_signal(f64::NAN),
            Err(EngineError::InvalidScore(_))
        ));
        assert!(classify_signal(f64::INFINITY).is_err());
        assert!(classify_signal(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn absent_score_is_not_sell() {
        let p = Position::new("ETH", AssetType::Crypto, 1.0);
        assert_eq!(resolve_signal(&p), Ok(None));

        let p = p.with_score(10.0);
        assert_eq!(resolve_signal(&p), Ok(Some(SignalLabel::Sell)));
    }

    #[test]
    fn precomputed_label_wins_over_score() {
        let p = Position::new("ETH", AssetType::Crypto, 1.0)
            .with_score(90.0)
            .with_signal(SignalLabel::Hold);
        assert_eq!(resolve_signal(&p), Ok(Some(SignalLabel::Hold)));
    }

    #[test]
    fn labels_round_trip_through_wire_names() {
        for label in [
            SignalLabel::StrongBuy,
            SignalLabel::Buy,
            SignalLabel::Hold,
            SignalLabel::ConsiderSelling,
            SignalLabel::Sell,
        ] {
            assert_eq!(label.as_str().parse::<SignalLabel>(), Ok(label));
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
        }
    }
}
