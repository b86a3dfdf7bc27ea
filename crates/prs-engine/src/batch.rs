//! Batch evaluation of a host snapshot.
//!
//! Each record is adapted, classified and given a signal on its own. A failure
//! is recorded against that record; the rest of the batch is still evaluated.

use serde::{Serialize, Serializer};

use crate::classify::classify;
use crate::signal::{resolve_signal, SignalLabel};
use crate::summary::{cash_reserve, summarize, CashReserve, PortfolioSummary, StatusCounts};
use crate::{ClassificationResult, EngineError, LimitsConfig, Position, PositionRecord};

/// Outcome for one input record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub ticker: String,
    #[serde(serialize_with = "ser_outcome")]
    pub classification: Result<ClassificationResult, EngineError>,
    #[serde(serialize_with = "ser_outcome")]
    pub signal: Result<Option<SignalLabel>, EngineError>,
}

/// Parallel to the input: `rows[i]` belongs to `records[i]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub rows: Vec<PositionReport>,
    /// Over records that passed the wire adapter.
    pub summary: PortfolioSummary,
    pub counts: StatusCounts,
    #[serde(serialize_with = "ser_outcome")]
    pub cash_reserve: Result<Option<CashReserve>, EngineError>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &EngineError)> {
        self.rows.iter().filter_map(|r| match (&r.classification, &r.signal) {
            (Err(e), _) | (Ok(_), Err(e)) => Some((r.ticker.as_str(), e)),
            _ => None,
        })
    }
}

/// Evaluate a list of wire records under `cfg`.
pub fn evaluate_positions(records: &[PositionRecord], cfg: &LimitsConfig) -> BatchReport {
    let mut rows = Vec::with_capacity(records.len());
    let mut adapted = Vec::with_capacity(records.len());
    let mut counts = StatusCounts::default();

    for rec in records {
        let row = match Position::try_from(rec) {
            Ok(pos) => {
                let row = PositionReport {
                    ticker: pos.ticker.clone(),
                    classification: classify(&pos, cfg),
                    signal: resolve_signal(&pos),
                };
                adapted.push(pos);
                row
            }
            Err(e) => PositionReport {
                ticker: rec.ticker.clone(),
                classification: Err(e.clone()),
                signal: Err(e),
            },
        };
        counts.record(&row.classification);
        rows.push(row);
    }

    let summary = summarize(&adapted);
    let cash_reserve = cash_reserve(&summary, cfg);

    BatchReport {
        rows,
        summary,
        counts,
        cash_reserve,
    }
}

/// Serialize `Result` as `{"ok": ..}` / `{"error": "<display>"}`.
fn ser_outcome<T, S>(value: &Result<T, EngineError>, s: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    #[derive(Serialize)]
    #[serde(rename_all = "lowercase")]
    enum Outcome<'a, T> {
        Ok(&'a T),
        Error(String),
    }

    match value {
        Ok(v) => Outcome::Ok(v).serialize(s),
        Err(e) => Outcome::<T>::Error(e.to_string()).serialize(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DefensiveLimits, PositionLimits, PositionStatus};

    fn rec(ticker: &str, asset: &str, allocation: f64, score: Option<f64>) -> PositionRecord {
        PositionRecord {
            ticker: ticker.to_string(),
            asset_type: asset.to_string(),
            allocation,
            score,
            signal: None,
        }
    }

    fn cfg() -> LimitsConfig {
        LimitsConfig::new(
            PositionLimits::new(10.0, 5.0),
            DefensiveLimits::new(5.0, 2.5, 30.0),
        )
    }

    #[test]
    fn bad_record_does_not_abort_batch() {
        let records = vec![
            rec("AAPL", "stock", 2.0, Some(70.0)),
            rec("GLD", "commodity", 3.0, Some(50.0)),
            rec("BTC", "crypto", 4.5, Some(200.0)),
        ];
        let report = evaluate_positions(&records, &cfg());

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].ticker, "AAPL");
        assert_eq!(report.rows[1].ticker, "GLD");
        assert_eq!(report.rows[2].ticker, "BTC");

        assert!(report.rows[0].classification.is_ok());
        assert_eq!(report.rows[0].signal, Ok(Some(SignalLabel::StrongBuy)));

        assert_eq!(
            report.rows[1].classification,
            Err(EngineError::InvalidAssetType("commodity".to_string()))
        );

        // Bad score only poisons the signal, not the classification.
        assert_eq!(
            report.rows[2].classification.as_ref().unwrap().status,
            PositionStatus::NearLimit
        );
        assert_eq!(report.rows[2].signal, Err(EngineError::InvalidScore(200.0)));

        assert_eq!(report.counts.failed, 1);
        assert_eq!(report.counts.total(), 3);
        assert_eq!(report.summary.position_count, 2);
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn report_serializes_outcomes_as_tagged_objects() {
        let records = vec![rec("ETH", "crypto", 1.0, None), rec("", "stock", 1.0, None)];
        let report = evaluate_positions(&records, &cfg());
        let v = serde_json::to_value(&report).unwrap();

        assert_eq!(v["rows"][0]["classification"]["ok"]["status"], "OK");
        assert!(v["rows"][0]["signal"]["ok"].is_null());
        assert!(v["rows"][1]["classification"]["error"]
            .as_str()
            .unwrap()
            .contains("ticker must be non-empty"));
        assert!(v["cashReserve"]["ok"].is_null());
    }
}
