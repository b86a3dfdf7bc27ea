use prs_engine::{evaluate_positions, BatchReport, MarketRegime};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::snapshot::{Snapshot, SnapshotFreshness, SnapshotWatermark};

/// Everything the UI renders for one snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub seq: u64,
    pub regime: MarketRegime,
    pub report: BatchReport,
}

/// Holds the newest published view and refuses older ones.
#[derive(Debug, Default)]
pub struct Dashboard {
    watermark: SnapshotWatermark,
    latest: Option<DashboardView>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure evaluation of one snapshot. Safe to run off the publishing path.
    pub fn evaluate(snapshot: &Snapshot) -> DashboardView {
        let report = evaluate_positions(&snapshot.positions, &snapshot.limits);

        for (ticker, err) in report.failures() {
            warn!(seq = snapshot.seq, ticker, error = %err, "position evaluation failed");
        }
        debug!(
            seq = snapshot.seq,
            positions = report.rows.len(),
            over_limit = report.counts.over_limit,
            near_limit = report.counts.near_limit,
            "snapshot evaluated"
        );

        DashboardView {
            seq: snapshot.seq,
            regime: snapshot.limits.regime(),
            report,
        }
    }

    /// Publish a finished evaluation. Views from superseded snapshots are
    /// dropped and the current view is left untouched.
    pub fn publish(&mut self, view: DashboardView) -> SnapshotFreshness {
        let freshness = self.watermark.accept(view.seq);
        if freshness.is_fresh() {
            info!(seq = view.seq, regime = view.regime.as_str(), "dashboard view published");
            self.latest = Some(view);
        } else {
            log_rejected(&freshness);
        }
        freshness
    }

    /// Evaluate and publish in one step. A snapshot that is already stale is
    /// not evaluated at all.
    pub fn refresh(&mut self, snapshot: &Snapshot) -> SnapshotFreshness {
        let freshness = self.watermark.check(snapshot.seq);
        if freshness.is_rejected() {
            log_rejected(&freshness);
            return freshness;
        }
        self.publish(Self::evaluate(snapshot))
    }

    pub fn latest(&self) -> Option<&DashboardView> {
        self.latest.as_ref()
    }

    pub fn last_seq(&self) -> u64 {
        self.watermark.last_accepted()
    }
}

fn log_rejected(freshness: &SnapshotFreshness) {
    match freshness {
        SnapshotFreshness::Stale { watermark, got } => {
            warn!(watermark, got, "discarding stale dashboard evaluation");
        }
        SnapshotFreshness::NoSequence => {
            warn!("discarding unsequenced dashboard evaluation");
        }
        SnapshotFreshness::Fresh => {}
    }
}
