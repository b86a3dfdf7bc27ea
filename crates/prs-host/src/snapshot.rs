//! Snapshot sequencing: last snapshot wins.
//!
//! # Invariants
//!
//! - **Strictly increasing**: a snapshot is accepted only if its `seq` is
//!   greater than the last accepted `seq`. Re-publishing the same `seq` is
//!   stale.
//! - **No sequence -> stale**: `seq == 0` is always rejected.
//! - **Watermark advances only on acceptance**.
//!
//! The engine has no notion of staleness; this is the host-side guard that
//! stops a slow evaluation of an old fetch from overwriting a newer one.

use prs_engine::{LimitsConfig, PositionRecord};
use serde::{Deserialize, Serialize};

/// One atomic `(positions, limits)` pair from the data-fetch layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Monotonic fetch counter assigned by the host; 0 means unsequenced.
    pub seq: u64,
    pub positions: Vec<PositionRecord>,
    pub limits: LimitsConfig,
}

impl Snapshot {
    pub fn new(seq: u64, positions: Vec<PositionRecord>, limits: LimitsConfig) -> Self {
        Self {
            seq,
            positions,
            limits,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotFreshness {
    Fresh,
    /// Older than (or equal to) the last accepted snapshot.
    Stale { watermark: u64, got: u64 },
    NoSequence,
}

impl SnapshotFreshness {
    pub fn is_fresh(&self) -> bool {
        matches!(self, SnapshotFreshness::Fresh)
    }

    pub fn is_rejected(&self) -> bool {
        !self.is_fresh()
    }
}

/// Tracks the last accepted snapshot sequence number.
#[derive(Clone, Debug, Default)]
pub struct SnapshotWatermark {
    last_accepted: u64,
}

impl SnapshotWatermark {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only check; does not advance the watermark.
    pub fn check(&self, seq: u64) -> SnapshotFreshness {
        if seq == 0 {
            return SnapshotFreshness::NoSequence;
        }
        if seq <= self.last_accepted {
            return SnapshotFreshness::Stale {
                watermark: self.last_accepted,
                got: seq,
            };
        }
        SnapshotFreshness::Fresh
    }

    /// Check and, if fresh, advance to `seq`.
    pub fn accept(&mut self, seq: u64) -> SnapshotFreshness {
        let result = self.check(seq);
        if result.is_fresh() {
            self.last_accepted = seq;
        }
        result
    }

    /// 0 until a snapshot has been accepted.
    pub fn last_accepted(&self) -> u64 {
        self.last_accepted
    }

    pub fn has_accepted_any(&self) -> bool {
        self.last_accepted > 0
    }
}
