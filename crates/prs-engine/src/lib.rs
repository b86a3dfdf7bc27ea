//! prs-engine
//!
//! Portfolio risk & signal classification.
//!
//! - Limit resolution (base vs defensive block, missing-limit policy)
//! - Position status (OK / NEAR_LIMIT / OVER_LIMIT) + progress ratio
//! - Score -> signal label
//! - Portfolio summary and defensive cash floor
//!
//! Deterministic, pure logic. No IO, no time, no shared state.

mod error;
mod types;

pub mod batch;
pub mod classify;
pub mod limits;
pub mod signal;
pub mod summary;

pub use batch::{evaluate_positions, BatchReport, PositionReport};
pub use classify::{classify, classify_against, classify_all, NEAR_LIMIT_FRACTION};
pub use error::EngineError;
pub use limits::{resolve_limit, resolve_limit_str, resolve_min_cash};
pub use signal::{classify_signal, resolve_signal, SignalLabel};
pub use summary::{cash_reserve, summarize, CashReserve, PortfolioSummary, StatusCounts};
pub use types::*;
