//! Command handler modules for prs-cli.
//!
//! Shared utilities used by multiple command paths live here.

pub mod evaluate;
pub mod onboarding;

use anyhow::{Context, Result};
use prs_engine::{MarketRegime, PositionRecord};
use std::fs;

/// Parse a CLI `--regime` string.
pub fn parse_regime(raw: &str) -> Result<MarketRegime> {
    raw.parse::<MarketRegime>().map_err(anyhow::Error::msg)
}

/// Load a JSON array of position records.
pub fn load_positions(path: &str) -> Result<Vec<PositionRecord>> {
    let bytes = fs::read(path).with_context(|| format!("read positions file failed: {}", path))?;
    // Strip UTF-8 BOM if present.
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    let raw = std::str::from_utf8(bytes).context("positions file must be UTF-8 text")?;
    serde_json::from_str(raw.trim())
        .context("positions file must contain a JSON array of {ticker, assetType, allocation}")
}
