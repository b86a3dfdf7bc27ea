use anyhow::{Context, Result};
use prs_config::{report_unused_keys, UnusedKeyPolicy};
use prs_engine::{BatchReport, PositionReport};
use prs_host::{Dashboard, Snapshot};
use tracing::{info, warn};

use super::{load_positions, parse_regime};

pub struct EvaluateArgs<'a> {
    pub config_paths: &'a [String],
    pub positions_path: &'a str,
    pub regime: Option<&'a str>,
    pub json: bool,
    pub strict_keys: bool,
}

/// Per-position failures are reported inline and do not fail the command.
pub fn run(args: EvaluateArgs<'_>) -> Result<()> {
    let path_refs: Vec<&str> = args.config_paths.iter().map(|s| s.as_str()).collect();
    let loaded = prs_config::load_layered_yaml(&path_refs)?;

    let policy = if args.strict_keys {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let unused = report_unused_keys(&loaded.config_json, policy)?;
    for ptr in &unused.unused_leaf_pointers {
        warn!(pointer = %ptr, "config key is not read by anything");
    }

    let mut limits = loaded.limits().context("config limits invalid")?;
    if let Some(raw) = args.regime {
        limits = limits.with_regime(parse_regime(raw)?);
    }

    let records = load_positions(args.positions_path)?;
    info!(
        positions = records.len(),
        regime = limits.regime().as_str(),
        config_hash = %loaded.config_hash,
        "evaluating positions"
    );

    let mut dashboard = Dashboard::new();
    dashboard.refresh(&Snapshot::new(1, records, limits));
    let view = dashboard
        .latest()
        .context("evaluation produced no dashboard view")?;

    if args.json {
        let out = serde_json::to_string_pretty(view).context("serialize report failed")?;
        println!("{}", out);
        return Ok(());
    }

    println!(
        "regime={} config_hash={}",
        view.regime.as_str(),
        loaded.config_hash
    );
    for row in &view.report.rows {
        println!("{}", format_row(row));
    }
    print_summary(&view.report);

    Ok(())
}

fn format_row(row: &PositionReport) -> String {
    let mut line = format!("ticker={}", row.ticker);
    match &row.classification {
        Ok(c) => line.push_str(&format!(
            " limit={} status={} progress={:.4}",
            c.limit, c.status, c.progress_ratio
        )),
        Err(e) => {
            // Adapter failures poison both fields; report once.
            line.push_str(&format!(" error={}", e));
            return line;
        }
    }
    match &row.signal {
        Ok(Some(label)) => line.push_str(&format!(" signal={}", label)),
        Ok(None) => line.push_str(" signal=NONE"),
        Err(e) => line.push_str(&format!(" signal_error={}", e)),
    }
    line
}

fn print_summary(report: &BatchReport) {
    let s = &report.summary;
    let average = s
        .average_position_size
        .map(|a| format!("{:.4}", a))
        .unwrap_or_else(|| "n/a".to_string());
    println!(
        "positions={} total_allocation={:.4} average_position_size={}",
        s.position_count, s.total_allocation, average
    );

    let c = &report.counts;
    println!(
        "ok={} near_limit={} over_limit={} failed={}",
        c.ok, c.near_limit, c.over_limit, c.failed
    );

    match &report.cash_reserve {
        Ok(Some(r)) => println!(
            "cash_required={} cash_actual={:.4} cash_shortfall={:.4}",
            r.required, r.actual, r.shortfall
        ),
        Ok(None) => {}
        Err(e) => println!("cash_error={}", e),
    }
}
