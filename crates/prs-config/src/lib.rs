//! prs-config
//!
//! Layered YAML configuration for the dashboard engine.
//!
//! - Later documents deep-merge over earlier ones (base -> env -> local)
//! - Canonical JSON + SHA-256 hash identifies the effective config
//! - `LimitsConfig` extraction with regime mapping
//! - Unused-key guard so typos in limit names do not silently fall back

use anyhow::{anyhow, bail, Context, Result};
use prs_engine::{LimitsConfig, MarketRegime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;

/// JSON pointers the workspace actually reads.
///
/// Observed config reads:
/// - `limits_from_config_json`: /regime, each `LimitsConfig` field under /limits
/// - prs-cli onboarding commands: /onboarding/state_path
///
/// Limit fields are listed leaf by leaf so a misspelled limit name shows up
/// as unused instead of being swallowed by a `/limits` prefix.
pub const CONSUMED_POINTERS: &[&str] = &[
    "/regime",
    "/limits/missingLimits",
    "/limits/defensiveModeActive",
    "/limits/positionLimits/maxStockPosition",
    "/limits/positionLimits/maxCryptoPosition",
    "/limits/defensiveLimits/singleStockMax",
    "/limits/defensiveLimits/singleCryptoMax",
    "/limits/defensiveLimits/minCash",
    "/onboarding/state_path",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Consumed JSON-pointer prefixes used for this analysis (sorted, unique)
    pub consumed_prefixes: Vec<String>,
    /// Unused leaf pointers (sorted)
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Report config leaves not covered by [`CONSUMED_POINTERS`].
///
/// `Warn` always returns the report; `Fail` errors when it is not clean.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let consumed: BTreeSet<String> = CONSUMED_POINTERS
        .iter()
        .map(|p| normalize_pointer(p))
        .collect();
    let consumed_prefixes: Vec<String> = consumed.into_iter().collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|leaf| !consumed_prefixes.iter().any(|cp| is_prefix_pointer(cp, leaf)))
        .collect();
    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        consumed_prefixes,
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        bail!(
            "CONFIG_UNUSED_KEYS: {} unused config leaf key(s) detected. First few: {:?}",
            report.unused_leaf_pointers.len(),
            report.unused_leaf_pointers.iter().take(12).collect::<Vec<_>>()
        );
    }

    Ok(report)
}

/// Must begin with "/", no trailing "/" unless it is just "/".
fn normalize_pointer(p: &str) -> String {
    let mut s = p.trim().to_string();
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    while s.ends_with('/') && s.len() > 1 {
        s.pop();
    }
    s
}

/// "/a/b" covers "/a/b" and "/a/b/c" but not "/a/bc".
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" || leaf == prefix {
        return true;
    }
    leaf.strip_prefix(prefix)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map {
                let next = format!("{}/{}", prefix, k.replace('~', "~0").replace('/', "~1"));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                collect_leaf_pointers(vv, &format!("{prefix}/{i}"), out);
            }
        }
        _ => out.push(if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        }),
    }
}

// ---------------------------------------------------------------------------
// Layered loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    pub fn limits(&self) -> Result<LimitsConfig> {
        limits_from_config_json(&self.config_json)
    }

    pub fn onboarding_state_path(&self) -> Option<&str> {
        self.config_json
            .pointer("/onboarding/state_path")
            .and_then(Value::as_str)
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let docs = paths
        .iter()
        .map(|p| fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}")))
        .collect::<Result<Vec<String>>>()?;

    let doc_refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        // An empty layer parses as null; it overrides nothing.
        if !v_json.is_null() {
            merged = deep_merge(merged, v_json);
        }
    }

    // serde_json::Map is key-sorted (no preserve_order), so this is canonical.
    let canonical_json = serde_json::to_string(&merged).context("canonical json serialize failed")?;
    let config_hash = hex::encode(Sha256::digest(canonical_json.as_bytes()));

    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

// ---------------------------------------------------------------------------
// Limits extraction
// ---------------------------------------------------------------------------

/// Build the engine's `LimitsConfig` from merged config JSON.
///
/// Reads:
/// - /limits            (optional; `LimitsConfig` wire shape, unknown fields refused)
/// - /regime            (optional; RISK_ON | RISK_OFF)
///
/// When both `/regime` and `/limits/defensiveModeActive` are present they must
/// agree.
pub fn limits_from_config_json(cfg: &Value) -> Result<LimitsConfig> {
    let mut limits: LimitsConfig = match cfg.pointer("/limits") {
        None | Some(Value::Null) => LimitsConfig::default(),
        Some(v) => serde_json::from_value(v.clone()).context("config limits section is malformed")?,
    };

    let regime = match cfg.pointer("/regime") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.parse::<MarketRegime>().map_err(|e| anyhow!(e))?),
        Some(other) => bail!("config regime must be a string (got {other})"),
    };

    if let Some(regime) = regime {
        let explicit = cfg
            .pointer("/limits/defensiveModeActive")
            .and_then(Value::as_bool);
        if let Some(flag) = explicit {
            if flag != regime.is_defensive() {
                bail!(
                    "config conflict: regime={} but limits.defensiveModeActive={}",
                    regime.as_str(),
                    flag
                );
            }
        }
        limits = limits.with_regime(regime);
    }

    Ok(limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_pointer_respects_segment_boundary() {
        assert!(is_prefix_pointer("/limits", "/limits"));
        assert!(is_prefix_pointer("/limits", "/limits/positionLimits/maxStockPosition"));
        assert!(!is_prefix_pointer("/limits", "/limitsX"));
        assert!(is_prefix_pointer("/", "/anything"));
    }

    #[test]
    fn normalize_adds_leading_and_strips_trailing_slash() {
        assert_eq!(normalize_pointer("limits/"), "/limits");
        assert_eq!(normalize_pointer("/"), "/");
    }

    #[test]
    fn deep_merge_overrides_leaves_and_keeps_siblings() {
        let a = serde_json::json!({"limits": {"positionLimits": {"maxStockPosition": 10, "maxCryptoPosition": 5}}});
        let b = serde_json::json!({"limits": {"positionLimits": {"maxStockPosition": 8}}});
        let m = deep_merge(a, b);
        assert_eq!(m.pointer("/limits/positionLimits/maxStockPosition").unwrap(), 8);
        assert_eq!(m.pointer("/limits/positionLimits/maxCryptoPosition").unwrap(), 5);
    }

    #[test]
    fn regime_string_is_validated() {
        let cfg = serde_json::json!({"regime": "SIDEWAYS"});
        let err = limits_from_config_json(&cfg).unwrap_err();
        assert!(err.to_string().contains("invalid regime"));

        let cfg = serde_json::json!({"regime": 1});
        assert!(limits_from_config_json(&cfg).is_err());
    }
}
