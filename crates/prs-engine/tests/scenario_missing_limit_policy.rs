//! Scenario: absent vs zero limits under the strict and fallback policies.
//!
//! # Invariants under test
//!
//! 1. Strict: an absent field in the active block fails with InvalidConfig.
//! 2. Fallback: an absent field resolves to the documented default
//!    (10 / 5 base, 5 / 2.5 defensive, 30 min cash).
//! 3. A present `0` is never "missing": InvalidConfig under both policies,
//!    and classification never divides by it.
//! 4. Only the active block is consulted: a hole in the inactive block is
//!    harmless.

use prs_engine::*;

fn partial_cfg() -> LimitsConfig {
    // Base block complete, defensive block empty.
    LimitsConfig::new(PositionLimits::new(10.0, 5.0), DefensiveLimits::default())
}

#[test]
fn strict_fails_only_for_the_active_block() {
    let cfg = partial_cfg();
    assert_eq!(resolve_limit(AssetType::Stock, &cfg), Ok(10.0));

    let cfg = cfg.with_defensive_mode(true);
    let err = resolve_limit(AssetType::Stock, &cfg).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidConfig {
            field: "defensiveLimits.singleStockMax",
            value: None
        }
    );
}

#[test]
fn fallback_fills_documented_defaults() {
    let cfg = partial_cfg()
        .with_defensive_mode(true)
        .with_policy(LimitPolicy::Fallback);
    assert_eq!(resolve_limit(AssetType::Stock, &cfg), Ok(5.0));
    assert_eq!(resolve_limit(AssetType::Crypto, &cfg), Ok(2.5));
    assert_eq!(resolve_min_cash(&cfg), Ok(30.0));
}

#[test]
fn zero_limit_fails_classification_under_both_policies() {
    for policy in [LimitPolicy::Strict, LimitPolicy::Fallback] {
        let mut cfg = partial_cfg().with_policy(policy);
        cfg.position_limits.max_crypto_position = Some(0.0);

        let p = Position::new("SOL", AssetType::Crypto, 1.0);
        assert_eq!(
            classify(&p, &cfg),
            Err(EngineError::InvalidConfig {
                field: "positionLimits.maxCryptoPosition",
                value: Some(0.0)
            }),
            "policy={policy:?}"
        );
    }
}

#[test]
fn policy_is_read_from_wire_config() {
    let cfg: LimitsConfig = serde_json::from_str(r#"{ "missingLimits": "fallback" }"#).unwrap();
    assert_eq!(cfg.missing_limits, LimitPolicy::Fallback);
    assert_eq!(resolve_limit(AssetType::Crypto, &cfg), Ok(5.0));
}
