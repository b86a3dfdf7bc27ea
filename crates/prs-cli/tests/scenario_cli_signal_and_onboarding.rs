//! Scenario: `prs signal` and `prs onboarding` through the binary.
//!
//! GREEN when:
//! - `signal --score 65` prints STRONG_BUY; 34.999 prints SELL.
//! - Out-of-range scores fail the command.
//! - `onboarding status` is false until `onboarding complete` runs, and the
//!   state path can come from config.
//! - `config-hash` prints a 64-char hex hash.

use predicates::prelude::*;

#[allow(deprecated)]
fn prs() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("prs").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn signal_thresholds() {
    prs()
        .args(["signal", "--score", "65"])
        .assert()
        .success()
        .stdout("signal=STRONG_BUY\n");
    prs()
        .args(["signal", "--score", "34.999"])
        .assert()
        .success()
        .stdout("signal=SELL\n");
}

#[test]
fn signal_rejects_out_of_range() {
    prs()
        .args(["signal", "--score=101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid score"));
    prs()
        .args(["signal", "--score=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid score"));
}

#[test]
fn onboarding_flag_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state").join("onboarding.json");

    prs()
        .args(["onboarding", "status", "--state-file"])
        .arg(&state)
        .assert()
        .success()
        .stdout("onboarded=false\n");

    prs()
        .args(["onboarding", "complete", "--state-file"])
        .arg(&state)
        .assert()
        .success();

    prs()
        .args(["onboarding", "status", "--state-file"])
        .arg(&state)
        .assert()
        .success()
        .stdout("onboarded=true\n");
}

#[test]
fn onboarding_path_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("from_cfg.json");
    let cfg = dir.path().join("cfg.yaml");
    std::fs::write(
        &cfg,
        format!("onboarding:\n  state_path: \"{}\"\n", state.display()),
    )
    .unwrap();

    prs()
        .args(["onboarding", "complete", "--config"])
        .arg(&cfg)
        .assert()
        .success();
    assert!(state.exists());
}

#[test]
fn config_hash_prints_hex_digest() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("cfg.yaml");
    std::fs::write(&cfg, "regime: RISK_ON\n").unwrap();

    prs()
        .arg("config-hash")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^config_hash=[0-9a-f]{64}\n").unwrap())
        .stdout(predicate::str::contains(r#"{"regime":"RISK_ON"}"#));
}
