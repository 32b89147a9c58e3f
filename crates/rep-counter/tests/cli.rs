use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use rep_counter::replay::ReplayReport;
use rep_counter::{DetectorParams, Exercise, Phase, SessionConfig};

fn bin() -> Command {
    Command::cargo_bin("rep-counter").expect("binary")
}

const SIT_UPS: &str = r#"{"frame": 0, "landmarks": {"left_shoulder": [200.0, 600.0], "left_hip": [400.0, 600.0], "left_knee": [500.0, 500.0]}}
{"frame": 1, "landmarks": {"left_shoulder": [450.0, 400.0], "left_hip": [400.0, 600.0], "left_knee": [500.0, 500.0]}}
{"frame": 2, "landmarks": {"left_shoulder": [200.0, 600.0], "left_hip": [400.0, 600.0], "left_knee": [500.0, 500.0]}}
{"frame": 3}
{"frame": 4, "landmarks": {"left_shoulder": [450.0, 400.0], "left_hip": [400.0, 600.0], "left_knee": [500.0, 500.0]}}
{"frame": 5, "landmarks": {"left_shoulder": [200.0, 600.0], "left_hip": [400.0, 600.0], "left_knee": [500.0, 500.0]}}
"#;

#[test]
fn init_config_writes_loadable_preset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("jump.json");

    bin()
        .args(["init-config", "--exercise", "broad_jump", "--output"])
        .arg(&path)
        .assert()
        .success();

    let cfg = SessionConfig::load_json(&path).expect("load");
    assert_eq!(cfg.exercise, Exercise::BroadJump);
    assert_eq!(
        cfg.detector,
        Some(DetectorParams::for_exercise(Exercise::BroadJump))
    );
}

#[test]
fn init_config_prints_to_stdout() {
    bin()
        .args(["init-config", "--exercise", "medicine_ball_throw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"family\": \"crossing\""))
        .stdout(predicate::str::contains("\"release_fraction\": 0.7"));
}

#[test]
fn init_config_rejects_unknown_exercise() {
    bin()
        .args(["init-config", "--exercise", "burpees"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown exercise `burpees`"));
}

#[test]
fn replay_counts_sit_ups_and_writes_outputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("sit_ups.json");
    let input = dir.path().join("frames.jsonl");
    let events = dir.path().join("events.jsonl");
    let report = dir.path().join("report.json");
    fs::write(&config, r#"{"exercise": "sit_ups"}"#).expect("config");
    fs::write(&input, SIT_UPS).expect("input");

    bin()
        .arg("replay")
        .arg("--config")
        .arg(&config)
        .arg("--input")
        .arg(&input)
        .arg("--events")
        .arg(&events)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("sit_ups #1 frame 2"))
        .stdout(predicate::str::contains("sit_ups #2 frame 5"))
        .stdout(predicate::str::contains("2 repetitions, 6 frames"));

    let logged = fs::read_to_string(&events).expect("events");
    assert_eq!(logged.lines().count(), 2);
    assert!(logged.lines().all(|l| l.contains("\"increment\":1")));

    let report: ReplayReport =
        serde_json::from_str(&fs::read_to_string(&report).expect("report")).expect("json");
    assert_eq!(report.status.count, 2);
    assert_eq!(report.missing_frames, 1);
    assert_eq!(report.phase, Phase::Down);
    assert_eq!(report.events.len(), 2);
}

#[test]
fn replay_fails_on_invalid_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("bad.json");
    let input = dir.path().join("frames.jsonl");
    fs::write(&config, r#"{"exercise": "sit_ups", "pixels_per_unit": -1.0}"#).expect("config");
    fs::write(&input, SIT_UPS).expect("input");

    bin()
        .arg("replay")
        .arg("--config")
        .arg(&config)
        .arg("--input")
        .arg(&input)
        .assert()
        .failure();
}
