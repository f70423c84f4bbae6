mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn porkchop_writes_csv_and_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("planner.toml");
    fs::write(&config_path, common::SMALL_CONFIG).expect("config");
    let csv_path = dir.path().join("out/grid.csv");
    let json_path = dir.path().join("out/series.json");

    Command::cargo_bin("porkchop")
        .expect("porkchop bin")
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "--arrive-end",
            "2023-01-05",
            "--csv",
            csv_path.to_str().unwrap(),
            "--json",
            json_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Mission: Earth to Mars 2022"))
        .stderr(predicate::str::contains("grid: 3 departures x 3 arrivals"));

    let csv = fs::read_to_string(&csv_path).expect("csv written");
    assert_eq!(csv.lines().count(), 1 + 9);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("json written")).unwrap();
    assert_eq!(json["title"], "Mission: Earth to Mars 2022, Type 1, 2 Transfers");
    assert_eq!(json["series"][0]["arrival_dates"].as_array().unwrap().len(), 3);
}

#[test]
fn porkchop_rejects_unknown_bodies() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("planner.toml");
    fs::write(&config_path, common::SMALL_CONFIG).expect("config");

    Command::cargo_bin("porkchop")
        .expect("porkchop bin")
        .args(["--config", config_path.to_str().unwrap(), "--to", "Vulcan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown body `Vulcan`"));
}

#[test]
fn fetch_kernels_lists_the_catalog() {
    Command::cargo_bin("fetch_kernels")
        .expect("fetch_kernels bin")
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("de440s.bsp"));
}
