use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/precip_sample.json");

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("years"));
}

#[test]
fn years_are_sorted_and_unique() {
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args(["years", "--data", SAMPLE]);
    cmd.assert()
        .success()
        .stdout(predicate::eq("2030\n2040\n2050\n"));
}

#[test]
fn missing_data_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args(["years", "--data"]).arg(&missing);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn render_svg_for_selected_year() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("cmp.svg");
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args(["render", "--data", SAMPLE, "--year", "2050", "--out"])
        .arg(&out);
    cmd.assert().success();

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Model SSP2.45 — 2050"));
    assert!(svg.contains("Model SSP1.26 — 2050"));
    assert!(svg.contains("Avg Precipitation (mm/day)"));
    assert!(svg.contains("jan"));
}

#[test]
fn render_rejects_unknown_year() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args(["render", "--data", SAMPLE, "--year", "1999", "--out"])
        .arg(dir.path().join("x.svg"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("1999"));
}

#[test]
fn render_png_without_font_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args(["render", "--data", SAMPLE, "--out"])
        .arg(dir.path().join("x.png"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("font"));
}

#[test]
fn config_overrides_scenarios() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("cfg.json");
    std::fs::write(
        &cfg,
        r##"{"left": {"model": "ssp1-26", "label": "Low", "color": "#336699"}}"##,
    )
    .unwrap();
    let out = dir.path().join("cmp.svg");
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args(["render", "--data", SAMPLE, "--config"])
        .arg(&cfg)
        .arg("--out")
        .arg(&out);
    cmd.assert().success();

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Low — 2030"));
}

// Live test (opt-in): PRECIP_DATA_URL=<url> cargo test --features online
#[cfg(feature = "online")]
#[test]
fn years_from_url() {
    let Ok(url) = std::env::var("PRECIP_DATA_URL") else {
        eprintln!("PRECIP_DATA_URL not set; skipping live load");
        return;
    };
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args(["years", "--data", url.as_str()]);
    cmd.assert().success();
}
