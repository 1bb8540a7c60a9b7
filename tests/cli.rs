use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn noise_chart() -> Command {
    Command::cargo_bin("noise-chart").unwrap()
}

#[test]
fn dump_config_prints_defaults() {
    noise_chart()
        .arg("--dump-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"target_id\": \"noiseChart\""))
        .stdout(predicate::str::contains("\"5:40\""))
        .stdout(predicate::str::contains("\"threshold\": 50.0"));
}

#[test]
fn dump_config_applies_config_file_and_target() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.json");
    std::fs::write(&path, r##"{ "threshold": 70, "theme": { "series": "#00FF00" } }"##).unwrap();

    noise_chart()
        .arg("--config")
        .arg(&path)
        .args(["--target", "lobbyChart", "--dump-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"threshold\": 70.0"))
        .stdout(predicate::str::contains("\"#00FF00\""))
        .stdout(predicate::str::contains("\"target_id\": \"lobbyChart\""));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.json");
    std::fs::write(&path, r#"{ "samples": [150] }"#).unwrap();

    noise_chart()
        .arg("--config")
        .arg(&path)
        .arg("--dump-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn missing_target_exports_nothing() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("chart.png");

    noise_chart()
        .args(["--target", "missing"])
        .arg("--export")
        .arg(&output)
        .assert()
        .success();
    assert!(!output.exists());
}

#[test]
fn export_writes_png_at_pixel_ratio() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("chart.png");

    noise_chart()
        .arg("--export")
        .arg(&output)
        .args(["--scale", "2"])
        .assert()
        .success();

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (1600, 800));
}

#[test]
fn export_frames_writes_numbered_files() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("chart.png");

    noise_chart()
        .arg("--export")
        .arg(&output)
        .args(["--frames", "3", "--width", "320", "--height", "200"])
        .assert()
        .success();

    for i in 0..3 {
        let frame = dir.path().join(format!("chart_{i:04}.png"));
        let img = image::open(&frame).unwrap();
        assert_eq!((img.width(), img.height()), (320, 200));
    }
    assert!(!dir.path().join("chart_0003.png").exists());
}
