use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_snapshot(path: &Path, json: &str) {
    std::fs::write(path, json).expect("write snapshot");
}

fn dpm(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dpm"));
    // Keep a user's central config out of the test.
    cmd.env("XDG_CONFIG_HOME", dir.path());
    cmd
}

const PALETTE: &str = r##"{
    "colors": ["#1a73e8", "#ffffff", "#202124"],
    "spacing": ["4px", "8px", "1rem"],
    "typography": [{"fontFamily": "Inter", "fontSize": "16px", "fontWeight": 400}],
    "components": [{"name": "Button/Primary", "type": "button"}]
}"##;

#[test]
fn compare_exit_code_passes_for_matching_snapshots() {
    let dir = TempDir::new().expect("tempdir");
    let design = dir.path().join("design.json");
    let implementation = dir.path().join("impl.json");
    write_snapshot(&design, PALETTE);
    write_snapshot(&implementation, PALETTE);

    let status = dpm(&dir)
        .args([
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            implementation.to_str().unwrap(),
            "--format",
            "json",
        ])
        .status()
        .expect("run dpm");
    assert_eq!(status.code(), Some(0));
}

#[test]
fn compare_accepts_config_flag_and_still_passes() {
    let dir = TempDir::new().expect("tempdir");
    let design = dir.path().join("design.json");
    let implementation = dir.path().join("impl.json");
    let cfg_path = dir.path().join("dpm.toml");
    write_snapshot(&design, PALETTE);
    write_snapshot(&implementation, PALETTE);
    std::fs::write(&cfg_path, "passThreshold = 95\n").expect("write config");

    let status = dpm(&dir)
        .args([
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            implementation.to_str().unwrap(),
            "--config",
            cfg_path.to_str().unwrap(),
        ])
        .status()
        .expect("run dpm");
    assert_eq!(status.code(), Some(0));
}

#[test]
fn compare_exit_code_fails_threshold_for_different_snapshots() {
    let dir = TempDir::new().expect("tempdir");
    let design = dir.path().join("design.json");
    let implementation = dir.path().join("impl.json");
    write_snapshot(&design, r##"{"colors": ["#000000", "#ff0000"]}"##);
    write_snapshot(&implementation, r##"{"colors": ["#ffffff", "#00ff00"]}"##);

    let status = dpm(&dir)
        .args([
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            implementation.to_str().unwrap(),
            "--format",
            "json",
        ])
        .status()
        .expect("run dpm");
    assert_eq!(status.code(), Some(1));
}

#[test]
fn compare_pass_threshold_flag_overrides_config() {
    let dir = TempDir::new().expect("tempdir");
    let design = dir.path().join("design.json");
    let implementation = dir.path().join("impl.json");
    let cfg_path = dir.path().join("dpm.toml");
    write_snapshot(&design, r##"{"colors": ["#000000"], "spacing": ["8px"]}"##);
    write_snapshot(&implementation, r##"{"colors": ["#000000"], "spacing": ["40px"]}"##);
    std::fs::write(&cfg_path, "passThreshold = 95\n").expect("write config");

    // Overall similarity is 50: fails the config's 95, passes the flag's 40.
    let status = dpm(&dir)
        .args([
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            implementation.to_str().unwrap(),
            "--config",
            cfg_path.to_str().unwrap(),
            "--pass-threshold",
            "40",
        ])
        .status()
        .expect("run dpm");
    assert_eq!(status.code(), Some(0));
}

#[test]
fn missing_design_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let implementation = dir.path().join("impl.json");
    write_snapshot(&implementation, PALETTE);

    let status = dpm(&dir)
        .args([
            "compare",
            "--design",
            dir.path().join("missing.json").to_str().unwrap(),
            "--impl",
            implementation.to_str().unwrap(),
        ])
        .status()
        .expect("run dpm");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn invalid_threshold_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let design = dir.path().join("design.json");
    write_snapshot(&design, PALETTE);

    let status = dpm(&dir)
        .args([
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            design.to_str().unwrap(),
            "--threshold",
            "150",
        ])
        .status()
        .expect("run dpm");
    assert_eq!(status.code(), Some(2));
}
