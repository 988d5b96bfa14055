use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use dpm_lib::error::ErrorCategory;
use dpm_lib::{Category, CategoryOutcome, DpmOutput};
use tempfile::{tempdir, TempDir};

fn bin_path() -> PathBuf {
    std::env::var("CARGO_BIN_EXE_dpm")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("target")
                .join("debug")
                .join(if cfg!(windows) { "dpm.exe" } else { "dpm" })
        })
}

fn run_cmd(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("DPM_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("run dpm command")
}

fn parse_json(stdout: &[u8]) -> DpmOutput {
    serde_json::from_slice(stdout).expect("output should be valid JSON")
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

const DESIGN: &str = r##"{
    "colors": ["#1A73E8", "#ffffff", "#ffffff", "#202124"],
    "spacing": [4, "8px", "1rem", "not-a-length"],
    "typography": [
        {"fontFamily": "Inter", "fontSize": "16px", "fontWeight": 400, "lineHeight": 1.5},
        {"fontFamily": "Inter", "fontSize": "24px", "fontWeight": "bold"}
    ],
    "components": [
        {"name": "Button/Primary", "type": "button"},
        {"name": "Hero Image", "type": "image"}
    ]
}"##;

const IMPLEMENTATION_YAML: &str = r##"
colors:
  - "rgb(26, 115, 232)"
  - "#fff"
  - "#222222"
spacing:
  - 4px
  - 0.5rem
  - 16px
typography:
  - fontFamily: "'Inter', sans-serif"
    fontSize: 1rem
    fontWeight: normal
    lineHeight: 24px
  - fontFamily: Arial
    fontSize: 24px
    fontWeight: 700
components:
  - name: button-primary
    type: button
  - name: hero_img
    type: img
"##;

#[test]
fn compare_reports_matches_and_deviations_per_category() {
    let dir = tempdir().expect("tempdir");
    let design = write(&dir, "design.json", DESIGN);
    let implementation = write(&dir, "impl.yaml", IMPLEMENTATION_YAML);

    let output = run_cmd(
        &dir,
        &[
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            implementation.to_str().unwrap(),
        ],
    );

    let out = match parse_json(&output.stdout) {
        DpmOutput::Compare(out) => out,
        other => panic!("expected compare output, got {other:?}"),
    };
    assert!(out.design.available);
    assert!(out.implementation.available);

    let report = &out.report;
    assert_eq!(report.per_category.len(), 4);

    let colors = report.category(Category::Colors).expect("colors");
    assert_eq!(colors.matched.len(), 3);
    assert_eq!(colors.design_count(), 3);

    let typography = report.category(Category::Typography).expect("typography");
    assert_eq!(typography.matched.len(), 1);
    assert_eq!(typography.missing.len(), 1);
    assert_eq!(typography.extra.len(), 1);

    let spacing = report.category(Category::Spacing).expect("spacing");
    assert_eq!(spacing.matched.len(), 3);
    assert_eq!(report.data_quality.unparseable, 1);

    let components = report.category(Category::Components).expect("components");
    assert_eq!(components.matched.len(), 2);

    assert_eq!(report.matches, 9);
    assert_eq!(report.deviations, 2);
    assert_eq!(out.passed, report.overall_similarity >= out.pass_threshold);
    assert!(!report.top_issues.is_empty());
}

#[test]
fn missing_implementation_still_produces_a_report() {
    let dir = tempdir().expect("tempdir");
    let design = write(&dir, "design.json", DESIGN);
    let missing = dir.path().join("impl.json");

    let output = run_cmd(
        &dir,
        &[
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            missing.to_str().unwrap(),
        ],
    );
    assert_eq!(output.status.code(), Some(1));

    match parse_json(&output.stdout) {
        DpmOutput::Compare(out) => {
            assert!(!out.implementation.available);
            assert!(out
                .implementation
                .error
                .as_deref()
                .unwrap_or_default()
                .contains("not found"));
            assert_eq!(out.report.overall_similarity, 0.0);
            assert_eq!(out.report.matches, 0);
            let colors = out.report.category(Category::Colors).expect("colors");
            assert_eq!(colors.missing.len(), 3);
            assert!(!out.passed);
        }
        other => panic!("expected compare output, got {other:?}"),
    }
}

#[test]
fn missing_design_returns_error_payload() {
    let dir = tempdir().expect("tempdir");
    let implementation = write(&dir, "impl.yaml", IMPLEMENTATION_YAML);

    let output = run_cmd(
        &dir,
        &[
            "compare",
            "--design",
            dir.path().join("design.json").to_str().unwrap(),
            "--impl",
            implementation.to_str().unwrap(),
        ],
    );
    assert_eq!(output.status.code(), Some(2));

    match parse_json(&output.stdout) {
        DpmOutput::Error(out) => {
            assert_eq!(out.error.category, ErrorCategory::Input);
            assert!(out.error.message.contains("not found"));
            assert!(out
                .error
                .remediation
                .as_deref()
                .unwrap_or_default()
                .contains("absolute path"));
        }
        other => panic!("expected error output, got {other:?}"),
    }
}

#[test]
fn unsupported_extension_is_an_input_error() {
    let dir = tempdir().expect("tempdir");
    let design = write(&dir, "design.xml", "<colors/>");

    let output = run_cmd(
        &dir,
        &["compare", "--design", design.to_str().unwrap(), "--impl", "impl.json"],
    );
    assert_eq!(output.status.code(), Some(2));
    match parse_json(&output.stdout) {
        DpmOutput::Error(out) => {
            assert!(out.error.message.contains("Unsupported snapshot extension"));
        }
        other => panic!("expected error output, got {other:?}"),
    }
}

#[test]
fn unknown_category_returns_config_error() {
    let dir = tempdir().expect("tempdir");
    let design = write(&dir, "design.json", DESIGN);

    let output = run_cmd(
        &dir,
        &[
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            design.to_str().unwrap(),
            "--categories",
            "colors,borders",
        ],
    );
    assert_eq!(output.status.code(), Some(2));
    match parse_json(&output.stdout) {
        DpmOutput::Error(out) => {
            assert_eq!(out.error.category, ErrorCategory::Config);
            assert!(out.error.message.contains("borders"));
        }
        other => panic!("expected error output, got {other:?}"),
    }
}

#[test]
fn categories_flag_limits_the_report() {
    let dir = tempdir().expect("tempdir");
    let design = write(&dir, "design.json", DESIGN);

    let output = run_cmd(
        &dir,
        &[
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            design.to_str().unwrap(),
            "--categories",
            "colors,components",
        ],
    );
    assert_eq!(output.status.code(), Some(0));
    match parse_json(&output.stdout) {
        DpmOutput::Compare(out) => {
            let keys: Vec<Category> = out.report.per_category.keys().copied().collect();
            assert_eq!(keys, vec![Category::Colors, Category::Components]);
            assert!(out
                .report
                .per_category
                .values()
                .all(|o| matches!(o, CategoryOutcome::Compared(_))));
        }
        other => panic!("expected compare output, got {other:?}"),
    }
}

#[test]
fn config_thresholds_apply_per_category() {
    let dir = tempdir().expect("tempdir");
    let design = write(&dir, "design.json", r##"{"colors": ["#000000"]}"##);
    let implementation = write(&dir, "impl.json", r##"{"colors": ["#050505"]}"##);
    let config = write(&dir, "dpm.toml", "[thresholds]\ncolors = 99\n");

    let output = run_cmd(
        &dir,
        &[
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            implementation.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
    );
    match parse_json(&output.stdout) {
        DpmOutput::Compare(out) => {
            let colors = out.report.category(Category::Colors).expect("colors");
            assert!(colors.matched.is_empty());
        }
        other => panic!("expected compare output, got {other:?}"),
    }
}

#[test]
fn skip_compare_emits_normalized_tokens() {
    let dir = tempdir().expect("tempdir");
    let design = write(&dir, "design.json", DESIGN);
    let implementation = write(&dir, "impl.yaml", IMPLEMENTATION_YAML);

    let output = run_cmd(
        &dir,
        &[
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            implementation.to_str().unwrap(),
            "--skip-compare",
        ],
    );
    assert_eq!(output.status.code(), Some(0));
    match parse_json(&output.stdout) {
        DpmOutput::Extract(out) => {
            assert_eq!(out.design_tokens.colors.len(), 4);
            assert_eq!(out.design_tokens.invalid_count(), 1);
            assert_eq!(out.implementation_tokens.components.len(), 2);
        }
        other => panic!("expected extract output, got {other:?}"),
    }
}

#[test]
fn normalize_command_prints_tokens() {
    let dir = tempdir().expect("tempdir");
    let input = write(&dir, "snap.yaml", IMPLEMENTATION_YAML);

    let output = run_cmd(
        &dir,
        &["normalize", "--input", input.to_str().unwrap(), "--rem-base", "10"],
    );
    assert_eq!(output.status.code(), Some(0));

    let raw: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(raw["mode"], "normalize");
    assert_eq!(raw["remBasePx"], 10.0);
    assert_eq!(raw["unparseable"], 0);
    assert_eq!(raw["tokens"]["colors"][0]["type"], "color");
    // 0.5rem at a 10px base
    assert_eq!(raw["tokens"]["spacing"][1]["valuePx"], 5.0);
}

#[test]
fn pretty_format_without_tty_keeps_json_shape() {
    let dir = tempdir().expect("tempdir");
    let design = write(&dir, "design.json", DESIGN);

    let output = run_cmd(
        &dir,
        &[
            "compare",
            "--design",
            design.to_str().unwrap(),
            "--impl",
            design.to_str().unwrap(),
            "--format",
            "pretty",
        ],
    );
    assert_eq!(output.status.code(), Some(0));
    let raw: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(raw["mode"], "compare");
    assert_eq!(raw["passed"], true);
}
