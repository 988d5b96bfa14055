use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dpm_lib::output::DPM_OUTPUT_VERSION;
use dpm_lib::{CategoryOutcome, DpmError, DpmOutput, ErrorOutput, NormalizedTokens};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &DpmOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: DpmError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::error!(error = %err, "dpm failed");
    let error_payload = err.to_payload();
    let payload = DpmOutput::Error(ErrorOutput {
        version: DPM_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Reserve exit code 2 for fatal/errors; threshold failures use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &DpmOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &DpmOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &DpmOutput, colorize: bool) -> String {
    match body {
        DpmOutput::Compare(out) => {
            let mut buf = String::new();
            let report = &out.report;
            let status = if out.passed { "PASS" } else { "FAIL" };
            let status_colored = color(status, if out.passed { "32" } else { "31" }, colorize);
            let overall = color(
                &format!("{:.1}%", report.overall_similarity),
                threshold_color_code(report.overall_similarity, out.pass_threshold),
                colorize,
            );
            writeln!(buf, "{} Design parity check", status_colored).ok();
            writeln!(
                buf,
                "Similarity: {overall} (pass threshold {:.1}%)",
                out.pass_threshold
            )
            .ok();
            if !out.implementation.available {
                let reason = out.implementation.error.as_deref().unwrap_or("unavailable");
                writeln!(
                    buf,
                    "Implementation {} could not be read ({}); compared as empty.",
                    out.implementation.path.display(),
                    reason
                )
                .ok();
            }

            if !report.per_category.is_empty() {
                writeln!(buf, "Categories:").ok();
                writeln!(
                    buf,
                    "  {:12} {:>8} {:>8} {:>8} {:>8}",
                    "category", "score", "matched", "missing", "extra"
                )
                .ok();
                for (category, outcome) in &report.per_category {
                    match outcome {
                        CategoryOutcome::Compared(result) => {
                            let score = color(
                                &format!("{:>7.1}%", result.similarity),
                                score_color_code(result.similarity),
                                colorize,
                            );
                            writeln!(
                                buf,
                                "  {:12} {} {:>8} {:>8} {:>8}",
                                category.as_str(),
                                score,
                                result.matched.len(),
                                result.missing.len(),
                                result.extra.len()
                            )
                            .ok();
                        }
                        CategoryOutcome::Errored { message } => {
                            let label = color("  errored", "31", colorize);
                            writeln!(buf, "  {:12} {} {}", category.as_str(), label, message).ok();
                        }
                    }
                }
            }

            writeln!(
                buf,
                "Totals: {} comparisons, {} matches, {} deviations",
                report.total_comparisons, report.matches, report.deviations
            )
            .ok();
            if report.data_quality.unparseable > 0 {
                writeln!(
                    buf,
                    "Data quality: {} unparseable entr{} excluded",
                    report.data_quality.unparseable,
                    if report.data_quality.unparseable == 1 { "y" } else { "ies" }
                )
                .ok();
            }

            let mut issues = report.top_issues.clone();
            if issues.len() > 5 {
                issues.truncate(5);
            }
            if !issues.is_empty() {
                writeln!(buf, "Top issues (max 5):").ok();
                for issue in issues {
                    writeln!(buf, "- {issue}").ok();
                }
            }
            buf
        }
        DpmOutput::Extract(out) => {
            let mut buf = String::new();
            let header = color("[EXTRACT]", "36", colorize);
            writeln!(buf, "{} Comparison skipped", header).ok();
            write_token_counts(&mut buf, "Design", &out.design.path, &out.design_tokens);
            write_token_counts(
                &mut buf,
                "Implementation",
                &out.implementation.path,
                &out.implementation_tokens,
            );
            buf
        }
        DpmOutput::Normalize(out) => {
            let mut buf = String::new();
            let header = color("[NORMALIZE]", "34", colorize);
            writeln!(buf, "{} rem base {}px", header, out.rem_base_px).ok();
            write_token_counts(&mut buf, "Input", &out.input.path, &out.tokens);
            for token in out
                .tokens
                .colors
                .iter()
                .chain(&out.tokens.typography)
                .chain(&out.tokens.spacing)
                .chain(&out.tokens.components)
            {
                writeln!(buf, "- {token}").ok();
            }
            buf
        }
        DpmOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

fn write_token_counts(buf: &mut String, label: &str, path: &Path, tokens: &NormalizedTokens) {
    writeln!(
        buf,
        "{label} {}: colors {}, typography {}, spacing {}, components {} ({} invalid)",
        path.display(),
        tokens.colors.len(),
        tokens.typography.len(),
        tokens.spacing.len(),
        tokens.components.len(),
        tokens.invalid_count()
    )
    .ok();
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Map a 0-100 score to ANSI color code.
fn score_color_code(score: f64) -> &'static str {
    if score >= 90.0 {
        "32" // green
    } else if score >= 75.0 {
        "33" // yellow
    } else {
        "31" // red
    }
}

fn threshold_color_code(score: f64, threshold: f64) -> &'static str {
    if score >= threshold {
        "32"
    } else if (threshold - score) <= 5.0 {
        "33"
    } else {
        "31"
    }
}

/// Determine exit code for compare command.
pub fn exit_code_for_compare(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpm_lib::{
        CompareOutput, ComparisonReport, DataQuality, Engine, NormalizeOutput, Normalizer,
        RawValue, Snapshot, SourceDescriptor,
    };
    use std::collections::BTreeMap;

    fn compare_output(report: ComparisonReport, passed: bool) -> DpmOutput {
        DpmOutput::Compare(CompareOutput {
            version: DPM_OUTPUT_VERSION.to_string(),
            design: SourceDescriptor::available("design.json"),
            implementation: SourceDescriptor::available("impl.json"),
            pass_threshold: 90.0,
            passed,
            report,
        })
    }

    #[test]
    fn exit_code_for_compare_maps_pass_fail() {
        assert_eq!(exit_code_for_compare(true), ExitCode::SUCCESS);
        assert_eq!(exit_code_for_compare(false), ExitCode::from(1));
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(
            DpmError::Config("boom".to_string()),
            OutputFormat::Json,
            None,
        );
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn format_pretty_includes_status_categories_and_issues() {
        let design = Snapshot {
            colors: vec![RawValue::from("#000000"), RawValue::from("#ff0000")],
            spacing: vec![RawValue::from("8px"), RawValue::from("not-a-length")],
            ..Snapshot::default()
        };
        let implementation = Snapshot {
            colors: vec![RawValue::from("#000000")],
            ..Snapshot::default()
        };
        let report = Engine::default().compare(Some(&design), Some(&implementation));

        let pretty = format_pretty(&compare_output(report, false), false);
        assert!(pretty.contains("FAIL Design parity check"));
        assert!(pretty.contains("pass threshold 90.0%"));
        assert!(pretty.contains("Categories:"));
        assert!(pretty.contains("colors") && pretty.contains("spacing"));
        assert!(pretty.contains("Data quality: 1 unparseable entry excluded"));
        assert!(pretty.contains("Top issues (max 5):"));
        assert!(pretty.contains("Color #ff0000 is missing in the implementation."));
        assert!(!pretty.contains("\x1b["));
    }

    #[test]
    fn format_pretty_marks_errored_categories() {
        let mut per_category = BTreeMap::new();
        per_category.insert(
            dpm_lib::Category::Typography,
            CategoryOutcome::Errored {
                message: "comparator panicked: boom".to_string(),
            },
        );
        let report = dpm_lib::aggregate(per_category, DataQuality::default());

        let pretty = format_pretty(&compare_output(report, false), false);
        assert!(pretty.contains("typography"));
        assert!(pretty.contains("errored comparator panicked: boom"));
    }

    #[test]
    fn format_pretty_notes_unavailable_implementation() {
        let output = DpmOutput::Compare(CompareOutput {
            version: DPM_OUTPUT_VERSION.to_string(),
            design: SourceDescriptor::available("design.json"),
            implementation: SourceDescriptor::unavailable("impl.json", "Snapshot file not found"),
            pass_threshold: 90.0,
            passed: false,
            report: Engine::default().compare(None, None),
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("impl.json could not be read (Snapshot file not found)"));
    }

    #[test]
    fn format_pretty_colorizes_when_requested() {
        let report = Engine::default().compare(None, None);
        let pretty = format_pretty(&compare_output(report, true), true);
        assert!(pretty.contains("\x1b[32mPASS\x1b[0m"));
    }

    #[test]
    fn format_pretty_lists_normalized_tokens() {
        let snapshot = Snapshot {
            colors: vec![RawValue::from("#ABC")],
            spacing: vec![RawValue::from("2rem")],
            ..Snapshot::default()
        };
        let normalizer = Normalizer::default();
        let tokens = normalizer.normalize_snapshot(&snapshot);
        let output = DpmOutput::Normalize(NormalizeOutput {
            version: DPM_OUTPUT_VERSION.to_string(),
            input: SourceDescriptor::available("snap.json"),
            rem_base_px: normalizer.rem_base_px,
            unparseable: tokens.invalid_count(),
            tokens,
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[NORMALIZE] rem base 16px"));
        assert!(pretty.contains("colors 1, typography 0, spacing 1, components 0 (0 invalid)"));
        assert!(pretty.contains("- #aabbcc"));
        assert!(pretty.contains("- 32px"));
    }

    #[test]
    fn format_pretty_error_includes_hint() {
        let payload = DpmError::snapshot("Snapshot file not found: design.json").to_payload();
        let output = DpmOutput::Error(ErrorOutput {
            version: DPM_OUTPUT_VERSION.to_string(),
            message: Some(payload.message.clone()),
            error: payload,
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] Snapshot file not found: design.json"));
        assert!(pretty.contains("Hint:"));
    }
}
