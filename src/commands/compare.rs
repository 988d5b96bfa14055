use std::path::PathBuf;
use std::process::ExitCode;

use dpm_lib::output::DPM_OUTPUT_VERSION;
use dpm_lib::{
    load_snapshot, CompareOutput, DpmError, DpmOutput, Engine, ExtractOutput,
    InMemoryReportCache, Normalizer, Snapshot, SourceDescriptor,
};
use tracing::{debug, info, warn};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_compare, render_error, write_output};
use crate::settings::{
    format_effective_config, load_config, parse_categories, resolve_compare_settings,
    validate_settings, CompareFlagSources,
};

/// Run the compare command.
#[allow(clippy::too_many_arguments)]
pub async fn run_compare(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    design_path: PathBuf,
    impl_path: PathBuf,
    threshold: f64,
    pass_threshold: f64,
    categories: Option<Vec<String>>,
    format: OutputFormat,
    output: Option<PathBuf>,
    skip_compare: bool,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let flag_sources = CompareFlagSources::from_args(raw_args);
    let effective = resolve_compare_settings(threshold, pass_threshold, &config, &flag_sources);
    if let Err(err) = validate_settings(&effective, config_path.as_deref()) {
        return render_error(err, format, output.clone());
    }

    let categories = match parse_categories(categories.as_deref()) {
        Ok(c) => c,
        Err(err) => return render_error(err, format, output.clone()),
    };
    debug!(
        "{}",
        format_effective_config(&effective, &categories, config_path.as_deref())
    );

    let design = match load_snapshot(&design_path).await {
        Ok(snapshot) => snapshot,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let design_source = SourceDescriptor::available(&design_path);

    // A partial extraction still gets a report: the implementation side is
    // compared as empty.
    let (implementation, impl_source) = match load_snapshot(&impl_path).await {
        Ok(snapshot) => (Some(snapshot), SourceDescriptor::available(&impl_path)),
        Err(err) => {
            warn!(path = %impl_path.display(), error = %err, "implementation snapshot unavailable");
            (
                None,
                SourceDescriptor::unavailable(&impl_path, err.to_string()),
            )
        }
    };

    if skip_compare {
        info!("comparison skipped; emitting normalized tokens");
        let empty = Snapshot::default();
        let impl_snapshot = implementation.as_ref().unwrap_or(&empty);
        let body = DpmOutput::Extract(ExtractOutput {
            version: DPM_OUTPUT_VERSION.to_string(),
            design: design_source,
            implementation: impl_source,
            design_tokens: Normalizer::for_snapshot(&design, effective.rem_base_px)
                .normalize_snapshot(&design),
            implementation_tokens: Normalizer::for_snapshot(impl_snapshot, effective.rem_base_px)
                .normalize_snapshot(impl_snapshot),
        });
        if let Err(err) = write_output(&body, format, output.clone()) {
            return render_error(DpmError::Io(std::io::Error::other(err.to_string())), format, output);
        }
        return ExitCode::SUCCESS;
    }

    let engine = Engine::from_config(&effective).only(&categories);
    let mut cache = InMemoryReportCache::from_config(&effective.cache);
    let report = match tokio::task::spawn_blocking(move || {
        engine.compare_cached(&mut cache, Some(&design), implementation.as_ref())
    })
    .await
    {
        Ok(Ok(report)) => report,
        Ok(Err(err)) => return render_error(err, format, output),
        Err(join_error) => {
            return render_error(
                DpmError::Unknown(format!("Comparison task failed: {}", join_error)),
                format,
                output,
            )
        }
    };

    // Determine pass/fail
    let passed = report.overall_similarity >= effective.pass_threshold;
    info!(
        overall = report.overall_similarity,
        pass_threshold = effective.pass_threshold,
        passed,
        "comparison complete"
    );

    let body = DpmOutput::Compare(CompareOutput {
        version: DPM_OUTPUT_VERSION.to_string(),
        design: design_source,
        implementation: impl_source,
        pass_threshold: effective.pass_threshold,
        passed,
        report,
    });

    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(DpmError::Io(std::io::Error::other(err.to_string())), format, output);
    }

    exit_code_for_compare(passed)
}
