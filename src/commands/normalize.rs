use std::path::PathBuf;
use std::process::ExitCode;

use dpm_lib::output::DPM_OUTPUT_VERSION;
use dpm_lib::{load_snapshot, DpmError, DpmOutput, NormalizeOutput, Normalizer, SourceDescriptor};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::load_config;

/// Run the normalize command.
pub async fn run_normalize(
    config_path: Option<PathBuf>,
    input: PathBuf,
    rem_base: Option<f64>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let fallback_rem_base = rem_base.unwrap_or(config.rem_base_px);
    if !(fallback_rem_base.is_finite() && fallback_rem_base > 0.0) {
        return render_error(
            DpmError::Config(format!(
                "--rem-base must be a positive number, got {}",
                fallback_rem_base
            )),
            format,
            output,
        );
    }

    let snapshot = match load_snapshot(&input).await {
        Ok(snapshot) => snapshot,
        Err(err) => return render_error(err, format, output.clone()),
    };

    let normalizer = Normalizer::for_snapshot(&snapshot, fallback_rem_base);
    let tokens = normalizer.normalize_snapshot(&snapshot);
    let body = DpmOutput::Normalize(NormalizeOutput {
        version: DPM_OUTPUT_VERSION.to_string(),
        input: SourceDescriptor::available(&input),
        rem_base_px: normalizer.rem_base_px,
        unparseable: tokens.invalid_count(),
        tokens,
    });

    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(DpmError::Io(std::io::Error::other(err.to_string())), format, output);
    }
    ExitCode::SUCCESS
}
