mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_compare, run_normalize};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    dpm_lib::logging::init(args.verbose);

    match args.command {
        Commands::Compare {
            design,
            r#impl,
            threshold,
            pass_threshold,
            categories,
            format,
            output,
            skip_compare,
        } => {
            run_compare(
                &raw_args,
                args.config,
                design,
                r#impl,
                threshold,
                pass_threshold,
                categories,
                format,
                output,
                skip_compare,
            )
            .await
        }
        Commands::Normalize {
            input,
            rem_base,
            output,
            format,
        } => run_normalize(args.config, input, rem_base, format, output).await,
    }
}
