mod cli;
mod platform;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    platform::logging::initialize(
        watermark_logging::level_for_verbosity(cli.verbose),
        cli.log_file.as_deref(),
    );

    match platform::run_app(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
