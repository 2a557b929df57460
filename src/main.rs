use clap::Parser;
use downsort::cli::{Args, init_logging, resolve_target, run_cli};
use downsort::file_organizer::OrganizeError;
use downsort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(target) = resolve_target(args.target.as_deref()) else {
        OutputFormatter::error("Could not determine the home directory; pass a TARGET folder.");
        return ExitCode::from(2);
    };

    match run_cli(&args, &target) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e @ OrganizeError::InvalidPattern { .. }) => {
            OutputFormatter::error(&e.to_string());
            ExitCode::from(2)
        }
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
