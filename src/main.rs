//! test-relocator CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use test_relocator::{format_report, Cli, Relocator};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok((output, code)) => {
            println!("{}", output);
            code
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> test_relocator::Result<(String, ExitCode)> {
    // 1. Merge config file and flags
    let config = cli.to_config()?;

    // 2. Resolve crate name and build the engine
    let relocator = Relocator::new(config)?;

    // 3. Relocate
    let report = relocator.run()?;

    // 4. Render
    let output = format_report(&report, cli.format, cli.verbose);
    Ok((output, report.exit_code()))
}
