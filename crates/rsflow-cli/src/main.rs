use clap::Parser;
use rsflow_cli::{run_clip, run_fetch, Cli, CliError, Command, RsflowConfig, Summary};
use rsflow_common::{ProgressCallback, ProgressEvent};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG takes precedence over -v
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<Summary, CliError> {
    let config = match &cli.config {
        Some(path) => RsflowConfig::load(path)?,
        None => RsflowConfig::default(),
    };
    debug!("Configuration: {:?}", config);

    let progress: ProgressCallback =
        Box::new(|event: &ProgressEvent<'_>| eprintln!("{}", event));
    let callback = (!cli.quiet).then_some(&progress);

    match &cli.command {
        Command::Fetch(args) => run_fetch(args, &config, callback),
        Command::Clip(args) => run_clip(args, &config, callback),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(summary) => {
            for path in &summary.outputs {
                println!("{}", path.display());
            }
            for failure in &summary.failures {
                eprintln!("failed: {}", failure);
            }
            if summary.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
