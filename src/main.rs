use clap::Parser;
use covpipe::cli::{Cli, Commands};
use covpipe::config::CliOverrides;
use covpipe::errors::PipelineError;
use log::LevelFilter;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = dispatch(cli) {
        eprintln!("error: {:#}", err);
        std::process::exit(exit_code(&err));
    }
}

fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run {
            prefix,
            target_dir,
            coverage_dir,
            skip_upload,
            keep_artifacts,
            keep_going,
            dry_run,
            verbosity,
        } => {
            init_logging(verbosity);
            covpipe::commands::run::run_pipeline(CliOverrides {
                prefix,
                target_dir,
                coverage_dir,
                skip_upload,
                keep_artifacts,
                keep_going,
                dry_run,
            })
        }
        Commands::Init { force } => {
            init_logging(0);
            covpipe::commands::init::init_config(force)
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// The failing child's exit status where one is known, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<PipelineError>()
        .map(PipelineError::exit_code)
        .unwrap_or(1)
}
