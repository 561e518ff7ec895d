use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "covpipe")]
#[command(about = "CI coverage pipeline: build, test, instrument, upload", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the coverage pipeline
    Run {
        /// Artifact prefix (defaults to project.prefix from .covpipe.toml)
        #[arg(long)]
        prefix: Option<String>,

        /// Build-output directory containing the test binaries
        #[arg(long, value_name = "DIR")]
        target_dir: Option<PathBuf>,

        /// Root directory for per-artifact coverage reports
        #[arg(long, value_name = "DIR")]
        coverage_dir: Option<PathBuf>,

        /// Skip the upload stage (for local runs)
        #[arg(long)]
        skip_upload: bool,

        /// Keep the test binaries instead of deleting them after upload
        #[arg(long)]
        keep_artifacts: bool,

        /// Continue instrumenting remaining artifacts when one fails,
        /// reporting all failures at the end
        #[arg(long)]
        keep_going: bool,

        /// Print the commands that would run without executing anything
        #[arg(long)]
        dry_run: bool,

        /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .covpipe.toml to the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_overrides() {
        let cli = Cli::parse_from([
            "covpipe",
            "run",
            "--prefix",
            "myproj",
            "--skip-upload",
            "--dry-run",
            "-vv",
        ]);
        match cli.command {
            Commands::Run {
                prefix,
                skip_upload,
                dry_run,
                verbosity,
                keep_going,
                ..
            } => {
                assert_eq!(prefix.as_deref(), Some("myproj"));
                assert!(skip_upload);
                assert!(dry_run);
                assert!(!keep_going);
                assert_eq!(verbosity, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_init_force() {
        let cli = Cli::parse_from(["covpipe", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init { force: true }));
    }
}
