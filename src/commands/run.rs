//! The `run` subcommand: wire configuration to the pipeline and execute it.

use crate::config::{self, CliOverrides};
use crate::pipeline;
use crate::process::{CommandRunner, DryRunRunner, ProcessRunner};
use crate::stages::KcovSourceBuild;
use anyhow::Result;
use std::path::Path;

pub fn run_pipeline(overrides: CliOverrides) -> Result<()> {
    let file = config::load_config_file(Path::new("."))?;
    let config = config::resolve(file, overrides)?;

    let runner: Box<dyn CommandRunner> = if config.dry_run {
        Box::new(DryRunRunner::new())
    } else {
        Box::new(ProcessRunner::new())
    };
    let provisioner = KcovSourceBuild::from_config(&config);

    let report = pipeline::run(&config, runner.as_ref(), &provisioner)?;
    log::info!(
        "pipeline complete: {} artifact(s) instrumented, {} cleaned up",
        report.instrumented.len(),
        report.cleaned
    );
    Ok(())
}
