//! Top-level pipeline sequencing.
//!
//! Stages run in a fixed order with fail-fast semantics: the first error
//! stops the run before any later stage issues a command. There are no
//! retries and no rollback; a failed run leaves whatever the failing tool
//! left behind for the CI environment to discard.

use crate::artifacts;
use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::process::CommandRunner;
use crate::stages::{self, ToolProvisioner};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Base names of the artifacts instrumented, in processing order.
    pub instrumented: Vec<String>,
    /// Whether the upload stage ran (false under `--skip-upload`).
    pub uploaded: bool,
    /// Artifacts deleted by cleanup.
    pub cleaned: usize,
}

/// Execute the full pipeline: build, test, bootstrap the coverage tool,
/// instrument every artifact, upload, clean up.
pub fn run(
    config: &PipelineConfig,
    runner: &dyn CommandRunner,
    provisioner: &dyn ToolProvisioner,
) -> Result<PipelineReport, PipelineError> {
    stages::build::run(config, runner)?;

    let tool = provisioner.ensure_installed(runner)?;

    let artifacts = artifacts::discover(&config.target_dir, &config.prefix)?;
    if artifacts.is_empty() {
        log::warn!(
            "no test binaries matching `{}-*` found in {}; nothing to instrument",
            config.prefix,
            config.target_dir.display()
        );
    }
    stages::instrument::run(config, runner, &tool, &artifacts)?;

    let uploaded = if config.skip_upload {
        log::info!("skipping upload");
        false
    } else {
        stages::upload::run(config, runner)?;
        true
    };

    let cleaned = if config.keep_artifacts {
        log::info!("keeping artifacts");
        0
    } else {
        stages::cleanup::run(config)?
    };

    Ok(PipelineReport {
        instrumented: artifacts.into_iter().map(|a| a.name).collect(),
        uploaded,
        cleaned,
    })
}
