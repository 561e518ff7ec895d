//! Build & test stage.

use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::process::{CommandRunner, CommandSpec};

/// Compile the project and run its test suite, both verbose.
///
/// The test binaries this leaves behind in the build-output directory are
/// the artifacts the rest of the pipeline operates on. Failures propagate
/// immediately; partial build output is left for the CI environment to
/// discard with the workspace.
pub fn run(_config: &PipelineConfig, runner: &dyn CommandRunner) -> Result<(), PipelineError> {
    log::info!("building project");
    runner
        .run(&CommandSpec::new("cargo").args(["build", "--verbose"]))
        .map_err(PipelineError::Build)?;

    log::info!("running test suite");
    runner
        .run(&CommandSpec::new("cargo").args(["test", "--verbose"]))
        .map_err(PipelineError::Test)?;

    Ok(())
}
