//! Upload stage.
//!
//! The upload helper is an external command (by default the codecov bash
//! uploader, fetched over the network at run time). It finds the report
//! directories on its own and authenticates with whatever token the CI
//! environment provides; both are opaque to the pipeline.

use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::process::{CommandRunner, CommandSpec};

pub fn run(config: &PipelineConfig, runner: &dyn CommandRunner) -> Result<(), PipelineError> {
    log::info!("uploading coverage reports");
    let spec = CommandSpec::new(config.upload.program.as_str()).args(config.upload.args.clone());
    runner.run(&spec).map_err(PipelineError::Upload)?;
    println!("Uploaded code coverage");
    Ok(())
}
