//! Pipeline error types.
//!
//! Each stage failure is a distinct variant carrying the failing command's
//! details, so the binary can propagate the child's exit status as its own
//! and the caller can tell which stage broke without parsing log text.

use crate::process::CommandError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("build failed")]
    Build(#[source] CommandError),

    #[error("tests failed")]
    Test(#[source] CommandError),

    #[error("coverage tool bootstrap failed during {step}")]
    Bootstrap {
        step: &'static str,
        #[source]
        source: CommandError,
    },

    #[error("instrumentation failed for `{artifact}`")]
    Instrument {
        artifact: String,
        #[source]
        source: CommandError,
    },

    /// Collected failures from a `--keep-going` instrumentation pass.
    #[error("instrumentation failed for {} artifact(s): {}", .0.len(), .0.join(", "))]
    InstrumentBatch(Vec<String>),

    #[error("upload failed")]
    Upload(#[source] CommandError),

    #[error("artifact discovery failed in {dir}: {message}")]
    Discovery { dir: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// The exit status the pipeline process should terminate with.
    ///
    /// Where the failure wraps a child that exited with a code, that code is
    /// propagated verbatim; everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        let source = match self {
            PipelineError::Build(e)
            | PipelineError::Test(e)
            | PipelineError::Bootstrap { source: e, .. }
            | PipelineError::Instrument { source: e, .. }
            | PipelineError::Upload(e) => Some(e),
            _ => None,
        };
        source.and_then(CommandError::exit_code).unwrap_or(1)
    }
}
