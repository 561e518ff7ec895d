// Export modules for library usage
pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod process;
pub mod stages;

// Re-export commonly used types
pub use crate::artifacts::Artifact;
pub use crate::config::{CliOverrides, PipelineConfig};
pub use crate::errors::PipelineError;
pub use crate::pipeline::PipelineReport;
pub use crate::process::{CommandRunner, CommandSpec, ProcessRunner};
pub use crate::stages::{KcovSourceBuild, ToolProvisioner};
