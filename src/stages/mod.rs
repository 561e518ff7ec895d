//! Pipeline stages, in execution order.
//!
//! Each stage is a function taking the resolved configuration and a
//! [`crate::process::CommandRunner`]; none of them touch global state. The
//! sequencing and fail-fast policy live in [`crate::pipeline`], not here.

pub mod bootstrap;
pub mod build;
pub mod cleanup;
pub mod instrument;
pub mod upload;

pub use bootstrap::{KcovSourceBuild, ToolProvisioner};
