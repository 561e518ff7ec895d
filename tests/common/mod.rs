//! Shared test doubles for pipeline integration tests.

use covpipe::errors::PipelineError;
use covpipe::process::{CommandError, CommandRunner, CommandSpec};
use covpipe::stages::ToolProvisioner;
use std::cell::RefCell;
use std::path::PathBuf;

/// Records every command it is asked to run, optionally failing the first
/// command whose rendered form contains a configured needle.
pub struct FakeRunner {
    fail_on: Option<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, spec: &CommandSpec) -> Result<(), CommandError> {
        let rendered = spec.rendered();
        self.calls.borrow_mut().push(rendered.clone());
        match &self.fail_on {
            Some(needle) if rendered.contains(needle.as_str()) => Err(CommandError::NonZero {
                command: rendered,
                status: 1,
            }),
            _ => Ok(()),
        }
    }
}

/// Provisioner that issues a single marker command through the runner, so
/// tests can assert where the bootstrap falls in the stage ordering without
/// a network or a C++ toolchain.
pub struct StubProvisioner {
    pub tool: PathBuf,
}

impl StubProvisioner {
    pub fn new() -> Self {
        Self {
            tool: PathBuf::from("kcov"),
        }
    }
}

impl ToolProvisioner for StubProvisioner {
    fn ensure_installed(&self, runner: &dyn CommandRunner) -> Result<PathBuf, PipelineError> {
        runner
            .run(&CommandSpec::new("provision-kcov"))
            .map_err(|source| PipelineError::Bootstrap {
                step: "fetch",
                source,
            })?;
        Ok(self.tool.clone())
    }
}
