//! Typed invocation of external commands.
//!
//! Every external tool the pipeline touches (cargo, curl, tar, cmake, make,
//! kcov, the upload helper) is modeled as a [`CommandSpec`] executed through
//! the [`CommandRunner`] trait. Orchestration logic never calls
//! `std::process::Command` directly, so tests can substitute a scripted
//! runner and assert on the exact command sequence without any of the real
//! tools installed.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Command;

/// A single external command: program, arguments, optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Shell-style rendering used in logs and error messages.
    pub fn rendered(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            if arg.contains(' ') {
                out.push('\'');
                out.push_str(arg);
                out.push('\'');
            } else {
                out.push_str(arg);
            }
        }
        out
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered())
    }
}

/// Failure of a single external command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` exited with status {status}")]
    NonZero { command: String, status: i32 },
    /// Killed by a signal, or the platform reported no exit code.
    #[error("`{command}` terminated without an exit code")]
    Terminated { command: String },
}

impl CommandError {
    /// Exit code of the failed child, where one exists.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CommandError::NonZero { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Executes commands on behalf of the pipeline stages.
pub trait CommandRunner {
    /// Run a command to completion, returning `Err` on spawn failure or
    /// non-zero exit. Output streams to the parent's stdout/stderr; the
    /// pipeline relies on the underlying tools for their own diagnostics.
    fn run(&self, spec: &CommandSpec) -> Result<(), CommandError>;
}

/// Production runner: blocking `std::process` execution with inherited stdio.
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<(), CommandError> {
        log::debug!("running: {}", spec);
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }
        let status = command.status().map_err(|source| CommandError::Spawn {
            command: spec.rendered(),
            source,
        })?;
        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(CommandError::NonZero {
                command: spec.rendered(),
                status: code,
            }),
            None => Err(CommandError::Terminated {
                command: spec.rendered(),
            }),
        }
    }
}

/// Dry-run runner: prints each command instead of executing it.
#[derive(Debug, Default, Clone)]
pub struct DryRunRunner;

impl DryRunRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, spec: &CommandSpec) -> Result<(), CommandError> {
        println!("[dry-run] {}", spec);
        Ok(())
    }
}

/// Look up a compiler launcher (ccache) on PATH, if one is installed.
///
/// The kcov build is pure C++; wrapping the compilers in ccache makes repeat
/// CI runs on a warm cache substantially cheaper. Absence is not an error.
pub fn find_compiler_launcher() -> Option<PathBuf> {
    which::which("ccache").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn rendered_joins_program_and_args() {
        let spec = CommandSpec::new("cargo").args(["build", "--verbose"]);
        assert_eq!(spec.rendered(), "cargo build --verbose");
    }

    #[test]
    fn rendered_quotes_args_with_spaces() {
        let spec = CommandSpec::new("bash").arg("-c").arg("echo hello");
        assert_eq!(spec.rendered(), "bash -c 'echo hello'");
    }

    #[test]
    fn current_dir_sets_cwd() {
        let spec = CommandSpec::new("make").current_dir("/tmp/build");
        assert_eq!(spec.cwd.as_deref(), Some(Path::new("/tmp/build")));
    }

    #[test]
    fn nonzero_error_exposes_exit_code() {
        let err = CommandError::NonZero {
            command: "cargo test".into(),
            status: 101,
        };
        assert_eq!(err.exit_code(), Some(101));
    }

    #[test]
    fn spawn_error_has_no_exit_code() {
        let err = CommandError::Spawn {
            command: "nope".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn dry_run_runner_always_succeeds() {
        let runner = DryRunRunner::new();
        let spec = CommandSpec::new("definitely-not-installed").arg("--flag");
        assert!(runner.run(&spec).is_ok());
    }

    #[test]
    fn process_runner_reports_spawn_failure() {
        let runner = ProcessRunner::new();
        let spec = CommandSpec::new("covpipe-test-no-such-binary-3f9a");
        let err = runner.run(&spec).unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
