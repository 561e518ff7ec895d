//! Instrumentation stage.
//!
//! Re-executes each test binary under kcov, which records line coverage into
//! a per-artifact report directory. The default policy is fail-fast on the
//! first artifact whose instrumentation run exits non-zero; `--keep-going`
//! switches to collecting every failure and reporting them together.

use crate::artifacts::Artifact;
use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::process::{CommandRunner, CommandSpec};
use std::fs;
use std::path::Path;

/// Instrument every artifact, producing one report directory per binary.
pub fn run(
    config: &PipelineConfig,
    runner: &dyn CommandRunner,
    tool: &Path,
    artifacts: &[Artifact],
) -> Result<(), PipelineError> {
    let mut failed: Vec<String> = Vec::new();

    for artifact in artifacts {
        let report_dir = artifact.report_dir(&config.coverage_dir);
        if !config.dry_run {
            // Idempotent: repeat runs land in the same directory.
            fs::create_dir_all(&report_dir)?;
        }

        log::info!("instrumenting {}", artifact.name);
        let result = runner.run(&kcov_invocation(config, tool, artifact, &report_dir));
        if let Err(source) = result {
            if config.keep_going {
                log::warn!("instrumentation failed for {}, continuing", artifact.name);
                failed.push(artifact.name.clone());
            } else {
                return Err(PipelineError::Instrument {
                    artifact: artifact.name.clone(),
                    source,
                });
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::InstrumentBatch(failed))
    }
}

fn kcov_invocation(
    config: &PipelineConfig,
    tool: &Path,
    artifact: &Artifact,
    report_dir: &Path,
) -> CommandSpec {
    let mut spec = CommandSpec::new(tool.to_string_lossy());
    if !config.tool.exclude_patterns.is_empty() {
        spec = spec.arg(format!(
            "--exclude-pattern={}",
            config.tool.exclude_patterns.join(",")
        ));
    }
    if config.tool.verify {
        spec = spec.arg("--verify");
    }
    spec.arg(report_dir.to_string_lossy())
        .arg(artifact.path.to_string_lossy())
}
