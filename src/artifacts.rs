//! Test-binary artifact discovery.
//!
//! The build stage drops test binaries into the build-output directory named
//! `<prefix>-<hash>`, alongside `.d` dependency-metadata files with the same
//! stem. Discovery matches on the prefix and filters the `.d` files out; the
//! same predicate drives both instrumentation and cleanup so the two stages
//! always agree on the artifact set.

use crate::errors::PipelineError;
use std::path::{Path, PathBuf};

/// A discovered test binary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Artifact {
    pub path: PathBuf,
    /// File name, used to derive the per-artifact report directory.
    pub name: String,
}

impl Artifact {
    /// Report directory for this artifact under the coverage-output root.
    pub fn report_dir(&self, coverage_root: &Path) -> PathBuf {
        coverage_root.join(&self.name)
    }
}

/// Enumerate artifacts in `target_dir` matching `prefix`.
///
/// Results are sorted by path so instrumentation order is deterministic.
/// An absent or empty directory yields an empty set, not an error.
pub fn discover(target_dir: &Path, prefix: &str) -> Result<Vec<Artifact>, PipelineError> {
    let pattern = target_dir.join(format!("{prefix}-*"));
    let pattern = pattern.to_string_lossy().into_owned();
    let matches = glob::glob(&pattern).map_err(|e| PipelineError::Discovery {
        dir: target_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut artifacts = Vec::new();
    for entry in matches {
        let path = entry.map_err(|e| PipelineError::Discovery {
            dir: target_dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !path.is_file() || is_dependency_file(&path) {
            continue;
        }
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        artifacts.push(Artifact { path, name });
    }
    artifacts.sort();
    Ok(artifacts)
}

/// Cargo writes a `<binary>.d` makefile-style dependency listing next to
/// each test binary; those are not executable and must not be instrumented
/// or deleted as artifacts.
fn is_dependency_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "d")
}
