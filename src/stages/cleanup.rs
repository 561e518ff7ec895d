//! Cleanup stage.
//!
//! Deletes the instrumented test binaries so repeat CI runs on a cached
//! target directory do not re-instrument stale artifacts. Best-effort by
//! contract: a file that cannot be removed is logged and skipped, and zero
//! matches is a no-op.

use crate::artifacts;
use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use std::fs;

/// Remove every file the discovery predicate matches, returning the count
/// of deleted artifacts.
pub fn run(config: &PipelineConfig) -> Result<usize, PipelineError> {
    let artifacts = artifacts::discover(&config.target_dir, &config.prefix)?;
    if artifacts.is_empty() {
        log::warn!(
            "no artifacts to clean up in {}",
            config.target_dir.display()
        );
        return Ok(0);
    }

    let mut removed = 0;
    for artifact in &artifacts {
        if config.dry_run {
            println!("[dry-run] rm {}", artifact.path.display());
            continue;
        }
        match fs::remove_file(&artifact.path) {
            Ok(()) => {
                log::debug!("removed {}", artifact.path.display());
                removed += 1;
            }
            Err(e) => log::warn!("failed to remove {}: {}", artifact.path.display(), e),
        }
    }
    Ok(removed)
}
