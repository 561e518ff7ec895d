//! Coverage-tool bootstrap stage.
//!
//! kcov is fetched as a source tarball and built from scratch on every run.
//! CI workers are ephemeral, so there is no prior installation to detect and
//! nothing to invalidate; the only concession to speed is routing the C++
//! compile through ccache when the worker has one.

use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::process::{find_compiler_launcher, CommandRunner, CommandSpec};
use std::fs;
use std::path::{Path, PathBuf};

/// Makes the coverage tool available, returning the path to its binary.
///
/// The pipeline core sequences stages against this trait so its tests do not
/// need network access or a C++ toolchain.
pub trait ToolProvisioner {
    fn ensure_installed(&self, runner: &dyn CommandRunner) -> Result<PathBuf, PipelineError>;
}

/// Fetch, build, and install kcov into a pipeline-local prefix.
#[derive(Debug, Clone)]
pub struct KcovSourceBuild {
    archive_url: String,
    prefix: PathBuf,
    dry_run: bool,
}

impl KcovSourceBuild {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            archive_url: config.tool.archive_url.clone(),
            prefix: config.tool.install_prefix.clone(),
            dry_run: config.dry_run,
        }
    }

    fn prepare_dirs(&self, src_dir: &Path, build_dir: &Path) -> Result<(), PipelineError> {
        if self.dry_run {
            return Ok(());
        }
        fs::create_dir_all(src_dir)?;
        fs::create_dir_all(build_dir)?;
        Ok(())
    }
}

impl ToolProvisioner for KcovSourceBuild {
    fn ensure_installed(&self, runner: &dyn CommandRunner) -> Result<PathBuf, PipelineError> {
        let archive = self.prefix.join("kcov.tar.gz");
        let src_dir = self.prefix.join("src");
        let build_dir = self.prefix.join("build");
        self.prepare_dirs(&src_dir, &build_dir)?;

        // CMAKE_INSTALL_PREFIX resolves relative paths against the build
        // directory, so the prefix must be absolute.
        let install_prefix = std::path::absolute(&self.prefix)?;

        log::info!("fetching coverage tool from {}", self.archive_url);
        runner
            .run(
                &CommandSpec::new("curl")
                    .args(["-sSL", "-o"])
                    .arg(archive.to_string_lossy())
                    .arg(self.archive_url.as_str()),
            )
            .map_err(|source| PipelineError::Bootstrap {
                step: "fetch",
                source,
            })?;

        runner
            .run(
                &CommandSpec::new("tar")
                    .arg("xzf")
                    .arg(archive.to_string_lossy())
                    .arg("-C")
                    .arg(src_dir.to_string_lossy())
                    .arg("--strip-components=1"),
            )
            .map_err(|source| PipelineError::Bootstrap {
                step: "extract",
                source,
            })?;

        let mut configure = CommandSpec::new("cmake")
            .arg("-S")
            .arg(src_dir.to_string_lossy())
            .arg("-B")
            .arg(build_dir.to_string_lossy())
            .arg("-DCMAKE_BUILD_TYPE=Release")
            .arg(format!(
                "-DCMAKE_INSTALL_PREFIX={}",
                install_prefix.display()
            ));
        if let Some(launcher) = find_compiler_launcher() {
            log::debug!("using compiler launcher {}", launcher.display());
            configure = configure
                .arg(format!("-DCMAKE_C_COMPILER_LAUNCHER={}", launcher.display()))
                .arg(format!(
                    "-DCMAKE_CXX_COMPILER_LAUNCHER={}",
                    launcher.display()
                ));
        }
        runner
            .run(&configure)
            .map_err(|source| PipelineError::Bootstrap {
                step: "configure",
                source,
            })?;

        log::info!("compiling coverage tool");
        runner
            .run(&CommandSpec::new("make").current_dir(&build_dir))
            .map_err(|source| PipelineError::Bootstrap {
                step: "compile",
                source,
            })?;

        runner
            .run(&CommandSpec::new("make").arg("install").current_dir(&build_dir))
            .map_err(|source| PipelineError::Bootstrap {
                step: "install",
                source,
            })?;

        Ok(install_prefix.join("bin").join("kcov"))
    }
}
