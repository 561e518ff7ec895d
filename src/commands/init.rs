use crate::config::CONFIG_FILE_NAME;
use anyhow::Result;
use std::path::PathBuf;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let default_config = r#"# covpipe configuration

[project]
# Artifact prefix: test binaries are discovered as <prefix>-* in target_dir.
prefix = "myproject"
target_dir = "target/debug"
coverage_dir = "target/cov"

[tool]
# Pin to a release tarball for reproducible instrumentation, e.g.
# "https://github.com/SimonKagstrom/kcov/archive/v43.tar.gz"
archive_url = "https://github.com/SimonKagstrom/kcov/archive/master.tar.gz"
install_prefix = "target/kcov"
exclude_patterns = ["/.cargo", "/usr/lib"]
verify = true

[upload]
command = "bash"
args = ["-c", "bash <(curl -s https://codecov.io/bash)"]
"#;

    std::fs::write(&config_path, default_config)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}
