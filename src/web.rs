use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

use crate::config::{BuildConfig, APP_NAME};
use crate::exec;

/// Package the web frontend: run the crate's build script, then stage the
/// built `dist` tree under a versioned upload directory. No archive is
/// produced for web releases.
pub fn package(config: &BuildConfig) -> Result<()> {
    run_build_script(config)?;

    let staged = stage_distribution(config)?;
    println!("Staged web distribution: {}", staged.display());

    Ok(())
}

fn run_build_script(config: &BuildConfig) -> Result<()> {
    let script = config.crate_path.join("build.sh");
    println!("Running web build script {}", script.display());

    let mut cmd = Command::new("bash");
    cmd.arg(&script).arg("--with-npm-install");

    exec::run_streamed(&mut cmd).context("Web build script failed")?;
    Ok(())
}

/// Copy the built `dist` tree into `<upload_path>/punchcards/v<version>`.
/// The app directory is created if absent; the versioned destination must
/// not already exist.
fn stage_distribution(config: &BuildConfig) -> Result<PathBuf> {
    let app_dir = config.upload_path.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create upload directory {}", app_dir.display()))?;

    let dest = app_dir.join(format!("v{}", config.version));
    copy_tree(&config.crate_path.join("dist"), &dest)?;

    Ok(dest)
}

/// Recursively copy a directory tree. The destination is created fresh
/// and must not already exist.
fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir(dest)
        .with_context(|| format!("Failed to create destination {}", dest.display()))?;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }

    Ok(())
}
