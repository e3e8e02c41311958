use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::archive;
use crate::bundle::{MacosAppBundler, PlatformBundler};
use crate::config::{BuildConfig, APP_NAME, LICENSE_NAME, README_NAME, REVISION_NAME};
use crate::exec;
use crate::git;

/// Package a desktop frontend: release-build the binary, stage it with
/// docs and a revision stamp, and zip the staged directory into the
/// upload path. Each stage is fatal on failure; nothing is retried.
pub fn package(config: &BuildConfig, binary_name: &str, output_prefix: &str) -> Result<()> {
    build_release(config)?;

    let output_dir = create_output_dir(config, output_prefix)?;
    stage_artifacts(config, binary_name, &output_dir)?;
    write_revision_stamp(config, &output_dir)?;

    let zip_path = archive_output(config, &output_dir)?;
    println!("Wrote release archive: {}", zip_path.display());

    if config.os == "macos" {
        MacosAppBundler.bundle(&output_dir)?;
    }

    Ok(())
}

/// Directory name a packaged release is staged and archived under.
fn output_dir_name(config: &BuildConfig, output_prefix: &str) -> String {
    format!(
        "{}-{}-{}-v{}",
        output_prefix,
        config.os,
        config.architecture.as_str(),
        config.version
    )
}

fn build_release(config: &BuildConfig) -> Result<()> {
    println!("Building release binary for {}", config.frontend.as_str());

    let mut cmd = Command::new("cargo");
    cmd.arg("build")
        .arg("--manifest-path")
        .arg(&config.manifest_path)
        .arg("--release");

    exec::run_streamed(&mut cmd).context("Release build failed")?;
    Ok(())
}

/// Create the staging directory under the build path. Intermediate
/// directories are created as needed, but the leaf must not already
/// exist: an identical (frontend, os, version) bundle from a previous
/// run is never overwritten or merged.
fn create_output_dir(config: &BuildConfig, output_prefix: &str) -> Result<PathBuf> {
    fs::create_dir_all(&config.build_path)
        .with_context(|| format!("Failed to create build path {}", config.build_path.display()))?;

    let output_dir = config.build_path.join(output_dir_name(config, output_prefix));
    fs::create_dir(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    Ok(output_dir)
}

fn stage_artifacts(config: &BuildConfig, binary_name: &str, output_dir: &Path) -> Result<()> {
    let binary_src = config
        .crate_path
        .join("target")
        .join("release")
        .join(binary_name);

    copy_into(&binary_src, &output_dir.join(APP_NAME))?;
    copy_into(&config.root_path.join(README_NAME), &output_dir.join(README_NAME))?;
    copy_into(&config.root_path.join(LICENSE_NAME), &output_dir.join(LICENSE_NAME))?;

    Ok(())
}

fn copy_into(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;
    Ok(())
}

fn write_revision_stamp(config: &BuildConfig, output_dir: &Path) -> Result<()> {
    let revision = git::head_revision(&config.root_path)?;
    let stamp_path = output_dir.join(REVISION_NAME);

    fs::write(&stamp_path, revision)
        .with_context(|| format!("Failed to write revision stamp {}", stamp_path.display()))?;
    Ok(())
}

fn archive_output(config: &BuildConfig, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(&config.upload_path).with_context(|| {
        format!("Failed to create upload path {}", config.upload_path.display())
    })?;

    let zip_name = format!(
        "{}.zip",
        output_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );
    let zip_path = config.upload_path.join(zip_name);

    archive::zip_directory(output_dir, &zip_path)?;
    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Arch, Frontend, Strategy};
    use std::fs::File;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn test_config(tmp: &TempDir, frontend: Frontend, os: &str) -> BuildConfig {
        BuildConfig {
            frontend,
            build_path: tmp.path().join("build"),
            upload_path: tmp.path().join("uploads"),
            crate_path: tmp.path().join("crate"),
            root_path: tmp.path().join("root"),
            os: os.to_string(),
            architecture: Arch::X86_64,
            manifest_path: tmp.path().join("crate").join("Cargo.toml"),
            version: "0.2.0".to_string(),
        }
    }

    /// Lay out the inputs staging expects: a built binary under
    /// target/release plus README and LICENSE at the root path.
    fn seed_artifacts(config: &BuildConfig, binary_name: &str) {
        let release_dir = config.crate_path.join("target").join("release");
        fs::create_dir_all(&release_dir).unwrap();
        fs::write(release_dir.join(binary_name), b"\x7felf").unwrap();

        fs::create_dir_all(&config.root_path).unwrap();
        fs::write(config.root_path.join(README_NAME), b"# punchcards").unwrap();
        fs::write(config.root_path.join(LICENSE_NAME), b"MIT").unwrap();
    }

    #[test]
    fn test_output_dir_name() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp, Frontend::Unix, "linux");

        assert_eq!(
            output_dir_name(&config, "punchcards-terminal"),
            "punchcards-terminal-linux-x86_64-v0.2.0"
        );
    }

    #[test]
    fn test_create_output_dir_rejects_existing_bundle() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp, Frontend::Glutin, "linux");

        create_output_dir(&config, "punchcards-opengl").unwrap();
        let second = create_output_dir(&config, "punchcards-opengl");
        assert!(second.is_err());
    }

    #[test]
    fn test_stage_and_archive_desktop_bundle() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp, Frontend::Unix, "linux");

        let Strategy::Desktop {
            binary_name,
            output_prefix,
        } = config.frontend.strategy()
        else {
            panic!("unix is a desktop frontend");
        };

        seed_artifacts(&config, &binary_name);

        let output_dir = create_output_dir(&config, &output_prefix).unwrap();
        stage_artifacts(&config, &binary_name, &output_dir).unwrap();
        // Stand in for the git stage; stamp contents aren't under test here.
        fs::write(output_dir.join(REVISION_NAME), "deadbeef\n").unwrap();

        let zip_path = archive_output(&config, &output_dir).unwrap();
        assert_eq!(
            zip_path,
            config
                .upload_path
                .join("punchcards-terminal-linux-x86_64-v0.2.0.zip")
        );

        let archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "punchcards-terminal-linux-x86_64-v0.2.0/LICENSE".to_string(),
                "punchcards-terminal-linux-x86_64-v0.2.0/README.md".to_string(),
                "punchcards-terminal-linux-x86_64-v0.2.0/punchcards".to_string(),
                "punchcards-terminal-linux-x86_64-v0.2.0/revision.txt".to_string(),
            ]
        );
    }

    #[test]
    fn test_stage_fails_without_built_binary() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp, Frontend::Unix, "linux");

        fs::create_dir_all(&config.root_path).unwrap();
        fs::write(config.root_path.join(README_NAME), b"# punchcards").unwrap();
        fs::write(config.root_path.join(LICENSE_NAME), b"MIT").unwrap();

        let output_dir = create_output_dir(&config, "punchcards-terminal").unwrap();
        let result = stage_artifacts(&config, "punchcards_unix", &output_dir);
        assert!(result.is_err());
    }
}
