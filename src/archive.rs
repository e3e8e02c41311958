use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip a directory into `zip_path`.
///
/// Every file is stored under the directory's own basename with
/// forward-slash separators (`<dir-name>/<relative-path>`), so unpacking
/// always yields a single top-level directory regardless of where the
/// staging directory lived. Directories themselves get no entries.
pub fn zip_directory(src_dir: &Path, zip_path: &Path) -> Result<()> {
    let base = src_dir
        .file_name()
        .ok_or_else(|| anyhow!("archive source {} has no basename", src_dir.display()))?
        .to_string_lossy()
        .into_owned();

    let file = File::create(zip_path)
        .with_context(|| format!("Failed to create archive {}", zip_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for entry in WalkDir::new(src_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry.path().strip_prefix(src_dir)?;
        let name = format!(
            "{}/{}",
            base,
            rel.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/")
        );

        zip.start_file(name, options)?;
        let mut f = File::open(entry.path())
            .with_context(|| format!("Failed to read {}", entry.path().display()))?;
        io::copy(&mut f, &mut zip)?;
    }

    zip.finish()
        .with_context(|| format!("Failed to finish archive {}", zip_path.display()))?;

    Ok(())
}
