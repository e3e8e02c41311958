use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The subset of the crate manifest the packager consumes: only the
/// package version is read, everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CrateManifest {
    package: PackageSection,
}

#[derive(Debug, Clone, Deserialize)]
struct PackageSection {
    version: String,
}

impl CrateManifest {
    /// Load and parse the manifest. A missing file, malformed document, or
    /// absent version field is an error; callers treat all three as fatal
    /// before starting a build.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read crate manifest {}", path.display()))?;

        let manifest: CrateManifest = toml::from_str(&content)
            .with_context(|| format!("Failed to parse crate manifest {}", path.display()))?;

        Ok(manifest)
    }

    pub fn version(&self) -> &str {
        &self.package.version
    }
}
