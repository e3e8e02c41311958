use anyhow::Result;
use clap::ValueEnum;
use std::path::{Component, Path, PathBuf};

use crate::manifest::CrateManifest;

/// Name the packaged game binary ships under, and the directory name web
/// uploads are grouped by.
pub const APP_NAME: &str = "punchcards";

pub const README_NAME: &str = "README.md";
pub const LICENSE_NAME: &str = "LICENSE";
pub const REVISION_NAME: &str = "revision.txt";
pub const MANIFEST_NAME: &str = "Cargo.toml";

/// Build variant being packaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Frontend {
    /// Terminal UI
    Unix,
    /// OpenGL desktop UI
    Glutin,
    /// Web build
    Wasm,
}

impl Frontend {
    pub fn as_str(&self) -> &str {
        match self {
            Frontend::Unix => "unix",
            Frontend::Glutin => "glutin",
            Frontend::Wasm => "wasm",
        }
    }

    /// Map the frontend to its packaging strategy. Desktop frontends carry
    /// the compiled binary name and the prefix their bundle is named with.
    pub fn strategy(&self) -> Strategy {
        match self {
            Frontend::Unix => Strategy::Desktop {
                binary_name: format!("{}_unix", APP_NAME),
                output_prefix: format!("{}-terminal", APP_NAME),
            },
            Frontend::Glutin => Strategy::Desktop {
                binary_name: format!("{}_glutin", APP_NAME),
                output_prefix: format!("{}-opengl", APP_NAME),
            },
            Frontend::Wasm => Strategy::Web,
        }
    }
}

/// How a frontend gets packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Release-build the binary, stage it with docs and a revision stamp,
    /// zip the result into the upload directory.
    Desktop {
        binary_name: String,
        output_prefix: String,
    },
    /// Run the crate's web build script and stage the `dist` tree under a
    /// versioned upload directory. No archive.
    Web,
}

/// Architecture tag baked into desktop bundle names.
///
/// Only one architecture is released today; the packager never matches on
/// this beyond `as_str`, so new variants don't touch the packaging logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
}

impl Arch {
    pub fn as_str(&self) -> &str {
        match self {
            Arch::X86_64 => "x86_64",
        }
    }
}

/// Resolved inputs for one packaging run. Built once from the CLI flags
/// plus the crate manifest, then read-only.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub frontend: Frontend,
    pub build_path: PathBuf,
    pub upload_path: PathBuf,
    pub crate_path: PathBuf,
    pub root_path: PathBuf,
    pub os: String,
    pub architecture: Arch,
    pub manifest_path: PathBuf,
    pub version: String,
}

impl BuildConfig {
    /// Normalize the path flags, locate the crate manifest, and read the
    /// version out of it. Fails before any build side effect.
    pub fn resolve(
        frontend: Frontend,
        build_path: PathBuf,
        upload_path: PathBuf,
        crate_path: PathBuf,
        root_path: PathBuf,
        os: String,
    ) -> Result<Self> {
        let crate_path = normalize_path(&crate_path);
        let manifest_path = crate_path.join(MANIFEST_NAME);
        let manifest = CrateManifest::load(&manifest_path)?;

        Ok(Self {
            frontend,
            build_path: normalize_path(&build_path),
            upload_path: normalize_path(&upload_path),
            crate_path,
            root_path: normalize_path(&root_path),
            os,
            architecture: Arch::X86_64,
            manifest_path,
            version: manifest.version().to_string(),
        })
    }
}

/// Lexically normalize a path: drop `.` components and redundant
/// separators, collapse `..` against a preceding normal component. Never
/// touches the filesystem, so the path doesn't have to exist yet.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let ends_with_normal =
                    matches!(out.components().next_back(), Some(Component::Normal(_)));
                let at_root = matches!(out.components().next_back(), Some(Component::RootDir));

                if ends_with_normal {
                    out.pop();
                } else if !at_root {
                    // Leading `..` components have nothing to cancel
                    // against; `/..` stays at the root.
                    out.push("..");
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
