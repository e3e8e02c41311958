use anyhow::Result;
use std::path::Path;

/// Post-archive hook for turning a completed output directory into a
/// platform-native bundle format.
///
/// The zip is always produced first; a bundler may transform the staged
/// directory in addition to it. The default implementation does nothing.
pub trait PlatformBundler {
    fn bundle(&self, output_dir: &Path) -> Result<()> {
        let _ = output_dir;
        Ok(())
    }
}

/// macOS `.app` bundling.
///
/// Not implemented yet; this type only reserves the dispatch point so the
/// desktop packager already calls through the hook on macOS releases.
pub struct MacosAppBundler;

impl PlatformBundler for MacosAppBundler {}
