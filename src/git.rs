//! Git helpers. Shells out to `git` via `std::process::Command`.

use std::path::Path;
use std::process::Command;

use crate::exec::{self, CommandError};

/// Return the commit identifier of HEAD in the given repository, exactly
/// as `git rev-parse HEAD` prints it (trailing newline included), so it
/// can be written verbatim as a revision stamp.
///
/// Fails if the directory is not under version control; a release built
/// from an untracked tree is not stampable.
pub fn head_revision(repo: &Path) -> Result<String, CommandError> {
    let mut cmd = Command::new("git");
    cmd.args(["rev-parse", "HEAD"]).current_dir(repo);
    exec::capture_stdout(&mut cmd)
}
