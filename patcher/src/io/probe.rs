//! Filesystem existence probes.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

/// Whether `path` names an existing regular file (symlinks followed).
///
/// Directories do not count. Any lookup failure, including permission denied,
/// is reported as "does not exist" so callers can move on to the next candidate.
pub fn is_existing_file(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) => {
            if !meta.is_file() {
                debug!(path = %path.display(), "probe: exists but is not a file");
            }
            meta.is_file()
        }
        Err(err) if err.kind() == ErrorKind::NotFound => false,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "probe: lookup failed, treating as missing");
            false
        }
    }
}
