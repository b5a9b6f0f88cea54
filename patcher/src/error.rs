//! Failure reasons for patching a manifest.
//!
//! Skip conditions (missing manifest, no interpreter found) are not errors;
//! they are reported as [`crate::apply::ApplyOutcome`] variants.

use std::io;
use std::path::PathBuf;

/// Why a manifest could not be patched.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// Reading the manifest, writing the temp file, or replacing the original failed.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The manifest is not valid JSON.
    #[error("parse manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The document root has no room for a top-level field (array, string, ...).
    #[error("cannot set field `{field}` in {}: document root is {found}, not an object", .path.display())]
    FieldTypeConflict {
        path: PathBuf,
        field: String,
        found: &'static str,
    },
    /// The resolved interpreter path cannot be stored as a JSON string.
    #[error("interpreter path {} is not valid Unicode", .path.display())]
    NonUnicodePath { path: PathBuf },
}

impl PatchError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        PatchError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
