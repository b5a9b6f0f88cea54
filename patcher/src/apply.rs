//! Orchestration for `manifest-patcher apply`, run at installer commit.
//!
//! Three steps, each attempted at most once:
//! 1. Skip if the manifest file does not exist (it is never created here).
//! 2. Skip if none of the candidate interpreters exists.
//! 3. Rewrite the manifest field with the resolved interpreter path.
//!
//! Both skips are reported as outcomes rather than errors; whether either
//! should fail the installation is left to the caller.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::PatchError;
use crate::io::config::PatcherConfig;
use crate::io::manifest_store::ManifestPatcher;
use crate::resolve::PathResolver;

/// Structured apply outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Manifest field now holds `value`.
    Applied { manifest: PathBuf, value: String },
    /// Manifest file is absent; nothing was written.
    SkippedNoManifest { manifest: PathBuf },
    /// No candidate interpreter exists; nothing was written.
    SkippedNoCandidate,
}

/// Point `field` of the manifest at the first existing candidate.
pub fn apply(
    manifest_path: &Path,
    candidates: &[PathBuf],
    field: &str,
) -> Result<ApplyOutcome, PatchError> {
    if !manifest_path.is_file() {
        info!(manifest = %manifest_path.display(), "manifest not found, skipping");
        return Ok(ApplyOutcome::SkippedNoManifest {
            manifest: manifest_path.to_path_buf(),
        });
    }

    let resolver = PathResolver::new(candidates.to_vec());
    let Some(resolved) = resolver.resolve() else {
        info!(
            candidates = candidates.len(),
            "no candidate interpreter found, skipping"
        );
        return Ok(ApplyOutcome::SkippedNoCandidate);
    };
    let Some(value) = resolved.to_str().map(str::to_owned) else {
        return Err(PatchError::NonUnicodePath { path: resolved });
    };
    debug!(value = %value, "resolved interpreter");

    let report = ManifestPatcher::new(manifest_path).patch(field, &value)?;
    debug!(changed = report.changed, "apply finished");
    Ok(ApplyOutcome::Applied {
        manifest: manifest_path.to_path_buf(),
        value,
    })
}

/// Run [`apply`] with the paths and field named by `cfg`.
pub fn apply_config(cfg: &PatcherConfig) -> Result<ApplyOutcome, PatchError> {
    apply(&cfg.manifest_path, &cfg.candidates, &cfg.field)
}
