//! Interpreter resolution for `manifest-patcher resolve` and `apply`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::resolver::first_existing;
use crate::io::config::PatcherConfig;
use crate::io::probe::is_existing_file;

/// Picks the first existing interpreter from an ordered candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    candidates: Vec<PathBuf>,
}

impl PathResolver {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    pub fn from_config(cfg: &PatcherConfig) -> Self {
        Self::new(cfg.candidates.clone())
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Probe the filesystem in priority order and return the first hit.
    pub fn resolve(&self) -> Option<PathBuf> {
        resolve_with(&self.candidates, is_existing_file)
    }
}

/// Resolve against an arbitrary existence probe.
pub fn resolve_with<F>(candidates: &[PathBuf], mut exists: F) -> Option<PathBuf>
where
    F: FnMut(&Path) -> bool,
{
    let selected = first_existing(candidates, |candidate| {
        let hit = exists(candidate);
        debug!(candidate = %candidate.display(), hit, "probed candidate");
        hit
    });
    selected.cloned()
}
