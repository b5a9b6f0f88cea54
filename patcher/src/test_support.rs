//! Test-only helpers for building manifest/interpreter fixtures on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;

/// Temporary directory holding a manifest and fake interpreter executables.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the manifest inside the fixture (may not exist yet).
    pub fn manifest_path(&self) -> PathBuf {
        self.path().join("External Tools").join("tool.pbitool.json")
    }

    /// Write raw manifest text, creating parent directories.
    pub fn write_manifest_raw(&self, contents: &str) -> Result<PathBuf> {
        let path = self.manifest_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Write `value` as compact JSON.
    pub fn write_manifest(&self, value: &Value) -> Result<PathBuf> {
        let raw = serde_json::to_string(value).context("serialize manifest")?;
        self.write_manifest_raw(&raw)
    }

    pub fn read_manifest(&self) -> Result<Value> {
        let path = self.manifest_path();
        let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
    }

    /// Create an empty file standing in for an interpreter at `relative`.
    pub fn install_interpreter(&self, relative: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, "").with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Path under the fixture that is guaranteed not to exist.
    pub fn missing(&self, relative: &str) -> PathBuf {
        self.path().join("missing").join(relative)
    }
}
