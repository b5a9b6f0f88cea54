//! Patcher configuration (TOML).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_MANIFEST_PATH: &str = r"C:\Program Files (x86)\Common Files\Microsoft Shared\Power BI Desktop\External Tools\Action-BI-Toolkit.pbitool.json";

/// Interpreter install locations, newest first.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    r"C:\Program Files\PowerShell\7\pwsh.exe",
    r"C:\Program Files\PowerShell\6\pwsh.exe",
    r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe",
];

pub const DEFAULT_FIELD: &str = "path";

/// Where the manifest lives, which field to rewrite, and where to look for
/// the interpreter.
///
/// Missing fields take the built-in defaults, so a config file only needs to
/// mention what it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PatcherConfig {
    /// Absolute path of the external-tool manifest to patch.
    pub manifest_path: PathBuf,

    /// Top-level manifest field that receives the resolved interpreter path.
    pub field: String,

    /// Candidate interpreter paths in priority order (first existing wins).
    pub candidates: Vec<PathBuf>,
}

impl Default for PatcherConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            field: DEFAULT_FIELD.to_string(),
            candidates: DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }
}

impl PatcherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.manifest_path.as_os_str().is_empty() {
            return Err(anyhow!("manifest_path must not be empty"));
        }
        if self.field.trim().is_empty() {
            return Err(anyhow!("field must not be empty"));
        }
        if let Some(idx) = self
            .candidates
            .iter()
            .position(|candidate| candidate.as_os_str().is_empty())
        {
            return Err(anyhow!("candidates[{idx}] must not be empty"));
        }
        Ok(())
    }
}

/// Command-line overrides layered on top of a loaded config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub manifest_path: Option<PathBuf>,
    pub field: Option<String>,
    /// Replaces the whole candidate list when non-empty.
    pub candidates: Vec<PathBuf>,
}

impl ConfigOverrides {
    pub fn apply_to(&self, mut base: PatcherConfig) -> Result<PatcherConfig> {
        if let Some(manifest_path) = &self.manifest_path {
            base.manifest_path = manifest_path.clone();
        }
        if let Some(field) = &self.field {
            base.field = field.clone();
        }
        if !self.candidates.is_empty() {
            base.candidates = self.candidates.clone();
        }
        base.validate()?;
        Ok(base)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `PatcherConfig::default()`.
pub fn load_config(path: &Path) -> Result<PatcherConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file missing, using defaults");
        let cfg = PatcherConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PatcherConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    debug!(path = %path.display(), candidates = cfg.candidates.len(), "config loaded");
    Ok(cfg)
}

/// Render config as TOML with a trailing newline.
pub fn render_config(cfg: &PatcherConfig) -> Result<String> {
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    if !buf.ends_with('\n') {
        buf.push('\n');
    }
    Ok(buf)
}
