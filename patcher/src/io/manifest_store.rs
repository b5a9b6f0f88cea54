//! Manifest load/patch/save.
//!
//! The manifest is read whole, edited as a `serde_json::Value`, and written
//! back as 2-space indented JSON with a trailing newline. Writes go to a
//! temp file in the manifest's directory that is then renamed over the
//! original, so a crash mid-write never leaves a truncated manifest behind.
//! A symlinked manifest is written through to its target.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::core::document::{kind_of, set_top_level_string};
use crate::error::PatchError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Result of a successful [`ManifestPatcher::patch`].
#[derive(Debug, Clone, PartialEq)]
pub struct PatchReport {
    /// Value the field held before patching, if it existed.
    pub previous: Option<Value>,
    /// False when the field already held the requested value.
    pub changed: bool,
}

/// Rewrites a single top-level field of the manifest at a fixed path.
#[derive(Debug, Clone)]
pub struct ManifestPatcher {
    manifest_path: PathBuf,
}

impl ManifestPatcher {
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
        }
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Set `field` to `value`, preserving every other field and their order.
    pub fn patch(&self, field: &str, value: &str) -> Result<PatchReport, PatchError> {
        let path = self.manifest_path.as_path();
        let mut doc = load_manifest(path)?;

        let previous = set_top_level_string(&mut doc, field, value).map_err(|conflict| {
            PatchError::FieldTypeConflict {
                path: path.to_path_buf(),
                field: field.to_string(),
                found: conflict.found,
            }
        })?;

        match &previous {
            Some(Value::String(_)) | None => {}
            Some(other) => {
                warn!(
                    path = %path.display(),
                    field,
                    previous = kind_of(other),
                    "overwriting non-string manifest field"
                );
            }
        }
        let changed = previous.as_ref().and_then(Value::as_str) != Some(value);
        if !changed {
            debug!(path = %path.display(), field, "manifest field already up to date");
        }

        write_manifest(path, &doc)?;
        info!(path = %path.display(), field, value, "manifest patched");
        Ok(PatchReport { previous, changed })
    }
}

/// Read and parse the manifest, tolerating a leading UTF-8 byte-order mark.
pub fn load_manifest(path: &Path) -> Result<Value, PatchError> {
    debug!(path = %path.display(), "loading manifest");
    let raw = fs::read(path).map_err(|err| PatchError::io("read manifest", path, err))?;
    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw[..]);
    serde_json::from_slice(body).map_err(|source| PatchError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically write the manifest as indented JSON (temp file + rename).
pub fn write_manifest(path: &Path, doc: &Value) -> Result<(), PatchError> {
    let mut buf = serde_json::to_string_pretty(doc)
        .map_err(|err| PatchError::io("serialize manifest", path, err.into()))?;
    buf.push('\n');
    let target = follow_link(path)?;
    write_atomic(&target, &buf)
}

/// Resolve a symlinked manifest so the rename replaces the target, not the link.
fn follow_link(path: &Path) -> Result<PathBuf, PatchError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let target = fs::canonicalize(path)
                .map_err(|err| PatchError::io("resolve manifest link", path, err))?;
            debug!(link = %path.display(), target = %target.display(), "manifest is a symlink");
            Ok(target)
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), PatchError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Dropping the temp file on any early return removes it from disk.
    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|err| PatchError::io("create temp manifest", parent, err))?;
    temp.write_all(contents.as_bytes())
        .map_err(|err| PatchError::io("write temp manifest", temp.path(), err))?;
    temp.as_file()
        .sync_all()
        .map_err(|err| PatchError::io("sync temp manifest", temp.path(), err))?;

    if let Ok(meta) = fs::metadata(path)
        && let Err(err) = fs::set_permissions(temp.path(), meta.permissions())
    {
        warn!(path = %path.display(), error = %err, "could not copy manifest permissions");
    }

    temp.persist(path)
        .map_err(|err| PatchError::io("replace manifest", path, err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| {
                entry
                    .expect("entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    fn write_raw(dir: &Path, contents: &[u8]) -> PathBuf {
        let path = dir.join("tool.pbitool.json");
        fs::write(&path, contents).expect("write manifest");
        path
    }

    #[test]
    fn patch_preserves_sibling_fields_and_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_raw(
            temp.path(),
            br#"{"a": "x", "b": [1, 2], "path": "/old", "c": {"deep": true}}"#,
        );

        let report = ManifestPatcher::new(&path)
            .patch("path", "/usr/bin/pwsh")
            .expect("patch");
        assert_eq!(report.previous, Some(json!("/old")));
        assert!(report.changed);

        let contents = fs::read_to_string(&path).expect("read");
        let expected = "{\n  \"a\": \"x\",\n  \"b\": [\n    1,\n    2\n  ],\n  \"path\": \"/usr/bin/pwsh\",\n  \"c\": {\n    \"deep\": true\n  }\n}\n";
        assert_eq!(contents, expected);
    }

    #[test]
    fn patching_twice_is_byte_identical() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_raw(temp.path(), br#"{"version":"1.0","path":"/old"}"#);
        let patcher = ManifestPatcher::new(&path);

        patcher.patch("path", "/bin/sh").expect("first patch");
        let once = fs::read(&path).expect("read once");
        let report = patcher.patch("path", "/bin/sh").expect("second patch");
        let twice = fs::read(&path).expect("read twice");

        assert!(!report.changed);
        assert_eq!(once, twice);
    }

    #[test]
    fn byte_order_mark_is_accepted_and_dropped() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut raw = UTF8_BOM.to_vec();
        raw.extend_from_slice(br#"{"path": "/old"}"#);
        let path = write_raw(temp.path(), &raw);

        ManifestPatcher::new(&path)
            .patch("path", "/new")
            .expect("patch");
        let contents = fs::read(&path).expect("read");
        assert!(!contents.starts_with(UTF8_BOM));
        assert_eq!(load_manifest(&path).expect("load"), json!({"path": "/new"}));
    }

    #[test]
    fn invalid_json_is_a_parse_error_and_file_is_untouched() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_raw(temp.path(), b"{ \"path\": ");

        let err = ManifestPatcher::new(&path)
            .patch("path", "/new")
            .unwrap_err();
        assert!(matches!(err, PatchError::Parse { .. }), "got {err:?}");
        assert_eq!(fs::read(&path).expect("read"), b"{ \"path\": ");
        assert_eq!(dir_entries(temp.path()), vec!["tool.pbitool.json"]);
    }

    #[test]
    fn non_object_root_is_a_conflict() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_raw(temp.path(), b"[\"path\"]");

        let err = ManifestPatcher::new(&path)
            .patch("path", "/new")
            .unwrap_err();
        match err {
            PatchError::FieldTypeConflict { field, found, .. } => {
                assert_eq!(field, "path");
                assert_eq!(found, "an array");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read(&path).expect("read"), b"[\"path\"]");
    }

    #[test]
    fn missing_manifest_is_an_io_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = ManifestPatcher::new(temp.path().join("absent.json"))
            .patch("path", "/new")
            .unwrap_err();
        assert!(matches!(err, PatchError::Io { .. }), "got {err:?}");
        assert!(err.to_string().starts_with("read manifest"));
    }

    #[test]
    fn failed_replace_leaves_no_temp_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("tool.pbitool.json");
        fs::create_dir(&path).expect("mkdir");
        fs::write(path.join("occupant"), "").expect("write occupant");

        let err = write_manifest(&path, &json!({"path": "/new"})).unwrap_err();
        match err {
            PatchError::Io { action, .. } => assert_eq!(action, "replace manifest"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(dir_entries(temp.path()), vec!["tool.pbitool.json"]);
        assert!(path.join("occupant").exists());
    }

    #[test]
    fn successful_write_leaves_only_the_manifest() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_raw(temp.path(), br#"{"path": "/old"}"#);

        ManifestPatcher::new(&path)
            .patch("path", "/new")
            .expect("patch");
        assert_eq!(dir_entries(temp.path()), vec!["tool.pbitool.json"]);
    }

    #[cfg(unix)]
    #[test]
    fn permissions_survive_the_rewrite() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_raw(temp.path(), br#"{"path": "/old"}"#);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");

        ManifestPatcher::new(&path)
            .patch("path", "/new")
            .expect("patch");
        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_manifest_patches_the_target() {
        let temp = tempfile::tempdir().expect("tempdir");
        let real = write_raw(temp.path(), br#"{"path": "/old", "version": "1.0"}"#);
        let link = temp.path().join("link.json");
        std::os::unix::fs::symlink(&real, &link).expect("symlink");

        ManifestPatcher::new(&link)
            .patch("path", "/new")
            .expect("patch");

        let meta = fs::symlink_metadata(&link).expect("link metadata");
        assert!(meta.file_type().is_symlink());
        assert_eq!(
            load_manifest(&real).expect("load"),
            json!({"path": "/new", "version": "1.0"})
        );
    }
}
