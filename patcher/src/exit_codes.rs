//! Stable exit codes for manifest-patcher CLI commands.

/// Manifest patched, or the requested value was printed.
pub const OK: i32 = 0;
/// Command failed: invalid config, unreadable/corrupt manifest, failed write.
pub const FAILED: i32 = 1;
/// `apply` skipped because the manifest file does not exist.
pub const NO_MANIFEST: i32 = 2;
/// `apply` or `resolve` found none of the candidate interpreters on disk.
pub const NO_CANDIDATE: i32 = 3;
