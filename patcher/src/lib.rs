//! Install-time patcher for external-tool manifests.
//!
//! A desktop application discovers companion executables through JSON
//! manifests. This crate rewrites one field of such a manifest (the
//! interpreter path) with the first candidate interpreter found on disk.
//! The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (first-match selection, field
//!   upsert on a JSON document). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (filesystem probes, manifest
//!   read/write, configuration files).
//!
//! Orchestration modules ([`resolve`], [`apply`]) coordinate core logic with
//! I/O to implement the CLI commands.

pub mod apply;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod resolve;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
