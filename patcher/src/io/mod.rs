//! I/O helpers for patcher commands.

pub mod config;
pub mod manifest_store;
pub mod probe;
