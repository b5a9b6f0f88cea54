//! Pure logic with no filesystem access.

pub mod document;
pub mod resolver;
