//! First-match candidate selection.

use std::path::Path;

/// Return the first candidate for which `exists` holds, scanning in order.
///
/// Priority order is the only tie-break: later matches are never inspected
/// once an earlier candidate is accepted.
pub fn first_existing<P, F>(candidates: &[P], mut exists: F) -> Option<&P>
where
    P: AsRef<Path>,
    F: FnMut(&Path) -> bool,
{
    for candidate in candidates {
        if exists(candidate.as_ref()) {
            return Some(candidate);
        }
    }
    None
}
