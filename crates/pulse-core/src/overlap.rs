//! Directory-overlap matching between marker files and changed files.
//!
//! Given the list of component marker files in a repository tree and the
//! list of files touched by a pull request, determines which marker files
//! sit in a directory that also contains at least one changed file. Two
//! paths overlap when their normalized containing directories are EQUAL;
//! a marker does not own its subdirectories.

use std::collections::HashSet;
use tracing::debug;

/// Normalize the directory component of a path.
///
/// Drops the final segment (the file name), removes redundant `.` segments
/// and trailing separators, and joins the rest with `/`. A path with no
/// separator has no directory component and normalizes to the empty (root)
/// directory. Case is preserved.
pub fn normalized_dir(path: &str) -> String {
    let dir = match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    };
    dir.split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Return the marker paths whose directories also contain a changed file.
///
/// Per overlapping directory at most one marker is returned: the one with
/// the greater string length ("most specific wins" for duplicate component
/// declarations), ties keeping the marker encountered first. Output order
/// follows the order directories were first matched during the marker scan,
/// so identical inputs always produce identical output.
///
/// Total over its inputs: empty sequences, duplicates, and paths without a
/// separator are all handled without error.
pub fn find_overlapping_directories(markers: &[String], changed: &[String]) -> Vec<String> {
    let changed_dirs: HashSet<String> = changed.iter().map(|p| normalized_dir(p)).collect();

    // (directory, deepest marker seen so far), in first-match order.
    let mut matched: Vec<(String, String)> = Vec::new();
    for marker in markers {
        let dir = normalized_dir(marker);
        if !changed_dirs.contains(&dir) {
            continue;
        }
        match matched.iter_mut().find(|(d, _)| *d == dir) {
            Some((_, kept)) => {
                if marker.len() > kept.len() {
                    *kept = marker.clone();
                }
            }
            None => matched.push((dir, marker.clone())),
        }
    }

    let overlapping: Vec<String> = matched.into_iter().map(|(_, m)| m).collect();
    debug!(
        count = overlapping.len(),
        files = ?overlapping,
        "overlap scan complete"
    );
    overlapping
}
