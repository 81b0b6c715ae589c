//! Map directory discovery.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory names that never hold maps.
pub const SKIPPED_DIRS: &[&str] = &["styles", "python"];

/// Directory holding event maps, skipped when configured.
pub const EVENTS_DIR: &str = "events";

/// How to walk a maps directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Skip directories named `events`.
    pub ignore_events: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            ignore_events: true,
        }
    }
}

impl ScanOptions {
    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let Some(name) = entry.file_name().to_str() else {
            return false;
        };
        SKIPPED_DIRS.contains(&name) || (self.ignore_events && name == EVENTS_DIR)
    }
}

/// Lists every regular file under `root` in depth-first, name-sorted order.
///
/// Entries that cannot be read are logged and skipped.
pub fn candidate_files(root: &Path, options: ScanOptions) -> Vec<PathBuf> {
    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| {
            let skipped = options.is_skipped_dir(entry);
            if skipped {
                debug!(path = %entry.path().display(), "skipping directory");
            }
            !skipped
        });

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "skipping unreadable entry"),
        }
    }
    files
}
