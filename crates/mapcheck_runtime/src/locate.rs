//! Finding the source file of a definition.
//!
//! The compiled catalogs are built from many `.arc` and `.art` files under
//! the arch directory. These helpers find the file a given archetype or
//! artifact comes from, so a report entry can be traced back to its origin.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Extension of archetype definition files.
pub const ARCHETYPE_EXTENSION: &str = "arc";
/// Extension of artifact definition files.
pub const ARTIFACT_EXTENSION: &str = "art";

/// What kind of definition to look for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefinitionKind {
    /// `Object NAME` in a `.arc` file.
    Archetype,
    /// `artifact NAME` in a `.art` file.
    Artifact,
}

impl DefinitionKind {
    const fn extension(self) -> &'static str {
        match self {
            Self::Archetype => ARCHETYPE_EXTENSION,
            Self::Artifact => ARTIFACT_EXTENSION,
        }
    }

    const fn keyword(self) -> &'static str {
        match self {
            Self::Archetype => "Object",
            Self::Artifact => "artifact",
        }
    }
}

/// Returns the first file under `arch_dir` defining `name`.
///
/// Files are visited in file-name order. Unreadable files are skipped.
#[must_use]
pub fn find_definition(arch_dir: &Path, kind: DefinitionKind, name: &str) -> Option<PathBuf> {
    let wanted = format!("{} {name}", kind.keyword());

    WalkDir::new(arch_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext == kind.extension())
        })
        .find(|entry| match fs::read(entry.path()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes)
                .lines()
                .any(|line| line == wanted),
            Err(err) => {
                debug!(path = %entry.path().display(), %err, "skipping unreadable definition file");
                false
            }
        })
        .map(walkdir::DirEntry::into_path)
}

/// Looks for `name` as an archetype first, then as an artifact.
#[must_use]
pub fn locate(arch_dir: &Path, name: &str) -> Option<(DefinitionKind, PathBuf)> {
    [DefinitionKind::Archetype, DefinitionKind::Artifact]
        .into_iter()
        .find_map(|kind| find_definition(arch_dir, kind, name).map(|path| (kind, path)))
}
