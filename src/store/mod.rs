//! Persisted state: known co-authors and recent commit history.

pub mod co_authors;
pub mod history;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::StoreError;

pub use co_authors::{CoAuthor, CoAuthorChoice, CoAuthorDirectory, OTHER_CO_AUTHOR};
pub use history::{CommitHistoryEntry, DEFAULT_HISTORY_SIZE, HistoryCache};

/// Replace `path` with `contents` in one step.
///
/// Writes to a temp file in the same directory and renames it over the target,
/// so a crash mid-write leaves the previous file intact.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(contents).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
