//! Atomic write primitives
//!
//! Content is written to a uniquely named temp file next to the target and
//! then renamed over it, so readers see either the old file or the new one.
//! The temp file must share the target's directory: rename is only atomic
//! within one filesystem.

use crate::errors::{io_error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Fully written content waiting to replace its target
///
/// Dropping a `StagedWrite` without calling [`commit`](Self::commit)
/// removes the temp file and leaves the target untouched.
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedWrite {
    /// Path of the temp file holding the staged content
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Atomically move the staged content over the target
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the rename fails; the target keeps its
    /// previous content.
    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.temp
            .persist(&target)
            .map_err(|e| io_error("rename_temp", &target, e.error))?;
        tracing::debug!(path = %target.display(), "committed staged write");
        Ok(())
    }
}

/// Write `content` to a temp file beside `target` without replacing it yet
///
/// The temp file name starts with the target's file name.
///
/// # Errors
///
/// Returns an `Io` error if the target's directory does not exist or the
/// temp file cannot be created or written.
pub fn stage_write(target: &Path, content: &[u8]) -> Result<StagedWrite> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = target.file_name().unwrap_or_else(|| target.as_os_str());

    let mut temp = tempfile::Builder::new()
        .prefix(prefix)
        .tempfile_in(dir)
        .map_err(|e| io_error("create_temp", dir, e))?;

    temp.write_all(content)
        .map_err(|e| io_error("write_temp", temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| io_error("sync_temp", temp.path(), e))?;

    Ok(StagedWrite {
        temp,
        target: target.to_path_buf(),
    })
}

/// Atomically replace `target` with `content`
///
/// # Errors
///
/// Returns an `Io` error if staging or the final rename fails.
pub fn atomic_write(target: &Path, content: &[u8]) -> Result<()> {
    stage_write(target, content)?.commit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("commands");

        atomic_write(&target, b"hello").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"hello");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("commands");
        fs::write(&target, b"old").unwrap();

        atomic_write(&target, b"new").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("absent").join("commands");

        let err = atomic_write(&target, b"data").unwrap_err();

        assert_eq!(err.code(), "ERR_IO");
        assert_eq!(err.op(), Some("create_temp"));
        assert!(!target.exists());
    }

    #[test]
    fn test_temp_file_lives_beside_target() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("commands");

        let staged = stage_write(&target, b"staged").unwrap();

        assert_eq!(staged.temp_path().parent(), Some(temp_dir.path()));
        let temp_name = staged.temp_path().file_name().unwrap().to_string_lossy();
        assert!(temp_name.starts_with("commands"));
        assert_ne!(staged.temp_path(), target.as_path());
        assert!(!target.exists());
    }

    #[test]
    fn test_no_temp_files_after_commit() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("commands");

        atomic_write(&target, b"clean").unwrap();

        assert_eq!(entries(temp_dir.path()), vec!["commands".to_string()]);
    }

    #[test]
    fn test_dropped_stage_leaves_nothing_behind() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("commands");
        fs::write(&target, b"original").unwrap();

        let staged = stage_write(&target, b"replacement").unwrap();
        drop(staged);

        assert_eq!(fs::read(&target).unwrap(), b"original");
        assert_eq!(entries(temp_dir.path()), vec!["commands".to_string()]);
    }
}
