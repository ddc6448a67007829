//! Atomic file creation
//!
//! A [`StagedFile`] is a uniquely named temporary file in the destination's
//! directory. It becomes visible at the destination only through
//! [`StagedFile::commit`]; dropping it uncommitted removes it. Concurrent
//! writers of the same destination never see each other's partial bytes and
//! the last rename wins.

use apkfetch_errors::{Error, StorageError};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

pub struct StagedFile {
    file: File,
    temp_path: TempPath,
    dest: PathBuf,
}

impl StagedFile {
    /// Create a staging file next to `dest`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the temporary file cannot be
    /// created.
    pub async fn create(dest: &Path) -> Result<Self, Error> {
        let parent = dest.parent().ok_or_else(|| StorageError::IoError {
            message: format!("{} has no parent directory", dest.display()),
        })?;
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io_with_path(&e, parent))?;

        let temp = tempfile::Builder::new()
            .prefix(".apkfetch-")
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|e| Error::io_with_path(&e, parent))?;
        let (file, temp_path) = temp.into_parts();

        Ok(Self {
            file: File::from_std(file),
            temp_path,
            dest: dest.to_path_buf(),
        })
    }

    /// The open staging file
    pub fn file(&mut self) -> &mut File {
        &mut self.file
    }

    /// Flush and rename into place
    ///
    /// # Errors
    ///
    /// Returns an error if flushing or the rename fails; the temporary file
    /// is removed either way.
    pub async fn commit(mut self) -> Result<PathBuf, Error> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        drop(self.file);

        self.temp_path
            .persist(&self.dest)
            .map_err(|e| StorageError::AtomicRenameFailed {
                message: format!("{}: {}", self.dest.display(), e.error),
            })?;
        Ok(self.dest)
    }
}

/// Write `contents` to `path` atomically
///
/// # Errors
///
/// Returns an error if the file cannot be staged, written or renamed.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), Error> {
    let mut staged = StagedFile::create(path).await?;
    staged
        .file()
        .write_all(contents)
        .await
        .map_err(|e| Error::io_with_path(&e, path))?;
    staged.commit().await?;
    Ok(())
}
