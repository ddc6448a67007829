#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! URL-addressed artifact cache for apkfetch
//!
//! Every fetched file lives under the cache root at a path derived from its
//! source URL, using the same escaping that apko applies to its own cache so
//! both tools can share one directory. Files only ever appear complete: they
//! are written to a temporary sibling and renamed into place.

mod address;
mod assemble;
mod fileops;

pub use address::{query_escape, AddressTranslator, CacheAddress};
pub use assemble::{PackageAssembler, SegmentFiles};
pub use fileops::{write_atomic, StagedFile};

use apkfetch_errors::Error;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Cache root and the paths derived from it
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the artifact at `address`
    #[must_use]
    pub fn artifact_path(&self, address: &CacheAddress) -> PathBuf {
        self.root.join(address.relative_path())
    }

    /// A fresh `{artifact}.parts-XXXXXX` directory for one import's segments
    ///
    /// Every import stages into its own directory, so racing imports of one
    /// package never touch each other's segments. The directory is removed
    /// when the returned handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn staging_dir(&self, address: &CacheAddress) -> Result<TempDir, Error> {
        let artifact = self.artifact_path(address);
        let parent = artifact.parent().unwrap_or(&self.root);
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io_with_path(&e, parent))?;

        tempfile::Builder::new()
            .prefix(&format!("{}.parts-", address.file_name().replace('/', "_")))
            .tempdir_in(parent)
            .map_err(|e| Error::io_with_path(&e, parent))
    }

    /// Directory that holds the escaped repository prefix of `address`
    #[must_use]
    pub fn repository_dir(&self, address: &CacheAddress) -> PathBuf {
        self.root.join(address.escaped_prefix())
    }

    /// Concatenate the segments staged in `staging` into the artifact at
    /// `address`
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AssemblyIncomplete` if a segment is missing or
    /// empty, or an I/O error if writing the artifact fails.
    pub async fn assemble(
        &self,
        address: &CacheAddress,
        staging: &Path,
    ) -> Result<(PathBuf, u64), Error> {
        let segments = SegmentFiles::in_dir(staging);
        let output = self.artifact_path(address);
        let bytes = PackageAssembler::assemble(&segments, &output).await?;
        Ok((output, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_paths() {
        let store = ArtifactStore::new(PathBuf::from("/cache"));
        let address = AddressTranslator::translate(
            "https://packages.wolfi.dev/os/x86_64/busybox-1.36.1-r2.apk",
            Some("x86_64"),
        );

        assert_eq!(
            store.artifact_path(&address),
            PathBuf::from(
                "/cache/https%3A%2F%2Fpackages.wolfi.dev%2Fos%2F/x86_64/busybox-1.36.1-r2.apk"
            )
        );
        assert_eq!(
            store.repository_dir(&address),
            PathBuf::from("/cache/https%3A%2F%2Fpackages.wolfi.dev%2Fos%2F")
        );
    }

    #[tokio::test]
    async fn test_staging_dirs_are_private_to_each_import() {
        let temp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(temp.path().to_path_buf());
        let address = AddressTranslator::translate(
            "https://packages.wolfi.dev/os/x86_64/busybox-1.36.1-r2.apk",
            Some("x86_64"),
        );

        let first = store.staging_dir(&address).await.unwrap();
        let second = store.staging_dir(&address).await.unwrap();

        assert_ne!(first.path(), second.path());
        let artifact_dir = store.artifact_path(&address).parent().unwrap().to_path_buf();
        for staging in [&first, &second] {
            assert_eq!(staging.path().parent(), Some(artifact_dir.as_path()));
            let name = staging.path().file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with("busybox-1.36.1-r2.apk.parts-"), "{name}");
        }

        let kept = first.path().to_path_buf();
        drop(first);
        assert!(!kept.exists());
        assert!(second.path().exists());
    }
}
