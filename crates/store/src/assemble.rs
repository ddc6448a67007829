//! Package assembly from fetched segments
//!
//! An APK is three gzip members back to back: signature, control, data.
//! Concatenating the fetched members byte for byte in that order yields the
//! original package; nothing is decompressed.

use crate::fileops::StagedFile;
use apkfetch_errors::{Error, StorageError};
use apkfetch_types::SegmentKind;
use std::path::{Path, PathBuf};

/// Locations of the three segment files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFiles {
    pub signature: PathBuf,
    pub control: PathBuf,
    pub data: PathBuf,
}

impl SegmentFiles {
    /// `{dir}/signature.tar.gz`, `{dir}/control.tar.gz`, `{dir}/data.tar.gz`
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            signature: dir.join(SegmentKind::Signature.file_name()),
            control: dir.join(SegmentKind::Control.file_name()),
            data: dir.join(SegmentKind::Data.file_name()),
        }
    }

    #[must_use]
    pub fn path(&self, kind: SegmentKind) -> &Path {
        match kind {
            SegmentKind::Signature => &self.signature,
            SegmentKind::Control => &self.control,
            SegmentKind::Data => &self.data,
        }
    }
}

pub struct PackageAssembler;

impl PackageAssembler {
    /// Concatenate the segments into `output`, returning the bytes written
    ///
    /// All three segments are checked before anything is written, and
    /// `output` only appears once every byte is on disk.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AssemblyIncomplete` if any segment is missing
    /// or empty, or an I/O error if copying fails.
    pub async fn assemble(segments: &SegmentFiles, output: &Path) -> Result<u64, Error> {
        for kind in SegmentKind::ORDER {
            let path = segments.path(kind);
            let len = tokio::fs::metadata(path).await.map_or(0, |m| m.len());
            if len == 0 {
                return Err(StorageError::AssemblyIncomplete {
                    segment: kind.to_string(),
                    path: path.display().to_string(),
                }
                .into());
            }
        }

        let mut staged = StagedFile::create(output).await?;
        let mut total = 0u64;
        for kind in SegmentKind::ORDER {
            let path = segments.path(kind);
            let mut input = tokio::fs::File::open(path)
                .await
                .map_err(|e| Error::io_with_path(&e, path))?;
            total += tokio::io::copy(&mut input, staged.file())
                .await
                .map_err(|e| Error::io_with_path(&e, path))?;
        }
        staged.commit().await?;

        tracing::debug!(output = %output.display(), bytes = total, "assembled package");
        Ok(total)
    }
}
