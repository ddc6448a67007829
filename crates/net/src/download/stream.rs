//! Low-level streaming into a temporary sibling of the destination

use super::validation::check_length;
use apkfetch_errors::{Error, NetworkError, StorageError};
use apkfetch_hash::{Digest, SegmentVerifier};
use apkfetch_types::ByteRange;
use futures::StreamExt;
use std::ffi::OsString;
use std::path::Path;
use tempfile::TempPath;
use tokio::fs::{self as tokio_fs, File};
use tokio::io::AsyncWriteExt;

pub(super) struct StreamChecks<'a> {
    pub url: &'a str,
    pub range: Option<&'a ByteRange>,
    pub expected_len: Option<u64>,
    pub verifier: Option<SegmentVerifier>,
}

pub(super) struct Written {
    pub bytes: u64,
    pub digest: Option<Digest>,
}

/// Stream `response` to `dest`, checking length and digest before the
/// file becomes visible
///
/// Bytes go to a uniquely named temporary file in `dest`'s directory that
/// is renamed over `dest` once every check passes. Concurrent writers of
/// the same destination never share a file, and the last rename wins.
pub(super) async fn stream_to_file(
    response: reqwest::Response,
    dest: &Path,
    checks: StreamChecks<'_>,
) -> Result<Written, Error> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    tokio_fs::create_dir_all(parent)
        .await
        .map_err(|e| Error::io_with_path(&e, parent))?;

    let (file, temp_path) = part_file(dest, parent)?;

    // `temp_path` removes the partial file if anything below fails.
    let written = write_part(response, File::from_std(file), checks).await?;

    temp_path
        .persist(dest)
        .map_err(|e| StorageError::AtomicRenameFailed {
            message: format!("{}: {}", dest.display(), e.error),
        })?;

    Ok(written)
}

/// A fresh `.{name}.XXXXXX.part` file next to `dest`
fn part_file(dest: &Path, parent: &Path) -> Result<(std::fs::File, TempPath), Error> {
    let mut prefix = OsString::from(".");
    if let Some(name) = dest.file_name() {
        prefix.push(name);
        prefix.push(".");
    }

    let temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(|e| Error::io_with_path(&e, parent))?;
    Ok(temp.into_parts())
}

async fn write_part(
    response: reqwest::Response,
    mut file: File,
    mut checks: StreamChecks<'_>,
) -> Result<Written, Error> {
    let mut stream = response.bytes_stream();
    let mut bytes = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| NetworkError::DownloadFailed(e.to_string()))?;
        if let Some(verifier) = checks.verifier.as_mut() {
            verifier.update(&chunk);
        }
        file.write_all(&chunk).await?;
        bytes += chunk.len() as u64;
    }

    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    if let Some(expected_len) = checks.expected_len {
        check_length(checks.url, checks.range, expected_len, bytes)?;
    }

    let digest = match checks.verifier {
        Some(verifier) => Some(verifier.finish(checks.url)?),
        None => None,
    };

    Ok(Written { bytes, digest })
}
