//! Importing everything a lockfile pins

use crate::artifacts::LockedArtifactSet;
use crate::import::{import_index, import_keyring, import_package};
use crate::types::ImportReport;
use crate::OpsCtx;
use apkfetch_errors::Error;
use apkfetch_events::EventEmitter;
use apkfetch_types::{IndexImport, KeyringImport, Lockfile, PackageImport};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::Path;

enum Job {
    Keyring(KeyringImport),
    Index(IndexImport),
    Package(PackageImport),
}

impl Job {
    async fn run(self, ctx: &OpsCtx) -> Result<ImportReport, Error> {
        match self {
            Self::Keyring(import) => import_keyring(ctx, &import).await,
            Self::Index(import) => import_index(ctx, &import).await,
            Self::Package(import) => import_package(ctx, &import).await,
        }
    }
}

/// Import every keyring, index and package listed in `path`
///
/// Imports run concurrently, at most `general.parallel_imports` at a time.
/// The first failure stops the run; imports still in flight are dropped.
///
/// # Errors
///
/// Returns the lockfile error if it cannot be read or a package lacks a
/// control or data checksum, otherwise the first import failure.
pub async fn import_lockfile(ctx: &OpsCtx, path: &Path) -> Result<LockedArtifactSet, Error> {
    ctx.emit_operation_started(format!("lock {}", path.display()));

    let result = run_lockfile(ctx, path).await;
    ctx.emit_operation_completed(format!("lock {}", path.display()), result.is_ok());
    result
}

async fn run_lockfile(ctx: &OpsCtx, path: &Path) -> Result<LockedArtifactSet, Error> {
    let lockfile = Lockfile::from_path(path).await?;
    let packages = lockfile.package_imports()?;

    let jobs: Vec<Job> = lockfile
        .keyring_imports()
        .into_iter()
        .map(Job::Keyring)
        .chain(lockfile.index_imports().into_iter().map(Job::Index))
        .chain(packages.into_iter().map(Job::Package))
        .collect();

    ctx.emit_debug(format!(
        "{}: {} imports, {} at a time",
        path.display(),
        jobs.len(),
        ctx.config.parallel_imports()
    ));

    let reports: Vec<ImportReport> = stream::iter(jobs)
        .map(|job| job.run(ctx))
        .buffer_unordered(ctx.config.parallel_imports())
        .try_collect()
        .await?;

    Ok(LockedArtifactSet::from_reports(path.to_path_buf(), &reports))
}
