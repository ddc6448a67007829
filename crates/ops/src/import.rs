//! Package, index and keyring imports

use crate::descriptor::BuildDescriptor;
use crate::types::{ImportReport, ProbeReport};
use crate::OpsCtx;
use apkfetch_errors::Error;
use apkfetch_events::{AppEvent, EventEmitter, FailureContext, ImportEvent, ImportKind};
use apkfetch_hash::Digest;
use apkfetch_store::AddressTranslator;
use apkfetch_types::{
    IndexImport, KeyringImport, PackageImport, PackageReference, SegmentKind, SegmentSpec,
};
use std::future::Future;

/// Wrap an import in Started / Completed / Failed events
async fn tracked<F>(
    ctx: &OpsCtx,
    kind: ImportKind,
    name: &str,
    url: &str,
    import: F,
) -> Result<ImportReport, Error>
where
    F: Future<Output = Result<ImportReport, Error>>,
{
    ctx.emit(AppEvent::Import(ImportEvent::Started {
        kind,
        name: name.to_string(),
        url: url.to_string(),
    }));

    match import.await {
        Ok(report) => {
            ctx.emit(AppEvent::Import(ImportEvent::Completed {
                kind,
                name: name.to_string(),
                path: report.path.clone(),
            }));
            Ok(report)
        }
        Err(e) => {
            ctx.emit(AppEvent::Import(ImportEvent::Failed {
                kind,
                name: name.to_string(),
                failure: FailureContext::from_error(&e),
            }));
            Err(e)
        }
    }
}

/// Expected digest of a segment. The signature segment is never checked:
/// its checksum is not stable across repository rebuilds.
fn expected_digest(kind: SegmentKind, spec: &SegmentSpec) -> Result<Option<Digest>, Error> {
    if kind == SegmentKind::Signature {
        return Ok(None);
    }
    Ok(spec.digest.as_deref().map(Digest::parse).transpose()?)
}

/// Fetch the three segments of a package and assemble them
///
/// The artifact lands at `{cache}/{escaped repo}/{arch}/{name}-{version}.apk`.
/// Segments are staged in a private `<artifact>.parts-XXXXXX/` directory
/// that is removed afterwards, also when the import fails. Racing imports
/// of the same package each stage their own segments and the last assembly
/// wins.
///
/// # Errors
///
/// Fails on the first transport, integrity or assembly error; no artifact
/// is written in that case.
pub async fn import_package(ctx: &OpsCtx, import: &PackageImport) -> Result<ImportReport, Error> {
    let name = import.display_name();
    tracked(ctx, ImportKind::Package, &name, &import.url, async {
        // Digests are validated before any request goes out.
        let mut expected = Vec::with_capacity(SegmentKind::ORDER.len());
        for kind in SegmentKind::ORDER {
            expected.push(expected_digest(kind, import.segment(kind))?);
        }

        let reference = PackageReference {
            repository_url: AddressTranslator::repository_of(
                &import.url,
                Some(&import.architecture),
            )
            .to_string(),
            architecture: import.architecture.clone(),
            package_name: import.name.clone(),
            version: import.version.clone(),
        };
        let address = AddressTranslator::package(&reference);
        let staging = ctx.store.staging_dir(&address).await?;

        for (kind, expected) in SegmentKind::ORDER.into_iter().zip(&expected) {
            let spec = import.segment(kind);
            let result = ctx
                .downloader
                .download_range(
                    &import.url,
                    &spec.range,
                    &staging.path().join(kind.file_name()),
                    expected.as_ref(),
                )
                .await?;

            ctx.emit(AppEvent::Import(ImportEvent::SegmentFetched {
                name: name.clone(),
                segment: kind.to_string(),
                bytes: result.bytes,
                verified: result.digest.is_some(),
            }));
        }

        let (path, bytes) = ctx.store.assemble(&address, staging.path()).await?;
        ctx.emit(AppEvent::Import(ImportEvent::Assembled {
            name: name.clone(),
            path: path.clone(),
            bytes,
        }));

        let staging_path = staging.path().to_path_buf();
        if let Err(e) = staging.close() {
            ctx.emit_warning(format!(
                "could not remove staging directory {}: {e}",
                staging_path.display()
            ));
        }

        let descriptor = BuildDescriptor::packages()
            .write_to(&ctx.store.repository_dir(&address))
            .await?;

        Ok::<_, Error>(ImportReport {
            kind: ImportKind::Package,
            name: name.clone(),
            url: import.url.clone(),
            path,
            bytes,
            descriptor,
        })
    })
    .await
}

/// Probe the index URL once, then fetch it whole
///
/// The index lands at `{cache}/{escaped repo}/{arch}/APKINDEX/latest.tar.gz`.
///
/// # Errors
///
/// Returns `SetupError::EnvironmentMisconfigured` if the host ignores range
/// requests, or the transport error of the fetch.
pub async fn import_index(ctx: &OpsCtx, import: &IndexImport) -> Result<ImportReport, Error> {
    tracked(ctx, ImportKind::Index, &import.name, &import.url, async {
        ctx.probe.ensure(&import.url).await?;

        let address = AddressTranslator::index(&import.url, &import.architecture);
        let dest = ctx.store.artifact_path(&address);
        let result = ctx.downloader.download_full(&import.url, &dest, None).await?;

        let descriptor = BuildDescriptor::indexes()
            .write_to(&ctx.store.repository_dir(&address))
            .await?;

        Ok::<_, Error>(ImportReport {
            kind: ImportKind::Index,
            name: import.name.clone(),
            url: import.url.clone(),
            path: result.path,
            bytes: result.bytes,
            descriptor,
        })
    })
    .await
}

/// Fetch one public key to `{cache}/{escaped repo}/{file}`
///
/// # Errors
///
/// Returns the transport error of the fetch.
pub async fn import_keyring(ctx: &OpsCtx, import: &KeyringImport) -> Result<ImportReport, Error> {
    tracked(ctx, ImportKind::Keyring, &import.name, &import.url, async {
        let address = AddressTranslator::keyring(&import.url);
        let dest = ctx.store.artifact_path(&address);
        let result = ctx.downloader.download_full(&import.url, &dest, None).await?;

        let descriptor = BuildDescriptor::keyring(address.file_name())
            .write_to(&ctx.store.repository_dir(&address))
            .await?;

        Ok::<_, Error>(ImportReport {
            kind: ImportKind::Keyring,
            name: import.name.clone(),
            url: import.url.clone(),
            path: result.path,
            bytes: result.bytes,
            descriptor,
        })
    })
    .await
}

/// Run the range-support probe against `url` on its own
///
/// # Errors
///
/// Returns the probe failure, including the long-form remediation text when
/// the host ignores ranges.
pub async fn probe_repository(ctx: &OpsCtx, url: &str) -> Result<ProbeReport, Error> {
    ctx.probe.ensure(url).await?;
    Ok(ProbeReport {
        url: url.to_string(),
        strategy: ctx.downloader.strategy().name().to_string(),
        verified: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use apkfetch_errors::IntegrityError;
    use apkfetch_types::ByteRange;

    #[test]
    fn test_signature_digest_is_ignored() {
        let spec = SegmentSpec::new(ByteRange::first_byte(), Some("not a digest".to_string()));
        assert!(expected_digest(SegmentKind::Signature, &spec)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_control_digest_is_normalized() {
        let spec = SegmentSpec::new(
            ByteRange::first_byte(),
            Some(
                "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
                    .to_string(),
            ),
        );
        let digest = expected_digest(SegmentKind::Control, &spec).unwrap().unwrap();
        assert_eq!(
            digest.to_sri(),
            "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
    }

    #[test]
    fn test_bad_data_digest() {
        let spec = SegmentSpec::new(ByteRange::first_byte(), Some("md5-abc".to_string()));
        assert!(matches!(
            expected_digest(SegmentKind::Data, &spec),
            Err(Error::Integrity(IntegrityError::UnsupportedAlgorithm { .. }))
        ));
    }
}
