//! The flat bundle of files one lockfile materializes

use crate::types::ImportReport;
use apkfetch_events::ImportKind;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Lockfile plus every artifact imported from it
///
/// Constructed once per invocation and never mutated. The categories have
/// no ordering relationship; [`LockedArtifactSet::files`] is their plain
/// union.
#[derive(Clone, Debug, Serialize)]
pub struct LockedArtifactSet {
    lockfile: PathBuf,
    apks: BTreeSet<PathBuf>,
    indexes: BTreeSet<PathBuf>,
    keyrings: BTreeSet<PathBuf>,
}

impl LockedArtifactSet {
    #[must_use]
    pub fn new(
        lockfile: PathBuf,
        apks: impl IntoIterator<Item = PathBuf>,
        indexes: impl IntoIterator<Item = PathBuf>,
        keyrings: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        Self {
            lockfile,
            apks: apks.into_iter().collect(),
            indexes: indexes.into_iter().collect(),
            keyrings: keyrings.into_iter().collect(),
        }
    }

    /// Sort import reports into their categories
    #[must_use]
    pub fn from_reports(lockfile: PathBuf, reports: &[ImportReport]) -> Self {
        let of_kind = |kind: ImportKind| {
            reports
                .iter()
                .filter(move |r| r.kind == kind)
                .map(|r| r.path.clone())
        };
        Self::new(
            lockfile,
            of_kind(ImportKind::Package),
            of_kind(ImportKind::Index),
            of_kind(ImportKind::Keyring),
        )
    }

    #[must_use]
    pub fn lockfile(&self) -> &PathBuf {
        &self.lockfile
    }

    #[must_use]
    pub fn apks(&self) -> &BTreeSet<PathBuf> {
        &self.apks
    }

    #[must_use]
    pub fn indexes(&self) -> &BTreeSet<PathBuf> {
        &self.indexes
    }

    #[must_use]
    pub fn keyrings(&self) -> &BTreeSet<PathBuf> {
        &self.keyrings
    }

    /// Every file in the set, deduplicated
    #[must_use]
    pub fn files(&self) -> BTreeSet<PathBuf> {
        std::iter::once(&self.lockfile)
            .chain(&self.apks)
            .chain(&self.indexes)
            .chain(&self.keyrings)
            .cloned()
            .collect()
    }

    /// Per-category named groups
    #[must_use]
    pub fn output_groups(&self) -> BTreeMap<&'static str, BTreeSet<PathBuf>> {
        BTreeMap::from([
            ("lockfile", BTreeSet::from([self.lockfile.clone()])),
            ("apks", self.apks.clone()),
            ("indexes", self.indexes.clone()),
            ("keyrings", self.keyrings.clone()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_groups() {
        let set = LockedArtifactSet::new(
            PathBuf::from("apko.lock.json"),
            [PathBuf::from("a.apk"), PathBuf::from("b.apk"), PathBuf::from("a.apk")],
            [PathBuf::from("x86_64/APKINDEX/latest.tar.gz")],
            [PathBuf::from("key.rsa.pub")],
        );

        assert_eq!(set.apks().len(), 2);
        assert_eq!(set.files().len(), 5);
        assert!(set.files().contains(&PathBuf::from("apko.lock.json")));

        let groups = set.output_groups();
        assert_eq!(
            groups.keys().copied().collect::<Vec<_>>(),
            ["apks", "indexes", "keyrings", "lockfile"]
        );
        assert_eq!(groups["keyrings"].len(), 1);
    }
}
