//! Integration tests for store crate

#[cfg(test)]
mod tests {
    use apkfetch_store::*;
    use apkfetch_types::PackageReference;
    use tempfile::tempdir;

    fn reference() -> PackageReference {
        PackageReference {
            repository_url: "https://packages.example.dev/os".to_string(),
            architecture: "x86_64".to_string(),
            package_name: "hello".to_string(),
            version: "2.12-r0".to_string(),
        }
    }

    #[tokio::test]
    async fn test_assemble_into_store() {
        let temp = tempdir().unwrap();
        let store = ArtifactStore::new(temp.path().to_path_buf());
        let address = AddressTranslator::package(&reference());

        let staging = store.staging_dir(&address).await.unwrap();
        let segments = SegmentFiles::in_dir(staging.path());
        tokio::fs::write(&segments.signature, [0x1f, 0x8b, 1]).await.unwrap();
        tokio::fs::write(&segments.control, [0x1f, 0x8b, 2]).await.unwrap();
        tokio::fs::write(&segments.data, [0x1f, 0x8b, 3]).await.unwrap();

        assert!(!store.artifact_path(&address).exists());
        let (path, bytes) = store.assemble(&address, staging.path()).await.unwrap();

        assert_eq!(bytes, 9);
        assert!(store.artifact_path(&address).is_file());
        assert_eq!(
            path,
            temp.path()
                .join("https%3A%2F%2Fpackages.example.dev%2Fos%2F")
                .join("x86_64")
                .join("hello-2.12-r0.apk")
        );
        assert_eq!(
            tokio::fs::read(&path).await.unwrap(),
            [0x1f, 0x8b, 1, 0x1f, 0x8b, 2, 0x1f, 0x8b, 3]
        );

        // Re-assembly is byte-identical
        let (again, _) = store.assemble(&address, staging.path()).await.unwrap();
        assert_eq!(
            tokio::fs::read(&again).await.unwrap(),
            tokio::fs::read(&path).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_assemble_without_segments() {
        let temp = tempdir().unwrap();
        let store = ArtifactStore::new(temp.path().to_path_buf());
        let address = AddressTranslator::package(&reference());
        let staging = store.staging_dir(&address).await.unwrap();

        assert!(store.assemble(&address, staging.path()).await.is_err());
        assert!(!store.artifact_path(&address).exists());
    }
}
