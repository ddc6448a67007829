//! Integration tests for the types crate

#[cfg(test)]
mod tests {
    use apkfetch_types::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_lockfile_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apko.lock.json");
        tokio::fs::write(
            &path,
            r#"{"version":"v1","contents":{"keyring":[{"name":"k","url":"https://example.dev/os/k.rsa.pub"}]}}"#,
        )
        .await
        .unwrap();

        let lock = Lockfile::from_path(&path).await.unwrap();
        assert_eq!(lock.keyring_imports()[0].url, "https://example.dev/os/k.rsa.pub");
    }

    #[tokio::test]
    async fn test_missing_lockfile() {
        let dir = tempdir().unwrap();
        let err = Lockfile::from_path(&dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            apkfetch_errors::Error::Lockfile(apkfetch_errors::LockfileError::NotFound { .. })
        ));
    }

    #[test]
    fn test_byte_range_serde() {
        let spec = SegmentSpec::new("bytes=0-9".parse().unwrap(), None);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"range":"bytes=0-9"}"#);
    }
}
