//! Integration tests for error types

#[cfg(test)]
mod tests {
    use apkfetch_errors::*;

    #[test]
    fn test_error_conversion() {
        let net_err = NetworkError::Timeout {
            url: "https://example.dev".into(),
        };
        let err: Error = net_err.into();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::AssemblyIncomplete {
            segment: "control".into(),
            path: "/cache/ctl.tar.gz".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot assemble package: control segment missing or empty at /cache/ctl.tar.gz"
        );
    }

    #[test]
    fn test_environment_misconfigured_is_long_form() {
        let err: Error = SetupError::EnvironmentMisconfigured {
            url: "https://example.dev/os/x86_64/APKINDEX.tar.gz".into(),
            received: 10,
        }
        .into();
        let message = err.user_message();
        assert!(message.contains("returned 10 bytes"));
        assert!(message.contains("Range: bytes=START-END"));
        assert!(message.lines().count() > 5);
        assert_eq!(err.user_code(), Some("setup.environment_misconfigured"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::IoError { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io_err.into();
        assert_eq!(err.user_code(), Some("error.io"));
    }

    #[test]
    fn test_malformed_auth_hint() {
        let err: Error = ConfigError::MalformedAuthDescriptor {
            reason: "expected 4 fields, got 3".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("config.malformed_auth_descriptor"));
        assert!(err.user_hint().unwrap().contains("basic:REALM:USER:PASSWORD"));
    }
}
