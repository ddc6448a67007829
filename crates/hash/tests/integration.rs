//! Integration tests for hash crate

#[cfg(test)]
mod tests {
    use apkfetch_errors::IntegrityError;
    use apkfetch_hash::*;

    #[test]
    fn test_lockfile_digest_forms_verify_streamed_segment() {
        let segment = vec![0x1fu8; 96 * 1024];
        let actual = Digest::from_data(Algorithm::Sha1, &segment);

        for expected in [
            actual.to_sri(),
            format!("sha1:{}", actual.to_hex()),
            format!("sha1-{}", actual.to_hex()),
        ] {
            let mut verifier = SegmentVerifier::new(Digest::parse(&expected).unwrap());
            for chunk in segment.chunks(8 * 1024) {
                verifier.update(chunk);
            }
            assert_eq!(verifier.finish("https://example.dev/os/p.apk").unwrap(), actual);
        }
    }

    #[test]
    fn test_truncated_segment_is_a_mismatch() {
        let segment = b"data segment payload";
        let expected = Digest::from_data(Algorithm::Sha256, segment);

        let mut verifier = SegmentVerifier::new(expected.clone());
        verifier.update(&segment[..10]);
        match verifier.finish("https://example.dev/os/p.apk") {
            Err(IntegrityError::Mismatch { expected: e, .. }) => assert_eq!(e, expected.to_sri()),
            other => panic!("expected mismatch, got {other:?}"),
        }
    }
}
