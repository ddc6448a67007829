//! Status validation for range and full responses

use apkfetch_errors::{Error, NetworkError};
use apkfetch_types::ByteRange;
use reqwest::{Response, StatusCode};

/// How strictly to judge the status of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePolicy {
    /// A requested range must come back as `206 Partial Content`
    Strict,
    /// Any 2xx is accepted; the caller inspects what arrived
    Lenient,
}

pub(super) fn check_status(
    response: &Response,
    url: &str,
    range: Option<&ByteRange>,
    policy: ResponsePolicy,
) -> Result<(), Error> {
    classify(response.status(), url, range, policy)
}

fn classify(
    status: StatusCode,
    url: &str,
    range: Option<&ByteRange>,
    policy: ResponsePolicy,
) -> Result<(), Error> {
    if status == StatusCode::RANGE_NOT_SATISFIABLE {
        return Err(NetworkError::RangeNotSatisfiable {
            url: url.to_string(),
            range: range.map(ByteRange::header_value).unwrap_or_default(),
        }
        .into());
    }

    if !status.is_success() {
        return Err(NetworkError::HttpError {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    if range.is_some() && policy == ResponsePolicy::Strict && status != StatusCode::PARTIAL_CONTENT
    {
        return Err(NetworkError::PartialContentNotSupported {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    Ok(())
}

/// A closed range must deliver exactly its length
pub(super) fn check_length(
    url: &str,
    range: Option<&ByteRange>,
    expected: u64,
    received: u64,
) -> Result<(), Error> {
    if expected != received {
        return Err(NetworkError::LengthMismatch {
            url: url.to_string(),
            range: range.map(ByteRange::header_value).unwrap_or_default(),
            expected,
            received,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.dev/os/x86_64/a.apk";

    #[test]
    fn test_strict_range_requires_partial_content() {
        let range = ByteRange::new(0, 9).unwrap();
        assert!(classify(StatusCode::PARTIAL_CONTENT, URL, Some(&range), ResponsePolicy::Strict).is_ok());

        let err = classify(StatusCode::OK, URL, Some(&range), ResponsePolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::PartialContentNotSupported { status: 200, .. })
        ));
    }

    #[test]
    fn test_lenient_accepts_full_answer() {
        let range = ByteRange::first_byte();
        assert!(classify(StatusCode::OK, URL, Some(&range), ResponsePolicy::Lenient).is_ok());
    }

    #[test]
    fn test_full_fetch_accepts_ok() {
        assert!(classify(StatusCode::OK, URL, None, ResponsePolicy::Strict).is_ok());
    }

    #[test]
    fn test_error_statuses() {
        let range = ByteRange::new(100, 199).unwrap();
        let err = classify(
            StatusCode::RANGE_NOT_SATISFIABLE,
            URL,
            Some(&range),
            ResponsePolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::RangeNotSatisfiable { ref range, .. }) if range == "bytes=100-199"
        ));

        let err = classify(StatusCode::NOT_FOUND, URL, None, ResponsePolicy::Lenient).unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::HttpError { status: 404, .. })
        ));
    }

    #[test]
    fn test_length_check() {
        let range = ByteRange::new(0, 9).unwrap();
        assert!(check_length(URL, Some(&range), 10, 10).is_ok());
        assert!(matches!(
            check_length(URL, Some(&range), 10, 12).unwrap_err(),
            Error::Network(NetworkError::LengthMismatch {
                expected: 10,
                received: 12,
                ..
            })
        ));
    }
}
