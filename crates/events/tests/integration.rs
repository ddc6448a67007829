//! Integration tests for the event system

use apkfetch_errors::{Error, SetupError};
use apkfetch_events::*;

#[tokio::test]
async fn test_failure_context_from_error() {
    let (tx, mut rx) = channel();
    let error: Error = SetupError::EnvironmentMisconfigured {
        url: "https://example.dev/os/x86_64/APKINDEX.tar.gz".into(),
        received: 42,
    }
    .into();

    tx.emit(AppEvent::Probe(ProbeEvent::Failed {
        url: "https://example.dev/os/x86_64/APKINDEX.tar.gz".into(),
        failure: FailureContext::from_error(&error),
    }));

    let event = rx.recv().await.unwrap();
    assert_eq!(event.tracing_level(), tracing::Level::ERROR);
    match event {
        AppEvent::Probe(ProbeEvent::Failed { failure, .. }) => {
            assert_eq!(failure.code.as_deref(), Some("setup.environment_misconfigured"));
            assert!(failure.hint.is_some());
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_json_shape() {
    let event = AppEvent::Import(ImportEvent::Started {
        kind: ImportKind::Keyring,
        name: "example-signing.rsa.pub".into(),
        url: "https://example.dev/os/example-signing.rsa.pub".into(),
    });
    let json = event.to_json().unwrap();
    assert!(json.contains(r#""domain":"import""#));
    assert!(json.contains(r#""type":"Started""#));
    assert!(json.contains(r#""kind":"keyring""#));
}
