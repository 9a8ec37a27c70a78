//! Error reporting across the pipeline's layers.

use penflow_pipeline::Error;

#[test]
fn test_taxonomy_names() {
    let cases: Vec<(Error, &str)> = vec![
        (penflow_core::Error::Decode { length: 20 }.into(), "DecodeError"),
        (penflow_core::Error::validation("negative x").into(), "ValidationError"),
        (penflow_core::Error::EmptyStroke { stroke_id: 1 }.into(), "EmptyStrokeError"),
        (penflow_core::Error::task_not_found("t").into(), "TaskNotFoundError"),
        (
            penflow_core::Error::InvalidTaskId { id: "x".into() }.into(),
            "InvalidTaskIdError",
        ),
        (
            penflow_analyzer::Error::initialization("refused").into(),
            "EngineInitializationError",
        ),
        (
            penflow_recognizer::Error::classifier("down", Some(502)).into(),
            "ClassifierUnavailableError",
        ),
        (
            penflow_recognizer::Error::recognizer("down", None).into(),
            "RecognizerUnavailableError",
        ),
        (Error::QueueClosed, "QueueClosedError"),
        (Error::store("disk full"), "StoreError"),
        (Error::config("bad workers"), "ConfigError"),
    ];

    for (err, kind) in cases {
        assert_eq!(err.kind(), kind, "{err}");
    }
}

#[test]
fn test_client_errors() {
    let decode: Error = penflow_core::Error::Decode { length: 1 }.into();
    assert!(decode.is_client_error());

    let mime = Error::UnsupportedMimeType {
        mime_type: "text/plain".to_string(),
    };
    assert!(mime.is_client_error());
    assert_eq!(mime.to_string(), "Unsupported mime type: text/plain");

    let remote: Error = penflow_recognizer::Error::recognizer("down", Some(503)).into();
    assert!(!remote.is_client_error());
    assert!(!Error::QueueClosed.is_client_error());
}

#[test]
fn test_display_keeps_inner_message() {
    let err: Error = penflow_analyzer::Error::initialization("refused").into();
    assert!(err.to_string().contains("refused"));

    let err = Error::store("disk full");
    assert_eq!(err.to_string(), "Store error: disk full");
}
