//! Error handling tests for all modules

use face_capture::{
    capture_store::CaptureStore,
    error::{Error, Result},
    filters::create_filter,
    frame::Rotation,
    movement_detector::{Motion, MovementDetector},
    normalizer::FrameNormalizer,
    orientation::Orientation,
    pose_classifier::PoseClassifier,
    replay::ReplayScript,
};

#[test]
fn test_filter_creation_errors() {
    // Test invalid filter type
    let result = create_filter("invalid_filter");
    assert!(result.is_err());

    // Test invalid window size for moving average
    match create_filter("moving_average:0") {
        Err(Error::FilterError(msg)) => assert!(msg.contains("Window size")),
        _ => panic!("Expected FilterError"),
    }

    // Test invalid alpha for exponential filter
    match create_filter("exponential:2.0") {
        Err(Error::FilterError(msg)) => assert!(msg.contains("Alpha")),
        _ => panic!("Expected FilterError"),
    }

    assert!(create_filter("exponential:-0.1").is_err());
    assert!(create_filter("median:0").is_err());
    assert!(create_filter("none").is_ok());
}

#[test]
fn test_invalid_filter_parameters() {
    let test_cases = vec![
        "moving_average:-5", // Negative window size
        "median:abc",        // Non-numeric parameter
        "exponential:10",    // Alpha > 1
        "hampel:4",          // Even window
        "hampel:5:-1",       // Negative threshold
        "none:3",            // Unexpected parameter
    ];

    for filter_str in test_cases {
        let result = create_filter(filter_str);
        assert!(result.is_err(), "Expected error for {}", filter_str);
    }
}

#[test]
fn test_movement_detector_edge_cases() {
    // A negative threshold never reports stillness once the window fills
    let mut detector = MovementDetector::new(2, -1.0);
    assert_eq!(detector.update(0.0), Motion::Settling);
    assert_eq!(detector.update(0.0), Motion::Moving);

    // A very large window keeps settling
    let mut detector = MovementDetector::new(1000, 2.0);
    assert_eq!(detector.update(1.0), Motion::Settling);
}

#[test]
fn test_classifier_threshold_errors() {
    assert!(PoseClassifier::new(0.0).is_err());
    assert!(PoseClassifier::new(-1.0).is_err());
    assert!(PoseClassifier::new(f64::NAN).is_err());
    assert!(PoseClassifier::new(f64::INFINITY).is_err());
    assert!(PoseClassifier::new(10.0).is_ok());
}

#[test]
fn test_rotation_errors() {
    for degrees in [45, 360, 91] {
        assert!(matches!(Rotation::from_degrees(degrees), Err(Error::InvalidFrame(_))));
    }
}

#[test]
fn test_duplicate_capture_error() {
    let frame = face_capture::frame::RawFrame::from_rgba(0, image::RgbaImage::new(4, 4), Rotation::Deg0);
    let image = FrameNormalizer::default().normalize(&frame).unwrap();

    let mut store = CaptureStore::new();
    store.record(Orientation::Left, image.clone()).unwrap();
    match store.record(Orientation::Left, image) {
        Err(Error::DuplicateCapture(orientation)) => assert_eq!(orientation, Orientation::Left),
        other => panic!("Expected DuplicateCapture, got {other:?}"),
    }
}

#[test]
fn test_replay_script_errors() {
    assert!(matches!(ReplayScript::from_yaml("frames: 3"), Err(Error::InvalidInput(_))));
    assert!(ReplayScript::from_file("/nonexistent/script.yaml").is_err());
}

#[test]
fn test_error_display() {
    let cases: Vec<(Error, &str)> = vec![
        (Error::InvalidFrame("empty".to_string()), "Invalid frame: empty"),
        (
            Error::DuplicateCapture(Orientation::Right),
            "Duplicate capture for orientation right",
        ),
        (Error::OracleFailure("timeout".to_string()), "Face oracle failure: timeout"),
        (Error::ConfigError("bad".to_string()), "Configuration error: bad"),
        (Error::PipelineClosed, "Frame pipeline is closed"),
    ];
    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_error_conversion() {
    fn read_missing() -> Result<String> {
        Ok(std::fs::read_to_string("/nonexistent/file")?)
    }
    assert!(matches!(read_missing(), Err(Error::Io(_))));
}

#[test]
fn test_thread_safety() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
    assert_send_sync::<face_capture::session::CaptureSession>();
    assert_send_sync::<face_capture::pipeline::FramePipeline>();
}
