//! End-to-end scenarios through the frame pipeline


use parallax_window::{
    app::{Recording, ReplayApp},
    config::Config,
    pipeline::{FramePipeline, TrackingStatus},
    position_estimator::{estimate_depth, ViewerPosition},
};
use test_helpers::{face_with_eyes, video_frame, QueueDetector, FRAME_SIZE};

/// Five frames without a face leave the viewer where it was
#[test]
fn test_absent_landmarks_hold_position() {
    let config = Config::default();
    let detector = QueueDetector::new(vec![None; 5]);
    let mut pipeline = FramePipeline::new(detector, &config).unwrap();
    let initial = pipeline.position();

    for id in 1..=5 {
        let outcome = pipeline.step(Some(&video_frame(id)), config.calibration.screen_aspect());
        assert!(outcome.processed);
        assert_eq!(outcome.position, initial);
        assert_eq!(outcome.status, TrackingStatus::NoFaceDetected);
    }
    assert_eq!(pipeline.stats().frames_processed, 5);
    assert_eq!(pipeline.stats().status_changes, 0);
}

/// Tracking loss after a detection keeps the last smoothed value
#[test]
fn test_tracking_loss_holds_last_position() {
    let config = Config::default();
    let face = face_with_eyes(&config, (0.40, 0.45), (0.52, 0.45));
    let detector = QueueDetector::new([Some(face), None, None, None, None, None]);
    let mut pipeline = FramePipeline::new(detector, &config).unwrap();

    let tracked = pipeline.step(Some(&video_frame(1)), 1.75);
    assert_eq!(tracked.status, TrackingStatus::Tracking);
    for id in 2..=6 {
        let outcome = pipeline.step(Some(&video_frame(id)), 1.75);
        assert_eq!(outcome.position, tracked.position);
        assert_eq!(outcome.view.frustum, tracked.view.frustum);
        assert_eq!(outcome.status, TrackingStatus::NoFaceDetected);
    }
}

/// Eyes at (0.45, 0.5) and (0.55, 0.5) on a 1280 px frame
#[test]
fn test_first_detection_blends_from_default() {
    let config = Config::default();
    let face = face_with_eyes(&config, (0.45, 0.5), (0.55, 0.5));
    let mut pipeline = FramePipeline::new(QueueDetector::new([Some(face)]), &config).unwrap();
    assert_eq!(pipeline.position(), ViewerPosition::new(0.0, 0.0, 0.5));

    let raw_z = estimate_depth(0.1, FRAME_SIZE.width, &config.calibration);
    assert!((0.2..=2.0).contains(&raw_z));

    let outcome = pipeline.step(Some(&video_frame(1)), 1.75);
    let z = outcome.position.z;
    assert!(z > 0.5_f64.min(raw_z) && z < 0.5_f64.max(raw_z), "z = {z}");
    let ratio = (z - raw_z) / (0.5 - raw_z);
    assert!((ratio - config.calibration.smoothing_factor).abs() < 1e-9);
}

/// Viewer moving right at constant depth shifts the frustum left
#[test]
fn test_lateral_motion_shifts_window() {
    let mut config = Config::default();
    config.smoothing.filter = "none".to_string();

    // Face sliding toward the image's left edge, same eye spread
    let faces = [0.60, 0.55, 0.50, 0.45, 0.40]
        .into_iter()
        .map(|cx| Some(face_with_eyes(&config, (cx - 0.05, 0.5), (cx + 0.05, 0.5))))
        .collect::<Vec<_>>();
    let mut pipeline = FramePipeline::new(QueueDetector::new(faces), &config).unwrap();

    let mut previous = pipeline.step(Some(&video_frame(1)), 1.75);
    for id in 2..=5 {
        let current = pipeline.step(Some(&video_frame(id)), 1.75);
        assert!(current.position.x > previous.position.x);
        assert!((current.position.z - previous.position.z).abs() < 1e-9);
        assert!(current.view.frustum.left < previous.view.frustum.left);
        assert!(current.view.frustum.right < previous.view.frustum.right);
        previous = current;
    }
}

/// Redraws faster than the camera reuse the last frame without re-detecting
#[test]
fn test_detector_called_once_per_frame() {
    let config = Config::default();
    let face = face_with_eyes(&config, (0.45, 0.5), (0.55, 0.5));
    let detector = QueueDetector::new([Some(face.clone()), Some(face)]);
    let mut pipeline = FramePipeline::new(detector, &config).unwrap();

    for id in [1, 1, 1, 2, 2, 2] {
        pipeline.step(Some(&video_frame(id)), 1.75);
    }
    assert_eq!(pipeline.detector_mut().calls, 2);
    assert_eq!(pipeline.stats().frames_skipped, 4);
}

/// The replay application runs a recording from disk
#[test]
fn test_replay_from_file() {
    let path = std::env::temp_dir()
        .join(format!("parallax_window_replay_{}.yaml", std::process::id()));
    let recording = Recording::synthetic(90, FRAME_SIZE);
    std::fs::write(&path, serde_yaml::to_string(&recording).unwrap()).unwrap();

    let loaded = Recording::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, recording);

    let summary = ReplayApp::new(Config::default(), loaded).unwrap().run().unwrap();
    assert_eq!(summary.stats.frames_processed, 90);
    assert_eq!(summary.rendered, 180);
    assert_eq!(summary.final_status, TrackingStatus::Tracking);
}
