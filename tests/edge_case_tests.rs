//! Edge case tests for noisy and degenerate input


use parallax_window::{
    config::Config,
    filters::create_filter,
    landmarks::{FrameSize, Landmark, LandmarkFrame},
    pipeline::{FramePipeline, TrackingStatus},
    position_estimator::{PositionEstimator, ViewerPosition},
    projection::OffAxisProjector,
};
use test_helpers::{
    assert_frustum_sane, assert_position_finite, face_with_eyes, video_frame, QueueDetector,
    FRAME_SIZE,
};

#[test]
fn test_random_landmarks_never_break_the_pipeline() {
    let config = Config::default();
    let faces = (0..500)
        .map(|_| {
            let left = Landmark::new(rand::random::<f64>(), rand::random::<f64>());
            let right = Landmark::new(rand::random::<f64>(), rand::random::<f64>());
            Some(LandmarkFrame::from_eyes(&config.landmarks, left, right))
        })
        .collect::<Vec<_>>();
    let mut pipeline = FramePipeline::new(QueueDetector::new(faces), &config).unwrap();

    for id in 1..=500 {
        let outcome = pipeline.step(Some(&video_frame(id)), rand::random::<f64>() * 3.0);
        assert_position_finite(&outcome.position);
        assert_frustum_sane(&outcome.view.frustum);
        let z = outcome.position.z;
        assert!((config.calibration.min_depth_m..=config.calibration.max_depth_m).contains(&z));
    }
}

#[test]
fn test_extreme_landmark_values() {
    let config = Config::default();
    let mut estimator = PositionEstimator::new(&config).unwrap();
    let projector = OffAxisProjector::new(config.calibration).unwrap();

    let extreme_values = vec![
        (f64::INFINITY, f64::NEG_INFINITY),
        (f64::NAN, f64::NAN),
        (f64::MAX, f64::MIN),
        (1e100, -1e100),
        (-5.0, 7.0),
        (0.0, 0.0),
    ];

    for (a, b) in extreme_values {
        let frame = face_with_eyes(&config, (a, b), (b, a));
        let position = estimator.update(Some(&frame), FRAME_SIZE);
        assert_position_finite(&position);
        assert_frustum_sane(&projector.project(position, 1.75).frustum);
    }
}

#[test]
fn test_eyes_far_outside_image_do_not_reach_renderer() {
    let config = Config::default();
    let faces = vec![
        Some(face_with_eyes(&config, (1e17, 0.5), (1e17 + 0.1, 0.5))),
        Some(face_with_eyes(&config, (0.45, -3.0), (0.55, -3.0))),
    ];
    let mut pipeline = FramePipeline::new(QueueDetector::new(faces), &config).unwrap();
    let initial = pipeline.position();

    for id in 1..=2 {
        let outcome = pipeline.step(Some(&video_frame(id)), 1.75);
        assert_eq!(outcome.status, TrackingStatus::NoFaceDetected);
        assert_eq!(outcome.position, initial);
        assert_frustum_sane(&outcome.view.frustum);
        assert!(outcome.view.projection.iter().all(|v| v.is_finite()));
    }
    assert_eq!(pipeline.stats().detections, 0);
}

#[test]
fn test_far_off_center_eye_still_projects() {
    let config = Config::default();
    let projector = OffAxisProjector::new(config.calibration).unwrap();

    for x in [-6.93e16, -1e3, 1e3, f64::MAX] {
        let view = projector.project(ViewerPosition::new(x, -x, 0.95), 1.75);
        assert_frustum_sane(&view.frustum);
        assert!(view.projection.iter().all(|v| v.is_finite()), "eye x = {x}");
    }
}

#[test]
fn test_zero_sized_frame_is_ignored() {
    let config = Config::default();
    let mut estimator = PositionEstimator::new(&config).unwrap();
    let frame = face_with_eyes(&config, (0.4, 0.5), (0.6, 0.5));

    let before = estimator.position();
    assert_eq!(estimator.update(Some(&frame), FrameSize::new(0, 0)), before);
    assert!(estimator.observe(Some(&frame), FrameSize::new(0, 720)).is_none());
}

#[test]
fn test_filter_reset_behavior() {
    let mut config = Config::default();
    let seed = ViewerPosition::new(0.0, 0.0, 0.5);

    for name in ["exponential", "moving_average"] {
        config.smoothing.filter = name.to_string();
        let mut filter = create_filter(&config, seed).unwrap();

        filter.apply(ViewerPosition::new(0.1, 0.1, 1.0));
        filter.apply(ViewerPosition::new(0.2, 0.1, 1.2));
        let before_reset = filter.apply(ViewerPosition::new(0.3, 0.1, 1.4));

        filter.reset(seed);
        let after_reset = filter.apply(ViewerPosition::new(0.3, 0.1, 1.4));

        assert!(
            (before_reset.z - after_reset.z).abs() > 1e-10,
            "Filter {} did not change output after reset",
            filter.name()
        );
    }
}

#[test]
fn test_extreme_aspect_ratios() {
    let config = Config::default();
    let projector = OffAxisProjector::new(config.calibration).unwrap();
    let eye = ViewerPosition::new(0.05, 0.02, 0.5);

    for aspect in [1e-6, 0.1, 1.0, 10.0, 1e6, 0.0, -1.0, f64::INFINITY, f64::NAN] {
        let view = projector.project(eye, aspect);
        assert_frustum_sane(&view.frustum);
        assert!(view.projection.iter().all(|v| v.is_finite()), "aspect {aspect}");
    }
}
