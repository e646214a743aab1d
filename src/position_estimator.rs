//! Viewer position estimation from the two eye landmarks.
//!
//! Depth comes from the apparent eye separation under a pinhole camera: the
//! true interpupillary distance is known, so the pixel separation fixes the
//! distance to the camera. The eye midpoint is then back-projected at that
//! depth to get the lateral and vertical offsets.
//!
//! Coordinates are screen-centered meters: `x` grows toward the viewer's
//! right, `y` grows upward and `z` is the distance from the screen plane
//! toward the viewer. Landmarks are expected in raw (unmirrored) camera image
//! space, where stepping to your right moves your face toward the left edge of
//! the image; the estimator undoes that mirror so the reported `x` follows the
//! viewer's own sense of left and right.

use crate::{
    config::{CalibrationConfig, Config, LandmarkConfig},
    constants::{DEFAULT_INITIAL_DEPTH_M, EPSILON, IMAGE_CENTER},
    filters::{create_filter, PositionFilter},
    landmarks::{EyePair, FrameSize, LandmarkFrame},
    Result,
};
use log::debug;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Viewer eye position in screen-centered meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewerPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for ViewerPosition {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_INITIAL_DEPTH_M)
    }
}

impl ViewerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Position assumed before any face has been seen
    #[must_use]
    pub fn initial(calibration: &CalibrationConfig) -> Self {
        Self::new(0.0, 0.0, calibration.initial_depth_m)
    }

    #[must_use]
    pub fn to_point(self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Focal length in pixels for a frame of `width` pixels
fn focal_length_px(width: f64, calibration: &CalibrationConfig) -> f64 {
    let half_fov = calibration.camera_horizontal_fov_deg.to_radians() / 2.0;
    (width / 2.0) / half_fov.tan()
}

/// Estimate the viewer depth from the observed eye separation
///
/// `observed_ipd` is the normalized planar eye distance. For a validated
/// calibration the result always lies in `[min_depth_m, max_depth_m]`.
/// Coincident eyes give a vanishing separation, which is floored at
/// [`EPSILON`] pixels and therefore lands on the far bound. An inverted depth
/// range does not panic; the upper bound wins.
#[must_use]
pub fn estimate_depth(
    observed_ipd: f64,
    frame_width: u32,
    calibration: &CalibrationConfig,
) -> f64 {
    let width = f64::from(frame_width);
    let observed_px = observed_ipd * width;
    let observed_px = if observed_px.is_finite() { observed_px.max(EPSILON) } else { EPSILON };

    let focal = focal_length_px(width, calibration);
    let z = calibration.interpupillary_distance_m * focal / observed_px;
    if z.is_nan() {
        return calibration.max_depth_m;
    }
    z.max(calibration.min_depth_m).min(calibration.max_depth_m)
}

/// Unsmoothed viewer position for one pair of eye landmarks
#[must_use]
pub fn estimate_raw_position(
    eyes: &EyePair,
    frame: FrameSize,
    calibration: &CalibrationConfig,
) -> ViewerPosition {
    let z = estimate_depth(eyes.left.planar_distance(&eyes.right), frame.width, calibration);

    let mid = eyes.left.midpoint(&eyes.right);
    let focal = focal_length_px(f64::from(frame.width), calibration);
    let meters_per_px = z / focal;

    // Mirror the horizontal axis; image y grows downward.
    let offset_x_px = (IMAGE_CENTER - mid.x) * f64::from(frame.width);
    let offset_y_px = (IMAGE_CENTER - mid.y) * f64::from(frame.height);

    ViewerPosition::new(offset_x_px * meters_per_px, offset_y_px * meters_per_px, z)
}

/// Stateful estimator owning the smoothed viewer position
pub struct PositionEstimator {
    calibration: CalibrationConfig,
    topology: LandmarkConfig,
    filter: Box<dyn PositionFilter>,
    position: ViewerPosition,
}

impl PositionEstimator {
    /// Create an estimator at the configured initial position
    ///
    /// # Errors
    ///
    /// Returns an error if the calibration or landmark topology is invalid, or
    /// the configured filter cannot be built
    pub fn new(config: &Config) -> Result<Self> {
        config.calibration.validate()?;
        config.landmarks.validate()?;

        let position = ViewerPosition::initial(&config.calibration);
        let filter = create_filter(config, position)?;
        debug!("PositionEstimator using {}", filter.name());

        Ok(Self {
            calibration: config.calibration,
            topology: config.landmarks,
            filter,
            position,
        })
    }

    /// Fold one detection result into the smoothed position
    ///
    /// An absent or incomplete frame leaves the position untouched, which is
    /// how tracking loss is bridged.
    pub fn update(
        &mut self,
        frame: Option<&LandmarkFrame>,
        frame_size: FrameSize,
    ) -> ViewerPosition {
        self.observe(frame, frame_size).unwrap_or(self.position)
    }

    /// Like [`update`](Self::update), but `None` when the frame held no usable face
    pub fn observe(
        &mut self,
        frame: Option<&LandmarkFrame>,
        frame_size: FrameSize,
    ) -> Option<ViewerPosition> {
        let eyes = frame.and_then(|f| f.eyes(&self.topology))?;
        if frame_size.width == 0 {
            debug!("Ignoring detection on a zero-width frame");
            return None;
        }

        let raw = estimate_raw_position(&eyes, frame_size, &self.calibration);
        let smoothed = self.filter.apply(raw);
        if !smoothed.is_finite() {
            self.filter.reset(self.position);
            return None;
        }
        self.position = smoothed;

        debug!(
            "raw ({:.3}, {:.3}, {:.3}) -> smoothed ({:.3}, {:.3}, {:.3})",
            raw.x, raw.y, raw.z, smoothed.x, smoothed.y, smoothed.z
        );
        Some(smoothed)
    }

    /// Last smoothed position
    #[must_use]
    pub fn position(&self) -> ViewerPosition {
        self.position
    }

    #[must_use]
    pub fn calibration(&self) -> &CalibrationConfig {
        &self.calibration
    }

    /// Return to the initial position and clear filter history
    pub fn reset(&mut self) {
        self.position = ViewerPosition::initial(&self.calibration);
        self.filter.reset(self.position);
    }
}
