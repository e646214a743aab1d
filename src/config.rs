//! Configuration management for the parallax window pipeline

use crate::constants::{
    DEFAULT_CAMERA_HFOV_DEG, DEFAULT_FAR_PLANE, DEFAULT_INITIAL_DEPTH_M,
    DEFAULT_INTERPUPILLARY_DISTANCE_M, DEFAULT_MAX_DEPTH_M, DEFAULT_MIN_DEPTH_M,
    DEFAULT_MOVING_AVERAGE_WINDOW, DEFAULT_NEAR_PLANE, DEFAULT_SCREEN_HEIGHT_M,
    DEFAULT_SCREEN_WIDTH_M, DEFAULT_SMOOTHING_FACTOR, FACE_MESH_LANDMARK_COUNT,
    LEFT_IRIS_CENTER_INDEX, RIGHT_IRIS_CENTER_INDEX,
};
use crate::filters::FILTER_NAMES;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Physical geometry and depth model
    pub calibration: CalibrationConfig,

    /// Position smoothing
    pub smoothing: SmoothingConfig,

    /// Landmark topology consumed from the detector
    pub landmarks: LandmarkConfig,
}

/// Calibration constants shared by the estimator and the projector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Known eye separation used as the depth reference
    pub interpupillary_distance_m: f64,

    /// Width of the display surface acting as the window
    pub screen_width_m: f64,

    /// Height of the display surface acting as the window
    pub screen_height_m: f64,

    /// Weight of the previous smoothed value, in [0, 1)
    pub smoothing_factor: f64,

    /// Near clipping distance
    pub near_plane: f64,

    /// Far clipping distance
    pub far_plane: f64,

    /// Lower clamp for the estimated depth
    pub min_depth_m: f64,

    /// Upper clamp for the estimated depth
    pub max_depth_m: f64,

    /// Depth of the viewer before any detection
    pub initial_depth_m: f64,

    /// Horizontal field of view of the capture camera
    pub camera_horizontal_fov_deg: f64,
}

/// Smoothing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter applied to raw positions
    pub filter: String,

    /// Moving average window size
    pub moving_average_window: usize,
}

/// Positions of the consumed landmarks within the detector output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Index of the left eye center
    pub left_eye_index: usize,

    /// Index of the right eye center
    pub right_eye_index: usize,

    /// Frames with fewer points are treated as absent
    pub min_landmarks: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            interpupillary_distance_m: DEFAULT_INTERPUPILLARY_DISTANCE_M,
            screen_width_m: DEFAULT_SCREEN_WIDTH_M,
            screen_height_m: DEFAULT_SCREEN_HEIGHT_M,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            near_plane: DEFAULT_NEAR_PLANE,
            far_plane: DEFAULT_FAR_PLANE,
            min_depth_m: DEFAULT_MIN_DEPTH_M,
            max_depth_m: DEFAULT_MAX_DEPTH_M,
            initial_depth_m: DEFAULT_INITIAL_DEPTH_M,
            camera_horizontal_fov_deg: DEFAULT_CAMERA_HFOV_DEG,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "exponential".to_string(),
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
        }
    }
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            left_eye_index: LEFT_IRIS_CENTER_INDEX,
            right_eye_index: RIGHT_IRIS_CENTER_INDEX,
            min_landmarks: FACE_MESH_LANDMARK_COUNT,
        }
    }
}

impl CalibrationConfig {
    /// Width over height of the physical screen
    #[must_use]
    pub fn screen_aspect(&self) -> f64 {
        self.screen_width_m / self.screen_height_m
    }

    /// Validate the calibration invariants
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` naming the first violated invariant
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("interpupillary_distance_m", self.interpupillary_distance_m),
            ("screen_width_m", self.screen_width_m),
            ("screen_height_m", self.screen_height_m),
            ("near_plane", self.near_plane),
            ("far_plane", self.far_plane),
            ("min_depth_m", self.min_depth_m),
            ("max_depth_m", self.max_depth_m),
            ("initial_depth_m", self.initial_depth_m),
            ("camera_horizontal_fov_deg", self.camera_horizontal_fov_deg),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::ConfigError(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        if self.near_plane >= self.far_plane {
            return Err(Error::ConfigError(format!(
                "near_plane ({}) must be less than far_plane ({})",
                self.near_plane, self.far_plane
            )));
        }
        if !(0.0..1.0).contains(&self.smoothing_factor) {
            return Err(Error::ConfigError(format!(
                "smoothing_factor must be in [0, 1), got {}",
                self.smoothing_factor
            )));
        }
        if self.min_depth_m > self.max_depth_m {
            return Err(Error::ConfigError(format!(
                "min_depth_m ({}) must not exceed max_depth_m ({})",
                self.min_depth_m, self.max_depth_m
            )));
        }
        if self.max_depth_m >= self.far_plane {
            return Err(Error::ConfigError(format!(
                "max_depth_m ({}) must be less than far_plane ({})",
                self.max_depth_m, self.far_plane
            )));
        }
        if !(self.min_depth_m..=self.max_depth_m).contains(&self.initial_depth_m) {
            return Err(Error::ConfigError(format!(
                "initial_depth_m ({}) must lie within [{}, {}]",
                self.initial_depth_m, self.min_depth_m, self.max_depth_m
            )));
        }
        if self.camera_horizontal_fov_deg >= 180.0 {
            return Err(Error::ConfigError(
                "camera_horizontal_fov_deg must be below 180".to_string(),
            ));
        }

        Ok(())
    }
}

impl LandmarkConfig {
    /// Validate that the eye indices fit the declared topology
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if an index is out of range or both indices coincide
    pub fn validate(&self) -> Result<()> {
        if self.left_eye_index == self.right_eye_index {
            return Err(Error::ConfigError(
                "left_eye_index and right_eye_index must differ".to_string(),
            ));
        }
        let highest = self.left_eye_index.max(self.right_eye_index);
        if highest >= self.min_landmarks {
            return Err(Error::ConfigError(format!(
                "eye index {highest} is outside a {}-point landmark frame",
                self.min_landmarks
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        self.calibration.validate()?;
        self.landmarks.validate()?;

        if self.smoothing.moving_average_window == 0 {
            return Err(Error::ConfigError(
                "Moving average window size must be greater than 0".to_string(),
            ));
        }
        let filter = self.smoothing.filter.to_lowercase();
        if !FILTER_NAMES.contains(&filter.as_str()) {
            return Err(Error::ConfigError(format!(
                "Unknown filter '{}', expected one of {FILTER_NAMES:?}",
                self.smoothing.filter
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Parallax Window Configuration

# Physical geometry (meters) and depth model
calibration:
  interpupillary_distance_m: 0.063
  screen_width_m: 0.28
  screen_height_m: 0.16
  # Weight of the previous position; higher is smoother but laggier
  smoothing_factor: 0.7
  near_plane: 0.01
  far_plane: 10.0
  min_depth_m: 0.2
  max_depth_m: 2.0
  initial_depth_m: 0.5
  camera_horizontal_fov_deg: 60.0

# Position smoothing (exponential, moving_average, none)
smoothing:
  filter: "exponential"
  moving_average_window: 5

# Face-mesh topology with iris refinement
landmarks:
  left_eye_index: 468
  right_eye_index: 473
  min_landmarks: 478
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!((config.calibration.screen_aspect() - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed.calibration, CalibrationConfig::default());
        assert_eq!(parsed.landmarks, LandmarkConfig::default());
        assert_eq!(parsed.smoothing.filter, "exponential");
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let parsed = Config::from_yaml("calibration:\n  screen_width_m: 0.5\n").unwrap();
        assert_eq!(parsed.calibration.screen_width_m, 0.5);
        assert_eq!(parsed.calibration.screen_height_m, DEFAULT_SCREEN_HEIGHT_M);
        assert_eq!(parsed.smoothing.moving_average_window, DEFAULT_MOVING_AVERAGE_WINDOW);
    }

    #[test]
    fn test_smoothing_factor_must_stay_below_one() {
        let mut config = Config::default();
        config.calibration.smoothing_factor = 1.0;
        assert!(config.validate().is_err());

        config.calibration.smoothing_factor = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_planes_and_depth_range() {
        let mut calibration = CalibrationConfig::default();
        calibration.near_plane = 20.0;
        assert!(calibration.validate().is_err());

        let mut calibration = CalibrationConfig::default();
        calibration.min_depth_m = 3.0;
        assert!(calibration.validate().is_err());

        let mut calibration = CalibrationConfig::default();
        calibration.screen_width_m = f64::NAN;
        assert!(calibration.validate().is_err());
    }

    #[test]
    fn test_far_plane_must_lie_beyond_max_depth() {
        let mut calibration = CalibrationConfig::default();
        calibration.far_plane = calibration.max_depth_m;
        assert!(matches!(calibration.validate(), Err(Error::ConfigError(_))));

        calibration.far_plane = calibration.max_depth_m + 0.5;
        assert!(calibration.validate().is_ok());
    }

    #[test]
    fn test_landmark_indices_validated() {
        let mut landmarks = LandmarkConfig::default();
        landmarks.right_eye_index = landmarks.left_eye_index;
        assert!(landmarks.validate().is_err());

        let mut landmarks = LandmarkConfig::default();
        landmarks.min_landmarks = 468;
        assert!(landmarks.validate().is_err());
    }

    #[test]
    fn test_unknown_filter_rejected() {
        let mut config = Config::default();
        config.smoothing.filter = "kalman".to_string();
        assert!(config.validate().is_err());
    }
}
