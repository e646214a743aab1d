//! Temporal smoothing for viewer positions.
//!
//! The detector output jitters from frame to frame; these filters trade a
//! little lag for a stable eye point. Every filter is seeded with the initial
//! viewer position so the first detection blends in from there.

/// Exponential filter, the default first-order low-pass smoother
pub mod exponential;

/// Moving average filter for simple windowed smoothing
pub mod moving_average;

use crate::config::Config;
use crate::position_estimator::ViewerPosition;
use crate::Result;

/// Names accepted by [`create_filter`]
pub const FILTER_NAMES: [&str; 3] = ["exponential", "moving_average", "none"];

/// Trait for all position filters
pub trait PositionFilter: Send + Sync {
    /// Feed a raw position and return the smoothed one
    fn apply(&mut self, raw: ViewerPosition) -> ViewerPosition;

    /// Discard history and restart from `position`
    fn reset(&mut self, position: ViewerPosition);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl PositionFilter for NoFilter {
    fn apply(&mut self, raw: ViewerPosition) -> ViewerPosition {
        raw
    }

    fn reset(&mut self, _position: ViewerPosition) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create the filter selected in `config.smoothing`, seeded with `initial`
///
/// # Errors
///
/// Returns `Error::FilterError` for an unknown filter name or parameters the
/// filter cannot accept
pub fn create_filter(config: &Config, initial: ViewerPosition) -> Result<Box<dyn PositionFilter>> {
    match config.smoothing.filter.to_lowercase().as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "exponential" => {
            let factor = config.calibration.smoothing_factor;
            if !(0.0..1.0).contains(&factor) {
                return Err(crate::Error::FilterError(format!(
                    "Smoothing factor must be in [0, 1), got {factor}"
                )));
            }
            Ok(Box::new(exponential::ExponentialFilter::new(factor, initial)))
        }
        "moving_average" | "movingaverage" => {
            let window = config.smoothing.moving_average_window;
            if window == 0 {
                return Err(crate::Error::FilterError(
                    "Window size must be greater than 0".to_string(),
                ));
            }
            Ok(Box::new(moving_average::MovingAverageFilter::new(window, initial)))
        }
        other => Err(crate::Error::FilterError(format!("Unknown filter type: {other}"))),
    }
}
