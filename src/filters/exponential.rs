use super::PositionFilter;
use crate::position_estimator::ViewerPosition;

/// Exponential smoothing filter
///
/// Each axis follows `smoothed = smoothed * factor + raw * (1 - factor)`.
pub struct ExponentialFilter {
    smoothing_factor: f64,
    smoothed: ViewerPosition,
}

impl ExponentialFilter {
    /// Create a new exponential filter starting at `initial`
    ///
    /// # Panics
    ///
    /// Panics if `smoothing_factor` is not in the range [0, 1)
    #[must_use]
    pub fn new(smoothing_factor: f64, initial: ViewerPosition) -> Self {
        assert!(
            (0.0..1.0).contains(&smoothing_factor),
            "Smoothing factor must be in [0, 1)"
        );
        Self {
            smoothing_factor,
            smoothed: initial,
        }
    }

    fn blend(&self, previous: f64, raw: f64) -> f64 {
        self.smoothing_factor.mul_add(previous - raw, raw)
    }
}

impl PositionFilter for ExponentialFilter {
    fn apply(&mut self, raw: ViewerPosition) -> ViewerPosition {
        let previous = self.smoothed;
        self.smoothed = ViewerPosition {
            x: self.blend(previous.x, raw.x),
            y: self.blend(previous.y, raw.y),
            z: self.blend(previous.z, raw.z),
        };
        self.smoothed
    }

    fn reset(&mut self, position: ViewerPosition) {
        self.smoothed = position;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}
