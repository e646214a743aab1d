use std::collections::VecDeque;

use super::PositionFilter;
use crate::position_estimator::ViewerPosition;

/// Moving average filter
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<ViewerPosition>,
}

impl MovingAverageFilter {
    /// Create a new moving average filter whose window starts with `initial`
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero
    #[must_use]
    pub fn new(window_size: usize, initial: ViewerPosition) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        let mut buffer = VecDeque::with_capacity(window_size);
        buffer.push_back(initial);
        Self { window_size, buffer }
    }
}

impl PositionFilter for MovingAverageFilter {
    #[allow(clippy::cast_precision_loss)] // Window sizes are small
    fn apply(&mut self, raw: ViewerPosition) -> ViewerPosition {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(raw);

        let n = self.buffer.len() as f64;
        let sum = self
            .buffer
            .iter()
            .fold(ViewerPosition::new(0.0, 0.0, 0.0), |acc, p| {
                ViewerPosition::new(acc.x + p.x, acc.y + p.y, acc.z + p.z)
            });

        ViewerPosition::new(sum.x / n, sum.y / n, sum.z / n)
    }

    fn reset(&mut self, position: ViewerPosition) {
        self.buffer.clear();
        self.buffer.push_back(position);
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}
