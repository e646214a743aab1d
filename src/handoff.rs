//! Single-writer, single-reader handoff of the viewer position.
//!
//! When detection runs on a worker thread and rendering on another, the
//! worker publishes each smoothed position here and the render loop reads the
//! latest one. A short critical section guards the pair; a poisoned lock still
//! yields the last value written since a `ViewerPosition` is always whole.

use crate::position_estimator::ViewerPosition;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy)]
struct Slot {
    position: ViewerPosition,
    version: u64,
}

/// Writing half, owned by the detection side
#[derive(Debug)]
pub struct PositionWriter {
    slot: Arc<Mutex<Slot>>,
}

/// Reading half, owned by the render side
#[derive(Debug)]
pub struct PositionReader {
    slot: Arc<Mutex<Slot>>,
    seen: u64,
}

/// Create a connected writer/reader pair holding `initial`
#[must_use]
pub fn position_handoff(initial: ViewerPosition) -> (PositionWriter, PositionReader) {
    let slot = Arc::new(Mutex::new(Slot {
        position: initial,
        version: 0,
    }));
    (
        PositionWriter { slot: Arc::clone(&slot) },
        PositionReader { slot, seen: 0 },
    )
}

impl PositionWriter {
    /// Replace the shared position
    pub fn publish(&self, position: ViewerPosition) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.position = position;
        slot.version += 1;
    }
}

impl PositionReader {
    /// Latest published position
    #[must_use]
    pub fn latest(&self) -> ViewerPosition {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).position
    }

    /// Latest position if it was published since the previous call
    pub fn take_update(&mut self) -> Option<ViewerPosition> {
        let slot = *self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.version == self.seen {
            return None;
        }
        self.seen = slot.version;
        Some(slot.position)
    }
}
