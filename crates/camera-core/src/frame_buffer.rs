use crate::Frame;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Holder of the single most recent frame for one camera.
///
/// One capture worker writes, any number of request handlers read. The
/// frame and its timestamp live under one lock so a reader never sees a
/// new frame paired with an old timestamp. The critical section is only
/// the assignment or clone, never I/O.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    slot: Mutex<Option<(Frame, Instant)>>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current frame and its capture timestamp.
    pub fn publish(&self, frame: Frame) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some((frame, Instant::now()));
        }
    }

    /// Return an independent copy of the most recent frame, if any.
    pub fn read(&self) -> Option<Frame> {
        self.slot
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|(frame, _)| frame.clone()))
    }

    /// Time since the last publish, or `None` if no frame was ever published.
    pub fn age(&self) -> Option<Duration> {
        self.slot
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|(_, ts)| ts.elapsed()))
    }
}
