use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::scheduler::{FrameHandle, FrameHost};

/// Terminal stand-in for a display's animation frames: at most one pending
/// frame, delivered no sooner than `frame_interval` after the previous one.
pub struct FrameClock {
    frame_interval: Duration,
    epoch: Instant,
    last_frame: Instant,
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl FrameClock {
    pub fn new(frame_interval: Duration) -> Self {
        let now = Instant::now();
        FrameClock { frame_interval, epoch: now, last_frame: now, next_id: 0, pending: None }
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Sleeps until the pending frame is due and returns its timestamp in
    /// milliseconds since the clock was created. None if nothing is pending.
    pub fn wait_for_frame(&mut self) -> Option<f64> {
        self.pending.take()?;

        let due = self.last_frame + self.frame_interval;
        let now = Instant::now();
        if due > now {
            sleep(due - now);
        }

        self.last_frame = Instant::now();
        Some(self.last_frame.duration_since(self.epoch).as_secs_f64() * 1000.0)
    }
}

impl FrameHost for FrameClock {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
