use std::{
    fmt,
    time::{Duration, Instant},
};

/// End-to-end frame rate of a run: preprocessing, inference,
/// postprocessing and rendering all count.
#[derive(Debug)]
pub struct ThroughputMeter {
    started: Instant,
    frames: u64,
}

impl ThroughputMeter {
    /// Call before the first submission.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            frames: 0,
        }
    }

    /// Call once per rendered frame.
    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Call after the last render.
    pub fn finish(self) -> ThroughputReport {
        ThroughputReport {
            frames: self.frames,
            elapsed: self.started.elapsed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputReport {
    pub frames: u64,
    pub elapsed: Duration,
}

impl ThroughputReport {
    /// Frames per second, `None` when nothing was rendered or no time passed.
    pub fn fps(&self) -> Option<f64> {
        if self.frames == 0 || self.elapsed.is_zero() {
            return None;
        }
        Some(self.frames as f64 / self.elapsed.as_secs_f64())
    }
}

impl fmt::Display for ThroughputReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs_f64();
        match self.fps() {
            Some(fps) => write!(f, "{} frames in {secs:.2}s ({fps:.2} fps)", self.frames),
            None => write!(f, "{} frames in {secs:.2}s (fps undefined)", self.frames),
        }
    }
}
