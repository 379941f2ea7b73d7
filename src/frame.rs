use std::time::Instant;

/// Seconds between FPS recomputations
pub const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the clock started; drives the animation
    pub time: f64,
    pub delta: f32,
}

/// Infinite iterator that yields frame information
/// Use this in a loop: `for frame in frames { ... }`
#[derive(Debug, Clone)]
pub struct FrameIterator {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameIterator {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            frame_number: 0,
            start_time: start,
            last_frame_time: start,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Advance the clock to `now`; an instant earlier than the last frame counts as no time passing
    pub fn tick_at(&mut self, now: Instant) -> FrameInfo {
        let delta = now.saturating_duration_since(self.last_frame_time);
        let time = now.saturating_duration_since(self.start_time);

        let info = FrameInfo {
            number: self.frame_number,
            time: time.as_secs_f64(),
            delta: delta.as_secs_f32(),
        };

        self.frame_number += 1;
        self.last_frame_time = self.last_frame_time.max(now);
        info
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        Some(self.tick_at(Instant::now()))
    }
}

/// Frames-per-second average over `FPS_UPDATE_INTERVAL` windows
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frame_count: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    /// Record one frame; returns the new average when a window closes
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frame_count += 1;
        self.elapsed += delta;

        if self.elapsed < FPS_UPDATE_INTERVAL {
            return None;
        }
        self.fps = self.frame_count as f32 / self.elapsed;
        self.frame_count = 0;
        self.elapsed = 0.0;
        Some(self.fps)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
