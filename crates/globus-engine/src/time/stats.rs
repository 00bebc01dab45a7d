use super::FrameTime;

/// Rolling frame-rate summary.
///
/// Accumulates frame deltas and yields an average FPS every `window` frames.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: u32,
    frames: u32,
    elapsed: f32,
}

impl FrameStats {
    pub fn new(window: u32) -> Self {
        Self { window: window.max(1), frames: 0, elapsed: 0.0 }
    }

    /// Records a frame. Returns the average FPS when a window completes.
    pub fn record(&mut self, time: &FrameTime) -> Option<f32> {
        self.frames += 1;
        self.elapsed += time.dt;

        if self.frames < self.window {
            return None;
        }

        let fps = if self.elapsed > 0.0 { self.frames as f32 / self.elapsed } else { 0.0 };
        self.frames = 0;
        self.elapsed = 0.0;
        Some(fps)
    }
}
