use std::time::Instant;

/// Rolling frames-per-second meter.
///
/// Call [`update`](Self::update) once per frame; roughly once a second it
/// returns a fresh average for display.
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    pub current_fps: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            current_fps: 0.0,
        }
    }

    pub fn update(&mut self) -> Option<f32> {
        self.frames += 1;
        let elapsed = self.window_start.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            self.current_fps = self.frames as f32 / elapsed;
            self.window_start = Instant::now();
            self.frames = 0;
            return Some(self.current_fps);
        }
        None
    }
}
