use std::time::Instant;

use parking_lot::Mutex;

/// Wall clock behind the `time` uniform.
///
/// Lives outside the model so reducers stay deterministic; effects read it.
#[derive(Debug)]
pub struct ShaderClock {
    started: Mutex<Instant>,
}

impl ShaderClock {
    pub fn new() -> Self {
        Self {
            started: Mutex::new(Instant::now()),
        }
    }

    pub fn restart(&self) {
        *self.started.lock() = Instant::now();
    }

    /// Seconds since the last restart.
    pub fn elapsed(&self) -> f32 {
        self.started.lock().elapsed().as_secs_f32()
    }
}

impl Default for ShaderClock {
    fn default() -> Self {
        Self::new()
    }
}
