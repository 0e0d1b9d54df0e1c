/// Loop state of the [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Anything the scheduler can advance once per frame.
pub trait Simulation {
    /// Advance by `dt` seconds. Must finish every mutation before returning.
    fn update(&mut self, dt: f32);
}

/// Frame-driven game loop, independent of any platform "next frame"
/// primitive: the host calls [`Scheduler::tick`] with its wall clock.
///
/// Each running tick derives `dt = (now - last) / 1000` seconds, runs the
/// update phase to completion, then hands a shared borrow of the
/// simulation to the render phase. `dt` is not capped: a stalled host
/// produces one large step on resume.
#[derive(Debug)]
pub struct Scheduler {
    state: LoopState,
    /// Wall clock of the previous frame, in milliseconds.
    last_timestamp: f64,
    frames: u64,
    stats: FrameStats,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            last_timestamp: 0.0,
            frames: 0,
            stats: FrameStats::new(120),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frames processed since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Stopped → Running, capturing `now_ms` as the previous frame time.
    /// Returns false if already running.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = LoopState::Running;
        self.last_timestamp = now_ms;
        tracing::debug!(now_ms, "scheduler started");
        true
    }

    /// Running → Stopped. Ticks arriving afterwards are ignored; a frame
    /// already executing is not interrupted.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = LoopState::Stopped;
        tracing::debug!(frames = self.frames, "scheduler stopped");
        true
    }

    /// Run one frame at wall clock `now_ms`: update, then render.
    /// Returns the render output, or `None` when stopped.
    pub fn tick<S, R>(&mut self, now_ms: f64, sim: &mut S, render: impl FnOnce(&S) -> R) -> Option<R>
    where
        S: Simulation,
    {
        if !self.is_running() {
            return None;
        }
        let dt = ((now_ms - self.last_timestamp) / 1000.0) as f32;
        self.last_timestamp = now_ms;
        self.frames += 1;
        self.stats.record(dt);

        let _span = tracing::info_span!("frame", n = self.frames).entered();
        tracing::trace!(dt, "update");
        sim.update(dt);
        Some(render(&*sim))
    }
}

/// Rolling window of recent frame deltas, in seconds.
#[derive(Debug)]
pub struct FrameStats {
    history: Vec<f32>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameStats {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![0.0; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: f32) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn window(&self) -> &[f32] {
        let count = if self.filled { self.capacity } else { self.index };
        &self.history[..count]
    }

    pub fn count(&self) -> usize {
        self.window().len()
    }

    pub fn average(&self) -> f32 {
        let w = self.window();
        if w.is_empty() {
            return 0.0;
        }
        w.iter().sum::<f32>() / w.len() as f32
    }

    pub fn max(&self) -> f32 {
        self.window().iter().copied().fold(0.0, f32::max)
    }

    pub fn min(&self) -> f32 {
        self.window()
            .iter()
            .copied()
            .reduce(f32::min)
            .unwrap_or(0.0)
    }
}
