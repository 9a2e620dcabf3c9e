/// Default cap on fixed steps per frame.
pub const DEFAULT_MAX_STEPS: u32 = 10;

/// Fixed timestep accumulator.
/// Turns variable frame times into a whole number of equal physics steps,
/// so every `Physics::update` sees the same `dt`.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    ///
    /// Time beyond `max_steps` worth is dropped, so a long stall (debugger,
    /// backgrounded tab) resumes with a bounded catch-up instead of one
    /// huge step.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        let budget = self.dt * self.max_steps as f32;
        self.accumulator = (self.accumulator + frame_dt).min(budget);
        let whole = (self.accumulator / self.dt).floor();
        self.accumulator -= whole * self.dt;
        whole as u32
    }

    /// Fraction of a step left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Drop any partial step.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
