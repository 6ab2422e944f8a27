use std::time::Instant;

/// Wall-clock elapsed-seconds sampler. Every motion component owns one and
/// samples it independently; nothing in the engine shares a stopwatch.
///
/// `bank` credits synthetic elapsed time on top of the wall clock, which is
/// how deterministic tests and scripted fast-forwards drive time-dependent
/// state without sleeping.
pub struct Stopwatch {
    last: Instant,
    banked: f32,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            banked: 0.0,
        }
    }

    /// Seconds accumulated since the last `restart`.
    pub fn elapsed(&mut self) -> f32 {
        let now = Instant::now();
        self.banked += now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.banked
    }

    /// Returns the accumulated seconds and zeroes the accumulator.
    pub fn restart(&mut self) -> f32 {
        let elapsed = self.elapsed();
        self.banked = 0.0;
        elapsed
    }

    pub fn bank(&mut self, secs: f32) {
        self.banked += secs;
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-blocking timed window: gun recharge, the grounded auto-release
/// safeguard, the death pause, the lightning cycle. Replaces what would
/// otherwise be a blocking sleep inside the frame pipeline.
pub struct Cooldown {
    duration: f32,
    watch: Stopwatch,
}

impl Cooldown {
    pub fn new(duration: f32) -> Self {
        let duration = if duration < 0.0 {
            log::warn!("negative cooldown duration {duration} clamped to 0");
            0.0
        } else {
            duration
        };
        Self {
            duration,
            watch: Stopwatch::new(),
        }
    }

    /// True once the configured duration has accrued since the last `reset`.
    pub fn ready(&mut self) -> bool {
        self.watch.elapsed() >= self.duration
    }

    pub fn reset(&mut self) {
        self.watch.restart();
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn bank(&mut self, secs: f32) {
        self.watch.bank(secs);
    }
}
