//! Simulated clock.
//!
//! A monotonic tick counter owned by a single engine instance. Earlier
//! designs kept the clock in process-wide state reset between runs, which
//! corrupts traces when two runs overlap; owning it per engine makes each
//! run self-contained.

/// A deterministic tick counter. The engine is the only component that
/// advances or resets it; everything else reads `current`.
#[derive(Debug, Default, Clone)]
pub struct SimClock {
    tick: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self { tick: 0 }
    }

    /// Returns the committed tick. No component may observe a later tick
    /// than this one.
    #[inline]
    pub fn current(&self) -> u64 {
        self.tick
    }

    /// Advances to the next tick and returns the tick that just ended.
    #[inline]
    pub fn advance(&mut self) -> u64 {
        let ended = self.tick;
        self.tick += 1;
        ended
    }

    pub fn reset(&mut self) {
        self.tick = 0;
    }
}
