//! Simulation scheduler for the live activity feed.
//!
//! The `SimulationScheduler` is a two-state machine (`Running`, `Paused`)
//! owning at most one pending fire. While running, each fire is followed by
//! exactly one re-arm at `fire_time + delay`, with the delay drawn uniformly
//! from `[min_delay, max_delay)`. Pausing cancels the pending fire; resuming
//! arms a new one relative to the resume time.
//!
//! Time is a virtual millisecond clock supplied by the caller, so the same
//! scheduler runs under a real-time driver or a headless replay.

use contracts::SimulationMode;

use crate::rng::RandomSource;

// ---------------------------------------------------------------------------
// Timer handles
// ---------------------------------------------------------------------------

/// Identity of one armed fire. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A pending or due fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledFire {
    pub handle: TimerHandle,
    pub due_at_ms: u64,
}

// ---------------------------------------------------------------------------
// SimulationScheduler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimulationScheduler {
    mode: SimulationMode,
    pending: Option<ScheduledFire>,
    next_handle: u64,
    min_delay_ms: u64,
    max_delay_ms: u64,
    fired: u64,
}

impl SimulationScheduler {
    /// A scheduler in `Running` with nothing armed yet; call `start` to arm.
    /// The minimum delay is at least 1 ms so a fire never re-arms at its own instant.
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        let min_delay_ms = min_delay_ms.max(1);
        Self {
            mode: SimulationMode::Running,
            pending: None,
            next_handle: 0,
            min_delay_ms,
            max_delay_ms: max_delay_ms.max(min_delay_ms),
            fired: 0,
        }
    }

    /// Arms the first fire if running and nothing is armed.
    pub fn start(&mut self, now_ms: u64, rng: &mut impl RandomSource) -> Option<ScheduledFire> {
        if self.mode != SimulationMode::Running || self.pending.is_some() {
            return None;
        }
        Some(self.arm(now_ms, rng))
    }

    /// Cancels the pending fire. Pausing twice cancels nothing the second time.
    pub fn pause(&mut self) -> Option<TimerHandle> {
        self.mode = SimulationMode::Paused;
        self.pending.take().map(|fire| fire.handle)
    }

    /// Switches to `Running` and arms a fire relative to `now_ms`.
    pub fn resume(&mut self, now_ms: u64, rng: &mut impl RandomSource) -> Option<ScheduledFire> {
        self.mode = SimulationMode::Running;
        self.start(now_ms, rng)
    }

    pub fn toggle(&mut self, now_ms: u64, rng: &mut impl RandomSource) -> SimulationMode {
        match self.mode {
            SimulationMode::Running => {
                self.pause();
            }
            SimulationMode::Paused => {
                self.resume(now_ms, rng);
            }
        }
        self.mode
    }

    /// Takes the pending fire if it is due at or before `now_ms`.
    /// The caller runs the fire, then calls `complete` to re-arm.
    pub fn take_due(&mut self, now_ms: u64) -> Option<ScheduledFire> {
        match self.pending {
            Some(fire) if fire.due_at_ms <= now_ms => {
                self.pending = None;
                Some(fire)
            }
            _ => None,
        }
    }

    /// Records a finished fire and arms the next one if still running.
    pub fn complete(
        &mut self,
        fire: ScheduledFire,
        rng: &mut impl RandomSource,
    ) -> Option<ScheduledFire> {
        self.fired = self.fired.saturating_add(1);
        self.start(fire.due_at_ms, rng)
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode == SimulationMode::Running
    }

    pub fn pending(&self) -> Option<ScheduledFire> {
        self.pending
    }

    pub fn next_fire_at(&self) -> Option<u64> {
        self.pending.map(|fire| fire.due_at_ms)
    }

    /// Number of fires completed over the scheduler's lifetime.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    fn arm(&mut self, now_ms: u64, rng: &mut impl RandomSource) -> ScheduledFire {
        let delay = self.min_delay_ms + rng.floor_scaled(self.max_delay_ms - self.min_delay_ms);
        self.next_handle = self.next_handle.saturating_add(1);
        let fire = ScheduledFire {
            handle: TimerHandle(self.next_handle),
            due_at_ms: now_ms.saturating_add(delay),
        };
        self.pending = Some(fire);
        fire
    }
}
