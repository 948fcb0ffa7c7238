//! Runtime counters for the emotion simulation.
//!
//! Lock-free `AtomicU64` counters incremented on the hot path and read via
//! [`SentioCounters::snapshot`] for dashboards and tests. Counting is the
//! observability floor the simulation always carries; anything fancier
//! (spans, histograms, exporters) belongs to the embedding application.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for high-frequency simulation events.
#[derive(Debug, Default)]
pub struct SentioCounters {
    /// Stimuli committed to some entity's state.
    pub stimuli_applied: AtomicU64,
    /// Stimuli vetoed by a shield filter.
    pub stimuli_filtered: AtomicU64,
    /// Stimuli dropped by an active emotion lock.
    pub stimuli_lock_dropped: AtomicU64,
    /// Stimuli referencing a missing or destroyed target.
    pub stimuli_invalid_target: AtomicU64,
    /// Completed influence passes.
    pub influence_passes: AtomicU64,
    /// Stimuli generated by influence passes.
    pub influence_stimuli: AtomicU64,
    /// Accepted skill activations.
    pub skill_activations: AtomicU64,
    /// Refused skill activations.
    pub skill_unavailable: AtomicU64,
    /// Casts whose effect landed.
    pub casts_completed: AtomicU64,
    /// Completed whole-population decay passes.
    pub decay_passes: AtomicU64,
}

impl SentioCounters {
    /// Create a zeroed counter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stimuli_applied: AtomicU64::new(0),
            stimuli_filtered: AtomicU64::new(0),
            stimuli_lock_dropped: AtomicU64::new(0),
            stimuli_invalid_target: AtomicU64::new(0),
            influence_passes: AtomicU64::new(0),
            influence_stimuli: AtomicU64::new(0),
            skill_activations: AtomicU64::new(0),
            skill_unavailable: AtomicU64::new(0),
            casts_completed: AtomicU64::new(0),
            decay_passes: AtomicU64::new(0),
        }
    }

    /// Snapshot all counters for export.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            stimuli_applied: self.stimuli_applied.load(Ordering::Relaxed),
            stimuli_filtered: self.stimuli_filtered.load(Ordering::Relaxed),
            stimuli_lock_dropped: self.stimuli_lock_dropped.load(Ordering::Relaxed),
            stimuli_invalid_target: self.stimuli_invalid_target.load(Ordering::Relaxed),
            influence_passes: self.influence_passes.load(Ordering::Relaxed),
            influence_stimuli: self.influence_stimuli.load(Ordering::Relaxed),
            skill_activations: self.skill_activations.load(Ordering::Relaxed),
            skill_unavailable: self.skill_unavailable.load(Ordering::Relaxed),
            casts_completed: self.casts_completed.load(Ordering::Relaxed),
            decay_passes: self.decay_passes.load(Ordering::Relaxed),
        }
    }

    /// Bump a counter by one.
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// A point-in-time copy of all counter values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Stimuli committed to some entity's state.
    pub stimuli_applied: u64,
    /// Stimuli vetoed by a shield filter.
    pub stimuli_filtered: u64,
    /// Stimuli dropped by an active emotion lock.
    pub stimuli_lock_dropped: u64,
    /// Stimuli referencing a missing or destroyed target.
    pub stimuli_invalid_target: u64,
    /// Completed influence passes.
    pub influence_passes: u64,
    /// Stimuli generated by influence passes.
    pub influence_stimuli: u64,
    /// Accepted skill activations.
    pub skill_activations: u64,
    /// Refused skill activations.
    pub skill_unavailable: u64,
    /// Casts whose effect landed.
    pub casts_completed: u64,
    /// Completed whole-population decay passes.
    pub decay_passes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let counters = SentioCounters::new();
        assert_eq!(counters.snapshot(), CounterSnapshot::default());
    }

    #[test]
    fn bump_shows_up_in_snapshot() {
        let counters = SentioCounters::new();
        SentioCounters::bump(&counters.stimuli_applied);
        SentioCounters::bump(&counters.stimuli_applied);
        SentioCounters::bump(&counters.influence_passes);

        let snap = counters.snapshot();
        assert_eq!(snap.stimuli_applied, 2);
        assert_eq!(snap.influence_passes, 1);
        assert_eq!(snap.stimuli_filtered, 0);
    }
}
