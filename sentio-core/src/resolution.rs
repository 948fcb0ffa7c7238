//! Stimulus resolution — the single write path into emotional state.
//!
//! Every change to an entity's emotion flows through [`resolve`]: filters
//! first, then the blend policy, then the lock policy, then the commit with
//! its memory record. Nothing else in the crate mutates an
//! [`EmotionalState`](crate::state::EmotionalState) mid-simulation, which
//! is what makes per-entity ownership auditable.
//!
//! The blend policy (same set adds, overlapping sets merge with a recency
//! bias, disjoint sets replace outright) deliberately avoids smearing
//! unrelated emotions into each other: a sharp mood swing should read as a
//! swing, not as mud.

use serde::{Deserialize, Serialize};

use crate::config::SentioConfig;
use crate::emotion::Emotion;
use crate::filter::FilterDecision;
use crate::memory::MemoryRecord;
use crate::registry::EntityRecord;
use crate::stimulus::Stimulus;
use crate::types::{EntityId, SimTimestamp};

// ---------------------------------------------------------------------------
// Results & notifications
// ---------------------------------------------------------------------------

/// Why a stimulus was dropped without touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// A shield filter on the target vetoed delivery.
    Filtered,
    /// A forced-emotion lock was active and the stimulus was too weak to
    /// override it.
    LockHonored,
}

/// Outcome of resolving one stimulus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateChange {
    /// The stimulus was committed.
    Applied {
        /// Emotion before the stimulus.
        previous: Emotion,
        /// Emotion after the stimulus.
        emotion: Emotion,
        /// Intensity after the stimulus, clamped to [0, 1].
        intensity: f32,
    },
    /// The stimulus was dropped by policy; no state change, no memory
    /// record.
    Blocked(BlockReason),
    /// The stimulus referenced a missing or destroyed entity.
    InvalidTarget,
}

/// Notification fanned out to subscribers after each committed change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionChange {
    /// The entity whose state changed.
    pub entity: EntityId,
    /// The new (possibly composite) emotion.
    pub emotion: Emotion,
    /// The new intensity.
    pub intensity: f32,
    /// The emotion before the change.
    pub previous: Emotion,
    /// Tick at which the change was committed.
    pub tick: u64,
}

/// A listen-only subscriber to emotion changes. Presentation layers (aura
/// shaders, adaptive music) implement this; they receive notifications and
/// cannot reach back into the simulation.
pub trait EmotionListener {
    /// Called synchronously after each committed change, in subscriber
    /// registration order.
    fn on_change(&mut self, change: &EmotionChange);
}

/// Handle returned on subscription, used for explicit removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered list of registered emotion-change subscribers.
///
/// Invocation order is registration order and removal is explicit, so a
/// subscriber must unsubscribe before its owner is released.
#[derive(Default)]
pub struct NotificationHub {
    listeners: Vec<(ListenerId, Box<dyn EmotionListener>)>,
    next_id: u64,
}

impl NotificationHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener at the end of the invocation order.
    pub fn subscribe(&mut self, listener: Box<dyn EmotionListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener by handle, returning it to its owner.
    pub fn unsubscribe(&mut self, id: ListenerId) -> Option<Box<dyn EmotionListener>> {
        let index = self.listeners.iter().position(|(lid, _)| *lid == id)?;
        Some(self.listeners.remove(index).1)
    }

    /// Fan a change out to all listeners in registration order.
    pub fn emit(&mut self, change: &EmotionChange) {
        for (_, listener) in &mut self.listeners {
            listener.on_change(change);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Combine the current emotion with an incoming one.
///
/// Equal sets stack: intensities add, clamped. Overlapping sets merge: the
/// flags union and the intensity blends with a recency bias toward the
/// incoming stimulus. Disjoint sets (and anything landing on a neutral
/// state) replace: the new emotion takes over at its own intensity, so
/// transitions stay crisp.
fn combine(
    current: Emotion,
    current_intensity: f32,
    incoming: Emotion,
    incoming_intensity: f32,
    recency_weight: f32,
) -> (Emotion, f32) {
    if current == incoming && !current.is_neutral() {
        (current, (current_intensity + incoming_intensity).clamp(0.0, 1.0))
    } else if current.intersects(incoming) {
        let blended =
            recency_weight * incoming_intensity + (1.0 - recency_weight) * current_intensity;
        (current | incoming, blended.clamp(0.0, 1.0))
    } else {
        (incoming, incoming_intensity.clamp(0.0, 1.0))
    }
}

/// Resolve one stimulus against its target's record.
///
/// Runs the filter chain, computes the proposed intensity (profile
/// volatility and memory habituation applied, then clamped), honors any
/// active lock, and on success commits the change and appends the memory
/// record. The caller is responsible for fanning out the returned change.
pub fn resolve(
    record: &mut EntityRecord,
    stimulus: &Stimulus,
    now: SimTimestamp,
    config: &SentioConfig,
) -> StateChange {
    // 1. Shield filters veto silently: no state change, no memory record.
    if record.filters.apply(stimulus) == FilterDecision::Block {
        return StateChange::Blocked(BlockReason::Filtered);
    }

    // 2. Proposed intensity: base x caller multiplier x personality x
    //    habituation, clamped after application.
    let volatility_factor = 0.5 + record.profile.volatility;
    let habituation =
        record
            .memory
            .habituation_factor(stimulus.effect.emotion, now.tick, &config.memory);
    let proposed = (stimulus.effect.base_intensity
        * stimulus.intensity_multiplier
        * volatility_factor
        * habituation)
        .clamp(0.0, 1.0);

    // 3. Lock policy: while a forced emotion holds, only a clearly stronger
    //    stimulus may override it.
    if record.state.is_locked(now.tick)
        && proposed <= record.state.intensity + config.emotion.lock_override_margin
    {
        return StateChange::Blocked(BlockReason::LockHonored);
    }

    // 4. Commit, remember, report.
    let previous = record.state.current;
    let (emotion, intensity) = combine(
        record.state.current,
        record.state.intensity,
        stimulus.effect.emotion,
        proposed,
        config.emotion.blend_recency_weight,
    );
    record.state.set(emotion, intensity);
    if let Some(lock_ticks) = stimulus.lock_ticks {
        record.state.lock_until_tick(now.tick + lock_ticks);
    }

    record.memory.record(MemoryRecord {
        kind: stimulus.kind,
        source: stimulus.source,
        emotion,
        applied_intensity: intensity,
        tick: now.tick,
    });

    StateChange::Applied {
        previous,
        emotion,
        intensity,
    }
}
