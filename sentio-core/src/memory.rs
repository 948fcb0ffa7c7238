//! Emotion memory — a bounded, time-ordered record of resolved stimuli.
//!
//! Each entity keeps the last N stimuli that actually changed its state,
//! oldest evicted first. The record feeds two consumers: habituation
//! (repeated identical stimuli lose their punch, after Thompson & Spencer's
//! habituation criteria, 1966) and skill eligibility checks of the
//! "has felt X recently" variety.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::MemoryConfig;
use crate::emotion::Emotion;
use crate::stimulus::StimulusKind;
use crate::types::{EntityId, seconds_to_ticks};

/// One resolved stimulus, as remembered by its target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// What produced the stimulus.
    pub kind: StimulusKind,
    /// Who caused it, if anyone.
    pub source: Option<EntityId>,
    /// The emotion that was triggered.
    pub emotion: Emotion,
    /// The intensity that was actually applied, post-clamping.
    pub applied_intensity: f32,
    /// Tick at which the stimulus was resolved.
    pub tick: u64,
}

/// Bounded per-entity history of resolved stimuli.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionMemory {
    records: VecDeque<MemoryRecord>,
    capacity: usize,
}

impl EmotionMemory {
    /// Create an empty memory with the given record capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Append a record, evicting the oldest if at capacity.
    pub fn record(&mut self, record: MemoryRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.records.iter()
    }

    /// Whether any recorded stimulus within the last `window_ticks`
    /// triggered an emotion intersecting `emotion`.
    #[must_use]
    pub fn felt_recently(&self, emotion: Emotion, window_ticks: u64, now_tick: u64) -> bool {
        self.records
            .iter()
            .rev()
            .take_while(|r| now_tick.saturating_sub(r.tick) <= window_ticks)
            .any(|r| r.emotion.intersects(emotion))
    }

    /// Dampening factor in (0, 1] for a stimulus triggering `emotion`.
    ///
    /// Each prior record within the habituation window that triggered the
    /// same emotion steps the factor down, to a configured floor. A fresh
    /// emotion always returns 1.0.
    #[must_use]
    pub fn habituation_factor(
        &self,
        emotion: Emotion,
        now_tick: u64,
        config: &MemoryConfig,
    ) -> f32 {
        if emotion.is_neutral() {
            return 1.0;
        }
        let window = seconds_to_ticks(config.habituation_window_seconds);
        let repeats = self
            .records
            .iter()
            .rev()
            .take_while(|r| now_tick.saturating_sub(r.tick) <= window)
            .filter(|r| r.emotion.intersects(emotion))
            .count() as f32;
        (1.0 - config.habituation_step * repeats).max(config.habituation_floor)
    }
}

impl Default for EmotionMemory {
    fn default() -> Self {
        Self::new(MemoryConfig::default().capacity)
    }
}
