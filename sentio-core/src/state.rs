//! Per-entity emotional state and its per-tick decay.
//!
//! Every live entity owns exactly one [`EmotionalState`]: the current
//! (possibly composite) emotion, its intensity, and a personal decay rate.
//! Decay is linear toward zero and O(1) per entity per tick, so the
//! whole-population pass stays linear in entity count.

use serde::{Deserialize, Serialize};

use crate::config::EmotionConfig;
use crate::emotion::Emotion;
use crate::types::EmotionProfile;

/// An entity's current emotional state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionalState {
    /// The current emotion; may combine several categories.
    pub current: Emotion,
    /// Strength of the current emotion in [0, 1].
    pub intensity: f32,
    /// Per-second intensity falloff toward neutral, before the profile's
    /// resilience factor.
    pub decay_rate: f32,
    /// Absolute tick before which the current emotion cannot be overridden
    /// by decay or weaker stimuli.
    pub lock_until: Option<u64>,
}

impl EmotionalState {
    /// Create a neutral state with the configured default decay rate.
    #[must_use]
    pub fn new(config: &EmotionConfig) -> Self {
        Self {
            current: Emotion::NEUTRAL,
            intensity: 0.0,
            decay_rate: config.default_decay_rate,
            lock_until: None,
        }
    }

    /// Whether a forced emotion is still locked at `tick`.
    #[must_use]
    pub fn is_locked(&self, tick: u64) -> bool {
        self.lock_until.is_some_and(|until| tick < until)
    }

    /// Lock the current emotion until the given absolute tick. An earlier
    /// existing lock is extended, never shortened.
    pub fn lock_until_tick(&mut self, tick: u64) {
        self.lock_until = Some(self.lock_until.map_or(tick, |t| t.max(tick)));
    }

    /// Effective per-second decay rate for the given profile.
    ///
    /// A default profile (resilience 0.5) decays at exactly `decay_rate`;
    /// resilient entities shake moods off faster, brooding ones slower.
    #[must_use]
    pub fn effective_decay_rate(&self, profile: &EmotionProfile) -> f32 {
        self.decay_rate * (0.5 + profile.resilience)
    }

    /// Advance decay by `dt` seconds. Returns `true` if the state reset to
    /// neutral this step.
    ///
    /// Decay is suspended while a lock is active. When intensity reaches
    /// zero the emotion resets to neutral and any expired lock is cleared.
    pub fn decay(
        &mut self,
        dt: f32,
        now_tick: u64,
        profile: &EmotionProfile,
        config: &EmotionConfig,
    ) -> bool {
        if self.is_locked(now_tick) {
            return false;
        }
        if self.lock_until.is_some() {
            // Lock expired; stop carrying it around.
            self.lock_until = None;
        }
        if self.current.is_neutral() {
            return false;
        }

        self.intensity = (self.intensity - self.effective_decay_rate(profile) * dt).max(0.0);
        if self.intensity <= config.neutral_epsilon {
            self.intensity = 0.0;
            self.current = Emotion::NEUTRAL;
            return true;
        }
        false
    }

    /// Commit a new emotion and intensity, clamping intensity to [0, 1].
    pub fn set(&mut self, emotion: Emotion, intensity: f32) {
        debug_assert!(
            (0.0..=1.0).contains(&intensity),
            "resolution must hand over clamped intensity, got {intensity}"
        );
        self.current = emotion;
        self.intensity = intensity.clamp(0.0, 1.0);
        if self.current.is_neutral() {
            self.intensity = 0.0;
        }
    }
}
