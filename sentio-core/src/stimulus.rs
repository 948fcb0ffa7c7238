//! Stimuli — transient emotional events.
//!
//! A stimulus describes one proposed change to a target entity's emotional
//! state: who caused it, which emotion it triggers, and how hard it lands.
//! Stimuli are constructed, resolved once, and discarded; they are never
//! stored beyond the tick that resolves them.

use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::types::EntityId;

/// Where a stimulus came from, for memory records and resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StimulusKind {
    /// A direct gameplay event (dialogue, combat, gift, ...).
    Direct,
    /// Produced by a skill cast.
    Skill,
    /// Produced by the influence propagation pass.
    Influence,
    /// Ambient/environmental, with no source entity (weather, music, ...).
    Environmental,
}

/// The emotional payload of a stimulus: which emotion to trigger and at
/// what base intensity, before multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionEffect {
    /// The emotion (possibly composite) this stimulus triggers.
    pub emotion: Emotion,
    /// Base intensity in [0, 1] before the stimulus multiplier and the
    /// target's profile are applied.
    pub base_intensity: f32,
}

impl EmotionEffect {
    /// Create an effect with the base intensity clamped to [0, 1].
    #[must_use]
    pub fn new(emotion: Emotion, base_intensity: f32) -> Self {
        Self {
            emotion,
            base_intensity: base_intensity.clamp(0.0, 1.0),
        }
    }
}

/// An immutable emotional event aimed at one target entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stimulus {
    /// The entity that caused this stimulus, if any. Environmental stimuli
    /// have no source.
    pub source: Option<EntityId>,
    /// The entity whose emotional state this stimulus proposes to change.
    pub target: EntityId,
    /// What produced the stimulus.
    pub kind: StimulusKind,
    /// Scales the effect's base intensity. Unconstrained in sign and
    /// magnitude — the resolved intensity is clamped after application.
    pub intensity_multiplier: f32,
    /// If set, the resulting emotion is locked against weaker stimuli and
    /// decay for this many ticks after it is applied.
    pub lock_ticks: Option<u64>,
    /// The emotional payload.
    pub effect: EmotionEffect,
}

impl Stimulus {
    /// Create a stimulus with no source, unit multiplier, and no lock.
    #[must_use]
    pub fn new(target: EntityId, kind: StimulusKind, effect: EmotionEffect) -> Self {
        Self {
            source: None,
            target,
            kind,
            intensity_multiplier: 1.0,
            lock_ticks: None,
            effect,
        }
    }

    /// Attribute the stimulus to a source entity.
    #[must_use]
    pub fn from_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// Scale the effect's base intensity.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f32) -> Self {
        self.intensity_multiplier = multiplier;
        self
    }

    /// Lock the resulting emotion for a number of ticks after application.
    #[must_use]
    pub fn with_lock(mut self, ticks: u64) -> Self {
        self.lock_ticks = Some(ticks);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_clamps_base_intensity() {
        let effect = EmotionEffect::new(Emotion::HAPPY, 3.0);
        assert_eq!(effect.base_intensity, 1.0);
        let effect = EmotionEffect::new(Emotion::SAD, -1.0);
        assert_eq!(effect.base_intensity, 0.0);
    }

    #[test]
    fn builder_style_construction() {
        let source = EntityId::new();
        let target = EntityId::new();
        let stimulus = Stimulus::new(
            target,
            StimulusKind::Direct,
            EmotionEffect::new(Emotion::AFRAID, 0.6),
        )
        .from_source(source)
        .with_multiplier(1.5)
        .with_lock(120);

        assert_eq!(stimulus.source, Some(source));
        assert_eq!(stimulus.target, target);
        assert!((stimulus.intensity_multiplier - 1.5).abs() < f32::EPSILON);
        assert_eq!(stimulus.lock_ticks, Some(120));
    }
}
