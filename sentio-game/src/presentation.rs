//! Listen-only presentation cue adapters.
//!
//! Maps emotion changes onto the cues the presentation layer actually
//! consumes: an aura tint with a pulse rate for shaders, and a music mood
//! for the adaptive soundtrack. Everything here subscribes to the
//! simulation's change notifications and never writes back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use sentio_core::emotion::Emotion;
use sentio_core::resolution::{EmotionChange, EmotionListener};
use sentio_core::types::EntityId;

/// An aura rendering hint: RGB tint plus pulse rate in hertz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuraCue {
    /// RGB tint, each channel 0 to 1.
    pub tint: [f32; 3],
    /// Pulse rate in hertz; stronger feelings pulse faster.
    pub pulse_hz: f32,
    /// Overall aura opacity, 0 to 1.
    pub opacity: f32,
}

/// Mood bucket for the adaptive soundtrack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicMood {
    /// Light, major-key material.
    Bright,
    /// Slow, minor-key material.
    Somber,
    /// Driving, percussive material.
    Tense,
    /// Sparse, airy material.
    Serene,
    /// The neutral bed track.
    Ambient,
}

/// Tint lookup for a single emotion category.
fn tint_of(emotion: Emotion) -> [f32; 3] {
    match emotion {
        e if e == Emotion::HAPPY => [1.0, 0.85, 0.25],
        e if e == Emotion::SAD => [0.25, 0.4, 0.8],
        e if e == Emotion::ANGRY => [0.9, 0.2, 0.15],
        e if e == Emotion::AFRAID => [0.55, 0.25, 0.7],
        e if e == Emotion::CURIOUS => [0.3, 0.85, 0.6],
        e if e == Emotion::DISGUSTED => [0.45, 0.6, 0.2],
        e if e == Emotion::SURPRISED => [1.0, 0.6, 0.1],
        e if e == Emotion::CALM => [0.5, 0.8, 0.95],
        _ => [0.7, 0.7, 0.7],
    }
}

/// Compute the aura cue for an emotion at a given intensity.
///
/// Composite emotions average their category tints. Expressiveness scales
/// how much of the feeling actually shows.
#[must_use]
pub fn aura_for(emotion: Emotion, intensity: f32, expressiveness: f32) -> AuraCue {
    if emotion.is_neutral() || intensity <= 0.0 {
        return AuraCue {
            tint: [0.7, 0.7, 0.7],
            pulse_hz: 0.0,
            opacity: 0.0,
        };
    }

    let mut tint = [0.0f32; 3];
    let mut count = 0.0f32;
    for flag in emotion.iter() {
        let t = tint_of(flag);
        tint[0] += t[0];
        tint[1] += t[1];
        tint[2] += t[2];
        count += 1.0;
    }
    tint = [tint[0] / count, tint[1] / count, tint[2] / count];

    let shown = (intensity * (0.5 + expressiveness)).clamp(0.0, 1.0);
    AuraCue {
        tint,
        pulse_hz: 0.5 + 2.5 * shown,
        opacity: shown,
    }
}

/// Pick the soundtrack mood for an emotion at a given intensity.
#[must_use]
pub fn music_for(emotion: Emotion, intensity: f32) -> MusicMood {
    if emotion.is_neutral() || intensity < 0.2 {
        return MusicMood::Ambient;
    }
    if emotion.intersects(Emotion::ANGRY | Emotion::AFRAID) {
        MusicMood::Tense
    } else if emotion.intersects(Emotion::SAD | Emotion::DISGUSTED) {
        MusicMood::Somber
    } else if emotion.intersects(Emotion::HAPPY | Emotion::SURPRISED | Emotion::CURIOUS) {
        MusicMood::Bright
    } else {
        MusicMood::Serene
    }
}

/// A subscriber that keeps the latest aura cue per entity for the render
/// thread to read.
#[derive(Debug, Clone, Default)]
pub struct CueBoard {
    cues: Arc<Mutex<HashMap<EntityId, AuraCue>>>,
}

impl CueBoard {
    /// Create an empty cue board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest aura cue for an entity, if any change has been seen.
    #[must_use]
    pub fn cue(&self, entity: EntityId) -> Option<AuraCue> {
        self.cues
            .lock()
            .ok()
            .and_then(|cues| cues.get(&entity).copied())
    }

    /// Number of entities with a recorded cue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.lock().map(|cues| cues.len()).unwrap_or(0)
    }

    /// Whether no cues have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EmotionListener for CueBoard {
    fn on_change(&mut self, change: &EmotionChange) {
        // Expressiveness lives on the entity profile, which a listen-only
        // subscriber cannot reach; the render side scales by it instead.
        let cue = aura_for(change.emotion, change.intensity, 0.5);
        if let Ok(mut cues) = self.cues.lock() {
            cues.insert(change.entity, cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentio_core::config::SentioConfig;
    use sentio_core::influence::NullIndex;
    use sentio_core::sim::Simulation;
    use sentio_core::stimulus::{EmotionEffect, Stimulus, StimulusKind};
    use sentio_core::types::{EmotionProfile, Position};

    #[test]
    fn neutral_aura_is_invisible() {
        let cue = aura_for(Emotion::NEUTRAL, 0.0, 0.5);
        assert_eq!(cue.opacity, 0.0);
        assert_eq!(cue.pulse_hz, 0.0);
    }

    #[test]
    fn stronger_feelings_pulse_faster() {
        let faint = aura_for(Emotion::HAPPY, 0.2, 0.5);
        let strong = aura_for(Emotion::HAPPY, 0.9, 0.5);
        assert!(strong.pulse_hz > faint.pulse_hz);
        assert!(strong.opacity > faint.opacity);
    }

    #[test]
    fn composite_emotions_blend_tints() {
        let happy = aura_for(Emotion::HAPPY, 0.8, 0.5);
        let sad = aura_for(Emotion::SAD, 0.8, 0.5);
        let mixed = aura_for(Emotion::HAPPY | Emotion::SAD, 0.8, 0.5);
        for channel in 0..3 {
            let lo = happy.tint[channel].min(sad.tint[channel]);
            let hi = happy.tint[channel].max(sad.tint[channel]);
            assert!(mixed.tint[channel] >= lo && mixed.tint[channel] <= hi);
        }
    }

    #[test]
    fn music_mood_buckets() {
        assert_eq!(music_for(Emotion::NEUTRAL, 1.0), MusicMood::Ambient);
        assert_eq!(music_for(Emotion::HAPPY, 0.8), MusicMood::Bright);
        assert_eq!(music_for(Emotion::AFRAID, 0.8), MusicMood::Tense);
        assert_eq!(music_for(Emotion::SAD, 0.8), MusicMood::Somber);
        assert_eq!(music_for(Emotion::CALM, 0.8), MusicMood::Serene);
        // Tension wins over brightness in a mixed mood.
        assert_eq!(
            music_for(Emotion::HAPPY | Emotion::ANGRY, 0.8),
            MusicMood::Tense
        );
    }

    #[test]
    fn cue_board_tracks_changes_from_the_simulation() {
        let mut sim = Simulation::new(SentioConfig::default());
        let id = sentio_core::types::EntityId::new();
        sim.register_entity(id, EmotionProfile::default(), Position::default());

        let board = CueBoard::new();
        sim.subscribe(Box::new(board.clone()));

        sim.submit(Stimulus::new(
            id,
            StimulusKind::Direct,
            EmotionEffect::new(Emotion::HAPPY, 0.8),
        ));
        sim.tick(1.0 / 60.0, &NullIndex);

        let cue = board.cue(id).expect("cue recorded");
        assert!(cue.opacity > 0.0);
        assert_eq!(cue.tint, tint_of(Emotion::HAPPY));
    }
}
