//! Game events that drive the emotion simulation.
//!
//! Each event knows how to express itself as stimuli for the affected
//! entities and as relationship deltas for the social ledger. Witnesses
//! feel events at reduced strength compared to direct participants.

use sentio_core::emotion::Emotion;
use sentio_core::stimulus::{EmotionEffect, Stimulus, StimulusKind};
use sentio_core::types::{EntityId, TICKS_PER_SECOND};

/// How much weaker an event lands on a witness than on a participant.
const WITNESS_FACTOR: f32 = 0.6;

/// A relationship change produced by an event: (a, b, score delta,
/// familiarity delta).
pub type RelationshipDelta = (EntityId, EntityId, f32, f32);

/// A game event with emotional consequences.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// One entity spoke to another; warmth in [-1, 1] colours the exchange.
    Dialogue {
        /// Who spoke.
        speaker: EntityId,
        /// Who listened.
        listener: EntityId,
        /// Tone of the exchange, -1 (venomous) to 1 (heartfelt).
        warmth: f32,
    },

    /// One entity attacked another.
    Attack {
        /// The aggressor.
        attacker: EntityId,
        /// The entity attacked.
        victim: EntityId,
        /// Bystanders who saw it happen.
        witnesses: Vec<EntityId>,
    },

    /// A gift changed hands; generosity in [0, 1] scales the delight.
    Gift {
        /// Who gave.
        giver: EntityId,
        /// Who received.
        receiver: EntityId,
        /// How generous the gift was, 0 to 1.
        generosity: f32,
    },

    /// One entity insulted another.
    Insult {
        /// Who gave offence.
        offender: EntityId,
        /// Who took it.
        victim: EntityId,
    },

    /// One entity comforted another.
    Comfort {
        /// Who consoled.
        comforter: EntityId,
        /// Who was consoled.
        comforted: EntityId,
    },

    /// An entity discovered something new.
    Discovery {
        /// The discoverer.
        explorer: EntityId,
    },

    /// An entity lost someone or something dear. Grief lingers: the
    /// resulting sadness is locked in for a few seconds.
    Loss {
        /// Who suffered the loss.
        bereaved: EntityId,
        /// Bystanders who saw it happen.
        witnesses: Vec<EntityId>,
    },

    /// Ambient mood pressure with no source entity (weather, music, a
    /// place that feels wrong).
    Ambient {
        /// Entities under the ambient pressure.
        targets: Vec<EntityId>,
        /// The emotion the ambience pushes toward.
        emotion: Emotion,
        /// Base intensity of the pressure.
        intensity: f32,
    },
}

impl GameEvent {
    /// Express the event as stimuli for every affected entity.
    #[must_use]
    pub fn stimuli(&self) -> Vec<Stimulus> {
        match self {
            Self::Dialogue {
                speaker,
                listener,
                warmth,
            } => {
                let emotion = if *warmth >= 0.0 { Emotion::HAPPY } else { Emotion::SAD };
                vec![
                    Stimulus::new(
                        *listener,
                        StimulusKind::Direct,
                        EmotionEffect::new(emotion, 0.3 * warmth.abs()),
                    )
                    .from_source(*speaker),
                ]
            }

            Self::Attack {
                attacker,
                victim,
                witnesses,
            } => {
                let mut stimuli = vec![
                    Stimulus::new(
                        *victim,
                        StimulusKind::Direct,
                        EmotionEffect::new(Emotion::AFRAID, 0.7),
                    )
                    .from_source(*attacker),
                    Stimulus::new(
                        *attacker,
                        StimulusKind::Direct,
                        EmotionEffect::new(Emotion::ANGRY, 0.4),
                    ),
                ];
                stimuli.extend(witnesses.iter().map(|&witness| {
                    Stimulus::new(
                        witness,
                        StimulusKind::Direct,
                        EmotionEffect::new(Emotion::AFRAID, 0.7),
                    )
                    .from_source(*attacker)
                    .with_multiplier(WITNESS_FACTOR)
                }));
                stimuli
            }

            Self::Gift {
                giver,
                receiver,
                generosity,
            } => vec![
                Stimulus::new(
                    *receiver,
                    StimulusKind::Direct,
                    EmotionEffect::new(Emotion::HAPPY | Emotion::SURPRISED, 0.6 * generosity),
                )
                .from_source(*giver),
            ],

            Self::Insult { offender, victim } => vec![
                Stimulus::new(
                    *victim,
                    StimulusKind::Direct,
                    EmotionEffect::new(Emotion::ANGRY, 0.6),
                )
                .from_source(*offender),
            ],

            Self::Comfort {
                comforter,
                comforted,
            } => vec![
                Stimulus::new(
                    *comforted,
                    StimulusKind::Direct,
                    EmotionEffect::new(Emotion::CALM, 0.5),
                )
                .from_source(*comforter),
            ],

            Self::Discovery { explorer } => vec![Stimulus::new(
                *explorer,
                StimulusKind::Direct,
                EmotionEffect::new(Emotion::CURIOUS, 0.6),
            )],

            Self::Loss {
                bereaved,
                witnesses,
            } => {
                let mut stimuli = vec![
                    Stimulus::new(
                        *bereaved,
                        StimulusKind::Direct,
                        EmotionEffect::new(Emotion::SAD, 0.8),
                    )
                    .with_lock(5 * TICKS_PER_SECOND),
                ];
                stimuli.extend(witnesses.iter().map(|&witness| {
                    Stimulus::new(
                        witness,
                        StimulusKind::Direct,
                        EmotionEffect::new(Emotion::SAD, 0.8),
                    )
                    .with_multiplier(WITNESS_FACTOR)
                }));
                stimuli
            }

            Self::Ambient {
                targets,
                emotion,
                intensity,
            } => targets
                .iter()
                .map(|&target| {
                    Stimulus::new(
                        target,
                        StimulusKind::Environmental,
                        EmotionEffect::new(*emotion, *intensity),
                    )
                })
                .collect(),
        }
    }

    /// Express the event as relationship ledger updates.
    #[must_use]
    pub fn relationship_deltas(&self) -> Vec<RelationshipDelta> {
        match self {
            Self::Dialogue {
                speaker,
                listener,
                warmth,
            } => vec![(*speaker, *listener, 0.05 * warmth, 0.05)],

            Self::Attack {
                attacker,
                victim,
                witnesses,
            } => {
                let mut deltas = vec![(*attacker, *victim, -0.3, 0.1)];
                deltas.extend(
                    witnesses
                        .iter()
                        .map(|&witness| (*attacker, witness, -0.1, 0.05)),
                );
                deltas
            }

            Self::Gift {
                giver,
                receiver,
                generosity,
            } => vec![(*giver, *receiver, 0.2 * generosity, 0.1)],

            Self::Insult { offender, victim } => vec![(*offender, *victim, -0.15, 0.05)],

            Self::Comfort {
                comforter,
                comforted,
            } => vec![(*comforter, *comforted, 0.15, 0.1)],

            Self::Discovery { .. } | Self::Loss { .. } | Self::Ambient { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_frightens_victim_and_witnesses() {
        let attacker = EntityId::new();
        let victim = EntityId::new();
        let witness = EntityId::new();
        let event = GameEvent::Attack {
            attacker,
            victim,
            witnesses: vec![witness],
        };

        let stimuli = event.stimuli();
        let to_victim = stimuli
            .iter()
            .find(|s| s.target == victim)
            .expect("victim stimulus");
        assert_eq!(to_victim.effect.emotion, Emotion::AFRAID);
        assert_eq!(to_victim.source, Some(attacker));

        let to_witness = stimuli
            .iter()
            .find(|s| s.target == witness)
            .expect("witness stimulus");
        assert!(to_witness.intensity_multiplier < 1.0, "witnesses feel less");

        let deltas = event.relationship_deltas();
        assert!(deltas.iter().any(|(a, b, ds, _)| {
            *a == attacker && *b == victim && *ds < 0.0
        }));
    }

    #[test]
    fn loss_locks_grief_in() {
        let bereaved = EntityId::new();
        let event = GameEvent::Loss {
            bereaved,
            witnesses: vec![],
        };
        let stimuli = event.stimuli();
        assert_eq!(stimuli.len(), 1);
        assert_eq!(stimuli[0].effect.emotion, Emotion::SAD);
        assert!(stimuli[0].lock_ticks.is_some());
    }

    #[test]
    fn ambient_events_have_no_source() {
        let targets = vec![EntityId::new(), EntityId::new()];
        let event = GameEvent::Ambient {
            targets: targets.clone(),
            emotion: Emotion::CALM,
            intensity: 0.3,
        };
        let stimuli = event.stimuli();
        assert_eq!(stimuli.len(), 2);
        for stimulus in &stimuli {
            assert!(stimulus.source.is_none());
            assert_eq!(stimulus.kind, StimulusKind::Environmental);
        }
    }

    #[test]
    fn warm_dialogue_cheers_and_bonds() {
        let speaker = EntityId::new();
        let listener = EntityId::new();
        let event = GameEvent::Dialogue {
            speaker,
            listener,
            warmth: 0.8,
        };

        let stimuli = event.stimuli();
        assert_eq!(stimuli[0].effect.emotion, Emotion::HAPPY);

        let deltas = event.relationship_deltas();
        assert_eq!(deltas.len(), 1);
        assert!(deltas[0].2 > 0.0);
    }
}
