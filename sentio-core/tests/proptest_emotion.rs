//! Property-based tests for the sentio core.
//!
//! Verifies the simulation's structural invariants under random inputs:
//! clamping of every normalized quantity, decay monotonicity, ledger
//! symmetry, memory bounds, and filter behaviour.

use proptest::prelude::*;

use sentio_core::config::{MemoryConfig, SentioConfig};
use sentio_core::emotion::Emotion;
use sentio_core::filter::{FilterChain, FilterDecision, ShieldFilter};
use sentio_core::memory::{EmotionMemory, MemoryRecord};
use sentio_core::registry::EntityRecord;
use sentio_core::resolution;
use sentio_core::social::RelationshipLedger;
use sentio_core::state::EmotionalState;
use sentio_core::stimulus::{EmotionEffect, Stimulus, StimulusKind};
use sentio_core::types::{EmotionProfile, EntityId, Position, SimTimestamp};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_emotion() -> impl Strategy<Value = Emotion> {
    (1u16..=0xFF).prop_map(Emotion::from_bits_truncate)
}

fn arb_profile() -> impl Strategy<Value = EmotionProfile> {
    (0.0..1.0f32, 0.0..1.0f32, 0.0..1.0f32, 0.0..1.0f32)
        .prop_map(|(v, r, s, e)| EmotionProfile::new(v, r, s, e))
}

fn arb_stimulus(target: EntityId) -> impl Strategy<Value = Stimulus> {
    (
        arb_emotion(),
        -2.0..2.0f32,   // base intensity, deliberately out of range
        -10.0..10.0f32, // multiplier, unconstrained by contract
        proptest::option::of(0u64..600),
    )
        .prop_map(move |(emotion, base, multiplier, lock)| {
            let mut stimulus = Stimulus::new(
                target,
                StimulusKind::Direct,
                EmotionEffect::new(emotion, base),
            )
            .with_multiplier(multiplier);
            if let Some(ticks) = lock {
                stimulus = stimulus.with_lock(ticks);
            }
            stimulus
        })
}

// ---------------------------------------------------------------------------
// Property: intensity stays in [0, 1] for any stimulus sequence
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn intensity_always_clamped(
        profile in arb_profile(),
        seeds in prop::collection::vec((any::<u16>(), -2.0..2.0f32, -10.0..10.0f32), 1..40),
    ) {
        let config = SentioConfig::default();
        let id = EntityId::new();
        let mut record = EntityRecord::new(id, profile, Position::default(), &config);

        for (tick, (bits, base, multiplier)) in seeds.into_iter().enumerate() {
            let emotion = Emotion::from_bits_truncate(bits);
            let stimulus = Stimulus::new(
                id,
                StimulusKind::Direct,
                EmotionEffect::new(emotion, base),
            )
            .with_multiplier(multiplier);
            let _ = resolution::resolve(
                &mut record,
                &stimulus,
                SimTimestamp::now(tick as u64),
                &config,
            );
            prop_assert!(record.state.intensity >= 0.0);
            prop_assert!(record.state.intensity <= 1.0);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: decay is monotone and terminates at exactly neutral/zero
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn decay_monotone_to_neutral(
        emotion in arb_emotion(),
        start in 0.01..1.0f32,
        profile in arb_profile(),
    ) {
        let config = SentioConfig::default();
        let mut state = EmotionalState::new(&config.emotion);
        state.set(emotion, start);

        let mut last = state.intensity;
        for tick in 0..100_000u64 {
            state.decay(0.1, tick, &profile, &config.emotion);
            prop_assert!(state.intensity <= last);
            last = state.intensity;
            if state.current.is_neutral() {
                break;
            }
        }
        prop_assert!(state.current.is_neutral());
        prop_assert_eq!(state.intensity, 0.0);
    }
}

// ---------------------------------------------------------------------------
// Property: ledger score/familiarity bounded, lookup symmetric
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn ledger_bounded_and_symmetric(
        deltas in prop::collection::vec((-2.0..2.0f32, -2.0..2.0f32, any::<bool>()), 1..50),
    ) {
        let mut ledger = RelationshipLedger::new(0.0);
        let a = EntityId::new();
        let b = EntityId::new();

        for (score_delta, familiarity_delta, swap) in deltas {
            if swap {
                ledger.record_interaction(b, a, score_delta, familiarity_delta);
            } else {
                ledger.record_interaction(a, b, score_delta, familiarity_delta);
            }

            let ab = ledger.relationship(a, b);
            let ba = ledger.relationship(b, a);
            prop_assert!(ab.score >= -1.0 && ab.score <= 1.0);
            prop_assert!(ab.familiarity >= 0.0 && ab.familiarity <= 1.0);
            prop_assert_eq!(ab.score.to_bits(), ba.score.to_bits());
            prop_assert_eq!(ab.familiarity.to_bits(), ba.familiarity.to_bits());
        }
        prop_assert_eq!(ledger.len(), 1);
    }
}

// ---------------------------------------------------------------------------
// Property: familiarity never decreases across interactions
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn familiarity_monotone_nondecreasing(
        deltas in prop::collection::vec((-1.0..1.0f32, -1.0..1.0f32), 1..50),
    ) {
        let mut ledger = RelationshipLedger::new(0.0);
        let a = EntityId::new();
        let b = EntityId::new();

        let mut last = 0.0f32;
        for (score_delta, familiarity_delta) in deltas {
            ledger.record_interaction(a, b, score_delta, familiarity_delta);
            let familiarity = ledger.relationship(a, b).familiarity;
            prop_assert!(familiarity >= last);
            last = familiarity;
        }
    }
}

// ---------------------------------------------------------------------------
// Property: emotion memory never exceeds its capacity
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn memory_respects_capacity(
        capacity in 1..64usize,
        count in 0..200usize,
    ) {
        let mut memory = EmotionMemory::new(capacity);
        for tick in 0..count {
            memory.record(MemoryRecord {
                kind: StimulusKind::Direct,
                source: None,
                emotion: Emotion::HAPPY,
                applied_intensity: 0.5,
                tick: tick as u64,
            });
        }
        prop_assert!(memory.len() <= capacity);
        prop_assert_eq!(memory.len(), count.min(capacity));
    }
}

// ---------------------------------------------------------------------------
// Property: a shield blocks exactly the intersecting stimuli
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn shield_blocks_iff_intersecting(
        blocked in arb_emotion(),
        incoming in arb_emotion(),
    ) {
        let mut chain = FilterChain::new();
        chain.register(ShieldFilter::new(blocked, 100));

        let stimulus = Stimulus::new(
            EntityId::new(),
            StimulusKind::Direct,
            EmotionEffect::new(incoming, 0.5),
        );
        let decision = chain.apply(&stimulus);
        if incoming.intersects(blocked) {
            prop_assert_eq!(decision, FilterDecision::Block);
        } else {
            prop_assert_eq!(decision, FilterDecision::Allow);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: habituation factor stays within [floor, 1]
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn habituation_factor_bounded(
        emotion in arb_emotion(),
        repeats in 0..50usize,
    ) {
        let config = MemoryConfig::default();
        let mut memory = EmotionMemory::new(64);
        for _ in 0..repeats {
            memory.record(MemoryRecord {
                kind: StimulusKind::Direct,
                source: None,
                emotion,
                applied_intensity: 0.5,
                tick: 0,
            });
        }
        let factor = memory.habituation_factor(emotion, 1, &config);
        prop_assert!(factor >= config.habituation_floor);
        prop_assert!(factor <= 1.0);
    }
}

// ---------------------------------------------------------------------------
// Property: random stimuli survive a serde round-trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn stimulus_serde_roundtrip(stimulus in arb_stimulus(EntityId::new())) {
        let json = serde_json::to_string(&stimulus).expect("serialize");
        let restored: Stimulus = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(restored, stimulus);
    }
}
