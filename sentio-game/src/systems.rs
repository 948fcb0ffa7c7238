//! Per-frame glue between the game's event stream and the simulation.
//!
//! The driver collects the frame's [`GameEvent`]s, feeds them through
//! [`apply_event`], then advances the simulation once with [`run_frame`].
//! Stimuli queued by events resolve inside that tick, after decay, in
//! submission order.

use tracing::trace;

use sentio_core::influence::SpatialIndex;
use sentio_core::sim::Simulation;

use crate::events::GameEvent;

/// Feed one game event into the simulation: submits its stimuli and
/// records its relationship deltas.
pub fn apply_event(sim: &mut Simulation, event: &GameEvent) {
    for (a, b, delta_score, delta_familiarity) in event.relationship_deltas() {
        sim.record_interaction(a, b, delta_score, delta_familiarity);
    }
    let stimuli = event.stimuli();
    trace!(count = stimuli.len(), "event expressed as stimuli");
    for stimulus in stimuli {
        sim.submit(stimulus);
    }
}

/// Advance the simulation by one frame of `dt` seconds.
pub fn run_frame(sim: &mut Simulation, index: &dyn SpatialIndex, dt: f32) {
    sim.tick(dt, index);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentio_core::config::SentioConfig;
    use sentio_core::emotion::Emotion;
    use sentio_core::influence::NullIndex;
    use sentio_core::types::{EmotionProfile, EntityId, Position};

    fn spawn(sim: &mut Simulation) -> EntityId {
        let id = EntityId::new();
        sim.register_entity(id, EmotionProfile::default(), Position::default());
        id
    }

    #[test]
    fn attack_event_flows_through_to_state_and_ledger() {
        let mut sim = Simulation::new(SentioConfig::default());
        let attacker = spawn(&mut sim);
        let victim = spawn(&mut sim);

        apply_event(
            &mut sim,
            &GameEvent::Attack {
                attacker,
                victim,
                witnesses: vec![],
            },
        );
        run_frame(&mut sim, &NullIndex, 1.0 / 60.0);

        let victim_state = &sim.entity(victim).expect("live").state;
        assert_eq!(victim_state.current, Emotion::AFRAID);
        assert!(victim_state.intensity > 0.0);
        assert!(sim.relationship(attacker, victim).score < 0.0);
    }

    #[test]
    fn witnesses_end_up_less_afraid_than_victims() {
        let mut sim = Simulation::new(SentioConfig::default());
        let attacker = spawn(&mut sim);
        let victim = spawn(&mut sim);
        let witness = spawn(&mut sim);

        apply_event(
            &mut sim,
            &GameEvent::Attack {
                attacker,
                victim,
                witnesses: vec![witness],
            },
        );
        run_frame(&mut sim, &NullIndex, 1.0 / 60.0);

        let victim_intensity = sim.entity(victim).expect("live").state.intensity;
        let witness_intensity = sim.entity(witness).expect("live").state.intensity;
        assert!(witness_intensity > 0.0);
        assert!(witness_intensity < victim_intensity);
    }
}
