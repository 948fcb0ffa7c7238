//! Emotion influence propagation — moods spreading between neighbours.
//!
//! A periodic pass (slower than the tick rate) that lets each entity's
//! mood bleed onto the entities around it, after the emotional-contagion
//! observations of Hatfield, Cacioppo & Rapson (1994). Per ordered pair
//! the transfer is weighted by distance falloff, the pair's relationship,
//! and the source's sociability; both directions are evaluated
//! independently because relationships read the same but entities differ
//! in sociability and mood.
//!
//! The pass only *produces* stimuli; they are resolved through the normal
//! pipeline after all direct stimuli of the same tick. The relationship
//! ledger must be a snapshot for the whole pass so results cannot depend
//! on pair evaluation order.

use ordered_float::OrderedFloat;
use tracing::trace;

use crate::config::InfluenceConfig;
use crate::registry::EntityRegistry;
use crate::social::RelationshipLedger;
use crate::stimulus::{EmotionEffect, Stimulus, StimulusKind};
use crate::types::EntityId;

/// Spatial neighbourhood queries, maintained by the environment.
///
/// The simulation only ever asks one question: which entities sit within
/// `radius` of the given one. How the index is built (uniform grid, BVH,
/// engine-side chunk lists) is none of the core's business.
pub trait SpatialIndex {
    /// IDs of all entities within `radius` of `origin`, excluding `origin`
    /// itself.
    fn neighbors_within(&self, origin: EntityId, radius: f32) -> Vec<EntityId>;
}

/// An index that knows no neighbours. Useful for drivers that have not
/// wired up spatial data yet and for tests that exercise everything but
/// proximity.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullIndex;

impl SpatialIndex for NullIndex {
    fn neighbors_within(&self, _origin: EntityId, _radius: f32) -> Vec<EntityId> {
        Vec::new()
    }
}

/// Run one influence pass over the live population.
///
/// Returns the generated stimuli, ordered deterministically (by target,
/// strongest first), ready to be resolved by the caller. The ledger
/// argument must be a snapshot taken before the pass.
#[must_use]
pub fn run_pass(
    registry: &EntityRegistry,
    ledger: &RelationshipLedger,
    index: &dyn SpatialIndex,
    config: &InfluenceConfig,
) -> Vec<Stimulus> {
    let mut out: Vec<(OrderedFloat<f32>, Stimulus)> = Vec::new();

    for source_id in registry.sorted_ids() {
        let Some(source) = registry.get(source_id) else {
            continue;
        };
        if source.state.current.is_neutral() || source.state.intensity <= f32::EPSILON {
            continue;
        }
        let sociability_factor = 0.5 + 0.5 * source.profile.sociability;

        for target_id in index.neighbors_within(source_id, config.radius) {
            if target_id == source_id {
                continue;
            }
            let Some(target) = registry.get(target_id) else {
                continue;
            };

            let distance = source.position.distance(&target.position);
            let falloff = (1.0 - distance / config.radius).clamp(0.0, 1.0);
            let relationship = ledger.relationship(source_id, target_id);
            let weight = falloff * relationship.influence_multiplier() * sociability_factor;
            if weight <= config.min_weight {
                continue;
            }

            trace!(
                source = %source_id,
                target = %target_id,
                weight,
                emotion = %source.state.current,
                "influence transfer"
            );
            let stimulus = Stimulus::new(
                target_id,
                StimulusKind::Influence,
                EmotionEffect::new(source.state.current, source.state.intensity),
            )
            .from_source(source_id)
            .with_multiplier(weight * config.transfer_factor);
            out.push((OrderedFloat(weight), stimulus));
        }
    }

    // Deterministic resolution order: group by target, strongest transfer
    // first, source ID as the tiebreak.
    out.sort_by(|(wa, a), (wb, b)| {
        a.target
            .cmp(&b.target)
            .then(wb.cmp(wa))
            .then(a.source.cmp(&b.source))
    });
    out.into_iter().map(|(_, s)| s).collect()
}
