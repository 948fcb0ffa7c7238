//! The simulation facade — single-threaded, tick-stepped orchestration.
//!
//! An external driver (the game loop) steps the [`Simulation`] once per
//! frame. Within one tick the phases run in a fixed order:
//!
//! 1. decay — every live entity's intensity falls toward neutral
//! 2. shield expiry — filter chains shed expired shields
//! 3. cast completions — finished casts spend their resource and queue
//!    their effect stimuli
//! 4. stimulus resolution — the queue drains through the resolution
//!    pipeline in submission order
//! 5. influence — on its own slower cadence, the propagation pass runs
//!    against a ledger snapshot and its stimuli resolve last
//!
//! So a stimulus always sees this tick's decayed state, and influence
//! always runs after every direct and skill effect of the tick. All writes
//! to an entity's emotion go through the resolution pipeline; the ledger is
//! the only shared structure and sits behind an `RwLock` so the influence
//! pass can snapshot it.

use std::collections::VecDeque;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::config::SentioConfig;
use crate::emotion::Emotion;
use crate::filter::{FilterId, ShieldFilter};
use crate::influence::{self, SpatialIndex};
use crate::metrics::SentioCounters;
use crate::registry::{EntityRecord, EntityRegistry};
use crate::resolution::{
    self, BlockReason, EmotionChange, EmotionListener, ListenerId, NotificationHub, StateChange,
};
use crate::skill::{
    Activation, EffectShape, SkillDefinition, SkillLibrary, UnavailableReason,
};
use crate::social::{Relationship, RelationshipLedger};
use crate::stimulus::Stimulus;
use crate::types::{
    EmotionProfile, EntityId, Position, SimStats, SimTimestamp, seconds_to_ticks,
};

/// The emotion simulation for one world.
///
/// Owns the entity registry, the relationship ledger, the skill library,
/// the stimulus queue and the notification hub. See the module docs for
/// the per-tick phase order.
#[derive(Debug)]
pub struct Simulation {
    config: SentioConfig,
    registry: EntityRegistry,
    ledger: RwLock<RelationshipLedger>,
    skills: SkillLibrary,
    hub: NotificationHub,
    counters: SentioCounters,
    queue: VecDeque<Stimulus>,
    now: SimTimestamp,
    last_influence_tick: u64,
    stimuli_last_tick: u32,
}

impl Simulation {
    /// Create a simulation with the given configuration.
    #[must_use]
    pub fn new(config: SentioConfig) -> Self {
        let initial_score = config.social.initial_score;
        Self {
            config,
            registry: EntityRegistry::new(),
            ledger: RwLock::new(RelationshipLedger::new(initial_score)),
            skills: SkillLibrary::new(),
            hub: NotificationHub::new(),
            counters: SentioCounters::new(),
            queue: VecDeque::new(),
            now: SimTimestamp::now(0),
            last_influence_tick: 0,
            stimuli_last_tick: 0,
        }
    }

    /// Current simulation timestamp.
    #[must_use]
    pub fn now(&self) -> SimTimestamp {
        self.now
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SentioConfig {
        &self.config
    }

    /// The runtime counters.
    #[must_use]
    pub fn counters(&self) -> &SentioCounters {
        &self.counters
    }

    /// Coarse runtime statistics.
    #[must_use]
    pub fn stats(&self) -> SimStats {
        SimStats {
            live_entities: self.registry.len(),
            stimuli_last_tick: self.stimuli_last_tick,
            last_influence_tick: self.last_influence_tick,
        }
    }

    // -----------------------------------------------------------------------
    // Entity lifecycle
    // -----------------------------------------------------------------------

    /// Register an entity, allocating its emotional state, memory, filter
    /// chain and skill book. Replaces any previous record under the same ID.
    pub fn register_entity(&mut self, id: EntityId, profile: EmotionProfile, position: Position) {
        self.registry
            .insert(EntityRecord::new(id, profile, position, &self.config));
    }

    /// Destroy an entity: releases all owned state (including any cast in
    /// progress) and prunes its relationship ledger entries.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let removed = self.registry.remove(id).is_some();
        if removed {
            self.ledger.write().prune(id);
            debug!(entity = %id, "entity removed, ledger pruned");
        }
        removed
    }

    /// Whether an entity is live.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.registry.contains(id)
    }

    /// Borrow an entity's full record.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&EntityRecord> {
        self.registry.get(id)
    }

    /// Update an entity's world position. Returns `false` for unknown
    /// entities.
    pub fn update_position(&mut self, id: EntityId, position: Position) -> bool {
        match self.registry.get_mut(id) {
            Some(record) => {
                record.position = position;
                true
            }
            None => false,
        }
    }

    /// Snapshot of all live entity positions, for external index upkeep.
    #[must_use]
    pub fn positions(&self) -> Vec<(EntityId, Position)> {
        self.registry.positions()
    }

    // -----------------------------------------------------------------------
    // Subscriptions & shields
    // -----------------------------------------------------------------------

    /// Register a listen-only subscriber for emotion changes.
    pub fn subscribe(&mut self, listener: Box<dyn EmotionListener>) -> ListenerId {
        self.hub.subscribe(listener)
    }

    /// Remove a subscriber, returning it to the caller.
    pub fn unsubscribe(&mut self, id: ListenerId) -> Option<Box<dyn EmotionListener>> {
        self.hub.unsubscribe(id)
    }

    /// Attach a shield filter to an entity for `duration_ticks`. Returns
    /// `None` (with a warning) for unknown entities.
    pub fn shield(
        &mut self,
        entity: EntityId,
        blocked: Emotion,
        duration_ticks: u64,
    ) -> Option<FilterId> {
        match self.registry.get_mut(entity) {
            Some(record) => Some(record.filters.register(ShieldFilter::new(blocked, duration_ticks))),
            None => {
                warn!(entity = %entity, "shield requested for unknown entity");
                None
            }
        }
    }

    /// Remove a shield filter before its natural expiry.
    pub fn remove_shield(&mut self, entity: EntityId, filter: FilterId) -> bool {
        self.registry
            .get_mut(entity)
            .is_some_and(|record| record.filters.remove(filter))
    }

    // -----------------------------------------------------------------------
    // Relationships
    // -----------------------------------------------------------------------

    /// Record an interaction between two entities in the shared ledger.
    pub fn record_interaction(
        &self,
        a: EntityId,
        b: EntityId,
        delta_score: f32,
        delta_familiarity: f32,
    ) {
        self.ledger
            .write()
            .record_interaction(a, b, delta_score, delta_familiarity);
    }

    /// Look up the (symmetric) relationship between two entities.
    #[must_use]
    pub fn relationship(&self, a: EntityId, b: EntityId) -> Relationship {
        self.ledger.read().relationship(a, b)
    }

    /// Apply the explicit score decay policy over `elapsed_seconds`.
    pub fn decay_relationships(&self, elapsed_seconds: f32) {
        self.ledger
            .write()
            .decay_scores(self.config.social.score_decay_rate, elapsed_seconds);
    }

    // -----------------------------------------------------------------------
    // Stimuli
    // -----------------------------------------------------------------------

    /// Queue a stimulus for resolution during the next tick, after decay.
    pub fn submit(&mut self, stimulus: Stimulus) {
        self.queue.push_back(stimulus);
    }

    /// Resolve a stimulus immediately and return the outcome.
    ///
    /// Prefer [`Simulation::submit`] from gameplay code so the tick's
    /// decay-before-stimuli ordering holds; immediate processing is for
    /// callers that need the [`StateChange`] verdict in hand.
    pub fn process_stimulus(&mut self, stimulus: &Stimulus) -> StateChange {
        self.resolve_one(stimulus)
    }

    // -----------------------------------------------------------------------
    // Skills
    // -----------------------------------------------------------------------

    /// Validate and register a skill definition for all entities.
    ///
    /// # Errors
    /// Returns the definition's validation error, if any.
    pub fn register_skill(&mut self, definition: SkillDefinition) -> crate::error::Result<()> {
        self.skills.register(definition)
    }

    /// Whether an entity's passive skill is currently active.
    #[must_use]
    pub fn is_passive_active(&self, entity: EntityId, skill: &str) -> bool {
        self.registry
            .get(entity)
            .is_some_and(|record| record.skills.is_passive_active(skill))
    }

    /// Request a skill activation.
    ///
    /// Policy refusals come back as [`Activation::Unavailable`] without any
    /// log noise; only broken references are logged. Instant skills land
    /// their effect inside this call (the effect stimuli still resolve
    /// through the queue); casting skills enter the Casting phase and
    /// complete during a later tick. The spatial index is consulted for
    /// area shapes at completion time.
    pub fn activate_skill(
        &mut self,
        caster: EntityId,
        skill: &str,
        target: Option<EntityId>,
        index: &dyn SpatialIndex,
    ) -> Activation {
        let Some(definition) = self.skills.get(skill).cloned() else {
            SentioCounters::bump(&self.counters.skill_unavailable);
            return Activation::Unavailable(UnavailableReason::UnknownSkill);
        };
        let target_live = target.is_some_and(|t| self.registry.contains(t));
        let Some(record) = self.registry.get(caster) else {
            warn!(caster = %caster, skill, "skill activation by unknown entity");
            SentioCounters::bump(&self.counters.skill_unavailable);
            return Activation::Unavailable(UnavailableReason::UnknownEntity);
        };
        if let Some(reason) =
            record
                .skills
                .check_gate(
                    &definition,
                    &record.state,
                    &record.memory,
                    self.now.tick,
                    target,
                    target_live,
                )
        {
            SentioCounters::bump(&self.counters.skill_unavailable);
            return Activation::Unavailable(reason);
        }

        SentioCounters::bump(&self.counters.skill_activations);
        if definition.cast_ticks == 0 {
            self.complete_cast(caster, &definition, target, index);
        } else if let Some(record) = self.registry.get_mut(caster) {
            record.skills.begin_cast(&definition, target);
            debug!(caster = %caster, skill, cast_ticks = definition.cast_ticks, "cast started");
        }
        Activation::Accepted
    }

    /// Land a completed cast: spend the resource, shape the affected set,
    /// queue the effect stimuli, start the cooldown.
    fn complete_cast(
        &mut self,
        caster: EntityId,
        definition: &SkillDefinition,
        target: Option<EntityId>,
        index: &dyn SpatialIndex,
    ) {
        let Some(record) = self.registry.get_mut(caster) else {
            // Destroyed while casting; the skill book died with the record.
            return;
        };
        if definition.consumes_emotion {
            let remaining = (record.state.intensity - definition.consumption).max(0.0);
            if remaining <= self.config.emotion.neutral_epsilon {
                record.state.set(Emotion::NEUTRAL, 0.0);
            } else {
                let current = record.state.current;
                record.state.set(current, remaining);
            }
        }

        let affected: Vec<EntityId> = match definition.shape {
            EffectShape::SelfCast => vec![caster],
            EffectShape::Target => match target {
                Some(t) if self.registry.contains(t) => vec![t],
                _ => {
                    debug!(caster = %caster, skill = %definition.name, "cast fizzled: target gone");
                    Vec::new()
                }
            },
            EffectShape::Area { radius } => {
                let center = target.unwrap_or(caster);
                let ledger = self.ledger.read();
                let mut neighbors = index.neighbors_within(center, radius);
                neighbors.sort_unstable();
                neighbors
                    .into_iter()
                    .filter(|&n| n != caster)
                    .filter(|&n| {
                        self.registry
                            .get(n)
                            .is_some_and(|r| !r.filters.blocks(definition.effect.emotion))
                    })
                    .filter(|&n| {
                        ledger.relationship(caster, n).score > self.config.skill.area_score_cutoff
                    })
                    .take(self.config.skill.max_area_targets)
                    .collect()
            }
        };

        self.queue.extend(definition.to_stimuli(caster, &affected));
        if let Some(record) = self.registry.get_mut(caster) {
            record.skills.begin_cooldown(definition);
            for (name, active) in record.skills.refresh_passives(&self.skills, &record.state) {
                debug!(entity = %caster, skill = %name, active, "passive toggled");
            }
        }
        SentioCounters::bump(&self.counters.casts_completed);
    }

    // -----------------------------------------------------------------------
    // The tick
    // -----------------------------------------------------------------------

    /// Advance the simulation by `dt` seconds. See the module docs for the
    /// phase order. `index` answers the neighbourhood queries of influence
    /// and area skills; pass [`crate::influence::NullIndex`] when no
    /// spatial data exists.
    pub fn tick(&mut self, dt: f32, index: &dyn SpatialIndex) {
        if !self.config.general.enabled {
            return;
        }
        let ticks = seconds_to_ticks(dt).max(1);
        self.now = SimTimestamp::now(self.now.tick + ticks);
        self.stimuli_last_tick = 0;

        // 1. Decay, honoring locks; a mood fading out entirely is a change
        //    presentation cares about, so it fans out like any other.
        {
            let Self {
                registry,
                config,
                hub,
                skills,
                now,
                ..
            } = self;
            for record in registry.iter_mut() {
                let previous = record.state.current;
                if record
                    .state
                    .decay(dt, now.tick, &record.profile, &config.emotion)
                {
                    record.skills.refresh_passives(skills, &record.state);
                    hub.emit(&EmotionChange {
                        entity: record.id,
                        emotion: Emotion::NEUTRAL,
                        intensity: 0.0,
                        previous,
                        tick: now.tick,
                    });
                }
            }
        }
        SentioCounters::bump(&self.counters.decay_passes);

        // 2. Shield expiry: filters unregister themselves when done.
        for record in self.registry.iter_mut() {
            record.filters.tick(ticks);
        }

        // 3. Cast completions, in deterministic (caster, skill) order.
        let mut completions = Vec::new();
        for record in self.registry.iter_mut() {
            for completion in record.skills.tick(ticks) {
                completions.push((record.id, completion));
            }
        }
        completions.sort_by(|(a, ca), (b, cb)| a.cmp(b).then(ca.skill.cmp(&cb.skill)));
        for (caster, completion) in completions {
            let Some(definition) = self.skills.get(&completion.skill).cloned() else {
                warn!(caster = %caster, skill = %completion.skill, "completed cast has no definition");
                continue;
            };
            self.complete_cast(caster, &definition, completion.target, index);
        }

        // 4. Direct and skill stimuli, in submission order.
        while let Some(stimulus) = self.queue.pop_front() {
            self.resolve_one(&stimulus);
        }

        // 5. Influence propagation on its own cadence, against a ledger
        //    snapshot, resolved after everything else this tick.
        if self.now.tick.saturating_sub(self.last_influence_tick)
            >= self.config.influence.interval_ticks
        {
            self.last_influence_tick = self.now.tick;
            let snapshot = self.ledger.read().clone();
            let stimuli =
                influence::run_pass(&self.registry, &snapshot, index, &self.config.influence);
            SentioCounters::bump(&self.counters.influence_passes);
            for stimulus in stimuli {
                SentioCounters::bump(&self.counters.influence_stimuli);
                self.resolve_one(&stimulus);
            }
        }
    }

    /// Resolve one stimulus against its target, bump the counters, refresh
    /// passives and fan out the change.
    fn resolve_one(&mut self, stimulus: &Stimulus) -> StateChange {
        let Self {
            registry,
            hub,
            config,
            counters,
            skills,
            now,
            stimuli_last_tick,
            ..
        } = self;
        let Some(record) = registry.get_mut(stimulus.target) else {
            warn!(
                target = %stimulus.target,
                kind = ?stimulus.kind,
                "stimulus for unknown entity dropped"
            );
            SentioCounters::bump(&counters.stimuli_invalid_target);
            return StateChange::InvalidTarget;
        };

        let result = resolution::resolve(record, stimulus, *now, config);
        match &result {
            StateChange::Applied {
                previous,
                emotion,
                intensity,
            } => {
                SentioCounters::bump(&counters.stimuli_applied);
                *stimuli_last_tick += 1;
                for (name, active) in record.skills.refresh_passives(skills, &record.state) {
                    debug!(entity = %record.id, skill = %name, active, "passive toggled");
                }
                hub.emit(&EmotionChange {
                    entity: stimulus.target,
                    emotion: *emotion,
                    intensity: *intensity,
                    previous: *previous,
                    tick: now.tick,
                });
            }
            StateChange::Blocked(BlockReason::Filtered) => {
                SentioCounters::bump(&counters.stimuli_filtered);
            }
            StateChange::Blocked(BlockReason::LockHonored) => {
                SentioCounters::bump(&counters.stimuli_lock_dropped);
            }
            StateChange::InvalidTarget => {}
        }
        result
    }
}
