//! Skill definitions and the per-entity skill controller.
//!
//! Definitions are immutable shared templates, validated once at load time
//! and registered by name in a [`SkillLibrary`]. Each entity owns a
//! [`SkillBook`] holding the mutable side: the Ready → Casting → Cooldown
//! state machine per skill, and the on/off flags of passive skills.
//!
//! Casting is logical suspension: a "ticks remaining" counter checked once
//! per tick, never a scheduled task, so the simulation advance stays
//! deterministic and single-pass.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::error::{Result, SentioError};
use crate::memory::EmotionMemory;
use crate::state::EmotionalState;
use crate::stimulus::{EmotionEffect, Stimulus, StimulusKind};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Who a skill's effect lands on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectShape {
    /// Affects the caster only.
    SelfCast,
    /// Affects a single chosen target.
    Target,
    /// Affects every eligible entity within `radius` of the caster (or of
    /// the chosen target, when one is given).
    Area {
        /// Effect radius in world units.
        radius: f32,
    },
}

/// A memory-based activation requirement: the caster must have recently
/// felt an emotion, whether or not it still holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeltRecently {
    /// The emotion the caster must have a recent record of.
    pub emotion: Emotion,
    /// How far back, in ticks, "recently" reaches.
    pub window_ticks: u64,
}

/// Immutable, shared skill template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Unique skill name; the registration key.
    pub name: String,
    /// Emotion categories the caster's current emotion must contain.
    pub required: Emotion,
    /// Minimum intensity the caster must hold to activate.
    pub min_intensity: f32,
    /// Optional memory gate on top of the current-emotion requirement.
    pub requires_felt: Option<FeltRecently>,
    /// Whether activating spends emotional intensity.
    pub consumes_emotion: bool,
    /// Intensity consumed from the caster at cast completion.
    pub consumption: f32,
    /// Ticks spent casting before the effect lands; zero casts instantly.
    pub cast_ticks: u64,
    /// Ticks of cooldown after the effect lands.
    pub cooldown_ticks: u64,
    /// Passive skills have no state machine; they are on while their
    /// emotion condition holds.
    pub passive: bool,
    /// Who the effect lands on.
    pub shape: EffectShape,
    /// The emotional payload delivered to each affected entity.
    pub effect: EmotionEffect,
    /// If set, the delivered emotion is locked for this many ticks.
    pub lock_ticks: Option<u64>,
}

impl SkillDefinition {
    /// Create an instant, non-consuming active skill.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        required: Emotion,
        min_intensity: f32,
        shape: EffectShape,
        effect: EmotionEffect,
    ) -> Self {
        Self {
            name: name.into(),
            required,
            min_intensity: min_intensity.clamp(0.0, 1.0),
            requires_felt: None,
            consumes_emotion: false,
            consumption: 0.0,
            cast_ticks: 0,
            cooldown_ticks: 0,
            passive: false,
            shape,
            effect,
            lock_ticks: None,
        }
    }

    /// Set the cast time in ticks.
    #[must_use]
    pub fn with_cast(mut self, ticks: u64) -> Self {
        self.cast_ticks = ticks;
        self
    }

    /// Set the cooldown in ticks.
    #[must_use]
    pub fn with_cooldown(mut self, ticks: u64) -> Self {
        self.cooldown_ticks = ticks;
        self
    }

    /// Make the skill consume caster intensity at cast completion.
    #[must_use]
    pub fn with_consumption(mut self, amount: f32) -> Self {
        self.consumes_emotion = true;
        self.consumption = amount.clamp(0.0, 1.0);
        self
    }

    /// Lock the delivered emotion on each affected entity.
    #[must_use]
    pub fn with_lock(mut self, ticks: u64) -> Self {
        self.lock_ticks = Some(ticks);
        self
    }

    /// Require a recent memory of `emotion` within `window_ticks`.
    #[must_use]
    pub fn with_felt_requirement(mut self, emotion: Emotion, window_ticks: u64) -> Self {
        self.requires_felt = Some(FeltRecently {
            emotion,
            window_ticks,
        });
        self
    }

    /// Mark the skill passive.
    #[must_use]
    pub fn as_passive(mut self) -> Self {
        self.passive = true;
        self
    }

    /// Load-time validation; activations assume a validated definition and
    /// do not re-check.
    ///
    /// # Errors
    /// Returns `SentioError::InvalidDefinition` describing the first
    /// problem found.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: &str| {
            Err(SentioError::InvalidDefinition {
                name: self.name.clone(),
                reason: reason.to_string(),
            })
        };
        if self.name.is_empty() {
            return fail("empty name");
        }
        if self.consumes_emotion && self.consumption <= 0.0 {
            return fail("consumes emotion but consumption is zero");
        }
        if let EffectShape::Area { radius } = self.shape {
            if radius <= 0.0 {
                return fail("area radius must be positive");
            }
        }
        if let Some(felt) = &self.requires_felt {
            if felt.emotion.is_neutral() {
                return fail("felt-recently gate needs a non-neutral emotion");
            }
            if felt.window_ticks == 0 {
                return fail("felt-recently gate needs a non-zero window");
            }
        }
        if self.passive {
            if self.cast_ticks != 0 || self.cooldown_ticks != 0 {
                return fail("passive skills cannot cast or cool down");
            }
            if self.consumes_emotion {
                return fail("passive skills cannot consume emotion");
            }
            if self.required.is_neutral() {
                return fail("passive skills need an emotion condition");
            }
        }
        Ok(())
    }

    /// Build the stimuli a completed cast delivers, one per affected
    /// entity. `affected` must already be shaped and vetted by the caller
    /// (self, the chosen target, or the filtered area candidates).
    #[must_use]
    pub fn to_stimuli(&self, caster: EntityId, affected: &[EntityId]) -> Vec<Stimulus> {
        affected
            .iter()
            .map(|&target| {
                let mut stimulus =
                    Stimulus::new(target, StimulusKind::Skill, self.effect).from_source(caster);
                if let Some(ticks) = self.lock_ticks {
                    stimulus = stimulus.with_lock(ticks);
                }
                stimulus
            })
            .collect()
    }
}

/// Shared, read-only collection of validated skill definitions.
#[derive(Debug, Clone, Default)]
pub struct SkillLibrary {
    skills: HashMap<String, SkillDefinition>,
}

impl SkillLibrary {
    /// Create an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a definition, replacing any previous one with
    /// the same name.
    ///
    /// # Errors
    /// Returns the definition's validation error, if any.
    pub fn register(&mut self, definition: SkillDefinition) -> Result<()> {
        definition.validate()?;
        self.skills.insert(definition.name.clone(), definition);
        Ok(())
    }

    /// Look up a definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SkillDefinition> {
        self.skills.get(name)
    }

    /// Number of registered skills.
    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Whether the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Per-entity controller state
// ---------------------------------------------------------------------------

/// Where one (entity, skill) pair sits in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillPhase {
    /// Available for activation.
    Ready,
    /// Cast in progress; completes when the counter reaches zero.
    Casting {
        /// Ticks left until the effect lands.
        remaining: u64,
    },
    /// Recently used; unavailable until the counter reaches zero.
    Cooldown {
        /// Ticks left until the skill is ready again.
        remaining: u64,
    },
}

/// A cast that finished this tick and whose effect must now land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastCompletion {
    /// The skill whose cast completed.
    pub skill: String,
    /// The chosen target, for targeted shapes.
    pub target: Option<EntityId>,
}

/// Why an activation was refused. Policy outcomes, not faults — callers
/// (UI, AI) are expected to react to them.
#[derive(Debug, Clone, PartialEq)]
pub enum UnavailableReason {
    /// No definition registered under that name.
    UnknownSkill,
    /// The casting entity is not registered.
    UnknownEntity,
    /// The skill is cooling down.
    OnCooldown {
        /// Ticks left on the cooldown.
        remaining: u64,
    },
    /// A cast of this skill is already in progress.
    StillCasting,
    /// The caster's current emotion lacks a required category.
    EmotionMismatch {
        /// The categories the skill requires.
        required: Emotion,
    },
    /// The caster's intensity is below the skill's minimum.
    InsufficientIntensity {
        /// Minimum intensity required.
        required: f32,
        /// The caster's current intensity.
        current: f32,
    },
    /// The caster has no recent memory of the required feeling.
    NotFeltRecently {
        /// The emotion the skill's memory gate asks for.
        required: Emotion,
    },
    /// A targeted skill was activated without a live target.
    InvalidTarget,
    /// Passive skills cannot be activated explicitly.
    PassiveSkill,
}

/// Outcome of an activation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// The activation was accepted; the cast has begun (or, for instant
    /// skills, already landed).
    Accepted,
    /// The activation was refused for the given reason.
    Unavailable(UnavailableReason),
}

impl Activation {
    /// Whether the activation was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Per-entity mutable skill state: one phase per known skill plus passive
/// on/off flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillBook {
    phases: HashMap<String, SkillPhase>,
    /// Targets of in-flight casts, keyed by skill name.
    cast_targets: HashMap<String, Option<EntityId>>,
    passives_on: HashMap<String, bool>,
}

impl SkillBook {
    /// Create an empty skill book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase for a skill; skills never seen are Ready.
    #[must_use]
    pub fn phase(&self, skill: &str) -> SkillPhase {
        self.phases
            .get(skill)
            .copied()
            .unwrap_or(SkillPhase::Ready)
    }

    /// Gate an activation against the caster's state and memory. Returns
    /// the refusal reason, or `None` when the activation may proceed.
    /// `target_live` reports whether the chosen target references a live
    /// entity.
    #[must_use]
    pub fn check_gate(
        &self,
        definition: &SkillDefinition,
        state: &EmotionalState,
        memory: &EmotionMemory,
        now_tick: u64,
        target: Option<EntityId>,
        target_live: bool,
    ) -> Option<UnavailableReason> {
        if definition.passive {
            return Some(UnavailableReason::PassiveSkill);
        }
        match self.phase(&definition.name) {
            SkillPhase::Cooldown { remaining } => {
                return Some(UnavailableReason::OnCooldown { remaining });
            }
            SkillPhase::Casting { .. } => return Some(UnavailableReason::StillCasting),
            SkillPhase::Ready => {}
        }
        if !state.current.contains(definition.required) {
            return Some(UnavailableReason::EmotionMismatch {
                required: definition.required,
            });
        }
        if state.intensity < definition.min_intensity {
            return Some(UnavailableReason::InsufficientIntensity {
                required: definition.min_intensity,
                current: state.intensity,
            });
        }
        if let Some(felt) = &definition.requires_felt {
            if !memory.felt_recently(felt.emotion, felt.window_ticks, now_tick) {
                return Some(UnavailableReason::NotFeltRecently {
                    required: felt.emotion,
                });
            }
        }
        if matches!(definition.shape, EffectShape::Target) && (target.is_none() || !target_live) {
            return Some(UnavailableReason::InvalidTarget);
        }
        None
    }

    /// Enter the Casting phase for a skill whose gate already passed.
    pub fn begin_cast(&mut self, definition: &SkillDefinition, target: Option<EntityId>) {
        self.phases.insert(
            definition.name.clone(),
            SkillPhase::Casting {
                remaining: definition.cast_ticks,
            },
        );
        self.cast_targets.insert(definition.name.clone(), target);
    }

    /// Enter the Cooldown phase after a cast lands; zero-cooldown skills go
    /// straight back to Ready.
    pub fn begin_cooldown(&mut self, definition: &SkillDefinition) {
        self.cast_targets.remove(&definition.name);
        if definition.cooldown_ticks == 0 {
            self.phases.remove(&definition.name);
        } else {
            self.phases.insert(
                definition.name.clone(),
                SkillPhase::Cooldown {
                    remaining: definition.cooldown_ticks,
                },
            );
        }
    }

    /// Advance all phases by `ticks`. Returns the casts that completed,
    /// sorted by skill name so the resolution order is deterministic.
    pub fn tick(&mut self, ticks: u64) -> Vec<CastCompletion> {
        let mut completed = Vec::new();
        self.phases.retain(|name, phase| match phase {
            SkillPhase::Casting { remaining } => {
                *remaining = remaining.saturating_sub(ticks);
                if *remaining == 0 {
                    completed.push(name.clone());
                }
                // Keep the entry; `begin_cooldown` rewrites it once the
                // effect has landed.
                true
            }
            SkillPhase::Cooldown { remaining } => {
                *remaining = remaining.saturating_sub(ticks);
                *remaining > 0
            }
            SkillPhase::Ready => false,
        });

        completed.sort_unstable();
        completed
            .into_iter()
            .map(|skill| {
                let target = self.cast_targets.get(&skill).copied().flatten();
                CastCompletion { skill, target }
            })
            .collect()
    }

    /// Re-evaluate passive skills against the caster's state. Returns the
    /// passives whose on/off status flipped, with their new status.
    pub fn refresh_passives(
        &mut self,
        library: &SkillLibrary,
        state: &EmotionalState,
    ) -> Vec<(String, bool)> {
        let mut changed = Vec::new();
        for definition in library.skills.values().filter(|d| d.passive) {
            let holds = state.current.contains(definition.required)
                && state.intensity >= definition.min_intensity;
            let previous = self
                .passives_on
                .insert(definition.name.clone(), holds)
                .unwrap_or(false);
            if previous != holds {
                changed.push((definition.name.clone(), holds));
            }
        }
        changed.sort_unstable();
        changed
    }

    /// Whether a passive skill is currently active.
    #[must_use]
    pub fn is_passive_active(&self, skill: &str) -> bool {
        self.passives_on.get(skill).copied().unwrap_or(false)
    }
}
