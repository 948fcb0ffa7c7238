//! Social relationship ledger — pairwise score and familiarity.
//!
//! One record per unordered entity pair, created lazily on first
//! interaction. Lookup is symmetric: the pair key is canonicalized by
//! ordering the two IDs, so `relationship(a, b)` and `relationship(b, a)`
//! always hit the same entry. Score is clamped to [-1, 1] after every
//! update; familiarity to [0, 1] and it only ever grows, except through the
//! explicit decay policy (which leaves it untouched and erodes score only).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Canonical key for an unordered entity pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey(EntityId, EntityId);

impl PairKey {
    /// Build the canonical key for two entities, in either order.
    #[must_use]
    pub fn new(a: EntityId, b: EntityId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    /// Whether the pair involves the given entity.
    #[must_use]
    pub fn involves(&self, entity: EntityId) -> bool {
        self.0 == entity || self.1 == entity
    }
}

/// Relationship record for one entity pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Relationship {
    /// Affinity in [-1, 1]: negative is hostile, positive is friendly.
    pub score: f32,
    /// How much interaction history exists, in [0, 1]. Monotone
    /// non-decreasing outside the explicit reset policy.
    pub familiarity: f32,
    /// Number of recorded interactions.
    pub interactions: u32,
}

impl Relationship {
    /// A brand-new relationship with the given starting score.
    #[must_use]
    pub fn new(initial_score: f32) -> Self {
        Self {
            score: initial_score.clamp(-1.0, 1.0),
            familiarity: 0.0,
            interactions: 0,
        }
    }

    /// Multiplier this relationship contributes to emotional influence.
    ///
    /// Maps score [-1, 1] onto [0, 1] — a warm relationship amplifies, a
    /// hostile one dampens toward nothing — and familiarity adds up to a
    /// 2x boost on top: strangers barely affect each other.
    #[must_use]
    pub fn influence_multiplier(&self) -> f32 {
        let affinity = 0.5 + 0.5 * self.score;
        let closeness = 0.5 + 0.5 * self.familiarity;
        affinity * closeness
    }
}

impl Default for Relationship {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// The globally shared ledger of pairwise relationships.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipLedger {
    entries: HashMap<PairKey, Relationship>,
    initial_score: f32,
}

impl RelationshipLedger {
    /// Create an empty ledger whose lazily created entries start at
    /// `initial_score`.
    #[must_use]
    pub fn new(initial_score: f32) -> Self {
        Self {
            entries: HashMap::new(),
            initial_score: initial_score.clamp(-1.0, 1.0),
        }
    }

    /// Record an interaction between two entities, creating the pair entry
    /// if absent. Score and familiarity are clamped after the update.
    pub fn record_interaction(
        &mut self,
        a: EntityId,
        b: EntityId,
        delta_score: f32,
        delta_familiarity: f32,
    ) {
        let initial = self.initial_score;
        let entry = self
            .entries
            .entry(PairKey::new(a, b))
            .or_insert_with(|| Relationship::new(initial));
        entry.score = (entry.score + delta_score).clamp(-1.0, 1.0);
        // Familiarity never decreases through interactions.
        entry.familiarity = (entry.familiarity + delta_familiarity.max(0.0)).clamp(0.0, 1.0);
        entry.interactions = entry.interactions.saturating_add(1);
    }

    /// Look up the relationship for a pair, in either argument order.
    /// Unknown pairs read as a default (neutral, unfamiliar) record.
    #[must_use]
    pub fn relationship(&self, a: EntityId, b: EntityId) -> Relationship {
        self.entries
            .get(&PairKey::new(a, b))
            .copied()
            .unwrap_or_else(|| Relationship::new(self.initial_score))
    }

    /// Whether a pair has an explicit entry.
    #[must_use]
    pub fn knows(&self, a: EntityId, b: EntityId) -> bool {
        self.entries.contains_key(&PairKey::new(a, b))
    }

    /// Remove every entry involving the given entity. Called on entity
    /// destruction.
    pub fn prune(&mut self, entity: EntityId) {
        self.entries.retain(|key, _| !key.involves(entity));
    }

    /// Explicit decay policy: scores drift exponentially toward zero over
    /// `elapsed_seconds`; familiarity is deliberately left alone.
    pub fn decay_scores(&mut self, rate: f32, elapsed_seconds: f32) {
        if rate <= 0.0 || elapsed_seconds <= 0.0 {
            return;
        }
        let factor = (-rate * elapsed_seconds).exp();
        for entry in self.entries.values_mut() {
            entry.score *= factor;
        }
    }

    /// Number of tracked pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
