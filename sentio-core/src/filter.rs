//! Shield/filter effects — temporary stimulus interceptors.
//!
//! A shield blocks incoming stimuli whose triggering emotion intersects its
//! blocked categories, for a fixed number of ticks. Filters are owned by
//! the target entity and consulted in registration order before resolution
//! commits anything; a blocked stimulus leaves no state change and no
//! memory record.

use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::stimulus::Stimulus;

/// Handle returned on registration, used for explicit removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterId(u64);

/// Verdict of a single filter on a single stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Let the stimulus through to resolution.
    Allow,
    /// Veto delivery; the stimulus is silently dropped.
    Block,
}

/// A time-limited shield that vetoes stimuli by emotion category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldFilter {
    /// Emotion categories this shield blocks.
    pub blocked: Emotion,
    /// Ticks remaining before the shield expires.
    pub remaining_ticks: u64,
}

impl ShieldFilter {
    /// Create a shield blocking `blocked` for `duration_ticks`.
    #[must_use]
    pub fn new(blocked: Emotion, duration_ticks: u64) -> Self {
        Self {
            blocked,
            remaining_ticks: duration_ticks,
        }
    }

    /// Decide whether a stimulus may pass.
    #[must_use]
    pub fn filter(&self, stimulus: &Stimulus) -> FilterDecision {
        if stimulus.effect.emotion.intersects(self.blocked) {
            FilterDecision::Block
        } else {
            FilterDecision::Allow
        }
    }

    /// Advance one tick's worth of lifetime. Returns `true` once expired.
    pub fn tick(&mut self, ticks: u64) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(ticks);
        self.remaining_ticks == 0
    }
}

/// Ordered chain of active filters on one entity.
///
/// Filters run in registration order; the first `Block` wins. Expired
/// filters unregister themselves during the per-tick sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterChain {
    filters: Vec<(FilterId, ShieldFilter)>,
    next_id: u64,
}

impl FilterChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter at the end of the chain.
    pub fn register(&mut self, filter: ShieldFilter) -> FilterId {
        let id = FilterId(self.next_id);
        self.next_id += 1;
        self.filters.push((id, filter));
        id
    }

    /// Remove a filter by handle. Returns `true` if it was present.
    pub fn remove(&mut self, id: FilterId) -> bool {
        let before = self.filters.len();
        self.filters.retain(|(fid, _)| *fid != id);
        before != self.filters.len()
    }

    /// Run the chain over a stimulus in registration order.
    #[must_use]
    pub fn apply(&self, stimulus: &Stimulus) -> FilterDecision {
        for (_, filter) in &self.filters {
            if filter.filter(stimulus) == FilterDecision::Block {
                return FilterDecision::Block;
            }
        }
        FilterDecision::Allow
    }

    /// Whether any active filter would block the given emotion. Used as a
    /// cheap pre-check when selecting area-effect targets.
    #[must_use]
    pub fn blocks(&self, emotion: Emotion) -> bool {
        self.filters
            .iter()
            .any(|(_, f)| f.blocked.intersects(emotion))
    }

    /// Advance all filters by `ticks`, dropping the ones that expired.
    pub fn tick(&mut self, ticks: u64) {
        self.filters.retain_mut(|(_, filter)| !filter.tick(ticks));
    }

    /// Number of active filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimulus::{EmotionEffect, StimulusKind};
    use crate::types::EntityId;

    fn stimulus_of(emotion: Emotion) -> Stimulus {
        Stimulus::new(
            EntityId::new(),
            StimulusKind::Direct,
            EmotionEffect::new(emotion, 0.5),
        )
    }

    #[test]
    fn blocks_iff_categories_intersect() {
        let shield = ShieldFilter::new(Emotion::SAD | Emotion::AFRAID, 100);
        assert_eq!(shield.filter(&stimulus_of(Emotion::SAD)), FilterDecision::Block);
        assert_eq!(
            shield.filter(&stimulus_of(Emotion::AFRAID | Emotion::SURPRISED)),
            FilterDecision::Block
        );
        assert_eq!(shield.filter(&stimulus_of(Emotion::HAPPY)), FilterDecision::Allow);
    }

    #[test]
    fn chain_first_block_wins() {
        let mut chain = FilterChain::new();
        chain.register(ShieldFilter::new(Emotion::SAD, 100));
        chain.register(ShieldFilter::new(Emotion::ANGRY, 100));

        assert_eq!(chain.apply(&stimulus_of(Emotion::ANGRY)), FilterDecision::Block);
        assert_eq!(chain.apply(&stimulus_of(Emotion::HAPPY)), FilterDecision::Allow);
    }

    #[test]
    fn expiry_unregisters_the_filter() {
        let mut chain = FilterChain::new();
        chain.register(ShieldFilter::new(Emotion::SAD, 10));
        chain.register(ShieldFilter::new(Emotion::ANGRY, 30));

        chain.tick(10);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.apply(&stimulus_of(Emotion::SAD)), FilterDecision::Allow);
        assert_eq!(chain.apply(&stimulus_of(Emotion::ANGRY)), FilterDecision::Block);

        chain.tick(20);
        assert!(chain.is_empty());
    }

    #[test]
    fn explicit_removal_by_handle() {
        let mut chain = FilterChain::new();
        let id = chain.register(ShieldFilter::new(Emotion::AFRAID, 100));
        assert!(chain.remove(id));
        assert!(!chain.remove(id));
        assert_eq!(chain.apply(&stimulus_of(Emotion::AFRAID)), FilterDecision::Allow);
    }
}
