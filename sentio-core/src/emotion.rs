//! Emotion vocabulary — a bit-flag set of basic emotion categories.
//!
//! The category list follows Ekman's basic-emotion family (1992), extended
//! with the curiosity/calm pair that game characters need for idle and
//! exploration moods. Categories are independent bit flags so an entity can
//! be, say, happy *and* curious at once; the empty set is the neutral
//! baseline. Whether two categories may coexist is a resolution policy,
//! never a property of the type.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// A composable set of emotion categories.
    ///
    /// Intersection and union are single integer ops, which keeps the
    /// filter chain and influence pass cheap.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct Emotion: u16 {
        /// Joy, contentment, delight.
        const HAPPY = 1 << 0;
        /// Sorrow, grief, disappointment.
        const SAD = 1 << 1;
        /// Anger, frustration, hostility.
        const ANGRY = 1 << 2;
        /// Fear, anxiety, dread.
        const AFRAID = 1 << 3;
        /// Curiosity, interest, wonder.
        const CURIOUS = 1 << 4;
        /// Disgust, revulsion.
        const DISGUSTED = 1 << 5;
        /// Surprise, startlement.
        const SURPRISED = 1 << 6;
        /// Calm, serenity, focus.
        const CALM = 1 << 7;
    }
}

impl Emotion {
    /// The neutral baseline — no category set.
    pub const NEUTRAL: Self = Self::empty();

    /// Whether this is the neutral baseline.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.is_empty()
    }

    /// Human-readable label for a single category; composites and the
    /// neutral baseline get collective labels via [`fmt::Display`].
    #[must_use]
    pub fn label(&self) -> &'static str {
        match *self {
            s if s == Self::HAPPY => "happy",
            s if s == Self::SAD => "sad",
            s if s == Self::ANGRY => "angry",
            s if s == Self::AFRAID => "afraid",
            s if s == Self::CURIOUS => "curious",
            s if s == Self::DISGUSTED => "disgusted",
            s if s == Self::SURPRISED => "surprised",
            s if s == Self::CALM => "calm",
            s if s.is_empty() => "neutral",
            _ => "mixed",
        }
    }
}

impl Default for Emotion {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "neutral");
        }
        let mut first = true;
        for flag in self.iter() {
            if !first {
                write!(f, "+")?;
            }
            write!(f, "{}", flag.label())?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_is_empty_set() {
        assert!(Emotion::NEUTRAL.is_neutral());
        assert_eq!(Emotion::default(), Emotion::NEUTRAL);
        assert_eq!(Emotion::NEUTRAL.to_string(), "neutral");
    }

    #[test]
    fn categories_compose() {
        let mood = Emotion::HAPPY | Emotion::CURIOUS;
        assert!(mood.contains(Emotion::HAPPY));
        assert!(mood.intersects(Emotion::CURIOUS | Emotion::SAD));
        assert!(!mood.intersects(Emotion::ANGRY));
        assert_eq!(mood.to_string(), "happy+curious");
    }

    #[test]
    fn single_category_labels() {
        assert_eq!(Emotion::AFRAID.label(), "afraid");
        assert_eq!((Emotion::HAPPY | Emotion::SAD).label(), "mixed");
    }
}
