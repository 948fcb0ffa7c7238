//! Core type definitions for the sentio simulation.
//!
//! All types are serializable and cheap to copy; the hot simulation loop
//! moves `EntityId`s and `SimTimestamp`s around by value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Simulation ticks per second of game time.
///
/// Durations exposed in seconds on the public API are converted to ticks
/// with this constant.
pub const TICKS_PER_SECOND: u64 = 60;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Unique identifier for any simulated participant (NPC, player, creature).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Simulation timestamp measured in ticks since world creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTimestamp {
    /// Simulation tick (monotonically increasing).
    pub tick: u64,
    /// Corresponding real-world wall-clock time (for save metadata).
    pub real_time: DateTime<Utc>,
}

impl SimTimestamp {
    /// Create a new timestamp at the current wall-clock time.
    #[must_use]
    pub fn now(tick: u64) -> Self {
        Self {
            tick,
            real_time: Utc::now(),
        }
    }

    /// Seconds of game time elapsed since `other`.
    #[must_use]
    pub fn seconds_since(&self, other: &Self) -> f32 {
        (self.tick.saturating_sub(other.tick)) as f32 / TICKS_PER_SECOND as f32
    }
}

/// Convert a duration in seconds to whole ticks (rounded, at least one tick
/// for any positive duration).
#[must_use]
pub fn seconds_to_ticks(seconds: f32) -> u64 {
    if seconds <= 0.0 {
        return 0;
    }
    ((seconds * TICKS_PER_SECOND as f32).round() as u64).max(1)
}

// ---------------------------------------------------------------------------
// Spatial
// ---------------------------------------------------------------------------

/// A 3D position in the game world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Position {
    /// Create a position from coordinates.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Emotion profile (personality)
// ---------------------------------------------------------------------------

/// Per-entity emotional personality. Each trait ranges 0.0–1.0.
///
/// Profiles modulate how strongly stimuli land, how fast moods fade, and
/// how much of an entity's mood bleeds onto its neighbours.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmotionProfile {
    /// How strongly stimuli affect the entity (0 = stoic, 1 = volatile).
    pub volatility: f32,
    /// How quickly moods fade back to neutral (0 = broods, 1 = shrugs it off).
    pub resilience: f32,
    /// How much the entity's mood radiates to nearby entities.
    pub sociability: f32,
    /// How visibly emotions show — presentation hint only, never read by
    /// the simulation itself.
    pub expressiveness: f32,
}

impl EmotionProfile {
    /// Create a profile with all traits clamped to [0, 1].
    #[must_use]
    pub fn new(volatility: f32, resilience: f32, sociability: f32, expressiveness: f32) -> Self {
        Self {
            volatility: volatility.clamp(0.0, 1.0),
            resilience: resilience.clamp(0.0, 1.0),
            sociability: sociability.clamp(0.0, 1.0),
            expressiveness: expressiveness.clamp(0.0, 1.0),
        }
    }
}

impl Default for EmotionProfile {
    fn default() -> Self {
        Self {
            volatility: 0.5,
            resilience: 0.5,
            sociability: 0.5,
            expressiveness: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Runtime statistics
// ---------------------------------------------------------------------------

/// Runtime statistics for the whole simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimStats {
    /// Number of live entities.
    pub live_entities: usize,
    /// Stimuli resolved during the last tick.
    pub stimuli_last_tick: u32,
    /// Tick at which the last influence pass ran.
    pub last_influence_tick: u64,
}
