//! Configuration for the sentio simulation.
//!
//! Maps directly to `sentio.toml`; every field has a serde default so a
//! partial file (or an empty one) yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Top-level sentio configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentioConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Emotional state and stimulus resolution tuning.
    #[serde(default)]
    pub emotion: EmotionConfig,
    /// Per-entity emotion memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Social relationship ledger settings.
    #[serde(default)]
    pub social: SocialConfig,
    /// Influence propagation settings.
    #[serde(default)]
    pub influence: InfluenceConfig,
    /// Skill controller settings.
    #[serde(default)]
    pub skill: SkillConfig,
}

impl SentioConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `SentioError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::SentioError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether the emotion simulation is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
        }
    }
}

/// Emotional state and stimulus resolution tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionConfig {
    /// Default per-second intensity falloff toward neutral, for entities
    /// whose profile doesn't override it.
    #[serde(default = "default_decay_rate")]
    pub default_decay_rate: f32,
    /// While a forced emotion is locked, an incoming stimulus only lands if
    /// its proposed intensity exceeds the current one by this margin.
    #[serde(default = "default_0_2")]
    pub lock_override_margin: f32,
    /// Recency weight of the incoming stimulus when blending intensities of
    /// overlapping (but not equal) emotion sets.
    #[serde(default = "default_0_7")]
    pub blend_recency_weight: f32,
    /// Intensities below this threshold snap to exactly zero / neutral.
    #[serde(default = "default_epsilon")]
    pub neutral_epsilon: f32,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            default_decay_rate: 0.1,
            lock_override_margin: 0.2,
            blend_recency_weight: 0.7,
            neutral_epsilon: 1e-4,
        }
    }
}

/// Per-entity emotion memory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Hard cap on memory records per entity (oldest evicted first).
    #[serde(default = "default_32")]
    pub capacity: usize,
    /// Window, in seconds, that counts as "recent" for habituation and
    /// felt-recently queries.
    #[serde(default = "default_10_0")]
    pub habituation_window_seconds: f32,
    /// Each repeat of the same emotion within the window dampens the next
    /// stimulus by this much.
    #[serde(default = "default_0_25")]
    pub habituation_step: f32,
    /// Lower bound of the habituation dampening factor.
    #[serde(default = "default_0_25")]
    pub habituation_floor: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 32,
            habituation_window_seconds: 10.0,
            habituation_step: 0.25,
            habituation_floor: 0.25,
        }
    }
}

/// Social relationship ledger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialConfig {
    /// Relationship score assigned to a pair on first interaction, before
    /// any deltas are applied.
    #[serde(default)]
    pub initial_score: f32,
    /// Per-second rate at which scores drift back toward zero when the
    /// explicit decay policy runs.
    #[serde(default = "default_0_002")]
    pub score_decay_rate: f32,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            initial_score: 0.0,
            score_decay_rate: 0.002,
        }
    }
}

/// Influence propagation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluenceConfig {
    /// How many ticks between influence passes.
    #[serde(default = "default_30")]
    pub interval_ticks: u64,
    /// Radius within which one entity's mood can reach another.
    #[serde(default = "default_8_0")]
    pub radius: f32,
    /// Pairs whose combined weight falls below this threshold are skipped.
    #[serde(default = "default_0_05")]
    pub min_weight: f32,
    /// Fraction of the weighted source intensity actually transferred.
    #[serde(default = "default_0_5")]
    pub transfer_factor: f32,
}

impl Default for InfluenceConfig {
    fn default() -> Self {
        Self {
            interval_ticks: 30,
            radius: 8.0,
            min_weight: 0.05,
            transfer_factor: 0.5,
        }
    }
}

/// Skill controller settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillConfig {
    /// Area effects skip entities whose relationship score toward the
    /// caster is at or below this cutoff.
    #[serde(default = "default_neg_0_25")]
    pub area_score_cutoff: f32,
    /// Hard cap on entities affected by a single area cast.
    #[serde(default = "default_16")]
    pub max_area_targets: usize,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            area_score_cutoff: -0.25,
            max_area_targets: 16,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_decay_rate() -> f32 { 0.1 }
fn default_epsilon() -> f32 { 1e-4 }
fn default_0_05() -> f32 { 0.05 }
fn default_0_2() -> f32 { 0.2 }
fn default_0_25() -> f32 { 0.25 }
fn default_0_5() -> f32 { 0.5 }
fn default_0_7() -> f32 { 0.7 }
fn default_0_002() -> f32 { 0.002 }
fn default_8_0() -> f32 { 8.0 }
fn default_10_0() -> f32 { 10.0 }
fn default_neg_0_25() -> f32 { -0.25 }
fn default_16() -> usize { 16 }
fn default_30() -> u64 { 30 }
fn default_32() -> usize { 32 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = SentioConfig::from_toml("").expect("empty toml");
        assert!(config.general.enabled);
        assert_eq!(config.memory.capacity, 32);
        assert_eq!(config.influence.interval_ticks, 30);
    }

    #[test]
    fn partial_toml_overrides_one_section() {
        let config = SentioConfig::from_toml(
            r#"
            [influence]
            radius = 12.5
            "#,
        )
        .expect("partial toml");
        assert!((config.influence.radius - 12.5).abs() < f32::EPSILON);
        // Untouched sections keep their defaults.
        assert!((config.emotion.default_decay_rate - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = SentioConfig::from_toml("not = [valid").expect_err("must fail");
        assert!(matches!(err, crate::SentioError::Config(_)));
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sentio.toml");

        let mut config = SentioConfig::default();
        config.memory.capacity = 64;
        config.influence.interval_ticks = 45;
        let serialized = toml::to_string(&config).expect("serialize");
        std::fs::write(&path, serialized).expect("write");

        let restored = SentioConfig::from_file(&path).expect("load");
        assert_eq!(restored.memory.capacity, 64);
        assert_eq!(restored.influence.interval_ticks, 45);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SentioConfig::from_file(std::path::Path::new("/no/such/sentio.toml"))
            .expect_err("must fail");
        assert!(matches!(err, crate::SentioError::Io(_)));
    }
}
