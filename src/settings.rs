//! Player settings and preferences
//!
//! Persisted separately from scores through a `KeyValueStore`.

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Name used until the player picks one
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";
/// Longest accepted display name, in characters
pub const MAX_PLAYER_NAME_LEN: usize = 20;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum weather particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 30,
            QualityPreset::Medium => 120,
            QualityPreset::High => 400,
        }
    }

    /// Trail length multiplier (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display name submitted with scores
    pub player_name: String,
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Player trail
    pub trails: bool,
    /// Rain/snow particles
    pub weather_particles: bool,
    /// Reduced motion (disables trail and particles)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            quality: QualityPreset::Medium,
            trails: true,
            weather_particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "gap_runner_settings";

    /// Set the display name; blank names fall back to the default
    pub fn set_player_name(&mut self, name: &str) {
        let trimmed: String = name.trim().chars().take(MAX_PLAYER_NAME_LEN).collect();
        self.player_name = if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            trimmed
        };
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if !self.weather_particles || self.reduced_motion {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective trail length
    pub fn trail_length(&self) -> usize {
        if !self.trails || self.reduced_motion {
            0
        } else {
            (crate::consts::TRAIL_LENGTH as f32 * self.quality.trail_quality()).round() as usize
        }
    }

    /// Load settings; absent or malformed data yields defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(mut settings)) => {
                log::info!("Loaded settings");
                let name = settings.player_name.clone();
                settings.set_player_name(&name);
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Discarding unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_player_name_sanitized() {
        let mut settings = Settings::default();
        settings.set_player_name("   ");
        assert_eq!(settings.player_name, DEFAULT_PLAYER_NAME);
        settings.set_player_name("  Grace Hopper  ");
        assert_eq!(settings.player_name, "Grace Hopper");
        settings.set_player_name(&"x".repeat(50));
        assert_eq!(settings.player_name.len(), MAX_PLAYER_NAME_LEN);
    }

    #[test]
    fn test_reduced_motion_disables_cosmetics() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.trail_length(), 0);
    }

    #[test]
    fn test_quality_scales_cosmetics() {
        let settings = Settings {
            quality: QualityPreset::High,
            ..Default::default()
        };
        assert_eq!(settings.max_particles(), 400);
        assert_eq!(settings.trail_length(), crate::consts::TRAIL_LENGTH);
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{ "player_name": "Lin" }"#)
            .expect("set");
        let settings = Settings::load(&store);
        assert_eq!(settings.player_name, "Lin");
        assert!(settings.trails);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.set_player_name("Kay");
        settings.quality = QualityPreset::Low;
        settings.save(&mut store).expect("save");
        assert_eq!(Settings::load(&store), settings);
    }
}
