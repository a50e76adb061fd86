//! Runtime settings
//!
//! Persisted as JSON next to the binary (or wherever the runner is pointed).
//! Gameplay geometry is compile-time and lives in `consts`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

use crate::audio::AudioManager;
use crate::consts::{POOL_CAPACITY, TICK_RATE_HZ};

/// Runner settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the best score is kept
    pub score_file: PathBuf,
    /// Run seed
    pub seed: u64,
    /// Real-time tick rate for interactive drivers
    pub tick_rate_hz: u32,
    /// Free-list size per obstacle class
    pub pool_capacity: usize,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    /// Stop the headless runner after this many ticks
    pub max_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            score_file: PathBuf::from("best_score.dat"),
            seed: 0x5eed,
            tick_rate_hz: TICK_RATE_HZ,
            pool_capacity: POOL_CAPACITY,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            max_ticks: 36_000,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; a missing file gives the defaults
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading settings {}", path.display()));
            }
        };
        let settings: Self = serde_json::from_str(&json)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing settings {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.tick_rate_hz > 0, "tick_rate_hz must be positive");
        ensure!(self.pool_capacity > 0, "pool_capacity must be positive");
        Ok(())
    }

    /// Audio manager configured with these volumes
    pub fn audio_manager(&self) -> AudioManager {
        let mut audio = AudioManager::new();
        audio.set_master_volume(self.master_volume);
        audio.set_sfx_volume(self.sfx_volume);
        audio.set_muted(self.muted);
        audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "flap-sim-settings-{name}-{}.json",
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(temp_path("missing")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let settings = Settings {
            seed: 42,
            muted: true,
            max_ticks: 10,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{ "seed": 7 }"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.pool_capacity, POOL_CAPACITY);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_values_rejected() {
        let path = temp_path("invalid");
        fs::write(&path, r#"{ "pool_capacity": 0 }"#).unwrap();
        assert!(Settings::load(&path).is_err());

        fs::write(&path, "not json").unwrap();
        assert!(Settings::load(&path).is_err());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_audio_manager_follows_settings() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.audio_manager().effective_volume(), 0.0);
    }
}
