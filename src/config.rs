use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of simultaneous music streams the table is sized for.
const DEFAULT_MAX_STREAMS: usize = 10;

/// Target hash-table fill factor, in percent. Kept low so handle lookup
/// stays near constant time even at full capacity.
const DEFAULT_LOAD_FACTOR_PERCENT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Maximum number of concurrently loaded music streams
    #[serde(default = "default_max_streams")]
    pub max_streams: usize,

    /// Hash-table fill factor in percent (1-100)
    #[serde(default = "default_load_factor")]
    pub load_factor_percent: usize,

    /// Base path prepended to every relative load path. When absent the
    /// platform-resolved path is used instead.
    #[serde(default)]
    pub base_path: Option<String>,
}

fn default_max_streams() -> usize {
    DEFAULT_MAX_STREAMS
}

fn default_load_factor() -> usize {
    DEFAULT_LOAD_FACTOR_PERCENT
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            max_streams: DEFAULT_MAX_STREAMS,
            load_factor_percent: DEFAULT_LOAD_FACTOR_PERCENT,
            base_path: None,
        }
    }
}

impl AudioConfig {
    /// Load configuration from a JSON file, falling back to defaults when the
    /// file doesn't exist. A present-but-broken file is an error, not a
    /// silent fallback.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();

        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: AudioConfig = serde_json::from_str(&content)?;
            tracing::info!("Loaded audio config from: {}", path.display());
            Ok(config)
        } else {
            tracing::debug!(
                "No audio config at {}, using defaults",
                path.display()
            );
            Ok(AudioConfig::default())
        }
    }

    /// Save configuration to disk as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Number of hash-table slots to reserve so the table never exceeds the
    /// configured fill factor at full capacity.
    pub fn table_slots(&self) -> usize {
        let load_factor = self.load_factor_percent.clamp(1, 100);
        (self.max_streams * 100).div_ceil(load_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AudioConfig::default();
        assert_eq!(config.max_streams, 10);
        assert_eq!(config.load_factor_percent, 50);
        assert!(config.base_path.is_none());
    }

    #[test]
    fn test_table_slots_respects_load_factor() {
        let config = AudioConfig::default();
        // 10 entries at 50% fill need 20 slots
        assert_eq!(config.table_slots(), 20);

        let config = AudioConfig {
            max_streams: 3,
            load_factor_percent: 100,
            base_path: None,
        };
        assert_eq!(config.table_slots(), 3);
    }

    #[test]
    fn test_table_slots_clamps_degenerate_load_factor() {
        let config = AudioConfig {
            max_streams: 4,
            load_factor_percent: 0,
            base_path: None,
        };
        assert_eq!(config.table_slots(), 400);
    }

    #[test]
    fn test_config_json_round_trip() {
        let json = r#"{ "max_streams": 4, "base_path": "/assets/" }"#;
        let config: AudioConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.max_streams, 4);
        // Omitted fields fall back to defaults
        assert_eq!(config.load_factor_percent, 50);
        assert_eq!(config.base_path.as_deref(), Some("/assets/"));

        let back = serde_json::to_string(&config).unwrap();
        let reparsed: AudioConfig = serde_json::from_str(&back).unwrap();
        assert_eq!(reparsed.max_streams, 4);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AudioConfig::load_or_default("/nonexistent/audio.json").unwrap();
        assert_eq!(config.max_streams, 10);
    }
}
