use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::appearance::AppearanceConfig;
use crate::engine::{INITIAL_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS};
use crate::error::{GameError, GameResult};

pub const CONFIG_FILE_NAME: &str = "serpent.yaml";
const DEFAULT_LOG_FILE: &str = "serpent.log";

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct FlavorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for FlavorConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub initial_tick_interval_ms: f64,
    pub frame_interval_ms: u64,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub appearance: AppearanceConfig,
    pub flavor: FlavorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_tick_interval_ms: INITIAL_TICK_INTERVAL_MS,
            frame_interval_ms: 16,
            seed: None,
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            appearance: AppearanceConfig::default(),
            flavor: FlavorConfig::default(),
        }
    }
}

impl Validate for Config {
    // Appearance colours are never rejected here, see `Appearance::from_config`.
    fn validate(&self) -> Result<(), String> {
        if !(MIN_TICK_INTERVAL_MS..=5000.0).contains(&self.initial_tick_interval_ms) {
            return Err(format!(
                "initial_tick_interval_ms must be between {} and 5000, got {}",
                MIN_TICK_INTERVAL_MS, self.initial_tick_interval_ms
            ));
        }
        if !(1..=1000).contains(&self.frame_interval_ms) {
            return Err(format!(
                "frame_interval_ms must be between 1 and 1000, got {}",
                self.frame_interval_ms
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

pub fn parse_config(content: &str) -> GameResult<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_yaml_ng::from_str(content)
        .map_err(|e| GameError::Config(format!("Failed to deserialize config: {}", e)))?;
    config.validate().map_err(GameError::Config)?;
    Ok(config)
}

/// Reads `path`, falling back to defaults when the file does not exist.
pub fn load_config(path: &Path) -> GameResult<Config> {
    match fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(GameError::Config(format!("Failed to read {}: {}", path.display(), e))),
    }
}

pub fn save_config(path: &Path, config: &Config) -> GameResult<()> {
    config.validate().map_err(GameError::Config)?;
    let content = serde_yaml_ng::to_string(config)
        .map_err(|e| GameError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_temp_file_path() -> PathBuf {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_serpent_config_{}.yaml", random_number));
        path
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = parse_config("seed: 42\nflavor: {}\n").unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.initial_tick_interval_ms, INITIAL_TICK_INTERVAL_MS);
        assert_eq!(config.frame_interval_ms, 16);
        assert!(config.flavor.enabled);
    }

    #[test]
    fn test_bad_colours_do_not_fail_loading() {
        let content = "appearance:\n  bg_color: \"chartreuse-ish\"\n  head_color: \"#FFF\"\n";
        let config = parse_config(content).unwrap();
        assert_eq!(config.appearance.bg_color.as_deref(), Some("chartreuse-ish"));
    }

    #[test]
    fn test_out_of_range_interval_is_rejected() {
        let err = parse_config("initial_tick_interval_ms: 10").unwrap_err();
        assert!(
            matches!(err, GameError::Config(ref msg) if msg.contains("initial_tick_interval_ms"))
        );
        assert!(parse_config("frame_interval_ms: 0").is_err());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse_config("\n").unwrap(), Config::default());
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        assert!(matches!(parse_config("seed: [1, 2"), Err(GameError::Config(_))));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config(&get_temp_file_path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load_file() {
        let path = get_temp_file_path();
        let mut config = Config::default();
        config.seed = Some(7);
        config.appearance.food_color = Some("#FF00E5".to_string());
        config.flavor.enabled = false;

        save_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
