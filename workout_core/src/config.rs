//! Configuration file support for wtrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wtrack/config.toml`.

use crate::ids::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
use crate::storage::WorkoutFile;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ids: IdConfig,
}

/// Data storage location
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_file_name(),
        }
    }
}

/// On-disk record layout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageFormat {
    /// `key: value` blocks separated by blank lines
    #[default]
    Text,
    /// One JSON object per line
    Jsonl,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub format: StorageFormat,
}

/// How new workout ids are chosen
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Random 4-digit ids
    #[default]
    Random,
    /// One past the highest id in use
    Sequential,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct IdConfig {
    #[serde(default)]
    pub strategy: IdStrategy,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("wtrack")
}

fn default_file_name() -> String {
    "workouts.txt".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("wtrack").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let name = self.data.file_name.trim();
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(Error::Config(format!(
                "data.file_name must be a plain file name, got {:?}",
                self.data.file_name
            )));
        }
        Ok(())
    }

    /// Full path of the workout file
    pub fn workout_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.data.file_name)
    }

    /// Workout file handle using the configured location and format
    pub fn workout_file(&self) -> WorkoutFile {
        WorkoutFile::new(self.workout_path(), self.storage.format)
    }

    /// Id generator for the configured strategy
    pub fn id_generator(&self) -> Box<dyn IdGenerator> {
        match self.ids.strategy {
            IdStrategy::Random => Box::new(RandomIdGenerator::new()),
            IdStrategy::Sequential => Box::new(SequentialIdGenerator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.file_name, "workouts.txt");
        assert_eq!(config.storage.format, StorageFormat::Text);
        assert_eq!(config.ids.strategy, IdStrategy::Random);
        assert!(config.workout_path().ends_with("wtrack/workouts.txt"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.storage.format = StorageFormat::Jsonl;
        config.ids.strategy = IdStrategy::Sequential;
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.storage.format, StorageFormat::Jsonl);
        assert_eq!(parsed.ids.strategy, IdStrategy::Sequential);
        assert_eq!(parsed.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[storage]
format = "jsonl"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.format, StorageFormat::Jsonl);
        assert_eq!(config.data.file_name, "workouts.txt"); // default
        assert_eq!(config.ids.strategy, IdStrategy::Random); // default
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[storage]\nformat = \"xml\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_file_name_with_separator_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[data]\nfile_name = \"../escape.txt\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
