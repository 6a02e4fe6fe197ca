//! RescueDaemon configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main RescueDaemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External simulator connection
    pub simulation: SimulationConfig,

    /// Task board behavior and actor channel sizes
    pub board: BoardConfig,

    /// Mission goal
    pub mission: MissionConfig,

    /// Event bus and event log
    pub events: EventsConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if self.simulation.timeout_ms == 0 {
            return Err(eyre::eyre!("simulation.timeout-ms must be greater than zero"));
        }

        let url = reqwest::Url::parse(&self.simulation.base_url)
            .context(format!("Invalid simulation.base-url: {}", self.simulation.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(eyre::eyre!(
                "simulation.base-url must use http or https, got {}",
                url.scheme()
            ));
        }

        if self.board.channel_buffer == 0 {
            return Err(eyre::eyre!("board.channel-buffer must be greater than zero"));
        }

        if self.events.capacity == 0 {
            return Err(eyre::eyre!("events.capacity must be greater than zero"));
        }

        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .rescuedaemon.yml
        let local_config = PathBuf::from(".rescuedaemon.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/rescuedaemon/rescuedaemon.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("rescuedaemon").join("rescuedaemon.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Simulator connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulator base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Task board configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Reject assignments to agents lacking the task's capability
    #[serde(rename = "enforce-capabilities")]
    pub enforce_capabilities: bool,

    /// Command channel size for every coordination actor
    #[serde(rename = "channel-buffer")]
    pub channel_buffer: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            enforce_capabilities: false,
            channel_buffer: 256,
        }
    }
}

/// Mission goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    #[serde(rename = "total-victims")]
    pub total_victims: u32,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self { total_victims: 10 }
    }
}

/// Event bus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity
    pub capacity: usize,

    /// Append every event to this JSONL file
    #[serde(rename = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: crate::events::DEFAULT_CHANNEL_CAPACITY,
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.simulation.base_url, "http://localhost:5000");
        assert_eq!(config.simulation.timeout_ms, 10_000);
        assert!(!config.board.enforce_capabilities);
        assert_eq!(config.board.channel_buffer, 256);
        assert_eq!(config.mission.total_victims, 10);
        assert_eq!(config.events.capacity, 1024);
        assert!(config.events.log_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
simulation:
  base-url: http://sim.local:8080
  timeout-ms: 2500

board:
  enforce-capabilities: true
  channel-buffer: 32

mission:
  total-victims: 4

events:
  capacity: 64
  log-file: /tmp/rescuedaemon-events.jsonl
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.simulation.base_url, "http://sim.local:8080");
        assert_eq!(config.simulation.timeout_ms, 2500);
        assert!(config.board.enforce_capabilities);
        assert_eq!(config.board.channel_buffer, 32);
        assert_eq!(config.mission.total_victims, 4);
        assert_eq!(config.events.capacity, 64);
        assert_eq!(
            config.events.log_file,
            Some(PathBuf::from("/tmp/rescuedaemon-events.jsonl"))
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
mission:
  total-victims: 3
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.mission.total_victims, 3);
        assert_eq!(config.simulation.base_url, "http://localhost:5000");
        assert_eq!(config.board.channel_buffer, 256);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.simulation.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.base_url = "ftp://sim.local".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.board.channel_buffer = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.events.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "mission:\n  total-victims: 7").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.mission.total_victims, 7);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "mission: [not, a, map").unwrap();
        assert!(Config::load_from_file(file.path()).is_err());
    }
}
