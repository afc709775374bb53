//! StudyPlanner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main StudyPlanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// History storage configuration
    pub storage: StorageConfig,

    /// Export output configuration
    pub export: ExportConfig,

    /// Log level (overridden by --log-level)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .studyplanner.yml
        let local_config = PathBuf::from(".studyplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/studyplanner/studyplanner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("studyplanner").join("studyplanner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log-level key, before logging is initialized
    ///
    /// Runs ahead of the full load so the subscriber can be set up first;
    /// any failure falls back to None silently.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct LogLevelOnly {
            #[serde(rename = "log-level")]
            log_level: Option<String>,
        }

        let path = Self::first_existing_config(config_path)?;
        let content = fs::read_to_string(&path).ok()?;
        let parsed: LogLevelOnly = serde_yaml::from_str(&content).ok()?;
        parsed.log_level
    }

    fn first_existing_config(config_path: Option<&PathBuf>) -> Option<PathBuf> {
        if let Some(path) = config_path {
            return Some(path.clone());
        }

        let local_config = PathBuf::from(".studyplanner.yml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("studyplanner").join("studyplanner.yml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "ollama" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Server base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "phi3".to_string(),
            base_url: "http://localhost:11434".to_string(),
            timeout_ms: 300_000,
        }
    }
}

/// History storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the plan history file
    #[serde(rename = "history-path")]
    pub history_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from(planstore::DEFAULT_HISTORY_FILE),
        }
    }
}

/// Export output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Text export path
    #[serde(rename = "text-path")]
    pub text_path: PathBuf,

    /// PDF export path
    #[serde(rename = "pdf-path")]
    pub pdf_path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            text_path: PathBuf::from(crate::DEFAULT_TEXT_EXPORT),
            pdf_path: PathBuf::from(crate::DEFAULT_PDF_EXPORT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.model, "phi3");
        assert_eq!(config.storage.history_path, PathBuf::from("study_plan_history.json"));
        assert_eq!(config.export.text_path, PathBuf::from("ai_study_plan.txt"));
        assert_eq!(config.export.pdf_path, PathBuf::from("ai_study_plan.pdf"));
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "phi3");
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.timeout_ms, 300_000);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: ollama
  model: llama3
  base-url: http://192.168.1.10:11434
  timeout-ms: 60000

storage:
  history-path: /tmp/plans/history.json

export:
  text-path: out/plan.txt
  pdf-path: out/plan.pdf

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.base_url, "http://192.168.1.10:11434");
        assert_eq!(config.llm.timeout_ms, 60_000);
        assert_eq!(config.storage.history_path, PathBuf::from("/tmp/plans/history.json"));
        assert_eq!(config.export.text_path, PathBuf::from("out/plan.txt"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: mistral
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.llm.model, "mistral");

        // Defaults for unspecified
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.storage.history_path, PathBuf::from("study_plan_history.json"));
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        std::fs::write(&path, "llm:\n  model: gemma\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.llm.model, "gemma");
    }

    #[test]
    fn test_load_explicit_path_missing_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.yml");

        assert!(Config::load(Some(&path)).is_err());
    }

    // Changes the process working directory, so it cannot run in parallel
    // with other tests.
    #[test]
    #[serial]
    fn test_load_local_fallback() {
        let temp = TempDir::new().unwrap();
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        std::fs::write(".studyplanner.yml", "llm:\n  model: qwen\n").unwrap();

        let config = Config::load(None).unwrap();

        std::env::set_current_dir(original).unwrap();
        assert_eq!(config.llm.model, "qwen");
    }

    #[test]
    fn test_load_log_level_from_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        std::fs::write(&path, "log-level: trace\n").unwrap();

        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("trace"));
    }

    #[test]
    fn test_load_log_level_absent_key() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        std::fs::write(&path, "llm:\n  model: phi3\n").unwrap();

        assert!(Config::load_log_level(Some(&path)).is_none());
    }
}
