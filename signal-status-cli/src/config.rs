//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use signal_status::TrackerConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// JSON-lines signal log to replay
    pub replay: Option<PathBuf>,
    /// Run the built-in simulated controller session instead
    #[serde(default)]
    pub simulate: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Only report signals whose identifier starts with this prefix
    pub prefix: Option<String>,
    /// Report only this signal
    pub signal: Option<String>,
    /// Write the report here instead of stdout
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if config.output.prefix.is_some() && config.output.signal.is_some() {
        anyhow::bail!("Config {:?}: output.prefix and output.signal are mutually exclusive", path);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [tracker]
            categories = ["DO ", "DI "]
            replay_interval_ms = 20

            [tracker.selectors]
            primary = "io-board"
            secondary = "tool"

            [input]
            replay = "session.jsonl"

            [output]
            format = "json"
            prefix = "DO "
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.tracker.selectors.primary, "io-board");
        assert_eq!(config.tracker.categories, vec!["DO ", "DI "]);
        assert_eq!(config.input.replay, Some(PathBuf::from("session.jsonl")));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.prefix.as_deref(), Some("DO "));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.tracker.categories, vec!["DO ", "DI ", "AI "]);
        assert!(!config.input.simulate);
        assert_eq!(config.output.format, OutputFormat::Txt);
    }

    #[test]
    fn test_single_signal_report_to_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nsignal = \"AI 0\"\nfile = \"status.txt\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.output.signal.as_deref(), Some("AI 0"));
        assert_eq!(config.output.file, Some(PathBuf::from("status.txt")));
        assert!(config.output.prefix.is_none());
    }

    #[test]
    fn test_load_config_rejects_conflicting_filters() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nprefix = \"DO \"\nsignal = \"DO 0\"").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
