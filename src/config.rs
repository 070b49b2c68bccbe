use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::context::FilterSettings;
use crate::error::{AnalysisError, Result};
use crate::models::OutputFormat;

/// Application configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub analysis: AnalysisConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

/// Classification windows and recompute sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Neighbors checked on each side for apology and de-escalation
    pub repair_radius: usize,
    /// Neighbors checked on each side for laughter
    pub joke_window: usize,
    /// Laughing messages needed to call it a joke
    pub joke_threshold: usize,
    /// Neighbors checked on each side for reciprocal banter
    pub banter_window: usize,
    /// Calendar days per recompute chunk
    pub chunk_days: u32,
    /// Classification threads; 0 uses all cores
    pub worker_threads: usize,
    /// Context messages loaded on each side of a chunk
    pub context_padding: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub default_format: String,
    pub output_directory: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "data/comms-analysis.db".to_string(),
            max_connections: 8,
            busy_timeout_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            format: "text".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let filters = FilterSettings::default();
        Self {
            repair_radius: filters.repair_radius,
            joke_window: filters.joke_window,
            joke_threshold: filters.joke_threshold,
            banter_window: filters.banter_window,
            chunk_days: 31,
            worker_threads: 0,
            context_padding: 8,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: "csv".to_string(),
            output_directory: "./output".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Filter window sizes
    #[must_use]
    pub const fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            repair_radius: self.repair_radius,
            joke_window: self.joke_window,
            joke_threshold: self.joke_threshold,
            banter_window: self.banter_window,
        }
    }
}

impl AppConfig {
    /// Load configuration, optionally layering an explicit file over the defaults.
    ///
    /// Environment variables use the `COMMS_ANALYSIS_` prefix and `__` between
    /// section and key, e.g. `COMMS_ANALYSIS_ANALYSIS__CHUNK_DAYS=7`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            // Start with default values
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("COMMS_ANALYSIS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(AnalysisError::InvalidConfig(msg));

        if self.database.max_connections == 0 {
            return invalid("max_connections must be greater than 0".into());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return invalid(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            ));
        }

        let analysis = &self.analysis;
        if analysis.joke_threshold == 0 {
            return invalid("joke_threshold must be greater than 0".into());
        }
        if analysis.chunk_days == 0 {
            return invalid("chunk_days must be greater than 0".into());
        }
        let widest = analysis
            .repair_radius
            .max(analysis.joke_window)
            .max(analysis.banter_window);
        if analysis.context_padding < widest {
            return invalid(format!(
                "context_padding ({}) must cover the widest filter window ({widest})",
                analysis.context_padding
            ));
        }

        self.export_format()?;

        Ok(())
    }

    /// The configured default export format
    pub fn export_format(&self) -> Result<OutputFormat> {
        self.export.default_format.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.analysis.repair_radius, 1);
        assert_eq!(config.analysis.joke_window, 3);
        assert_eq!(config.analysis.banter_window, 4);
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.analysis.context_padding = 2;
        assert!(matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))));
    }
}
