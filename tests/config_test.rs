//! Layered configuration loading

use std::fs;

use comms_analysis::config::AppConfig;
use comms_analysis::models::OutputFormat;
use comms_analysis::AnalysisError;
use tempfile::TempDir;

#[test]
fn test_file_overrides_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("override.toml");
    fs::write(
        &path,
        r#"
[database]
url = "sqlite:/tmp/override.db"

[analysis]
chunk_days = 7
repair_radius = 2

[export]
default_format = "json"
"#,
    )
    .expect("Failed to write config");

    let config = AppConfig::load_from(Some(&path)).expect("Failed to load config");
    assert_eq!(config.database.url, "sqlite:/tmp/override.db");
    assert_eq!(config.analysis.chunk_days, 7);
    assert_eq!(config.analysis.repair_radius, 2);
    // untouched keys keep their defaults
    assert_eq!(config.analysis.joke_window, 3);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.export_format().expect("valid format"), OutputFormat::Json);
    assert_eq!(config.analysis.filter_settings().repair_radius, 2);
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[analysis]\ncontext_padding = 1\nbanter_window = 6\n").expect("Failed to write config");

    let err = AppConfig::load_from(Some(&path)).expect_err("padding below the banter window");
    assert!(matches!(err, AnalysisError::InvalidConfig(_)));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let result = AppConfig::load_from(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(AnalysisError::Config(_))));
}

#[test]
fn test_validation_rules() {
    let mut config = AppConfig::default();
    config.analysis.chunk_days = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.analysis.joke_threshold = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.export.default_format = "pdf".to_string();
    assert!(config.validate().is_err());
}
