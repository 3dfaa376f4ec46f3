/*!
 * Tests for app configuration functionality
 */

use anyhow::Result;
use std::fs;

use crate::common;
use prepapyri::app_config::{Config, LogLevel};
use prepapyri::normalization::DEFAULT_MASK_PATTERN;

/// Test the default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.workspace.input_dir, "in");
    assert_eq!(config.workspace.output_dir, "out");
    assert_eq!(config.workspace.log_dir, "log");
    assert_eq!(config.workspace.archive_dir, "archive");
    assert_eq!(config.workspace.output_suffix, "_out");
    assert!(config.annotation.line_numbers);
    assert!(!config.annotation.recto_verso);
    assert_eq!(config.dots.mask_patterns, vec![DEFAULT_MASK_PATTERN.to_string()]);
    assert!(config.diagnostics);
    assert_eq!(config.preview_chars, 400);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that load_or_create writes defaults when the file is missing
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let (config, created) = Config::load_or_create(&path)?;

    assert!(created);
    assert_eq!(config, Config::default());
    assert!(path.exists());

    let (reloaded, created_again) = Config::load_or_create(&path)?;
    assert!(!created_again);
    assert_eq!(reloaded, config);
    Ok(())
}

#[test]
fn test_load_or_create_withPartialFile_shouldKeepGivenValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"workspace": {"output_suffix": ".norm"}, "log_level": "debug", "diagnostics": false}"#,
    )?;

    let (config, created) = Config::load_or_create(&path)?;

    assert!(!created);
    assert_eq!(config.workspace.output_suffix, ".norm");
    assert_eq!(config.workspace.input_dir, "in");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(!config.diagnostics);
    Ok(())
}

#[test]
fn test_load_or_create_withMalformedJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    let error = Config::load_or_create(&path).unwrap_err();
    assert!(format!("{:#}", error).contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_save_withCustomValues_shouldRoundTripThroughFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    let mut config = Config::default();
    config.annotation.recto_verso = true;
    config.dots.mask_patterns.push(r"\d+\.\d+".to_string());

    config.save(&path)?;
    let written = fs::read_to_string(&path)?;
    let parsed: Config = serde_json::from_str(&written)?;

    assert_eq!(parsed, config);
    Ok(())
}

/// Test validation of empty directory names
#[test]
fn test_validate_withEmptyInputDir_shouldFail() {
    let mut config = Config::default();
    config.workspace.input_dir = "  ".to_string();

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("input_dir"));
}

#[test]
fn test_validate_withArchiveEqualToInput_shouldFail() {
    let mut config = Config::default();
    config.workspace.archive_dir = "in".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withEmptySuffix_shouldFail() {
    let mut config = Config::default();
    config.workspace.output_suffix = String::new();

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("output_suffix"));
}

#[test]
fn test_validate_withBrokenMaskPattern_shouldFail() {
    let mut config = Config::default();
    config.dots.mask_patterns = vec!["(unclosed".to_string()];

    let error = config.validate().unwrap_err();
    assert!(format!("{:#}", error).contains("(unclosed"));
}

#[test]
fn test_build_pipeline_withAnnotationDisabled_shouldAbortRuns() -> Result<()> {
    let mut config = Config::default();
    config.annotation.line_numbers = false;

    let pipeline = config.build_pipeline()?;
    let outcome = pipeline.run(common::SAMPLE_TRANSCRIPTION);

    assert!(outcome.is_aborted());
    Ok(())
}
