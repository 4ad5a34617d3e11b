/*!
 * Tests for application configuration
 */

use anyhow::Result;
use wordbridge::app_config::{Config, LogLevel};
use wordbridge::alignment::MatchSettings;
use crate::common;

#[test]
fn test_default_shouldUseReaderDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "ru");
    assert_eq!(config.service.endpoint, "http://localhost:8000");
    assert_eq!(config.service.mapping_path, "/api/book-mapping");
    assert_eq!(config.matching.match_settings(), MatchSettings::default());
    assert_eq!(config.matching.paragraph_min_score, 0.7);
    assert_eq!(config.matching.hit_padding, 10.0);
    assert_eq!(config.cache.capacity, Some(1024));
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_saveAndLoad_shouldRoundTripThroughFile() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("wordbridge.json");

    let mut config = Config::default();
    config.target_language = "de".to_string();
    config.service.api_token = "secret".to_string();
    config.matching.window_ratio = 0.25;
    config.cache.capacity = None;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::load(&path)?;
    assert_eq!(loaded.target_language, "de");
    assert_eq!(loaded.service.api_token, "secret");
    assert_eq!(loaded.matching.window_ratio, 0.25);
    assert_eq!(loaded.cache.capacity, None);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_load_withMalformedFile_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "broken.json", "{ not json")?;

    assert!(Config::load(&path).is_err());
    assert!(Config::load(&dir.path().join("missing.json")).is_err());
    Ok(())
}

#[test]
fn test_validate_withInvalidLanguage_shouldFail() {
    let config = Config {
        source_language: "klingonish".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withEquivalentLanguageCodes_shouldFail() {
    let config = Config {
        source_language: "ru".to_string(),
        target_language: "rus".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withOutOfRangeMatching_shouldFail() {
    let mut config = Config::default();
    config.matching.window_ratio = -0.1;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.matching.hit_padding = f64::NAN;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.service.timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_deserialize_logLevel_shouldUseLowercaseNames() {
    let config: Config = serde_json::from_str(r#"{"log_level": "trace"}"#).unwrap();
    assert_eq!(config.log_level, LogLevel::Trace);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Trace);
}
