//! Configuration file loading and per-page resolution.

use penflow_pipeline::settings::{RECOGNIZER_URL_ENV, WORKERS_ENV};
use penflow_pipeline::{PenflowConfig, RecognitionConfig, RecognitionOptions};

#[test]
fn test_file_values_reach_page_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[defaults]
width = 1000
scale = 2.5
language = "ja_JP"

[analyzer]
kind_of_engine = 1
"#,
    )
    .unwrap();

    let settings = PenflowConfig::load(path.to_str()).unwrap();
    let config = RecognitionConfig::resolve(&RecognitionOptions::default(), &settings);

    assert_eq!(config.dimensions.width, 1000);
    assert_eq!(config.dimensions.height, 2970);
    assert_eq!(config.scale, 2.5);
    assert_eq!(config.configuration["lang"], "ja_JP");
    assert_eq!(config.analyzer.engine.kind_of_engine, 1);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = PenflowConfig::load(path.to_str()).unwrap_err();
    assert_eq!(err.kind(), "ConfigError");
}

#[test]
fn test_overrides_apply_after_file() {
    let mut settings = PenflowConfig::from_toml_str("[service]\nworkers = 2\n").unwrap();
    settings
        .apply_overrides(|key| match key {
            k if k == RECOGNIZER_URL_ENV => Some("http://localhost:9000/batch".to_string()),
            k if k == WORKERS_ENV => Some("8".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(settings.service.workers, 8);
    assert_eq!(settings.recognizer.url, "http://localhost:9000/batch");
}

#[test]
fn test_round_trip_through_toml() {
    let settings = PenflowConfig::default();
    let text = settings.to_toml_string().unwrap();
    assert_eq!(PenflowConfig::from_toml_str(&text).unwrap(), settings);
}
