// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// Config file round-trips, migration and failure modes.

use std::fs;
use tempfile::tempdir;
use vreq_core::config::CURRENT_SCHEMA_VERSION;
use vreq_core::{ConfigError, ExtractorConfig, Pipeline, VehicleCatalog};

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = ExtractorConfig::default()
        .with_threshold(90)
        .with_catalog(VehicleCatalog::from_codes(&["21EM"], &["S402A", "P7LGA"]));
    config.save(&path).unwrap();
    assert!(path.exists(), "save should create parent directories");

    let loaded = ExtractorConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let loaded = ExtractorConfig::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, ExtractorConfig::default());
}

#[test]
fn test_old_schema_is_migrated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"schema_version": 0, "match_threshold": 85}"#).unwrap();

    let loaded = ExtractorConfig::load(&path).unwrap();
    assert_eq!(loaded.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(loaded.match_threshold, 85);
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    match ExtractorConfig::load(&path) {
        Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected Parse error, got {:?}", other),
    }
}

#[test]
fn test_loaded_config_drives_pipeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "catalog": {
                "model_types": [{"code": "G20"}, {"code": "U11"}],
                "options": [{"code": "S5AC", "description": "Tow Hitch"}]
            },
            "model_code_pattern": "^[a-z]\\d{2}$",
            "option_code_pattern": "^s[0-9a-z]{3}$",
            "include_cues": ["want"],
            "exclude_cues": ["skip"]
        }"#,
    )
    .unwrap();

    let pipeline = Pipeline::new(ExtractorConfig::load(&path).unwrap()).unwrap();
    let reference = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let body = pipeline
        .process_at("U11, want the tow hitch, skip S5AC", reference)
        .unwrap();
    assert_eq!(body.model_type_codes, vec!["U11"]);
    assert_eq!(body.boolean_formulas, vec!["+S5AC"]);
}

#[test]
fn test_invalid_loaded_config_refuses_pipeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"catalog": {"model_types": [{"code": "21EM"}], "options": [{"code": "21EM"}]}}"#,
    )
    .unwrap();

    let config = ExtractorConfig::load(&path).unwrap();
    assert!(matches!(
        Pipeline::new(config),
        Err(ConfigError::DuplicateCode(code)) if code == "21EM"
    ));
}
