// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// CSV batch harness: column lookup, order preservation, mixed outcomes.

use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;
use vreq_core::batch::{load_prompts, process_batch, BatchError, Response};
use vreq_core::{ExtractorConfig, Pipeline};

#[test]
fn test_batch_preserves_order_and_outcomes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prompts.csv");
    let mut csv = String::from("id,prompt\n");
    for i in 0..40 {
        if i % 4 == 0 {
            csv.push_str(&format!("{},nothing useful {}\n", i, i));
        } else {
            csv.push_str(&format!("{},model 21EM with S402A in {} days\n", i, i));
        }
    }
    fs::write(&path, csv).unwrap();

    let prompts = load_prompts(&path, "prompt").unwrap();
    assert_eq!(prompts.len(), 40);

    let pipeline = Pipeline::new(ExtractorConfig::default()).unwrap();
    let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let rows = process_batch(&pipeline, &prompts, reference);

    assert_eq!(rows.len(), prompts.len());
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.prompt, prompts[i]);
        match &row.response {
            Response::Accepted(body) => {
                assert_ne!(i % 4, 0, "row {} should have been rejected", i);
                let expected = reference + chrono::Days::new(i as u64);
                assert_eq!(body.dates, vec![expected.format("%Y-%m-%d").to_string()]);
            }
            Response::Rejected(rejection) => {
                assert_eq!(i % 4, 0, "row {} rejected: {}", i, rejection);
            }
        }
    }
}

#[test]
fn test_missing_file_is_csv_error() {
    let dir = tempdir().unwrap();
    let err = load_prompts(&dir.path().join("absent.csv"), "prompt").unwrap_err();
    assert!(matches!(err, BatchError::Csv(_)));
}

#[test]
fn test_rows_serialize_as_prompt_and_response() {
    let pipeline = Pipeline::new(ExtractorConfig::default()).unwrap();
    let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let rows = process_batch(&pipeline, &["".to_string(), "S402A".to_string()], reference);
    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"prompt": "", "response": {"message": ["no extractable entities found"]}},
            {"prompt": "S402A", "response": {"modelTypeCodes": [], "booleanFormulas": ["+S402A"], "dates": []}}
        ])
    );
}
