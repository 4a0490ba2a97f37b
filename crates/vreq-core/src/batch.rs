// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Bulk processing of prompts read from a CSV sheet.

use crate::pipeline::Pipeline;
use crate::request::RequestBody;
use crate::validator::Rejection;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("column '{0}' not found in header")]
    MissingColumn(String),
}

/// Either the request body or the rejection for one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Accepted(RequestBody),
    Rejected(Rejection),
}

impl From<Result<RequestBody, Rejection>> for Response {
    fn from(result: Result<RequestBody, Rejection>) -> Self {
        match result {
            Ok(body) => Response::Accepted(body),
            Err(rejection) => Response::Rejected(rejection),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    pub prompt: String,
    pub response: Response,
}

pub fn load_prompts(path: &Path, column: &str) -> Result<Vec<String>, BatchError> {
    let rdr = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    read_column(rdr, column)
}

/// Reads the non-blank values of `column` (matched case-insensitively).
pub fn load_prompts_from_reader<R: Read>(reader: R, column: &str) -> Result<Vec<String>, BatchError> {
    let rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    read_column(rdr, column)
}

fn read_column<R: Read>(mut rdr: csv::Reader<R>, column: &str) -> Result<Vec<String>, BatchError> {
    let idx = rdr
        .headers()?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column))
        .ok_or_else(|| BatchError::MissingColumn(column.to_string()))?;

    let mut prompts = Vec::new();
    for record in rdr.records() {
        let record = record?;
        match record.get(idx).map(str::trim) {
            Some(prompt) if !prompt.is_empty() => prompts.push(prompt.to_string()),
            _ => log::debug!("[Pipeline] Skipping blank row {:?}", record.position()),
        }
    }
    Ok(prompts)
}

/// Processes prompts in parallel; output order matches input order.
pub fn process_batch(pipeline: &Pipeline, prompts: &[String], reference: NaiveDate) -> Vec<BatchRow> {
    let rows: Vec<BatchRow> = prompts
        .par_iter()
        .map(|prompt| BatchRow {
            prompt: prompt.clone(),
            response: pipeline.process_at(prompt, reference).into(),
        })
        .collect();

    let accepted = rows
        .iter()
        .filter(|r| matches!(r.response, Response::Accepted(_)))
        .count();
    log::info!("[Pipeline] Batch done: {}/{} accepted", accepted, rows.len());
    rows
}
