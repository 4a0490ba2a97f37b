// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use chrono::NaiveDate;
use vreq_nlp::dates::find_dates;
use vreq_nlp::segment::normalize;

/// Scans the normalized prompt for date expressions.
///
/// Works on the whole prompt rather than per clause: an abbreviated month
/// ("Nov. 8") ends a sentence as far as the segmenter is concerned.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateExtractor;

impl DateExtractor {
    /// Dates in source order, each value once.
    pub fn extract(&self, prompt: &str, reference: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        for found in find_dates(&normalize(prompt), reference) {
            log::debug!("[Pipeline] Date '{}' -> {}", found.text, found.date);
            if !dates.contains(&found.date) {
                dates.push(found.date);
            }
        }
        dates
    }
}
