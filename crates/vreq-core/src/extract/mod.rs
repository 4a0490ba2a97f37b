// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! The three extractors that read clauses into typed values.

pub mod dates;
pub mod descriptions;
pub mod model_codes;
pub mod options;

pub use dates::DateExtractor;
pub use descriptions::{DescriptionHit, DescriptionIndex};
pub use model_codes::ModelCodeExtractor;
pub use options::OptionFormulaExtractor;

use crate::formula::BooleanFormula;
use chrono::NaiveDate;
use serde::Serialize;

/// Unvalidated output of the extractors for one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub model_type_codes: Vec<String>,
    pub formulas: Vec<BooleanFormula>,
    pub dates: Vec<NaiveDate>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.model_type_codes.is_empty() && self.formulas.is_empty() && self.dates.is_empty()
    }
}
