// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::extract::Extraction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NO_ENTITIES: &str = "no extractable entities found";
pub const MALFORMED_FORMULA: &str = "malformed formula";
pub const NO_MODEL_CODE: &str = "no model type code found";
pub const NO_FORMULA: &str = "no boolean formula found";
pub const NO_DATE: &str = "no date found";

/// Extra completeness requirements. All off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub require_model_code: bool,
    pub require_formula: bool,
    pub require_date: bool,
}

impl ValidationPolicy {
    /// Every field must be present.
    pub fn strict() -> Self {
        Self {
            require_model_code: true,
            require_formula: true,
            require_date: true,
        }
    }
}

/// Accepted extraction, rendered to strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub model_type_codes: Vec<String>,
    pub boolean_formulas: Vec<String>,
    pub dates: Vec<String>,
}

/// A prompt that could not be turned into a request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("request rejected: {}", .reasons.join("; "))]
pub struct Rejection {
    #[serde(rename = "message")]
    pub reasons: Vec<String>,
}

impl Rejection {
    pub fn new<I, S>(reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reasons: reasons.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, reason: &str) -> bool {
        self.reasons.iter().any(|r| r == reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted(ExtractionResult),
    Rejected(Rejection),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    pub fn into_result(self) -> Result<ExtractionResult, Rejection> {
        match self {
            ValidationOutcome::Accepted(result) => Ok(result),
            ValidationOutcome::Rejected(rejection) => Err(rejection),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    policy: ValidationPolicy,
}

impl Validator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Checks completeness and formula shape. Every failing rule is reported,
    /// in rule order.
    pub fn validate(&self, extraction: &Extraction) -> ValidationOutcome {
        let mut reasons = Vec::new();

        if extraction.is_empty() {
            reasons.push(NO_ENTITIES);
        }
        if extraction.formulas.iter().any(|f| f.is_empty()) {
            reasons.push(MALFORMED_FORMULA);
        }
        if !extraction.is_empty() {
            if self.policy.require_model_code && extraction.model_type_codes.is_empty() {
                reasons.push(NO_MODEL_CODE);
            }
            if self.policy.require_formula && extraction.formulas.is_empty() {
                reasons.push(NO_FORMULA);
            }
            if self.policy.require_date && extraction.dates.is_empty() {
                reasons.push(NO_DATE);
            }
        }

        if !reasons.is_empty() {
            log::debug!("[Pipeline] Rejected: {:?}", reasons);
            return ValidationOutcome::Rejected(Rejection::new(reasons));
        }

        ValidationOutcome::Accepted(ExtractionResult {
            model_type_codes: extraction.model_type_codes.clone(),
            boolean_formulas: extraction.formulas.iter().map(|f| f.to_string()).collect(),
            dates: extraction
                .dates
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect(),
        })
    }
}
