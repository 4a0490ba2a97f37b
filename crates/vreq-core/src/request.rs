// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::validator::ExtractionResult;
use serde::{Deserialize, Serialize};

/// Machine-readable request consumed downstream.
///
/// Serializes as
/// `{"modelTypeCodes": [...], "booleanFormulas": [...], "dates": [...]}`;
/// every field is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub model_type_codes: Vec<String>,
    pub boolean_formulas: Vec<String>,
    pub dates: Vec<String>,
}

impl RequestBody {
    /// One body per model type code, each sharing the formulas and dates.
    /// A body without model codes is returned unchanged.
    pub fn per_model_type(&self) -> Vec<RequestBody> {
        if self.model_type_codes.len() <= 1 {
            return vec![self.clone()];
        }
        self.model_type_codes
            .iter()
            .map(|code| RequestBody {
                model_type_codes: vec![code.clone()],
                boolean_formulas: self.boolean_formulas.clone(),
                dates: self.dates.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBuilder;

impl RequestBuilder {
    pub fn build(&self, accepted: ExtractionResult) -> RequestBody {
        RequestBody {
            model_type_codes: accepted.model_type_codes,
            boolean_formulas: accepted.boolean_formulas,
            dates: accepted.dates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(models: &[&str]) -> RequestBody {
        RequestBuilder.build(ExtractionResult {
            model_type_codes: models.iter().map(|m| m.to_string()).collect(),
            boolean_formulas: vec!["+S402A-P7LGA".to_string()],
            dates: vec!["2024-11-08".to_string()],
        })
    }

    #[test]
    fn test_field_order_and_presence() {
        let json = serde_json::to_string(&RequestBody::default()).unwrap();
        assert_eq!(json, r#"{"modelTypeCodes":[],"booleanFormulas":[],"dates":[]}"#);

        let json = serde_json::to_string(&body(&["21EM"])).unwrap();
        assert_eq!(
            json,
            r#"{"modelTypeCodes":["21EM"],"booleanFormulas":["+S402A-P7LGA"],"dates":["2024-11-08"]}"#
        );
    }

    #[test]
    fn test_per_model_type_split() {
        let split = body(&["21EM", "DZ01"]).per_model_type();
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].model_type_codes, vec!["21EM"]);
        assert_eq!(split[1].model_type_codes, vec!["DZ01"]);
        assert!(split.iter().all(|b| b.boolean_formulas == vec!["+S402A-P7LGA"]));

        assert_eq!(body(&[]).per_model_type(), vec![body(&[])]);
    }
}
