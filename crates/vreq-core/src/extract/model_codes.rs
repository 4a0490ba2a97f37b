// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::descriptions::DescriptionIndex;
use crate::catalog::{CatalogKind, VehicleCatalog};
use regex::Regex;
use std::sync::OnceLock;
use vreq_nlp::fuzzy::best_match;
use vreq_nlp::segment::Clause;

fn ordinal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}(?:st|nd|rd|th)$").expect("Invalid ordinal regex"))
}

/// Finds model-type codes: shaped tokens corrected against the model catalog,
/// plus model sales descriptions.
#[derive(Debug, Clone)]
pub struct ModelCodeExtractor {
    shape: Regex,
    codes: Vec<String>,
    threshold: u8,
    descriptions: Option<DescriptionIndex>,
}

impl ModelCodeExtractor {
    pub fn new(
        catalog: &VehicleCatalog,
        shape: Regex,
        threshold: u8,
        descriptions: Option<DescriptionIndex>,
    ) -> Self {
        Self {
            shape,
            codes: catalog.codes(CatalogKind::ModelType).map(str::to_string).collect(),
            threshold,
            descriptions,
        }
    }

    fn is_candidate(&self, word: &str) -> bool {
        self.shape.is_match(word) && !ordinal_regex().is_match(word)
    }

    fn correct(&self, candidate: &str) -> Option<String> {
        match best_match(candidate, self.codes.iter().map(String::as_str), self.threshold) {
            Some(m) => {
                if !m.is_exact() {
                    log::debug!(
                        "[Pipeline] Corrected model code '{}' -> {} (score {})",
                        candidate,
                        m.entry,
                        m.score
                    );
                }
                Some(m.entry)
            }
            None => {
                log::debug!("[Pipeline] Dropped model code candidate '{}'", candidate);
                None
            }
        }
    }

    /// Corrected codes in first-seen order, without duplicates.
    pub fn extract(&self, clauses: &[Clause]) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        let mut keep = |code: String| {
            if !found.contains(&code) {
                found.push(code);
            }
        };

        for clause in clauses {
            let hits = self
                .descriptions
                .as_ref()
                .map(|index| index.find(clause))
                .unwrap_or_default();
            let mut hits = hits.into_iter().peekable();

            let mut i = 0;
            while i < clause.tokens.len() {
                if let Some(hit) = hits.next_if(|h| h.token == i) {
                    log::debug!("[Pipeline] Model description -> {} (score {})", hit.code, hit.score);
                    i = hit.end_token;
                    keep(hit.code);
                    continue;
                }
                let token = &clause.tokens[i];
                if token.is_word() {
                    for part in token.parts().filter(|p| self.is_candidate(p)) {
                        if let Some(code) = self.correct(part) {
                            keep(code);
                        }
                    }
                }
                i += 1;
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MODEL_CODE_PATTERN;
    use vreq_nlp::segment::{RuleSegmenter, Segmenter};

    fn extractor(with_descriptions: bool) -> ModelCodeExtractor {
        let catalog = VehicleCatalog::default();
        let descriptions = with_descriptions.then(|| DescriptionIndex::new(&catalog.model_types, 85));
        ModelCodeExtractor::new(
            &catalog,
            Regex::new(DEFAULT_MODEL_CODE_PATTERN).unwrap(),
            75,
            descriptions,
        )
    }

    fn run(extractor: &ModelCodeExtractor, prompt: &str) -> Vec<String> {
        extractor.extract(&RuleSegmenter.segment(prompt))
    }

    #[test]
    fn test_exact_and_order() {
        let codes = run(&extractor(false), "Models 28FF and dz01, then 21CF. Also 28ff again");
        assert_eq!(codes, vec!["28FF", "DZ01", "21CF"]);
    }

    #[test]
    fn test_ordinals_are_not_codes() {
        assert!(run(&extractor(false), "delivery on the 10th or 21st of may").is_empty());
    }

    #[test]
    fn test_unmatched_candidate_dropped() {
        assert!(run(&extractor(false), "model 99ZZ please").is_empty());
    }

    #[test]
    fn test_description_yields_code() {
        let codes = run(&extractor(true), "I'd like the X7 xDrive40i and a 318i");
        assert_eq!(codes, vec!["21EM", "28FF"]);
        assert!(run(&extractor(false), "I'd like the X7 xDrive40i").is_empty());
    }

    #[test]
    fn test_compound_parts() {
        let codes = run(&extractor(false), "21cf-11cf comparison");
        assert_eq!(codes, vec!["21CF", "11CF"]);
    }
}
