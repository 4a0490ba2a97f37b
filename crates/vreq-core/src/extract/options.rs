// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::descriptions::DescriptionIndex;
use crate::catalog::{CatalogKind, VehicleCatalog};
use crate::formula::{BooleanFormula, Polarity, SignedOptionCode};
use regex::Regex;
use std::collections::HashSet;
use vreq_nlp::fuzzy::best_match;
use vreq_nlp::segment::{Clause, TokenKind};

/// Turns each clause's signed option mentions into one boolean formula.
///
/// Polarity cues (`with`, `without`, `+`, `-`, ...) open a scope that lasts
/// until the next cue or the end of the clause. Codes seen before any cue are
/// included.
#[derive(Debug, Clone)]
pub struct OptionFormulaExtractor {
    shape: Regex,
    codes: Vec<String>,
    threshold: u8,
    include_cues: HashSet<String>,
    exclude_cues: HashSet<String>,
    descriptions: Option<DescriptionIndex>,
}

impl OptionFormulaExtractor {
    pub fn new(
        catalog: &VehicleCatalog,
        shape: Regex,
        threshold: u8,
        include_cues: &[String],
        exclude_cues: &[String],
        descriptions: Option<DescriptionIndex>,
    ) -> Self {
        let lower = |cues: &[String]| -> HashSet<String> { cues.iter().map(|c| c.to_lowercase()).collect() };
        Self {
            shape,
            codes: catalog.codes(CatalogKind::Option).map(str::to_string).collect(),
            threshold,
            include_cues: lower(include_cues),
            exclude_cues: lower(exclude_cues),
            descriptions,
        }
    }

    fn cue(&self, word: &str) -> Option<Polarity> {
        if self.exclude_cues.contains(word) {
            Some(Polarity::Exclude)
        } else if self.include_cues.contains(word) {
            Some(Polarity::Include)
        } else {
            None
        }
    }

    fn correct(&self, candidate: &str) -> Option<String> {
        let m = best_match(candidate, self.codes.iter().map(String::as_str), self.threshold);
        if m.is_none() {
            log::debug!("[Pipeline] Dropped option code candidate '{}'", candidate);
        }
        m.map(|m| m.entry)
    }

    /// One formula per clause that yields at least one code, in clause order.
    pub fn extract(&self, clauses: &[Clause]) -> Vec<BooleanFormula> {
        clauses
            .iter()
            .map(|clause| self.formula(clause))
            .filter(|formula| !formula.is_empty())
            .collect()
    }

    fn formula(&self, clause: &Clause) -> BooleanFormula {
        let hits = self
            .descriptions
            .as_ref()
            .map(|index| index.find(clause))
            .unwrap_or_default();
        let mut hits = hits.into_iter().peekable();

        let mut formula = BooleanFormula::new();
        let mut polarity = Polarity::Include;
        let mut i = 0;

        while i < clause.tokens.len() {
            if let Some(hit) = hits.next_if(|h| h.token == i) {
                i = hit.end_token;
                formula.push(SignedOptionCode::new(hit.code, polarity));
                continue;
            }

            let token = &clause.tokens[i];
            i += 1;
            match token.kind {
                TokenKind::Plus => polarity = Polarity::Include,
                TokenKind::Minus => polarity = Polarity::Exclude,
                TokenKind::Word => {
                    if let Some(cue) = self.cue(&token.text) {
                        polarity = cue;
                        continue;
                    }
                    let parts: Vec<&str> = token.parts().collect();
                    if parts.len() > 1 && parts.iter().all(|p| self.shape.is_match(p)) {
                        // inline formula such as "s402a-p7lga"
                        for (n, part) in parts.iter().enumerate() {
                            if n > 0 {
                                polarity = Polarity::Exclude;
                            }
                            if let Some(code) = self.correct(part) {
                                formula.push(SignedOptionCode::new(code, polarity));
                            }
                        }
                        continue;
                    }
                    for part in parts.into_iter().filter(|p| self.shape.is_match(p)) {
                        if let Some(code) = self.correct(part) {
                            formula.push(SignedOptionCode::new(code, polarity));
                        }
                    }
                }
            }
        }

        if !formula.is_empty() {
            log::debug!("[Pipeline] Clause '{}' -> {}", clause.text, formula);
        }
        formula
    }
}
