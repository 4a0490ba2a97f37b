// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::catalog::CatalogEntry;
use vreq_nlp::fuzzy::similarity;
use vreq_nlp::segment::{Clause, RuleSegmenter, Segmenter};

/// A sales description recognized in a clause, covering
/// `clause.tokens[token..end_token]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionHit {
    pub token: usize,
    pub end_token: usize,
    pub code: String,
    pub score: u8,
}

#[derive(Debug, Clone)]
struct Phrase {
    code: String,
    text: String,
    words: usize,
}

/// Catalog sales descriptions, tokenized the same way prompts are.
#[derive(Debug, Clone)]
pub struct DescriptionIndex {
    phrases: Vec<Phrase>,
    max_words: usize,
    threshold: u8,
}

impl DescriptionIndex {
    pub fn new(entries: &[CatalogEntry], threshold: u8) -> Self {
        let phrases: Vec<Phrase> = entries
            .iter()
            .filter_map(|entry| {
                let description = entry.description.as_deref()?;
                let words: Vec<String> = RuleSegmenter
                    .segment(description)
                    .into_iter()
                    .flat_map(|clause| clause.tokens)
                    .filter(|t| t.is_word())
                    .map(|t| t.text)
                    .collect();
                if words.is_empty() {
                    return None;
                }
                Some(Phrase {
                    code: entry.code.clone(),
                    words: words.len(),
                    text: words.join(" "),
                })
            })
            .collect();
        let max_words = phrases.iter().map(|p| p.words).max().unwrap_or(0);
        Self {
            phrases,
            max_words,
            threshold,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Non-overlapping description hits in token order. At each position the
    /// best scoring window wins; equal scores go to the longer window.
    pub fn find(&self, clause: &Clause) -> Vec<DescriptionHit> {
        let mut hits = Vec::new();
        if self.is_empty() {
            return hits;
        }

        let tokens = &clause.tokens;
        let mut i = 0;
        while i < tokens.len() {
            if !tokens[i].is_word() {
                i += 1;
                continue;
            }
            // consecutive word tokens starting at i
            let run = tokens[i..].iter().take_while(|t| t.is_word()).count();
            let longest = run.min(self.max_words);

            let mut hit: Option<DescriptionHit> = None;
            for len in (1..=longest).rev() {
                let window: Vec<&str> = tokens[i..i + len].iter().map(|t| t.text.as_str()).collect();
                if let Some((code, score)) = self.best_phrase(&window.join(" "), len) {
                    if hit.as_ref().map_or(true, |h| score > h.score) {
                        hit = Some(DescriptionHit {
                            token: i,
                            end_token: i + len,
                            code,
                            score,
                        });
                    }
                }
            }

            match hit {
                Some(hit) => {
                    i = hit.end_token;
                    hits.push(hit);
                }
                None => i += 1,
            }
        }
        hits
    }

    fn best_phrase(&self, window: &str, words: usize) -> Option<(String, u8)> {
        let mut best: Option<(&str, u8)> = None;
        for phrase in self.phrases.iter().filter(|p| p.words == words) {
            let score = similarity(window, &phrase.text);
            if score < self.threshold {
                continue;
            }
            best = match best {
                Some((code, kept)) if kept > score || (kept == score && code <= phrase.code.as_str()) => {
                    Some((code, kept))
                }
                _ => Some((phrase.code.as_str(), score)),
            };
        }
        best.map(|(code, score)| (code.to_string(), score))
    }
}
