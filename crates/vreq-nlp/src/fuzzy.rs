// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};

/// Best catalog entry for a candidate token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub entry: String,
    /// Similarity in 0..=100.
    pub score: u8,
    pub candidate: String,
}

impl MatchResult {
    pub fn is_exact(&self) -> bool {
        self.score == 100
    }
}

/// Case-insensitive normalized Levenshtein similarity scaled to 0..=100.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a = a.to_uppercase();
    let b = b.to_uppercase();
    (strsim::normalized_levenshtein(&a, &b) * 100.0).round() as u8
}

/// Highest scoring entry regardless of any threshold.
/// Exact score ties resolve to the lexicographically smaller entry.
pub fn rank<'a, I>(candidate: &str, catalog: I) -> Option<MatchResult>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, u8)> = None;
    for entry in catalog {
        let score = similarity(candidate, entry);
        best = match best {
            Some((kept, kept_score)) if kept_score > score || (kept_score == score && kept <= entry) => {
                Some((kept, kept_score))
            }
            _ => Some((entry, score)),
        };
    }
    best.map(|(entry, score)| MatchResult {
        entry: entry.to_string(),
        score,
        candidate: candidate.to_string(),
    })
}

/// Best entry scoring at least `threshold`, or `None` when nothing is close enough.
pub fn best_match<'a, I>(candidate: &str, catalog: I, threshold: u8) -> Option<MatchResult>
where
    I: IntoIterator<Item = &'a str>,
{
    rank(candidate, catalog).filter(|m| m.score >= threshold)
}
