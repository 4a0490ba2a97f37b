// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};

/// Byte range into the source prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Word,
    Plus,
    Minus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Lowercased token text; typographic apostrophes become `'`.
    pub text: String,
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Hyphen-separated pieces of a compound word (`s402a-p7lga`).
    /// A plain word yields itself.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.text.split('-').filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Lowercased, whitespace-collapsed clause text.
    pub text: String,
    pub span: Span,
    pub tokens: Vec<Token>,
}

impl Clause {
    /// Word tokens together with their index in `tokens`.
    pub fn words(&self) -> impl Iterator<Item = (usize, &Token)> {
        self.tokens.iter().enumerate().filter(|(_, t)| t.is_word())
    }
}

/// Splits a prompt into clauses and tokens.
///
/// Implementations must be deterministic: the same text always yields the same
/// clause and token boundaries.
pub trait Segmenter: Send + Sync {
    fn segment(&self, prompt: &str) -> Vec<Clause>;
}

/// Punctuation-driven segmenter.
///
/// Clause boundaries are `; ! ?`, line breaks and a `.` followed by whitespace or
/// the end of input. Commas and conjunctions never end a clause, so
/// "include S402A, exclude P7LGA" stays together.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSegmenter;

impl Segmenter for RuleSegmenter {
    fn segment(&self, prompt: &str) -> Vec<Clause> {
        clause_spans(prompt)
            .into_iter()
            .filter_map(|span| {
                let span = trim_span(prompt, span);
                if span.is_empty() {
                    return None;
                }
                let tokens = tokenize(prompt, span);
                if tokens.is_empty() {
                    return None;
                }
                Some(Clause {
                    text: normalize(span.slice(prompt)),
                    span,
                    tokens,
                })
            })
            .collect()
    }
}

/// Lowercases, folds `’` into `'` and collapses whitespace runs to a
/// single space.
pub fn normalize(s: &str) -> String {
    fold_apostrophes(
        &s.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase(),
    )
}

fn fold_apostrophes(s: &str) -> String {
    s.replace('\u{2019}', "'")
}

fn clause_spans(prompt: &str) -> Vec<Span> {
    let chars: Vec<(usize, char)> = prompt.char_indices().collect();
    let mut spans = Vec::new();
    let mut start = 0;

    for (i, &(pos, c)) in chars.iter().enumerate() {
        let next = chars.get(i + 1).map(|&(_, n)| n);
        let is_boundary = match c {
            ';' | '!' | '?' | '\n' | '\r' => true,
            // "08.11.2024" and "e.g" keep their dots
            '.' => next.map_or(true, char::is_whitespace),
            _ => false,
        };
        if is_boundary {
            spans.push(Span::new(start, pos));
            start = pos + c.len_utf8();
        }
    }
    spans.push(Span::new(start, prompt.len()));
    spans
}

fn trim_span(prompt: &str, span: Span) -> Span {
    let slice = span.slice(prompt);
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();
    if leading == slice.len() {
        return Span::new(span.start, span.start);
    }
    Span::new(span.start + leading, span.end - trailing)
}

fn tokenize(prompt: &str, span: Span) -> Vec<Token> {
    let chars: Vec<(usize, char)> = span
        .slice(prompt)
        .char_indices()
        .map(|(i, c)| (i + span.start, c))
        .collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if c.is_alphanumeric() {
            let mut j = i + 1;
            while j < chars.len() {
                let (_, cj) = chars[j];
                if cj.is_alphanumeric() {
                    j += 1;
                    continue;
                }
                let prev = chars[j - 1].1;
                let next = chars.get(j + 1).map(|&(_, n)| n);
                if joins_word(prev, cj, next) {
                    // the joiner and the alphanumeric after it
                    j += 2;
                    continue;
                }
                break;
            }
            let end = chars.get(j).map_or(span.end, |&(p, _)| p);
            tokens.push(Token {
                text: fold_apostrophes(&prompt[pos..end].to_lowercase()),
                kind: TokenKind::Word,
                span: Span::new(pos, end),
            });
            i = j;
        } else {
            let kind = match c {
                '+' => Some(TokenKind::Plus),
                '-' => Some(TokenKind::Minus),
                _ => None,
            };
            if let Some(kind) = kind {
                tokens.push(Token {
                    text: c.to_string(),
                    kind,
                    span: Span::new(pos, pos + c.len_utf8()),
                });
            }
            i += 1;
        }
    }

    tokens
}

fn joins_word(prev: char, c: char, next: Option<char>) -> bool {
    let Some(next) = next else {
        return false;
    };
    match c {
        '\'' | '\u{2019}' => prev.is_alphanumeric() && next.is_alphabetic(),
        '-' => prev.is_alphanumeric() && next.is_alphanumeric(),
        '/' | '.' => prev.is_ascii_digit() && next.is_ascii_digit(),
        _ => false,
    }
}
