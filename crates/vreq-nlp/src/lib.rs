// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Language-level building blocks for prompt extraction: clause/token
//! segmentation, fuzzy vocabulary matching and date recognition.

pub mod dates;
pub mod fuzzy;
pub mod segment;

pub use dates::{find_dates, DateMatch};
pub use fuzzy::{best_match, rank, similarity, MatchResult};
pub use segment::{Clause, RuleSegmenter, Segmenter, Span, Token, TokenKind};
