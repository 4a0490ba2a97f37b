// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Include,
    Exclude,
}

impl Polarity {
    pub fn sign(self) -> char {
        match self {
            Polarity::Include => '+',
            Polarity::Exclude => '-',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedOptionCode {
    pub code: String,
    pub polarity: Polarity,
}

impl SignedOptionCode {
    pub fn new(code: impl Into<String>, polarity: Polarity) -> Self {
        Self {
            code: code.into(),
            polarity,
        }
    }

    pub fn include(code: impl Into<String>) -> Self {
        Self::new(code, Polarity::Include)
    }

    pub fn exclude(code: impl Into<String>) -> Self {
        Self::new(code, Polarity::Exclude)
    }
}

impl fmt::Display for SignedOptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.polarity.sign(), self.code)
    }
}

/// Signed option codes of one clause, in mention order.
///
/// Renders without separators: `[-S402A, +P7LGA]` is `"-S402A+P7LGA"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanFormula {
    codes: Vec<SignedOptionCode>,
}

impl BooleanFormula {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a signed code. A code already present keeps its first polarity
    /// and position; returns whether the code was added.
    pub fn push(&mut self, signed: SignedOptionCode) -> bool {
        if self.codes.iter().any(|c| c.code == signed.code) {
            return false;
        }
        self.codes.push(signed);
        true
    }

    pub fn codes(&self) -> &[SignedOptionCode] {
        &self.codes
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }
}

impl FromIterator<SignedOptionCode> for BooleanFormula {
    fn from_iter<I: IntoIterator<Item = SignedOptionCode>>(iter: I) -> Self {
        let mut formula = BooleanFormula::new();
        for signed in iter {
            formula.push(signed);
        }
        formula
    }
}

impl fmt::Display for BooleanFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for signed in &self.codes {
            write!(f, "{}", signed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_without_separators() {
        let formula: BooleanFormula = [
            SignedOptionCode::exclude("S402A"),
            SignedOptionCode::include("P7LGA"),
        ]
        .into_iter()
        .collect();
        assert_eq!(formula.to_string(), "-S402A+P7LGA");
        assert_eq!(formula.len(), 2);
    }

    #[test]
    fn test_repeated_code_keeps_first() {
        let mut formula = BooleanFormula::new();
        assert!(formula.push(SignedOptionCode::include("S402A")));
        assert!(formula.push(SignedOptionCode::exclude("P7LGA")));
        assert!(!formula.push(SignedOptionCode::exclude("S402A")));
        assert_eq!(formula.to_string(), "+S402A-P7LGA");
    }

    #[test]
    fn test_empty_formula() {
        let formula = BooleanFormula::new();
        assert!(formula.is_empty());
        assert_eq!(formula.to_string(), "");
    }
}
