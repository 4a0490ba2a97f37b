// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKind {
    ModelType,
    Option,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::ModelType => write!(f, "model type"),
            CatalogKind::Option => write!(f, "option"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Canonical code, emitted verbatim in requests.
    pub code: String,
    /// Sales description, e.g. "Panorama Glass Roof".
    #[serde(default)]
    pub description: Option<String>,
}

impl CatalogEntry {
    pub fn new(code: &str, description: Option<&str>) -> Self {
        Self {
            code: code.to_string(),
            description: description.map(str::to_string),
        }
    }
}

/// Valid model-type and option codes. Read-only for the lifetime of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleCatalog {
    pub model_types: Vec<CatalogEntry>,
    pub options: Vec<CatalogEntry>,
}

impl Default for VehicleCatalog {
    fn default() -> Self {
        serde_json::from_str(include_str!("default_catalog.json"))
            .expect("Failed to parse default_catalog.json")
    }
}

impl VehicleCatalog {
    pub fn new(model_types: Vec<CatalogEntry>, options: Vec<CatalogEntry>) -> Self {
        Self {
            model_types,
            options,
        }
    }

    /// Builds a catalog from bare codes with no sales descriptions.
    pub fn from_codes(model_types: &[&str], options: &[&str]) -> Self {
        fn bare(codes: &[&str]) -> Vec<CatalogEntry> {
            codes.iter().map(|c| CatalogEntry::new(c, None)).collect()
        }
        Self::new(bare(model_types), bare(options))
    }

    pub fn entries(&self, kind: CatalogKind) -> &[CatalogEntry] {
        match kind {
            CatalogKind::ModelType => &self.model_types,
            CatalogKind::Option => &self.options,
        }
    }

    pub fn codes(&self, kind: CatalogKind) -> impl Iterator<Item = &str> {
        self.entries(kind).iter().map(|e| e.code.as_str())
    }

    /// Every code must be non-blank and belong to exactly one catalog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for kind in [CatalogKind::ModelType, CatalogKind::Option] {
            let entries = self.entries(kind);
            if entries.is_empty() {
                return Err(ConfigError::EmptyCatalog(kind));
            }
            for entry in entries {
                let code = entry.code.trim();
                if code.is_empty() {
                    return Err(ConfigError::BlankCode(kind));
                }
                if !seen.insert(code.to_uppercase()) {
                    return Err(ConfigError::DuplicateCode(code.to_string()));
                }
            }
        }
        log::debug!(
            "[Catalog] {} model type code(s), {} option code(s)",
            self.model_types.len(),
            self.options.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_loads() {
        let catalog = VehicleCatalog::default();
        assert!(catalog.validate().is_ok());

        let models: Vec<&str> = catalog.codes(CatalogKind::ModelType).collect();
        assert_eq!(models, vec!["21CF", "11CF", "21EM", "21EN", "DZ01", "28FF"]);

        let roof = catalog
            .options
            .iter()
            .find(|e| e.code == "S402A")
            .expect("S402A missing");
        assert_eq!(roof.description.as_deref(), Some("Panorama Glass Roof"));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let catalog = VehicleCatalog::from_codes(&["21EM"], &[]);
        assert!(matches!(
            catalog.validate(),
            Err(ConfigError::EmptyCatalog(CatalogKind::Option))
        ));
    }

    #[test]
    fn test_duplicate_across_catalogs_rejected() {
        let catalog = VehicleCatalog::from_codes(&["21EM"], &["S402A", "21em"]);
        match catalog.validate() {
            Err(ConfigError::DuplicateCode(code)) => assert_eq!(code, "21em"),
            other => panic!("expected DuplicateCode, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_code_rejected() {
        let catalog = VehicleCatalog::from_codes(&["  "], &["S402A"]);
        assert!(matches!(
            catalog.validate(),
            Err(ConfigError::BlankCode(CatalogKind::ModelType))
        ));
    }
}
