// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::catalog::{CatalogKind, VehicleCatalog};
use crate::validator::ValidationPolicy;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Bump when the on-disk layout changes incompatibly.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_MATCH_THRESHOLD: u8 = 75;
pub const DEFAULT_DESCRIPTION_THRESHOLD: u8 = 85;
pub const DEFAULT_MODEL_CODE_PATTERN: &str = r"^(?:\d{2}[a-z]{2}|[a-z]{2}\d{2})$";
pub const DEFAULT_OPTION_CODE_PATTERN: &str = r"^(?:[a-z]\d[0-9a-z]{2,4}|[lr]l)$";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} catalog is empty")]
    EmptyCatalog(CatalogKind),
    #[error("{0} catalog contains a blank code")]
    BlankCode(CatalogKind),
    #[error("code '{0}' appears more than once across the catalogs")]
    DuplicateCode(String),
    #[error("{name} {value} is outside 1..=100")]
    ThresholdOutOfRange { name: &'static str, value: u8 },
    #[error("invalid {name}: {source}")]
    InvalidPattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("no polarity cues configured")]
    NoPolarityCues,
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the extraction pipeline needs besides the prompt and the
/// reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub schema_version: u32,
    /// Minimum similarity (0..=100) for correcting a code-shaped token.
    pub match_threshold: u8,
    /// Minimum similarity for recognizing a sales description phrase.
    pub description_match_threshold: u8,
    pub description_matching: bool,
    /// Shape filters, applied to lowercased tokens.
    pub model_code_pattern: String,
    pub option_code_pattern: String,
    pub include_cues: Vec<String>,
    pub exclude_cues: Vec<String>,
    pub validation: ValidationPolicy,
    pub catalog: VehicleCatalog,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|w| w.to_string()).collect()
        }
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            description_match_threshold: DEFAULT_DESCRIPTION_THRESHOLD,
            description_matching: true,
            model_code_pattern: DEFAULT_MODEL_CODE_PATTERN.to_string(),
            option_code_pattern: DEFAULT_OPTION_CODE_PATTERN.to_string(),
            include_cues: words(&[
                "include",
                "including",
                "includes",
                "with",
                "plus",
                "add",
                "adding",
                "having",
                "along",
                "together",
                "accompanied",
                "addition",
            ]),
            exclude_cues: words(&[
                "exclude",
                "excluding",
                "excludes",
                "without",
                "except",
                "minus",
                "no",
                "not",
                "don't",
                "dont",
                "never",
                "lacking",
                "missing",
                "remove",
                "removing",
            ]),
            validation: ValidationPolicy::default(),
            catalog: VehicleCatalog::default(),
        }
    }
}

impl ExtractorConfig {
    /// `<config dir>/vreq/config.json`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("org", "vreq", "vreq")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("vreq.json"))
    }

    /// Loads a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("[Config] No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: ExtractorConfig = serde_json::from_str(&content).map_err(|source| {
            log::error!("[Config] JSON parse error for {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        if config.schema_version < CURRENT_SCHEMA_VERSION {
            log::info!(
                "[Config] Migrating {:?} from schema v{} to v{}",
                path,
                config.schema_version,
                CURRENT_SCHEMA_VERSION
            );
            config.schema_version = CURRENT_SCHEMA_VERSION;
        } else if config.schema_version > CURRENT_SCHEMA_VERSION {
            log::warn!(
                "[Config] {:?} has schema v{}, newer than supported v{}",
                path,
                config.schema_version,
                CURRENT_SCHEMA_VERSION
            );
        }

        log::debug!("[Config] Loaded {:?}", path);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write config {:?}", path))?;
        log::debug!("[Config] Saved {:?}", path);
        Ok(())
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.match_threshold = threshold;
        self
    }

    pub fn with_catalog(mut self, catalog: VehicleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Checks everything a pipeline needs before it may run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("match threshold", self.match_threshold),
            ("description match threshold", self.description_match_threshold),
        ] {
            if !(1..=100).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        self.model_code_regex()?;
        self.option_code_regex()?;
        if self.include_cues.is_empty() && self.exclude_cues.is_empty() {
            return Err(ConfigError::NoPolarityCues);
        }
        self.catalog.validate()
    }

    pub fn model_code_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.model_code_pattern).map_err(|source| ConfigError::InvalidPattern {
            name: "model code pattern",
            source,
        })
    }

    pub fn option_code_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.option_code_pattern).map_err(|source| ConfigError::InvalidPattern {
            name: "option code pattern",
            source,
        })
    }

    /// Catalog codes whose lowercased form fails their kind's shape pattern.
    /// A prompt can only reach these through a sales description.
    pub fn unreachable_codes(&self) -> Result<Vec<(CatalogKind, String)>, ConfigError> {
        let shapes = [
            (CatalogKind::ModelType, self.model_code_regex()?),
            (CatalogKind::Option, self.option_code_regex()?),
        ];
        let mut unreachable = Vec::new();
        for (kind, shape) in shapes {
            for code in self.catalog.codes(kind) {
                if !shape.is_match(&code.to_lowercase()) {
                    unreachable.push((kind, code.to_string()));
                }
            }
        }
        Ok(unreachable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_range() {
        let zero = ExtractorConfig::default().with_threshold(0);
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::ThresholdOutOfRange { value: 0, .. })
        ));
        let high = ExtractorConfig::default().with_threshold(101);
        assert!(high.validate().is_err());
        assert!(ExtractorConfig::default().with_threshold(100).validate().is_ok());
    }

    #[test]
    fn test_bad_pattern() {
        let config = ExtractorConfig {
            option_code_pattern: "([a-z".to_string(),
            ..ExtractorConfig::default()
        };
        match config.validate() {
            Err(ConfigError::InvalidPattern { name, .. }) => assert_eq!(name, "option code pattern"),
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_default_catalog_fits_default_shapes() {
        assert!(ExtractorConfig::default().unreachable_codes().unwrap().is_empty());
    }

    #[test]
    fn test_codes_outside_shape_are_reported() {
        let config = ExtractorConfig::default()
            .with_catalog(VehicleCatalog::from_codes(&["21EM", "X5"], &["S402A", "LL", "ZZ"]));
        assert_eq!(
            config.unreachable_codes().unwrap(),
            vec![
                (CatalogKind::ModelType, "X5".to_string()),
                (CatalogKind::Option, "ZZ".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_cues() {
        let config = ExtractorConfig {
            include_cues: Vec::new(),
            exclude_cues: Vec::new(),
            ..ExtractorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoPolarityCues)));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ExtractorConfig = serde_json::from_str(r#"{"match_threshold": 90}"#).unwrap();
        assert_eq!(config.match_threshold, 90);
        assert_eq!(config.description_match_threshold, DEFAULT_DESCRIPTION_THRESHOLD);
        assert_eq!(config.catalog, VehicleCatalog::default());
        assert!(config.include_cues.iter().any(|c| c == "with"));
    }
}
