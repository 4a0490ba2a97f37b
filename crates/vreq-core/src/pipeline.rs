// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::catalog::{CatalogEntry, CatalogKind};
use crate::config::{ConfigError, ExtractorConfig};
use crate::extract::{
    DateExtractor, DescriptionIndex, Extraction, ModelCodeExtractor, OptionFormulaExtractor,
};
use crate::request::{RequestBody, RequestBuilder};
use crate::validator::{Rejection, Validator};
use chrono::NaiveDate;
use vreq_nlp::segment::{RuleSegmenter, Segmenter};

/// Prompt to request body: segment, extract, validate, build.
///
/// Read-only after construction, so one pipeline can serve many threads.
pub struct Pipeline {
    config: ExtractorConfig,
    segmenter: Box<dyn Segmenter>,
    models: ModelCodeExtractor,
    options: OptionFormulaExtractor,
    dates: DateExtractor,
    validator: Validator,
    builder: RequestBuilder,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Validates `config` and compiles everything the extractors need.
    pub fn new(config: ExtractorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let catalog = &config.catalog;
        let descriptions = |entries: &[CatalogEntry]| {
            config
                .description_matching
                .then(|| DescriptionIndex::new(entries, config.description_match_threshold))
        };

        let models = ModelCodeExtractor::new(
            catalog,
            config.model_code_regex()?,
            config.match_threshold,
            descriptions(catalog.entries(CatalogKind::ModelType)),
        );
        let options = OptionFormulaExtractor::new(
            catalog,
            config.option_code_regex()?,
            config.match_threshold,
            &config.include_cues,
            &config.exclude_cues,
            descriptions(catalog.entries(CatalogKind::Option)),
        );

        for (kind, code) in config.unreachable_codes()? {
            log::warn!(
                "[Config] {} code '{}' does not fit the {} code pattern and will only match by description",
                kind,
                code,
                kind
            );
        }

        log::info!(
            "[Pipeline] Ready: threshold {}, {} model type(s), {} option(s)",
            config.match_threshold,
            catalog.model_types.len(),
            catalog.options.len()
        );

        Ok(Self {
            validator: Validator::new(config.validation),
            config,
            segmenter: Box::new(RuleSegmenter),
            models,
            options,
            dates: DateExtractor,
            builder: RequestBuilder,
        })
    }

    /// Replaces the tokenization strategy.
    pub fn with_segmenter(mut self, segmenter: impl Segmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Runs the extractors without validation.
    pub fn extract_at(&self, prompt: &str, reference: NaiveDate) -> Extraction {
        let clauses = self.segmenter.segment(prompt);
        let extraction = Extraction {
            model_type_codes: self.models.extract(&clauses),
            formulas: self.options.extract(&clauses),
            dates: self.dates.extract(prompt, reference),
        };
        log::debug!(
            "[Pipeline] {} clause(s): {} model code(s), {} formula(s), {} date(s)",
            clauses.len(),
            extraction.model_type_codes.len(),
            extraction.formulas.len(),
            extraction.dates.len()
        );
        extraction
    }

    /// Relative dates resolve against `reference`.
    pub fn process_at(&self, prompt: &str, reference: NaiveDate) -> Result<RequestBody, Rejection> {
        let extraction = self.extract_at(prompt, reference);
        let accepted = self.validator.validate(&extraction).into_result()?;
        Ok(self.builder.build(accepted))
    }

    /// Relative dates resolve against today's local date.
    pub fn process(&self, prompt: &str) -> Result<RequestBody, Rejection> {
        self.process_at(prompt, chrono::Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VehicleCatalog;
    use vreq_nlp::segment::Clause;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_invalid_config_refuses_to_build() {
        let config = ExtractorConfig::default().with_catalog(VehicleCatalog::from_codes(&[], &["S402A"]));
        assert!(matches!(Pipeline::new(config), Err(ConfigError::EmptyCatalog(_))));
    }

    #[test]
    fn test_pipeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }

    struct NothingSegmenter;

    impl Segmenter for NothingSegmenter {
        fn segment(&self, _prompt: &str) -> Vec<Clause> {
            Vec::new()
        }
    }

    #[test]
    fn test_custom_segmenter() {
        let pipeline = Pipeline::new(ExtractorConfig::default())
            .unwrap()
            .with_segmenter(NothingSegmenter);
        let rejection = pipeline.process_at("model 21EM", reference()).unwrap_err();
        assert!(rejection.contains(crate::validator::NO_ENTITIES));
    }

    #[test]
    fn test_description_matching_can_be_disabled() {
        let prompt = "X7 xDrive40i with panorama glass roof";
        let on = Pipeline::new(ExtractorConfig::default()).unwrap();
        let body = on.process_at(prompt, reference()).unwrap();
        assert_eq!(body.model_type_codes, vec!["21EM"]);
        assert_eq!(body.boolean_formulas, vec!["+S402A"]);

        let off = Pipeline::new(ExtractorConfig {
            description_matching: false,
            ..ExtractorConfig::default()
        })
        .unwrap();
        assert!(off.process_at(prompt, reference()).is_err());
    }
}
