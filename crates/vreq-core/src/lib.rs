// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Turns free-form vehicle configuration prompts into request bodies.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use vreq_core::{ExtractorConfig, Pipeline};
//!
//! let pipeline = Pipeline::new(ExtractorConfig::default())?;
//! let body = pipeline.process_at(
//!     "model 21EM with S402A, without P7LGA, on 2024-11-08",
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//! )?;
//! assert_eq!(body.boolean_formulas, vec!["+S402A-P7LGA"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod batch;
pub mod catalog;
pub mod config;
pub mod extract;
pub mod formula;
pub mod pipeline;
pub mod request;
pub mod validator;

pub use batch::{process_batch, BatchError, BatchRow, Response};
pub use catalog::{CatalogEntry, CatalogKind, VehicleCatalog};
pub use config::{ConfigError, ExtractorConfig};
pub use extract::Extraction;
pub use formula::{BooleanFormula, Polarity, SignedOptionCode};
pub use pipeline::Pipeline;
pub use request::{RequestBody, RequestBuilder};
pub use validator::{ExtractionResult, Rejection, ValidationOutcome, ValidationPolicy, Validator};
