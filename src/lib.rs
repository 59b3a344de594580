//! IQS: Image Quality Sampler
//!
//! Acceptance sampling for the manual quality control of scanned image
//! batches. The [`sampling`] module resolves ANSI Z1.4 / ISO 2859-1 plans
//! from a lot size, an inspection level and an AQL; the rest of the crate
//! draws the sample, drives the review and records its outcome.

pub mod cli;
pub mod core;
pub mod entities;
pub mod logging;
pub mod sampling;
