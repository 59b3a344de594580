//! CLI command implementations

pub mod batch;
pub mod completions;
pub mod config;
pub mod plan;
pub mod review;
pub mod table;
