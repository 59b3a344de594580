//! Acceptance sampling per ANSI Z1.4 / ISO 2859-1

pub mod manual;
pub mod resolver;
pub mod tables;
pub mod types;

pub use manual::{ManualPlan, ReviewPlan, SamplingMode};
pub use resolver::{
    check_tables, resolve, Decision, SamplingError, SamplingPlan, SamplingPlanResolver, TableIssue,
};
pub use tables::{AqlRow, LotSizeBracket, SamplingTables};
pub use types::{Aql, Cell, CodeLetter, InspectionLevel};
