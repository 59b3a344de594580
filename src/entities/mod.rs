//! Entity type definitions
//!
//! - [`Batch`] - a folder of scanned images and its delivery status
//! - [`ReviewSession`] - the accept/reject loop over a drawn sample
//! - [`SamplingReport`] - the signed record of a finished review

pub mod batch;
pub mod report;
pub mod review;

pub use batch::{Batch, BatchStatus};
pub use report::{PlanSummary, ReportError, Reviewers, SamplingReport};
pub use review::{RejectedItem, RejectionReason, ReviewError, ReviewOutcome, ReviewSession};
