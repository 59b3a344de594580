//! Operator-entered plans
//!
//! A manual plan skips the tables: the operator names the sample size and
//! the number of rejections that fails the lot.

use serde::{Deserialize, Serialize};

use crate::sampling::resolver::{Decision, SamplingError, SamplingPlan};

/// How the plan of a review was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Looked up in the ANSI Z1.4 tables
    Table,
    /// Sample size and rejection number given by hand
    Manual,
}

impl std::fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingMode::Table => write!(f, "table"),
            SamplingMode::Manual => write!(f, "manual"),
        }
    }
}

/// Sample size and rejection number chosen by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManualPlan {
    pub lot_size: u32,
    pub sample_size: u32,
    pub reject: u32,
}

impl ManualPlan {
    pub fn new(lot_size: u32, sample_size: u32, reject: u32) -> Result<Self, SamplingError> {
        if sample_size == 0 || sample_size > lot_size {
            return Err(SamplingError::InvalidSampleSize {
                sample_size,
                lot_size,
            });
        }
        if reject == 0 {
            return Err(SamplingError::InvalidRejectNumber);
        }
        Ok(Self {
            lot_size,
            sample_size,
            reject,
        })
    }

    /// Highest rejection count that still passes
    pub fn accept(&self) -> u32 {
        self.reject - 1
    }

    pub fn decide(&self, inspected: u32, rejections: u32) -> Decision {
        if rejections >= self.reject {
            Decision::Reject
        } else if inspected < self.sample_size {
            Decision::Continue
        } else {
            Decision::Accept
        }
    }
}

/// The plan a review is decided by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPlan {
    Table(SamplingPlan),
    Manual(ManualPlan),
}

impl ReviewPlan {
    pub fn mode(&self) -> SamplingMode {
        match self {
            ReviewPlan::Table(_) => SamplingMode::Table,
            ReviewPlan::Manual(_) => SamplingMode::Manual,
        }
    }

    pub fn lot_size(&self) -> u32 {
        match self {
            ReviewPlan::Table(plan) => plan.lot_size,
            ReviewPlan::Manual(plan) => plan.lot_size,
        }
    }

    pub fn sample_size(&self) -> u32 {
        match self {
            ReviewPlan::Table(plan) => plan.sample_size,
            ReviewPlan::Manual(plan) => plan.sample_size,
        }
    }

    pub fn accept(&self) -> Option<u32> {
        match self {
            ReviewPlan::Table(plan) => plan.accept,
            ReviewPlan::Manual(plan) => Some(plan.accept()),
        }
    }

    pub fn reject(&self) -> Option<u32> {
        match self {
            ReviewPlan::Table(plan) => plan.reject,
            ReviewPlan::Manual(plan) => Some(plan.reject),
        }
    }

    /// The table plan, if the review runs on one
    pub fn table(&self) -> Option<&SamplingPlan> {
        match self {
            ReviewPlan::Table(plan) => Some(plan),
            ReviewPlan::Manual(_) => None,
        }
    }

    pub fn decide(&self, inspected: u32, rejections: u32) -> Decision {
        match self {
            ReviewPlan::Table(plan) => plan.decide(inspected, rejections),
            ReviewPlan::Manual(plan) => plan.decide(inspected, rejections),
        }
    }
}

impl From<SamplingPlan> for ReviewPlan {
    fn from(plan: SamplingPlan) -> Self {
        ReviewPlan::Table(plan)
    }
}

impl From<ManualPlan> for ReviewPlan {
    fn from(plan: ManualPlan) -> Self {
        ReviewPlan::Manual(plan)
    }
}
