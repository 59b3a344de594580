//! Review session - the per-image accept/reject loop over a drawn sample

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::sampling::{Decision, ReviewPlan};

/// Why a reviewer rejected an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    WrongResolution,
    WrongOrientation,
    InformationLoss,
    OutOfFocus,
    LinesScratchesStains,
    WrongColorDepth,
    WrongNaming,
    WrongFileFormat,
    BlankMargin,
    /// Flagged, but let through by agreement. Does not count as a rejection.
    Concession,
}

impl RejectionReason {
    /// Order in which reasons are offered to the reviewer
    pub const ALL: [RejectionReason; 10] = [
        RejectionReason::WrongResolution,
        RejectionReason::WrongOrientation,
        RejectionReason::InformationLoss,
        RejectionReason::OutOfFocus,
        RejectionReason::LinesScratchesStains,
        RejectionReason::WrongColorDepth,
        RejectionReason::WrongNaming,
        RejectionReason::WrongFileFormat,
        RejectionReason::BlankMargin,
        RejectionReason::Concession,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            RejectionReason::WrongResolution => "Wrong resolution",
            RejectionReason::WrongOrientation => "Wrong orientation",
            RejectionReason::InformationLoss => "Information loss",
            RejectionReason::OutOfFocus => "Out of focus",
            RejectionReason::LinesScratchesStains => "Lines, scratches, stains",
            RejectionReason::WrongColorDepth => "Wrong color depth",
            RejectionReason::WrongNaming => "Wrong naming",
            RejectionReason::WrongFileFormat => "Wrong file format",
            RejectionReason::BlankMargin => "Blank margin",
            RejectionReason::Concession => "Concession",
        }
    }

    /// Whether the reason counts toward the rejection number
    pub fn counts(&self) -> bool {
        !matches!(self, RejectionReason::Concession)
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for RejectionReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-', ','], "_");
        match key.as_str() {
            "wrong_resolution" | "resolution" => Ok(RejectionReason::WrongResolution),
            "wrong_orientation" | "orientation" => Ok(RejectionReason::WrongOrientation),
            "information_loss" | "loss" => Ok(RejectionReason::InformationLoss),
            "out_of_focus" | "focus" | "blur" => Ok(RejectionReason::OutOfFocus),
            "lines_scratches_stains" | "lines__scratches__stains" | "scratches" => {
                Ok(RejectionReason::LinesScratchesStains)
            }
            "wrong_color_depth" | "color_depth" => Ok(RejectionReason::WrongColorDepth),
            "wrong_naming" | "naming" => Ok(RejectionReason::WrongNaming),
            "wrong_file_format" | "format" => Ok(RejectionReason::WrongFileFormat),
            "blank_margin" | "margin" => Ok(RejectionReason::BlankMargin),
            "concession" => Ok(RejectionReason::Concession),
            _ => Err(format!("Unknown rejection reason: {}", s)),
        }
    }
}

/// A flagged item and the reason given
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedItem {
    pub item: String,
    pub reason: RejectionReason,
}

/// State of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ReviewOutcome {
    #[default]
    InProgress,
    Accepted,
    Rejected,
    /// Sample exhausted without reaching an acceptance decision
    Reinspect,
    Aborted,
}

impl ReviewOutcome {
    pub fn is_finished(&self) -> bool {
        !matches!(self, ReviewOutcome::InProgress)
    }
}

impl std::fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewOutcome::InProgress => write!(f, "in_progress"),
            ReviewOutcome::Accepted => write!(f, "accepted"),
            ReviewOutcome::Rejected => write!(f, "rejected"),
            ReviewOutcome::Reinspect => write!(f, "reinspect"),
            ReviewOutcome::Aborted => write!(f, "aborted"),
        }
    }
}

impl From<Decision> for ReviewOutcome {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Continue => ReviewOutcome::InProgress,
            Decision::Accept => ReviewOutcome::Accepted,
            Decision::Reject => ReviewOutcome::Rejected,
            Decision::Reinspect => ReviewOutcome::Reinspect,
        }
    }
}

/// Errors from driving a review session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("review of {batch} is already finished ({outcome})")]
    Finished {
        batch: String,
        outcome: ReviewOutcome,
    },

    #[error("plan requires {expected} items but {found} were drawn")]
    SampleMismatch { expected: u32, found: usize },
}

/// An accept/reject loop over the sampled items of one batch
#[derive(Debug, Clone)]
pub struct ReviewSession {
    batch: String,
    plan: ReviewPlan,
    items: Vec<String>,
    position: usize,
    rejections: u32,
    rejected: Vec<RejectedItem>,
    outcome: ReviewOutcome,
}

impl ReviewSession {
    /// Start a review. `items` must hold exactly the plan's sample size.
    pub fn new(
        batch: impl Into<String>,
        plan: impl Into<ReviewPlan>,
        items: Vec<String>,
    ) -> Result<Self, ReviewError> {
        let plan = plan.into();
        if items.len() != plan.sample_size() as usize {
            return Err(ReviewError::SampleMismatch {
                expected: plan.sample_size(),
                found: items.len(),
            });
        }
        let mut session = Self {
            batch: batch.into(),
            plan,
            items,
            position: 0,
            rejections: 0,
            rejected: Vec::new(),
            outcome: ReviewOutcome::InProgress,
        };
        session.outcome = plan.decide(0, 0).into();
        Ok(session)
    }

    pub fn batch(&self) -> &str {
        &self.batch
    }

    pub fn plan(&self) -> &ReviewPlan {
        &self.plan
    }

    /// Item under review, `None` once the review is finished
    pub fn current(&self) -> Option<&str> {
        if self.outcome.is_finished() {
            return None;
        }
        self.items.get(self.position).map(String::as_str)
    }

    /// (1-based position of the current item, sample size)
    pub fn progress(&self) -> (usize, usize) {
        ((self.position + 1).min(self.items.len()), self.items.len())
    }

    pub fn rejections(&self) -> u32 {
        self.rejections
    }

    pub fn rejected(&self) -> &[RejectedItem] {
        &self.rejected
    }

    /// All items of the drawn sample
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Items that were actually looked at
    pub fn inspected(&self) -> &[String] {
        &self.items[..self.position.min(self.items.len())]
    }

    pub fn outcome(&self) -> ReviewOutcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    /// Accept the current item and move on
    pub fn accept(&mut self) -> Result<ReviewOutcome, ReviewError> {
        self.ensure_running()?;
        self.advance()
    }

    /// Reject the current item and move on
    pub fn reject(&mut self, reason: RejectionReason) -> Result<ReviewOutcome, ReviewError> {
        self.ensure_running()?;
        let item = self.items[self.position].clone();
        debug!(batch = %self.batch, %item, %reason, "item rejected");
        if reason.counts() {
            self.rejections += 1;
        }
        self.rejected.push(RejectedItem { item, reason });
        self.advance()
    }

    /// Cancel the review without a verdict
    pub fn abort(&mut self) {
        if !self.outcome.is_finished() {
            info!(batch = %self.batch, "review aborted");
            self.outcome = ReviewOutcome::Aborted;
        }
    }

    fn ensure_running(&self) -> Result<(), ReviewError> {
        if self.outcome.is_finished() {
            return Err(ReviewError::Finished {
                batch: self.batch.clone(),
                outcome: self.outcome,
            });
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<ReviewOutcome, ReviewError> {
        self.position += 1;
        self.outcome = self
            .plan
            .decide(self.position as u32, self.rejections)
            .into();
        if self.outcome.is_finished() {
            info!(
                batch = %self.batch,
                outcome = %self.outcome,
                inspected = self.position,
                rejections = self.rejections,
                "review finished"
            );
        }
        Ok(self.outcome)
    }
}
