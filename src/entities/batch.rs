//! Batch entity - a folder of scanned images submitted for inspection

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::entities::review::ReviewOutcome;

/// Batch status (delivery state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum BatchStatus {
    /// Not sampled yet
    #[default]
    Pending,
    /// Passed sampling
    ReadyForDelivery,
    /// Failed its first sampling, goes back for correction
    Correction,
    /// Failed again after a previous sampling, must be rescanned
    Rescan,
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchStatus::Pending => write!(f, "pending"),
            BatchStatus::ReadyForDelivery => write!(f, "ready_for_delivery"),
            BatchStatus::Correction => write!(f, "correction"),
            BatchStatus::Rescan => write!(f, "rescan"),
        }
    }
}

impl std::str::FromStr for BatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BatchStatus::Pending),
            "ready_for_delivery" | "ready" | "delivery" => Ok(BatchStatus::ReadyForDelivery),
            "correction" => Ok(BatchStatus::Correction),
            "rescan" => Ok(BatchStatus::Rescan),
            _ => Err(format!(
                "Invalid batch status: {}. Use pending, ready_for_delivery, correction, or rescan",
                s
            )),
        }
    }
}

/// A batch of scanned images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// Folder name (e.g. `BATCH_0042`)
    pub name: String,

    /// Location on disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Immediate subfolders of the batch folder
    #[serde(default)]
    pub folder_count: u32,

    /// Image files anywhere below the batch folder (the lot size)
    pub image_count: u32,

    /// Completed sampling rounds
    #[serde(default)]
    pub sampling_attempts: u32,

    #[serde(default)]
    pub status: BatchStatus,
}

impl Batch {
    pub fn new(name: impl Into<String>, folder_count: u32, image_count: u32) -> Self {
        Self {
            name: name.into(),
            path: None,
            folder_count,
            image_count,
            sampling_attempts: 0,
            status: BatchStatus::Pending,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.sampling_attempts = attempts;
        self
    }

    /// Lot size used to resolve the sampling plan
    pub fn lot_size(&self) -> u32 {
        self.image_count
    }

    /// Apply the outcome of a finished review and return the new status.
    ///
    /// Unfinished and aborted reviews leave the batch untouched.
    pub fn record_outcome(&mut self, outcome: ReviewOutcome) -> BatchStatus {
        let next = match outcome {
            ReviewOutcome::InProgress | ReviewOutcome::Aborted => return self.status,
            ReviewOutcome::Accepted => BatchStatus::ReadyForDelivery,
            ReviewOutcome::Rejected if self.sampling_attempts > 0 => BatchStatus::Rescan,
            ReviewOutcome::Rejected => BatchStatus::Correction,
            ReviewOutcome::Reinspect => BatchStatus::Pending,
        };
        self.sampling_attempts += 1;
        self.status = next;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_creation() {
        let batch = Batch::new("BATCH_001", 3, 1200);
        assert_eq!(batch.lot_size(), 1200);
        assert_eq!(batch.status, BatchStatus::Pending);
        assert_eq!(batch.sampling_attempts, 0);
    }

    #[test]
    fn test_first_rejection_goes_to_correction() {
        let mut batch = Batch::new("BATCH_001", 1, 50);
        assert_eq!(batch.record_outcome(ReviewOutcome::Rejected), BatchStatus::Correction);
        assert_eq!(batch.sampling_attempts, 1);
    }

    #[test]
    fn test_repeated_rejection_goes_to_rescan() {
        let mut batch = Batch::new("BATCH_001", 1, 50).with_attempts(1);
        assert_eq!(batch.record_outcome(ReviewOutcome::Rejected), BatchStatus::Rescan);
        assert_eq!(batch.sampling_attempts, 2);
    }

    #[test]
    fn test_acceptance_is_ready_for_delivery() {
        let mut batch = Batch::new("BATCH_001", 1, 50).with_attempts(2);
        assert_eq!(
            batch.record_outcome(ReviewOutcome::Accepted),
            BatchStatus::ReadyForDelivery
        );
        assert_eq!(batch.sampling_attempts, 3);
    }

    #[test]
    fn test_reinspect_keeps_batch_pending_and_counts_attempt() {
        let mut batch = Batch::new("BATCH_001", 1, 200_000);
        assert_eq!(batch.record_outcome(ReviewOutcome::Reinspect), BatchStatus::Pending);
        assert_eq!(batch.status, BatchStatus::Pending);
        assert_eq!(batch.sampling_attempts, 1);

        // A later failure counts the reinspection as a prior attempt
        assert_eq!(batch.record_outcome(ReviewOutcome::Rejected), BatchStatus::Rescan);
        assert_eq!(batch.sampling_attempts, 2);
    }

    #[test]
    fn test_abort_leaves_batch_untouched() {
        let mut batch = Batch::new("BATCH_001", 1, 50);
        assert_eq!(batch.record_outcome(ReviewOutcome::Aborted), BatchStatus::Pending);
        assert_eq!(batch.sampling_attempts, 0);
    }

    #[test]
    fn test_batch_status_parsing() {
        assert_eq!("pending".parse::<BatchStatus>().unwrap(), BatchStatus::Pending);
        assert_eq!("RESCAN".parse::<BatchStatus>().unwrap(), BatchStatus::Rescan);
        assert_eq!(
            "ready_for_delivery".parse::<BatchStatus>().unwrap(),
            BatchStatus::ReadyForDelivery
        );
        assert!("shipped".parse::<BatchStatus>().is_err());
    }

    #[test]
    fn test_batch_deserialization() {
        let yaml = r#"
name: BATCH_0042
folder_count: 4
image_count: 812
sampling_attempts: 1
status: correction
"#;
        let batch: Batch = serde_yml::from_str(yaml).unwrap();
        assert_eq!(batch.name, "BATCH_0042");
        assert_eq!(batch.lot_size(), 812);
        assert_eq!(batch.status, BatchStatus::Correction);
        assert!(batch.path.is_none());
    }
}
