//! Sampling report - the signed record of one review

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::batch::{Batch, BatchStatus};
use crate::entities::review::{RejectedItem, ReviewOutcome, ReviewSession};
use crate::sampling::{Aql, CodeLetter, InspectionLevel, SamplingMode};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("{0} reviewer name must not be empty")]
    MissingReviewer(&'static str),

    #[error("review of {0} is not finished")]
    Unfinished(String),
}

/// The two people who sign off a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewers {
    /// Reviewer on behalf of the commissioning authority
    pub authority: String,
    /// Reviewer on behalf of the contractor
    pub contractor: String,
}

impl Reviewers {
    pub fn new(
        authority: impl Into<String>,
        contractor: impl Into<String>,
    ) -> Result<Self, ReportError> {
        let authority = authority.into().trim().to_string();
        let contractor = contractor.into().trim().to_string();
        if authority.is_empty() {
            return Err(ReportError::MissingReviewer("authority"));
        }
        if contractor.is_empty() {
            return Err(ReportError::MissingReviewer("contractor"));
        }
        Ok(Self {
            authority,
            contractor,
        })
    }
}

/// Plan figures as printed on the report.
///
/// `accept` and `reject` are written as `null` when the plan has no such
/// number, so a never-rejecting plan stays visible on the signed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub mode: SamplingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_letter: Option<CodeLetter>,
    pub sample_size: u32,
    pub accept: Option<u32>,
    pub reject: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingReport {
    pub generated: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    pub batch: String,
    pub lot_size: u32,
    pub folder_count: u32,

    /// Table parameters, absent for manual plans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<InspectionLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aql: Option<Aql>,

    pub plan: PlanSummary,

    /// Items looked at, in review order
    pub inspected: Vec<String>,

    #[serde(default)]
    pub rejected: Vec<RejectedItem>,

    /// Rejections counted against the plan (concessions excluded)
    pub rejections: u32,

    pub outcome: ReviewOutcome,
    pub status: BatchStatus,
    pub sampling_attempts: u32,
    pub reviewers: Reviewers,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subfolders: Vec<String>,
}

impl SamplingReport {
    /// Build the report for a finished session.
    ///
    /// `batch` must already carry the outcome (see [`Batch::record_outcome`]).
    pub fn from_session(
        session: &ReviewSession,
        batch: &Batch,
        reviewers: Reviewers,
    ) -> Result<Self, ReportError> {
        if !session.is_finished() {
            return Err(ReportError::Unfinished(session.batch().to_string()));
        }
        let plan = session.plan();
        let table = plan.table();
        Ok(Self {
            generated: Utc::now(),
            project: None,
            location: None,
            batch: batch.name.clone(),
            lot_size: plan.lot_size(),
            folder_count: batch.folder_count,
            level: table.map(|t| t.level),
            aql: table.map(|t| t.aql),
            plan: PlanSummary {
                mode: plan.mode(),
                code_letter: table.map(|t| t.code_letter),
                sample_size: plan.sample_size(),
                accept: plan.accept(),
                reject: plan.reject(),
            },
            inspected: session.inspected().to_vec(),
            rejected: session.rejected().to_vec(),
            rejections: session.rejections(),
            outcome: session.outcome(),
            status: batch.status,
            sampling_attempts: batch.sampling_attempts,
            reviewers,
            subfolders: Vec::new(),
        })
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn with_subfolders(mut self, subfolders: Vec<String>) -> Self {
        self.subfolders = subfolders;
        self
    }

    pub fn to_yaml(&self) -> Result<String, serde_yml::Error> {
        serde_yml::to_string(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::review::RejectionReason;
    use crate::sampling::{resolve, ManualPlan};

    fn finished_session() -> (ReviewSession, Batch) {
        let mut batch = Batch::new("BATCH_007", 2, 40);
        // 26-50 at II: D (8), AQL 6.5 -> Ac 1 Re 2
        let plan = resolve(batch.lot_size(), InspectionLevel::II, Aql::Aql65)
            .unwrap()
            .unwrap();
        let items = (0..plan.sample_size)
            .map(|i| format!("box_1/img_{}.jpg", i))
            .collect();
        let mut session = ReviewSession::new(&batch.name, plan, items).unwrap();
        session.reject(RejectionReason::Concession).unwrap();
        session.reject(RejectionReason::OutOfFocus).unwrap();
        session.reject(RejectionReason::WrongOrientation).unwrap();
        batch.record_outcome(session.outcome());
        (session, batch)
    }

    #[test]
    fn test_reviewers_require_names() {
        assert!(Reviewers::new("A. Authority", "C. Contractor").is_ok());
        assert_eq!(
            Reviewers::new("  ", "C. Contractor").unwrap_err(),
            ReportError::MissingReviewer("authority")
        );
        assert_eq!(
            Reviewers::new("A. Authority", "").unwrap_err(),
            ReportError::MissingReviewer("contractor")
        );
    }

    #[test]
    fn test_report_from_finished_session() {
        let (session, batch) = finished_session();
        let reviewers = Reviewers::new("Authority", "Contractor").unwrap();
        let report = SamplingReport::from_session(&session, &batch, reviewers)
            .unwrap()
            .with_project(Some("Archive digitization".to_string()))
            .with_location(Some(" ".to_string()))
            .with_subfolders(vec!["box_1".to_string()]);

        assert_eq!(report.batch, "BATCH_007");
        assert_eq!(report.plan.sample_size, 8);
        assert_eq!(report.outcome, ReviewOutcome::Rejected);
        assert_eq!(report.status, BatchStatus::Correction);
        assert_eq!(report.rejections, 2);
        assert_eq!(report.rejected.len(), 3);
        assert_eq!(report.inspected.len(), 3);
        assert!(report.location.is_none());

        let yaml = report.to_yaml().unwrap();
        assert!(yaml.contains("batch: BATCH_007"));
        assert!(yaml.contains("mode: table"));
        assert!(yaml.contains("code_letter: D"));
        assert!(yaml.contains("reason: concession"));
        assert!(yaml.contains("status: correction"));

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["aql"], "6.5");
        assert_eq!(value["reviewers"]["contractor"], "Contractor");
    }

    #[test]
    fn test_never_reject_plan_writes_null_rejection_number() {
        let mut batch = Batch::new("BATCH_042", 6, 200_000);
        let plan = resolve(batch.lot_size(), InspectionLevel::III, Aql::Aql065)
            .unwrap()
            .unwrap();
        let items = (0..plan.sample_size).map(|i| i.to_string()).collect();
        let mut session = ReviewSession::new(&batch.name, plan, items).unwrap();
        while session.current().is_some() {
            session.accept().unwrap();
        }
        batch.record_outcome(session.outcome());
        let reviewers = Reviewers::new("a", "b").unwrap();
        let report = SamplingReport::from_session(&session, &batch, reviewers).unwrap();

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["plan"]["accept"], 14);
        assert!(value["plan"]["reject"].is_null());
        assert!(value["plan"].as_object().unwrap().contains_key("reject"));
        assert!(report.to_yaml().unwrap().contains("reject: null"));
    }

    #[test]
    fn test_manual_plan_report_records_mode() {
        let mut batch = Batch::new("BATCH_009", 1, 12);
        let plan = ManualPlan::new(batch.lot_size(), 3, 1).unwrap();
        let items = vec!["a.png".to_string(), "b.png".to_string(), "c.png".to_string()];
        let mut session = ReviewSession::new(&batch.name, plan, items).unwrap();
        session.accept().unwrap();
        session.reject(RejectionReason::WrongNaming).unwrap();
        batch.record_outcome(session.outcome());
        let reviewers = Reviewers::new("a", "b").unwrap();
        let report = SamplingReport::from_session(&session, &batch, reviewers).unwrap();

        assert_eq!(report.plan.mode, SamplingMode::Manual);
        assert_eq!(report.outcome, ReviewOutcome::Rejected);
        assert!(report.level.is_none());
        assert!(report.plan.code_letter.is_none());
        let yaml = report.to_yaml().unwrap();
        assert!(yaml.contains("mode: manual"));
        assert!(yaml.contains("reject: 1"));
        assert!(!yaml.contains("level:"));
    }

    #[test]
    fn test_unfinished_session_has_no_report() {
        let plan = resolve(40, InspectionLevel::II, Aql::Aql65).unwrap().unwrap();
        let items = (0..plan.sample_size).map(|i| i.to_string()).collect();
        let session = ReviewSession::new("BATCH_008", plan, items).unwrap();
        let batch = Batch::new("BATCH_008", 0, 40);
        let reviewers = Reviewers::new("a", "b").unwrap();
        assert!(matches!(
            SamplingReport::from_session(&session, &batch, reviewers),
            Err(ReportError::Unfinished(_))
        ));
    }
}
