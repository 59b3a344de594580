//! Sampling plan resolution
//!
//! Resolves a lot size, an inspection level and an AQL to a single sampling
//! plan for normal inspection: lot size and level select a code letter
//! (Table I), the code letter selects a row of Table II-A, and the AQL
//! selects the cell holding the acceptance and rejection numbers.

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::sampling::tables::SamplingTables;
use crate::sampling::types::{Aql, Cell, CodeLetter, InspectionLevel};

/// Errors raised while resolving a sampling plan.
///
/// A combination the tables simply do not cover is not an error: the
/// resolver returns `Ok(None)` for it.
#[derive(Debug, Error, Diagnostic)]
pub enum SamplingError {
    #[error("lot size {lot_size} is below the smallest tabulated lot size ({min})")]
    #[diagnostic(
        code(iqs::sampling::invalid_lot_size),
        help("a lot must contain at least two items before it can be sampled")
    )]
    InvalidLotSize { lot_size: u32, min: u32 },

    #[error("unknown inspection level '{0}'")]
    #[diagnostic(
        code(iqs::sampling::unknown_level),
        help("valid levels: I, II, III, S1, S2, S3, S4")
    )]
    UnknownInspectionLevel(String),

    #[error("unknown AQL '{0}'")]
    #[diagnostic(
        code(iqs::sampling::unknown_aql),
        help("valid AQLs: 0, 0.065, 0.10, 0.15, 0.25, 0.40, 0.65, 1.0, 1.5, 2.5, 4.0, 6.5")
    )]
    UnknownAql(String),

    #[error("code letter {0} has no sample size")]
    #[diagnostic(code(iqs::sampling::unmapped_code_letter))]
    UnmappedCodeLetter(CodeLetter),

    #[error("arrow for AQL {aql} at sample size {from} points to another arrow at sample size {to}")]
    #[diagnostic(
        code(iqs::sampling::arrow_chain),
        help("arrows must land on a cell with its own plan")
    )]
    ArrowChain { aql: Aql, from: u32, to: u32 },

    #[error("arrow for AQL {aql} at sample size {from} points to sample size {to}, which has no plan")]
    #[diagnostic(code(iqs::sampling::dangling_arrow))]
    DanglingArrow { aql: Aql, from: u32, to: u32 },

    #[error("sample size {sample_size} does not fit a lot of {lot_size}")]
    #[diagnostic(
        code(iqs::sampling::invalid_sample_size),
        help("a manual sample must hold at least one item and no more than the lot")
    )]
    InvalidSampleSize { sample_size: u32, lot_size: u32 },

    #[error("rejection number must be at least 1")]
    #[diagnostic(code(iqs::sampling::invalid_reject_number))]
    InvalidRejectNumber,
}

/// A resolved single sampling plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SamplingPlan {
    pub lot_size: u32,
    pub level: InspectionLevel,
    pub aql: Aql,
    pub code_letter: CodeLetter,

    /// Sample size belonging to the code letter
    pub default_sample_size: u32,

    /// Number of items to inspect
    pub sample_size: u32,

    /// Acceptance number (`None`: the lot is never accepted outright)
    pub accept: Option<u32>,

    /// Rejection number (`None`: the lot is never rejected)
    pub reject: Option<u32>,

    /// The cell was an arrow pointing at another sample size
    pub arrow: bool,

    /// The sample size was reduced to the lot size
    pub clamped: bool,
}

/// Verdict of a plan for a (partially) inspected sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Keep inspecting
    Continue,
    /// The lot passes
    Accept,
    /// The lot fails
    Reject,
    /// The sample was exhausted without reaching either number
    Reinspect,
}

impl SamplingPlan {
    /// Decide the lot after `inspected` items showed `rejections` nonconformities.
    ///
    /// A rejection number of zero is treated as one: the lot fails on its first
    /// nonconforming item.
    pub fn decide(&self, inspected: u32, rejections: u32) -> Decision {
        if let Some(reject) = self.reject {
            if rejections >= reject.max(1) {
                return Decision::Reject;
            }
        }
        if inspected < self.sample_size {
            return Decision::Continue;
        }
        match self.accept {
            Some(accept) if rejections <= accept => Decision::Accept,
            _ => Decision::Reinspect,
        }
    }
}

/// Resolves sampling plans against a set of tables
#[derive(Debug, Clone, Copy)]
pub struct SamplingPlanResolver {
    tables: &'static SamplingTables,
}

impl Default for SamplingPlanResolver {
    fn default() -> Self {
        Self::new(SamplingTables::normal())
    }
}

impl SamplingPlanResolver {
    pub fn new(tables: &'static SamplingTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'static SamplingTables {
        self.tables
    }

    /// Resolve the plan for a lot.
    ///
    /// Returns `Ok(None)` when the tables define no plan for the combination.
    pub fn resolve(
        &self,
        lot_size: u32,
        level: InspectionLevel,
        aql: Aql,
    ) -> Result<Option<SamplingPlan>, SamplingError> {
        let bracket =
            self.tables
                .bracket_for(lot_size)
                .ok_or_else(|| SamplingError::InvalidLotSize {
                    lot_size,
                    min: self.tables.min_lot_size().unwrap_or(0),
                })?;

        let code_letter = bracket.code_letter(level);
        let default_sample_size = self
            .tables
            .sample_size_for(code_letter)
            .ok_or(SamplingError::UnmappedCodeLetter(code_letter))?;
        debug!(lot_size, %level, %code_letter, default_sample_size, "code letter selected");

        let Some(row) = self.tables.row_for(default_sample_size) else {
            debug!(default_sample_size, "no AQL row for sample size");
            return Ok(None);
        };
        let Some(cell) = row.cell(aql) else {
            debug!(default_sample_size, %aql, "no plan for AQL");
            return Ok(None);
        };
        trace!(?cell, "cell found");

        let effective = match cell.arrow_sample_size() {
            Some(target) => {
                self.check_arrow_target(aql, default_sample_size, target)?;
                target
            }
            None => default_sample_size,
        };

        let clamped = effective > lot_size;
        let sample_size = if clamped { lot_size } else { effective };
        if clamped {
            warn!(effective, lot_size, "sample size clamped to lot size");
        }

        Ok(Some(SamplingPlan {
            lot_size,
            level,
            aql,
            code_letter,
            default_sample_size,
            sample_size,
            accept: cell.accept(),
            reject: cell.reject(),
            arrow: cell.is_arrow(),
            clamped,
        }))
    }

    fn check_arrow_target(&self, aql: Aql, from: u32, to: u32) -> Result<(), SamplingError> {
        match self.tables.row_for(to).and_then(|row| row.cell(aql)) {
            Some(target) if target.is_arrow() => {
                warn!(%aql, from, to, "arrow points at another arrow");
                Err(SamplingError::ArrowChain { aql, from, to })
            }
            Some(_) => Ok(()),
            None => {
                warn!(%aql, from, to, "arrow points at a sample size without a plan");
                Err(SamplingError::DanglingArrow { aql, from, to })
            }
        }
    }
}

/// Resolve against the normal inspection tables
pub fn resolve(
    lot_size: u32,
    level: InspectionLevel,
    aql: Aql,
) -> Result<Option<SamplingPlan>, SamplingError> {
    SamplingPlanResolver::default().resolve(lot_size, level, aql)
}

/// A structural problem found in a set of sampling tables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableIssue {
    #[error("first lot-size bracket starts at {0}, expected 2")]
    FirstBracket(u32),

    #[error("lot-size bracket starting at {found} should start at {expected}")]
    BracketGap { expected: u32, found: u32 },

    #[error("lot-size bracket {min}-{max} is empty")]
    EmptyBracket { min: u32, max: u32 },

    #[error("open-ended lot-size bracket starting at {0} is not the last bracket")]
    OpenBracketNotLast(u32),

    #[error("last lot-size bracket is not open-ended")]
    ClosedLastBracket,

    #[error("code letter {0} has no sample size")]
    MissingSampleSize(CodeLetter),

    #[error("no AQL row for sample size {0}")]
    MissingRow(u32),

    #[error("{count} AQL rows for sample size {sample_size}")]
    DuplicateRow { sample_size: u32, count: usize },

    #[error("arrow for AQL {aql} at sample size {from} points to another arrow at {to}")]
    ArrowChain { aql: Aql, from: u32, to: u32 },

    #[error("arrow for AQL {aql} at sample size {from} points to {to}, which has no plan")]
    DanglingArrow { aql: Aql, from: u32, to: u32 },

    #[error("arrow for AQL {aql} at sample size {from} disagrees with the plan at {to} ({found} vs {expected})")]
    ArrowMismatch {
        aql: Aql,
        from: u32,
        to: u32,
        found: Cell,
        expected: Cell,
    },
}

/// Check a set of tables for structural problems
pub fn check_tables(tables: &SamplingTables) -> Vec<TableIssue> {
    let mut issues = Vec::new();

    let mut expected_min = None;
    let count = tables.brackets.len();
    for (i, bracket) in tables.brackets.iter().enumerate() {
        match expected_min {
            None if bracket.min != 2 => issues.push(TableIssue::FirstBracket(bracket.min)),
            Some(expected) if bracket.min != expected => issues.push(TableIssue::BracketGap {
                expected,
                found: bracket.min,
            }),
            _ => {}
        }
        match bracket.max {
            Some(max) if max < bracket.min => issues.push(TableIssue::EmptyBracket {
                min: bracket.min,
                max,
            }),
            Some(_) if i + 1 == count => issues.push(TableIssue::ClosedLastBracket),
            None if i + 1 != count => issues.push(TableIssue::OpenBracketNotLast(bracket.min)),
            _ => {}
        }
        expected_min = bracket.max.map(|max| max.saturating_add(1));

        for letter in bracket.codes {
            if tables.sample_size_for(letter).is_none() {
                let issue = TableIssue::MissingSampleSize(letter);
                if !issues.contains(&issue) {
                    issues.push(issue);
                }
            }
        }
    }

    for &(_, sample_size) in tables.sample_sizes {
        let count = tables
            .rows
            .iter()
            .filter(|r| r.sample_size == sample_size)
            .count();
        match count {
            0 => issues.push(TableIssue::MissingRow(sample_size)),
            1 => {}
            _ => issues.push(TableIssue::DuplicateRow { sample_size, count }),
        }
    }

    for row in tables.rows {
        for &(aql, cell) in row.cells {
            let Some(to) = cell.arrow_sample_size() else {
                continue;
            };
            let from = row.sample_size;
            match tables.row_for(to).and_then(|target| target.cell(aql)) {
                None => issues.push(TableIssue::DanglingArrow { aql, from, to }),
                Some(target) if target.is_arrow() => {
                    issues.push(TableIssue::ArrowChain { aql, from, to })
                }
                Some(target) => {
                    if target.accept() != cell.accept() || target.reject() != cell.reject() {
                        issues.push(TableIssue::ArrowMismatch {
                            aql,
                            from,
                            to,
                            found: cell,
                            expected: target,
                        });
                    }
                }
            }
        }
    }

    issues
}
