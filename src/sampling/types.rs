//! Enumerated domains of the sampling tables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sampling::resolver::SamplingError;

/// Inspection level (general I-III, special S1-S4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InspectionLevel {
    I,
    II,
    III,
    S1,
    S2,
    S3,
    S4,
}

impl InspectionLevel {
    /// Column order of Table I
    pub const ALL: [InspectionLevel; 7] = [
        InspectionLevel::I,
        InspectionLevel::II,
        InspectionLevel::III,
        InspectionLevel::S1,
        InspectionLevel::S2,
        InspectionLevel::S3,
        InspectionLevel::S4,
    ];

    /// The three general levels offered to operators
    pub const GENERAL: [InspectionLevel; 3] =
        [InspectionLevel::I, InspectionLevel::II, InspectionLevel::III];

    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionLevel::I => "I",
            InspectionLevel::II => "II",
            InspectionLevel::III => "III",
            InspectionLevel::S1 => "S1",
            InspectionLevel::S2 => "S2",
            InspectionLevel::S3 => "S3",
            InspectionLevel::S4 => "S4",
        }
    }

    /// Index of this level's column in a lot-size bracket
    pub(crate) fn column(&self) -> usize {
        match self {
            InspectionLevel::I => 0,
            InspectionLevel::II => 1,
            InspectionLevel::III => 2,
            InspectionLevel::S1 => 3,
            InspectionLevel::S2 => 4,
            InspectionLevel::S3 => 5,
            InspectionLevel::S4 => 6,
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(
            self,
            InspectionLevel::S1 | InspectionLevel::S2 | InspectionLevel::S3 | InspectionLevel::S4
        )
    }
}

impl fmt::Display for InspectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InspectionLevel {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InspectionLevel::ALL
            .iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| SamplingError::UnknownInspectionLevel(s.to_string()))
    }
}

/// Acceptable Quality Limit, one column of Table II-A.
///
/// AQLs are identified by their canonical table heading. Parsing is exact:
/// `"0.10"` is an AQL, `"0.1"` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Aql {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "0.065")]
    Aql0065,
    #[serde(rename = "0.10")]
    Aql010,
    #[serde(rename = "0.15")]
    Aql015,
    #[serde(rename = "0.25")]
    Aql025,
    #[serde(rename = "0.40")]
    Aql040,
    #[serde(rename = "0.65")]
    Aql065,
    #[serde(rename = "1.0")]
    Aql10,
    #[serde(rename = "1.5")]
    Aql15,
    #[serde(rename = "2.5")]
    Aql25,
    #[serde(rename = "4.0")]
    Aql40,
    #[serde(rename = "6.5")]
    Aql65,
}

impl Aql {
    /// Column order of Table II-A
    pub const ALL: [Aql; 12] = [
        Aql::Zero,
        Aql::Aql0065,
        Aql::Aql010,
        Aql::Aql015,
        Aql::Aql025,
        Aql::Aql040,
        Aql::Aql065,
        Aql::Aql10,
        Aql::Aql15,
        Aql::Aql25,
        Aql::Aql40,
        Aql::Aql65,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aql::Zero => "0",
            Aql::Aql0065 => "0.065",
            Aql::Aql010 => "0.10",
            Aql::Aql015 => "0.15",
            Aql::Aql025 => "0.25",
            Aql::Aql040 => "0.40",
            Aql::Aql065 => "0.65",
            Aql::Aql10 => "1.0",
            Aql::Aql15 => "1.5",
            Aql::Aql25 => "2.5",
            Aql::Aql40 => "4.0",
            Aql::Aql65 => "6.5",
        }
    }
}

impl fmt::Display for Aql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aql {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Aql::ALL
            .iter()
            .find(|aql| aql.as_str() == key)
            .copied()
            .ok_or_else(|| SamplingError::UnknownAql(s.to_string()))
    }
}

/// Sample size code letter (A-R; I and O are not used by the standard)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CodeLetter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    J,
    K,
    L,
    M,
    N,
    P,
    Q,
    R,
}

impl CodeLetter {
    pub const ALL: [CodeLetter; 16] = [
        CodeLetter::A,
        CodeLetter::B,
        CodeLetter::C,
        CodeLetter::D,
        CodeLetter::E,
        CodeLetter::F,
        CodeLetter::G,
        CodeLetter::H,
        CodeLetter::J,
        CodeLetter::K,
        CodeLetter::L,
        CodeLetter::M,
        CodeLetter::N,
        CodeLetter::P,
        CodeLetter::Q,
        CodeLetter::R,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CodeLetter::A => "A",
            CodeLetter::B => "B",
            CodeLetter::C => "C",
            CodeLetter::D => "D",
            CodeLetter::E => "E",
            CodeLetter::F => "F",
            CodeLetter::G => "G",
            CodeLetter::H => "H",
            CodeLetter::J => "J",
            CodeLetter::K => "K",
            CodeLetter::L => "L",
            CodeLetter::M => "M",
            CodeLetter::N => "N",
            CodeLetter::P => "P",
            CodeLetter::Q => "Q",
            CodeLetter::R => "R",
        }
    }
}

impl fmt::Display for CodeLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cell of Table II-A
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// A plan for the row's own sample size
    Plan { accept: u32, reject: u32 },

    /// The table's arrow: use this plan, sampling `sample_size` units
    Arrow {
        accept: u32,
        reject: u32,
        sample_size: u32,
    },

    /// Never accept outright
    RejectOnly { reject: u32 },

    /// No rejection number exists
    NeverReject { accept: u32 },
}

impl Cell {
    pub fn accept(&self) -> Option<u32> {
        match *self {
            Cell::Plan { accept, .. }
            | Cell::Arrow { accept, .. }
            | Cell::NeverReject { accept } => Some(accept),
            Cell::RejectOnly { .. } => None,
        }
    }

    pub fn reject(&self) -> Option<u32> {
        match *self {
            Cell::Plan { reject, .. }
            | Cell::Arrow { reject, .. }
            | Cell::RejectOnly { reject } => Some(reject),
            Cell::NeverReject { .. } => None,
        }
    }

    /// Sample size an arrow points at
    pub fn arrow_sample_size(&self) -> Option<u32> {
        match *self {
            Cell::Arrow { sample_size, .. } => Some(sample_size),
            _ => None,
        }
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self, Cell::Arrow { .. })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ac = self.accept().map_or("-".to_string(), |a| a.to_string());
        let re = self.reject().map_or("-".to_string(), |r| r.to_string());
        match self.arrow_sample_size() {
            Some(n) => write!(f, "{} {} (n={})", ac, re, n),
            None => write!(f, "{} {}", ac, re),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspection_level_parsing() {
        assert_eq!("II".parse::<InspectionLevel>().unwrap(), InspectionLevel::II);
        assert_eq!("s3".parse::<InspectionLevel>().unwrap(), InspectionLevel::S3);
        assert_eq!(" III ".parse::<InspectionLevel>().unwrap(), InspectionLevel::III);
        assert!(matches!(
            "IV".parse::<InspectionLevel>(),
            Err(SamplingError::UnknownInspectionLevel(_))
        ));
    }

    #[test]
    fn test_aql_parsing_is_exact() {
        assert_eq!("0.10".parse::<Aql>().unwrap(), Aql::Aql010);
        assert_eq!("6.5".parse::<Aql>().unwrap(), Aql::Aql65);
        assert_eq!("0".parse::<Aql>().unwrap(), Aql::Zero);
        assert!(matches!("0.1".parse::<Aql>(), Err(SamplingError::UnknownAql(_))));
        assert!(matches!("1".parse::<Aql>(), Err(SamplingError::UnknownAql(_))));
        assert!(matches!("10".parse::<Aql>(), Err(SamplingError::UnknownAql(_))));
    }

    #[test]
    fn test_aql_display_matches_parse() {
        for aql in Aql::ALL {
            assert_eq!(aql.to_string().parse::<Aql>().unwrap(), aql);
        }
    }

    #[test]
    fn test_aql_serializes_as_heading() {
        let json = serde_json::to_string(&Aql::Aql040).unwrap();
        assert_eq!(json, "\"0.40\"");
        let level = serde_json::to_string(&InspectionLevel::S2).unwrap();
        assert_eq!(level, "\"S2\"");
    }

    #[test]
    fn test_cell_accessors() {
        let arrow = Cell::Arrow {
            accept: 1,
            reject: 2,
            sample_size: 32,
        };
        assert_eq!(arrow.accept(), Some(1));
        assert_eq!(arrow.reject(), Some(2));
        assert_eq!(arrow.arrow_sample_size(), Some(32));

        let never = Cell::NeverReject { accept: 14 };
        assert_eq!(never.reject(), None);
        assert_eq!(never.accept(), Some(14));

        let reject_only = Cell::RejectOnly { reject: 1 };
        assert_eq!(reject_only.accept(), None);
        assert_eq!(reject_only.reject(), Some(1));
        assert!(!reject_only.is_arrow());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Plan { accept: 0, reject: 1 }.to_string(), "0 1");
        assert_eq!(Cell::NeverReject { accept: 14 }.to_string(), "14 -");
        assert_eq!(
            Cell::Arrow {
                accept: 0,
                reject: 1,
                sample_size: 5
            }
            .to_string(),
            "0 1 (n=5)"
        );
    }
}
