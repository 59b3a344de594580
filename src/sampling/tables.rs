//! Reference tables of ANSI Z1.4 / ISO 2859-1
//!
//! Table I (sample size code letters) and Table II-A (single sampling plans
//! for normal inspection), kept as declarative data. Each literal below
//! corresponds to one row of the published tables so it can be compared
//! against the standard cell by cell.

use crate::sampling::types::CodeLetter::{self, *};
use crate::sampling::types::{Aql, Cell, InspectionLevel};

/// One row of Table I
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotSizeBracket {
    /// Smallest lot size in the bracket
    pub min: u32,

    /// Largest lot size in the bracket (`None` for the open-ended last row)
    pub max: Option<u32>,

    /// Code letters in column order I, II, III, S1, S2, S3, S4
    pub codes: [CodeLetter; 7],
}

impl LotSizeBracket {
    pub fn contains(&self, lot_size: u32) -> bool {
        self.min <= lot_size && self.max.map_or(true, |max| lot_size <= max)
    }

    pub fn code_letter(&self, level: InspectionLevel) -> CodeLetter {
        self.codes[level.column()]
    }
}

/// One row of Table II-A, keyed by the code letter's sample size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqlRow {
    pub sample_size: u32,
    pub cells: &'static [(Aql, Cell)],
}

impl AqlRow {
    pub fn cell(&self, aql: Aql) -> Option<Cell> {
        self.cells
            .iter()
            .find(|(key, _)| *key == aql)
            .map(|(_, cell)| *cell)
    }
}

/// A complete set of sampling tables
#[derive(Debug, Clone, Copy)]
pub struct SamplingTables {
    pub brackets: &'static [LotSizeBracket],
    pub sample_sizes: &'static [(CodeLetter, u32)],
    pub rows: &'static [AqlRow],
}

impl SamplingTables {
    /// The tables for normal inspection
    pub fn normal() -> &'static SamplingTables {
        &NORMAL_INSPECTION
    }

    pub fn bracket_for(&self, lot_size: u32) -> Option<&'static LotSizeBracket> {
        self.brackets.iter().find(|b| b.contains(lot_size))
    }

    pub fn sample_size_for(&self, letter: CodeLetter) -> Option<u32> {
        self.sample_sizes
            .iter()
            .find(|(l, _)| *l == letter)
            .map(|(_, n)| *n)
    }

    pub fn row_for(&self, sample_size: u32) -> Option<&'static AqlRow> {
        self.rows.iter().find(|r| r.sample_size == sample_size)
    }

    /// Smallest lot size any bracket accepts
    pub fn min_lot_size(&self) -> Option<u32> {
        self.brackets.iter().map(|b| b.min).min()
    }
}

pub const fn bracket(min: u32, max: Option<u32>, codes: [CodeLetter; 7]) -> LotSizeBracket {
    LotSizeBracket { min, max, codes }
}

pub const fn plan(accept: u32, reject: u32) -> Cell {
    Cell::Plan { accept, reject }
}

pub const fn arrow(accept: u32, reject: u32, sample_size: u32) -> Cell {
    Cell::Arrow {
        accept,
        reject,
        sample_size,
    }
}

pub const fn never_reject(accept: u32) -> Cell {
    Cell::NeverReject { accept }
}

pub const fn reject_only(reject: u32) -> Cell {
    Cell::RejectOnly { reject }
}

static NORMAL_INSPECTION: SamplingTables = SamplingTables {
    brackets: LOT_SIZE_BRACKETS,
    sample_sizes: CODE_LETTER_SAMPLE_SIZES,
    rows: AQL_ROWS,
};

/// Table I: lot size to code letter (columns I, II, III, S1, S2, S3, S4)
pub static LOT_SIZE_BRACKETS: &[LotSizeBracket] = &[
    bracket(2, Some(8), [A, A, B, A, A, A, A]),
    bracket(9, Some(15), [A, B, C, A, A, A, A]),
    bracket(16, Some(25), [B, C, D, A, A, B, B]),
    bracket(26, Some(50), [C, D, E, A, B, B, C]),
    bracket(51, Some(90), [C, E, F, B, B, C, C]),
    bracket(91, Some(150), [D, F, G, B, B, C, D]),
    bracket(151, Some(280), [E, G, H, B, C, D, E]),
    bracket(281, Some(500), [F, H, J, B, C, D, E]),
    bracket(501, Some(1200), [G, J, K, C, C, E, F]),
    bracket(1201, Some(3200), [H, K, L, C, D, E, G]),
    bracket(3201, Some(10000), [J, L, M, C, D, F, G]),
    bracket(10001, Some(35000), [K, M, N, C, D, F, H]),
    bracket(35001, Some(150000), [L, N, P, D, E, G, J]),
    bracket(150001, Some(500000), [M, P, Q, D, E, G, J]),
    bracket(500001, None, [N, Q, R, D, E, H, K]),
];

/// Default sample size per code letter
pub static CODE_LETTER_SAMPLE_SIZES: &[(CodeLetter, u32)] = &[
    (A, 2),
    (B, 3),
    (C, 5),
    (D, 8),
    (E, 13),
    (F, 20),
    (G, 32),
    (H, 50),
    (J, 80),
    (K, 125),
    (L, 200),
    (M, 315),
    (N, 500),
    (P, 800),
    (Q, 1250),
    (R, 2000),
];

/// Table II-A: acceptance (Ac) and rejection (Re) numbers per AQL
pub static AQL_ROWS: &[AqlRow] = &[
    AqlRow {
        sample_size: 2,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(0, 1, 200)),
            (Aql::Aql010, arrow(0, 1, 125)),
            (Aql::Aql015, arrow(0, 1, 80)),
            (Aql::Aql025, arrow(0, 1, 50)),
            (Aql::Aql040, arrow(0, 1, 32)),
            (Aql::Aql065, arrow(0, 1, 20)),
            (Aql::Aql10, arrow(0, 1, 13)),
            (Aql::Aql15, arrow(0, 1, 8)),
            (Aql::Aql25, arrow(0, 1, 5)),
            (Aql::Aql40, arrow(0, 1, 3)),
            (Aql::Aql65, plan(0, 1)),
        ],
    },
    AqlRow {
        sample_size: 3,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(0, 1, 200)),
            (Aql::Aql010, arrow(0, 1, 125)),
            (Aql::Aql015, arrow(0, 1, 80)),
            (Aql::Aql025, arrow(0, 1, 50)),
            (Aql::Aql040, arrow(0, 1, 32)),
            (Aql::Aql065, arrow(0, 1, 20)),
            (Aql::Aql10, arrow(0, 1, 13)),
            (Aql::Aql15, arrow(0, 1, 8)),
            (Aql::Aql25, arrow(0, 1, 5)),
            (Aql::Aql40, plan(0, 1)),
            (Aql::Aql65, arrow(0, 1, 2)),
        ],
    },
    AqlRow {
        sample_size: 5,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(0, 1, 200)),
            (Aql::Aql010, arrow(0, 1, 125)),
            (Aql::Aql015, arrow(0, 1, 80)),
            (Aql::Aql025, arrow(0, 1, 50)),
            (Aql::Aql040, arrow(0, 1, 32)),
            (Aql::Aql065, arrow(0, 1, 20)),
            (Aql::Aql10, arrow(0, 1, 13)),
            (Aql::Aql15, arrow(0, 1, 8)),
            (Aql::Aql25, plan(0, 1)),
            (Aql::Aql40, arrow(0, 1, 3)),
            (Aql::Aql65, arrow(1, 2, 8)),
        ],
    },
    AqlRow {
        sample_size: 8,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(0, 1, 200)),
            (Aql::Aql010, arrow(0, 1, 125)),
            (Aql::Aql015, arrow(0, 1, 80)),
            (Aql::Aql025, arrow(0, 1, 50)),
            (Aql::Aql040, arrow(0, 1, 32)),
            (Aql::Aql065, arrow(0, 1, 20)),
            (Aql::Aql10, arrow(0, 1, 13)),
            (Aql::Aql15, plan(0, 1)),
            (Aql::Aql25, arrow(0, 1, 5)),
            (Aql::Aql40, arrow(1, 2, 13)),
            (Aql::Aql65, plan(1, 2)),
        ],
    },
    AqlRow {
        sample_size: 13,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(0, 1, 200)),
            (Aql::Aql010, arrow(0, 1, 125)),
            (Aql::Aql015, arrow(0, 1, 80)),
            (Aql::Aql025, arrow(0, 1, 50)),
            (Aql::Aql040, arrow(0, 1, 32)),
            (Aql::Aql065, arrow(0, 1, 20)),
            (Aql::Aql10, plan(0, 1)),
            (Aql::Aql15, arrow(0, 1, 8)),
            (Aql::Aql25, arrow(1, 2, 20)),
            (Aql::Aql40, plan(1, 2)),
            (Aql::Aql65, plan(2, 3)),
        ],
    },
    AqlRow {
        sample_size: 20,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(0, 1, 200)),
            (Aql::Aql010, arrow(0, 1, 125)),
            (Aql::Aql015, arrow(0, 1, 80)),
            (Aql::Aql025, arrow(0, 1, 50)),
            (Aql::Aql040, arrow(0, 1, 32)),
            (Aql::Aql065, plan(0, 1)),
            (Aql::Aql10, arrow(0, 1, 13)),
            (Aql::Aql15, arrow(1, 2, 32)),
            (Aql::Aql25, plan(1, 2)),
            (Aql::Aql40, plan(2, 3)),
            (Aql::Aql65, plan(3, 4)),
        ],
    },
    AqlRow {
        sample_size: 32,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(0, 1, 200)),
            (Aql::Aql010, arrow(0, 1, 125)),
            (Aql::Aql015, arrow(0, 1, 80)),
            (Aql::Aql025, arrow(0, 1, 50)),
            (Aql::Aql040, plan(0, 1)),
            (Aql::Aql065, arrow(0, 1, 20)),
            (Aql::Aql10, arrow(1, 2, 50)),
            (Aql::Aql15, plan(1, 2)),
            (Aql::Aql25, plan(2, 3)),
            (Aql::Aql40, plan(3, 4)),
            (Aql::Aql65, plan(5, 6)),
        ],
    },
    AqlRow {
        sample_size: 50,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(0, 1, 200)),
            (Aql::Aql010, arrow(0, 1, 125)),
            (Aql::Aql015, arrow(0, 1, 80)),
            (Aql::Aql025, plan(0, 1)),
            (Aql::Aql040, arrow(0, 1, 32)),
            (Aql::Aql065, arrow(1, 2, 80)),
            (Aql::Aql10, plan(1, 2)),
            (Aql::Aql15, plan(2, 3)),
            (Aql::Aql25, plan(3, 4)),
            (Aql::Aql40, plan(5, 6)),
            (Aql::Aql65, plan(7, 8)),
        ],
    },
    AqlRow {
        sample_size: 80,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(0, 1, 200)),
            (Aql::Aql010, arrow(0, 1, 125)),
            (Aql::Aql015, plan(0, 1)),
            (Aql::Aql025, arrow(0, 1, 50)),
            (Aql::Aql040, arrow(1, 2, 125)),
            (Aql::Aql065, plan(1, 2)),
            (Aql::Aql10, plan(2, 3)),
            (Aql::Aql15, plan(3, 4)),
            (Aql::Aql25, plan(5, 6)),
            (Aql::Aql40, plan(7, 8)),
            (Aql::Aql65, plan(10, 11)),
        ],
    },
    AqlRow {
        sample_size: 125,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(0, 1, 200)),
            (Aql::Aql010, plan(0, 1)),
            (Aql::Aql015, arrow(0, 1, 80)),
            (Aql::Aql025, arrow(1, 2, 200)),
            (Aql::Aql040, plan(1, 2)),
            (Aql::Aql065, plan(2, 3)),
            (Aql::Aql10, plan(3, 4)),
            (Aql::Aql15, plan(5, 6)),
            (Aql::Aql25, plan(7, 8)),
            (Aql::Aql40, plan(10, 11)),
            (Aql::Aql65, plan(14, 15)),
        ],
    },
    AqlRow {
        sample_size: 200,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, plan(0, 1)),
            (Aql::Aql010, arrow(0, 1, 125)),
            (Aql::Aql015, arrow(1, 2, 315)),
            (Aql::Aql025, plan(1, 2)),
            (Aql::Aql040, plan(2, 3)),
            (Aql::Aql065, plan(3, 4)),
            (Aql::Aql10, plan(5, 6)),
            (Aql::Aql15, plan(7, 8)),
            (Aql::Aql25, plan(10, 11)),
            (Aql::Aql40, plan(14, 15)),
            (Aql::Aql65, plan(21, 22)),
        ],
    },
    AqlRow {
        sample_size: 315,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(0, 1, 200)),
            (Aql::Aql010, arrow(1, 2, 500)),
            (Aql::Aql015, plan(1, 2)),
            (Aql::Aql025, plan(2, 3)),
            (Aql::Aql040, plan(3, 4)),
            (Aql::Aql065, plan(5, 6)),
            (Aql::Aql10, plan(7, 8)),
            (Aql::Aql15, plan(10, 11)),
            (Aql::Aql25, plan(14, 15)),
            (Aql::Aql40, plan(21, 22)),
            (Aql::Aql65, arrow(21, 22, 200)),
        ],
    },
    AqlRow {
        sample_size: 500,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, arrow(1, 2, 800)),
            (Aql::Aql010, plan(1, 2)),
            (Aql::Aql015, plan(2, 3)),
            (Aql::Aql025, plan(3, 4)),
            (Aql::Aql040, plan(5, 6)),
            (Aql::Aql065, plan(7, 8)),
            (Aql::Aql10, plan(10, 11)),
            (Aql::Aql15, plan(14, 15)),
            (Aql::Aql25, plan(21, 22)),
            (Aql::Aql40, arrow(21, 22, 315)),
            (Aql::Aql65, arrow(21, 22, 200)),
        ],
    },
    AqlRow {
        sample_size: 800,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, plan(1, 2)),
            (Aql::Aql010, plan(2, 3)),
            (Aql::Aql015, plan(3, 4)),
            (Aql::Aql025, plan(5, 6)),
            (Aql::Aql040, plan(7, 8)),
            (Aql::Aql065, plan(10, 11)),
            (Aql::Aql10, plan(14, 15)),
            (Aql::Aql15, plan(21, 22)),
            (Aql::Aql25, arrow(21, 22, 500)),
            (Aql::Aql40, arrow(21, 22, 315)),
            (Aql::Aql65, arrow(21, 22, 200)),
        ],
    },
    AqlRow {
        sample_size: 1250,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, plan(2, 3)),
            (Aql::Aql010, plan(3, 4)),
            (Aql::Aql015, plan(5, 6)),
            (Aql::Aql025, plan(7, 8)),
            (Aql::Aql040, plan(10, 11)),
            (Aql::Aql065, never_reject(14)),
            (Aql::Aql10, plan(21, 22)),
            (Aql::Aql15, arrow(21, 22, 800)),
            (Aql::Aql25, arrow(21, 22, 500)),
            (Aql::Aql40, arrow(21, 22, 315)),
            (Aql::Aql65, arrow(21, 22, 200)),
        ],
    },
    AqlRow {
        sample_size: 2000,
        cells: &[
            (Aql::Zero, plan(0, 0)),
            (Aql::Aql0065, plan(3, 4)),
            (Aql::Aql010, plan(5, 6)),
            (Aql::Aql015, plan(7, 8)),
            (Aql::Aql025, plan(10, 11)),
            (Aql::Aql040, plan(14, 15)),
            (Aql::Aql065, plan(21, 22)),
            (Aql::Aql10, arrow(21, 22, 1250)),
            (Aql::Aql15, arrow(21, 22, 800)),
            (Aql::Aql25, arrow(21, 22, 500)),
            (Aql::Aql40, arrow(21, 22, 315)),
            (Aql::Aql65, arrow(21, 22, 200)),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_contains() {
        let first = LOT_SIZE_BRACKETS[0];
        assert!(first.contains(2));
        assert!(first.contains(8));
        assert!(!first.contains(1));
        assert!(!first.contains(9));

        let last = LOT_SIZE_BRACKETS[LOT_SIZE_BRACKETS.len() - 1];
        assert!(last.contains(500_001));
        assert!(last.contains(u32::MAX));
        assert!(!last.contains(500_000));
    }

    #[test]
    fn test_bracket_code_letter_columns() {
        let bracket = SamplingTables::normal().bracket_for(1200).unwrap();
        assert_eq!(bracket.code_letter(InspectionLevel::I), G);
        assert_eq!(bracket.code_letter(InspectionLevel::II), J);
        assert_eq!(bracket.code_letter(InspectionLevel::III), K);
        assert_eq!(bracket.code_letter(InspectionLevel::S4), F);
    }

    #[test]
    fn test_sample_sizes_cover_every_letter() {
        let tables = SamplingTables::normal();
        for letter in CodeLetter::ALL {
            assert!(
                tables.sample_size_for(letter).is_some(),
                "no sample size for {}",
                letter
            );
        }
        assert_eq!(tables.sample_size_for(K), Some(125));
        assert_eq!(tables.sample_size_for(R), Some(2000));
    }

    #[test]
    fn test_every_row_has_every_aql() {
        for row in AQL_ROWS {
            for aql in Aql::ALL {
                assert!(
                    row.cell(aql).is_some(),
                    "row {} has no cell for AQL {}",
                    row.sample_size,
                    aql
                );
            }
        }
    }

    #[test]
    fn test_rows_are_keyed_by_sample_sizes() {
        let keys: Vec<u32> = AQL_ROWS.iter().map(|r| r.sample_size).collect();
        let sizes: Vec<u32> = CODE_LETTER_SAMPLE_SIZES.iter().map(|(_, n)| *n).collect();
        assert_eq!(keys, sizes);
    }

    #[test]
    fn test_never_reject_cell() {
        let row = SamplingTables::normal().row_for(1250).unwrap();
        assert_eq!(row.cell(Aql::Aql065), Some(never_reject(14)));
    }

    #[test]
    fn test_min_lot_size() {
        assert_eq!(SamplingTables::normal().min_lot_size(), Some(2));
    }
}
