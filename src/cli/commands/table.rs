//! `iqs table` command - print or check the sampling tables

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{effective_format, format_number, write_output};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::sampling::{check_tables, Aql, Cell, CodeLetter, InspectionLevel, SamplingTables};

#[derive(clap::Args, Debug)]
pub struct TableArgs {
    /// Print Table I (lot size to code letter) instead of Table II-A
    #[arg(long)]
    pub letters: bool,

    /// Check the tables for structural problems instead of printing them
    #[arg(long, conflicts_with = "letters")]
    pub check: bool,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct BracketOut {
    min: u32,
    max: Option<u32>,
    code_letters: Vec<(InspectionLevel, CodeLetter)>,
}

#[derive(Serialize)]
struct CellOut {
    aql: Aql,
    #[serde(flatten)]
    cell: Cell,
}

#[derive(Serialize)]
struct RowOut {
    sample_size: u32,
    code_letters: Vec<CodeLetter>,
    cells: Vec<CellOut>,
}

pub fn run(args: TableArgs, global: &GlobalOpts) -> Result<()> {
    let tables = SamplingTables::normal();
    if args.check {
        return run_check(tables, global);
    }

    let config = Config::load();
    let format = effective_format(global, &config);
    let content = if args.letters {
        render_letters(tables, format)?
    } else {
        render_plans(tables, format)?
    };
    write_output(&content, args.output, global.quiet)
}

fn run_check(tables: &SamplingTables, global: &GlobalOpts) -> Result<()> {
    let issues = check_tables(tables);
    if issues.is_empty() {
        if !global.quiet {
            println!(
                "{} Sampling tables are consistent ({} brackets, {} rows)",
                style("✓").green(),
                tables.brackets.len(),
                tables.rows.len()
            );
        }
        return Ok(());
    }
    for issue in &issues {
        println!("{} {}", style("✗").red(), issue);
    }
    Err(miette::miette!(
        "{} problem(s) found in the sampling tables",
        issues.len()
    ))
}

fn bracket_label(min: u32, max: Option<u32>) -> String {
    match max {
        Some(max) => format!("{}-{}", min, max),
        None => format!("{}+", min),
    }
}

fn render_letters(tables: &SamplingTables, format: OutputFormat) -> Result<String> {
    let out: Vec<BracketOut> = tables
        .brackets
        .iter()
        .map(|b| BracketOut {
            min: b.min,
            max: b.max,
            code_letters: InspectionLevel::ALL
                .iter()
                .map(|level| (*level, b.code_letter(*level)))
                .collect(),
        })
        .collect();

    let mut header = vec!["Lot size".to_string()];
    header.extend(InspectionLevel::ALL.iter().map(|l| l.to_string()));

    match format {
        OutputFormat::Json => Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(&out).into_diagnostic()?
        )),
        OutputFormat::Yaml => serde_yml::to_string(&out).into_diagnostic(),
        OutputFormat::Tsv => {
            let mut s = header.join("\t");
            s.push('\n');
            for b in tables.brackets {
                let mut row = vec![bracket_label(b.min, b.max)];
                row.extend(InspectionLevel::ALL.iter().map(|l| b.code_letter(*l).to_string()));
                s.push_str(&row.join("\t"));
                s.push('\n');
            }
            Ok(s)
        }
        OutputFormat::Auto => {
            let mut output = String::new();
            output.push_str("# Sample Size Code Letters\n\n");

            let mut builder = Builder::default();
            builder.push_record(header);
            for b in tables.brackets {
                let mut row = vec![bracket_label(b.min, b.max)];
                row.extend(InspectionLevel::ALL.iter().map(|l| b.code_letter(*l).to_string()));
                builder.push_record(row);
            }
            output.push_str(&builder.build().with(Style::markdown()).to_string());

            output.push_str("\n\n## Sample Sizes\n\n");
            let mut builder = Builder::default();
            builder.push_record(["Code letter", "Sample size"]);
            for (letter, n) in tables.sample_sizes {
                builder.push_record([letter.to_string(), n.to_string()]);
            }
            output.push_str(&builder.build().with(Style::markdown()).to_string());
            output.push('\n');
            Ok(output)
        }
    }
}

/// Cell text for the printed table: arrows show their direction
fn cell_label(row_size: u32, cell: Option<Cell>) -> String {
    match cell {
        None => String::new(),
        Some(cell) => match cell.arrow_sample_size() {
            Some(target) if target > row_size => format!(
                "↓ {} {}",
                format_number(cell.accept()),
                format_number(cell.reject())
            ),
            Some(_) => format!(
                "↑ {} {}",
                format_number(cell.accept()),
                format_number(cell.reject())
            ),
            None => cell.to_string(),
        },
    }
}

fn letters_for(tables: &SamplingTables, sample_size: u32) -> Vec<CodeLetter> {
    tables
        .sample_sizes
        .iter()
        .filter(|(_, n)| *n == sample_size)
        .map(|(letter, _)| *letter)
        .collect()
}

fn render_plans(tables: &SamplingTables, format: OutputFormat) -> Result<String> {
    let out: Vec<RowOut> = tables
        .rows
        .iter()
        .map(|row| RowOut {
            sample_size: row.sample_size,
            code_letters: letters_for(tables, row.sample_size),
            cells: row
                .cells
                .iter()
                .map(|(aql, cell)| CellOut {
                    aql: *aql,
                    cell: *cell,
                })
                .collect(),
        })
        .collect();

    let mut header = vec!["Letter".to_string(), "n".to_string()];
    header.extend(Aql::ALL.iter().map(|a| a.to_string()));

    let rows = tables.rows.iter().map(|row| {
        let letters: Vec<String> = letters_for(tables, row.sample_size)
            .iter()
            .map(|l| l.to_string())
            .collect();
        let mut record = vec![letters.join(","), row.sample_size.to_string()];
        record.extend(
            Aql::ALL
                .iter()
                .map(|aql| cell_label(row.sample_size, row.cell(*aql))),
        );
        record
    });

    match format {
        OutputFormat::Json => Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(&out).into_diagnostic()?
        )),
        OutputFormat::Yaml => serde_yml::to_string(&out).into_diagnostic(),
        OutputFormat::Tsv => {
            let mut s = header.join("\t");
            s.push('\n');
            for record in rows {
                s.push_str(&record.join("\t"));
                s.push('\n');
            }
            Ok(s)
        }
        OutputFormat::Auto => {
            let mut output = String::new();
            output.push_str("# Single Sampling Plans for Normal Inspection\n\n");
            let mut builder = Builder::default();
            builder.push_record(header);
            for record in rows {
                builder.push_record(record);
            }
            output.push_str(&builder.build().with(Style::markdown()).to_string());
            output.push_str("\n\nCells read `Ac Re`. ↓/↑: use the plan below/above and its sample size.\n");
            Ok(output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_label() {
        assert_eq!(cell_label(20, Some(Cell::Plan { accept: 1, reject: 2 })), "1 2");
        assert_eq!(
            cell_label(
                20,
                Some(Cell::Arrow {
                    accept: 1,
                    reject: 2,
                    sample_size: 32
                })
            ),
            "↓ 1 2"
        );
        assert_eq!(
            cell_label(
                20,
                Some(Cell::Arrow {
                    accept: 0,
                    reject: 1,
                    sample_size: 13
                })
            ),
            "↑ 0 1"
        );
        assert_eq!(cell_label(20, None), "");
    }

    #[test]
    fn test_markdown_tables() {
        let tables = SamplingTables::normal();
        let plans = render_plans(tables, OutputFormat::Auto).unwrap();
        assert!(plans.contains("| Letter"));
        assert!(plans.contains("0.065"));
        let letters = render_letters(tables, OutputFormat::Auto).unwrap();
        assert!(letters.contains("500001+"));
        assert!(letters.contains("| S4"));
    }

    #[test]
    fn test_tsv_has_one_line_per_row() {
        let tables = SamplingTables::normal();
        let tsv = render_plans(tables, OutputFormat::Tsv).unwrap();
        assert_eq!(tsv.lines().count(), tables.rows.len() + 1);
    }
}
