//! cellcalc CLI - evaluate spreadsheet formulas against a sheet file

use anyhow::{Context, Result};
use cellcalc::prelude::*;
use cellcalc::{format_number, MAX_EVALUATION_DEPTH, MAX_RANGE_CELLS};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cellcalc")]
#[command(author, version, about = "Spreadsheet formula evaluation tool")]
struct Cli {
    /// Largest range a formula may aggregate
    #[arg(long, global = true, default_value_t = MAX_RANGE_CELLS)]
    max_range_cells: u64,

    /// Deepest a formula evaluation may recurse through references
    #[arg(long, global = true, default_value_t = MAX_EVALUATION_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula against a sheet and print the result
    Eval {
        /// Sheet file (JSON object of address -> cell)
        #[arg(short, long)]
        sheet: Option<PathBuf>,

        /// Formula text, e.g. "=SUM(A1:A3)"
        formula: String,
    },

    /// Print the display text of every cell in a sheet
    Render {
        /// Sheet file (JSON object of address -> cell)
        #[arg(short, long)]
        sheet: PathBuf,

        /// Print a summary line to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Print the numeric values of a range, one per line
    Series {
        /// Sheet file (JSON object of address -> cell)
        #[arg(short, long)]
        sheet: PathBuf,

        /// Range in start:end form, e.g. "B2:B13"
        range: String,
    },
}

/// One entry of a sheet file
///
/// Either the raw text alone, or the raw text with presentation attributes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellEntry {
    Raw(String),
    Detailed {
        value: String,
        #[serde(flatten)]
        presentation: Presentation,
    },
}

impl From<CellEntry> for Cell {
    fn from(entry: CellEntry) -> Self {
        match entry {
            CellEntry::Raw(raw) => Cell::new(raw),
            CellEntry::Detailed {
                value,
                presentation,
            } => Cell::new(value).with_presentation(presentation),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = EvaluationOptions {
        max_range_cells: cli.max_range_cells,
        max_depth: cli.max_depth,
    };

    match cli.command {
        Commands::Eval { sheet, formula } => {
            let sheet = match sheet {
                Some(path) => load_sheet(&path)?,
                None => Sheet::new(),
            };
            eval_formula(&sheet, &formula, options)
        }
        Commands::Render { sheet, stats } => render_sheet(&load_sheet(&sheet)?, options, stats),
        Commands::Series { sheet, range } => print_series(&load_sheet(&sheet)?, &range, options),
    }
}

fn load_sheet(path: &Path) -> Result<Sheet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    parse_sheet(&text).with_context(|| format!("Failed to load sheet '{}'", path.display()))
}

fn parse_sheet(text: &str) -> Result<Sheet> {
    let entries: BTreeMap<String, CellEntry> =
        serde_json::from_str(text).context("Invalid sheet JSON")?;

    let mut sheet = Sheet::new();
    for (address, entry) in entries {
        let addr = CellAddress::parse(&address)
            .with_context(|| format!("Invalid cell address '{}'", address))?;
        sheet.set_cell_at(addr, entry.into());
    }
    Ok(sheet)
}

fn eval_formula(sheet: &Sheet, formula: &str, options: EvaluationOptions) -> Result<()> {
    let result = Evaluator::new(sheet).with_options(options).evaluate(formula);
    writeln!(io::stdout(), "{}", result).context("Failed to write to stdout")?;
    Ok(())
}

fn render_sheet(sheet: &Sheet, options: EvaluationOptions, stats: bool) -> Result<()> {
    let (rendered, summary) = sheet.render_with_stats(&options);

    let mut out = io::stdout().lock();
    for cell in &rendered {
        writeln!(out, "{}\t{}", cell.address, cell.display).context("Failed to write to stdout")?;
    }

    if stats {
        eprintln!(
            "Rendered {} cells, {} formulas ({} errors)",
            summary.cells_rendered, summary.formulas_evaluated, summary.errors
        );
    }

    Ok(())
}

fn print_series(sheet: &Sheet, range: &str, options: EvaluationOptions) -> Result<()> {
    if CellRange::parse(range).is_err() {
        eprintln!("Warning: '{}' is not a start:end range", range);
    }

    let series = Evaluator::new(sheet)
        .with_options(options)
        .extract_series(range);

    let mut out = io::stdout().lock();
    for value in series {
        writeln!(out, "{}", format_number(value)).context("Failed to write to stdout")?;
    }

    Ok(())
}
