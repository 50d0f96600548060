//! Per-gene report sheets

use std::collections::HashMap;

use log::info;

use super::sheet_name::SheetNamer;
use crate::data::{compare_rows, ResultRow, ResultTable};

/// What to build the report from
#[derive(Debug, Clone)]
pub enum ReportInput {
    /// One augmented table, split into a sheet per gene
    ByGene(ResultTable),
    /// Tables that are already partitioned; emitted as-is under "0", "1", ...
    Indexed(Vec<ResultTable>),
}

/// One named table of the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheet {
    /// Export-safe sheet name
    pub name: String,
    /// Gene symbol, or the positional index in indexed mode
    pub key: String,
    pub rows: Vec<ResultRow>,
}

/// Ordered collection of report sheets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    sheets: Vec<ReportSheet>,
}

impl Report {
    pub fn sheets(&self) -> &[ReportSheet] {
        &self.sheets
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheet(&self, key: &str) -> Option<&ReportSheet> {
        self.sheets.iter().find(|s| s.key == key)
    }

    pub fn n_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

/// Sort rows by (column, row) in plate order; ties keep input order
pub fn sort_by_well(rows: &mut [ResultRow]) {
    rows.sort_by(|a, b| {
        a.well_column
            .cmp(&b.well_column)
            .then_with(|| compare_rows(&a.well_row, &b.well_row))
    });
}

/// Split a table into one sheet per gene.
///
/// Sheets appear in order of each gene's first appearance in the table;
/// rows within a sheet are in plate order.
pub fn pivot_by_gene(table: &ResultTable) -> Report {
    let genes = table.genes();
    let position: HashMap<&str, usize> = genes.iter().enumerate().map(|(i, g)| (*g, i)).collect();

    let mut partitions: Vec<Vec<ResultRow>> = vec![Vec::new(); genes.len()];
    for row in table.rows() {
        if let Some(&idx) = position.get(row.gene.as_str()) {
            partitions[idx].push(row.clone());
        }
    }

    let mut namer = SheetNamer::new();
    let sheets: Vec<ReportSheet> = genes
        .iter()
        .zip(partitions)
        .map(|(gene, mut rows)| {
            sort_by_well(&mut rows);
            ReportSheet {
                name: namer.assign(gene),
                key: gene.to_string(),
                rows,
            }
        })
        .collect();

    info!("Report: {} gene sheets from {} rows", sheets.len(), table.len());
    Report { sheets }
}

/// Build the report in the mode selected by the input
pub fn build_report(input: ReportInput) -> Report {
    match input {
        ReportInput::ByGene(table) => pivot_by_gene(&table),
        ReportInput::Indexed(tables) => {
            let sheets: Vec<ReportSheet> = tables
                .into_iter()
                .enumerate()
                .map(|(i, t)| ReportSheet {
                    name: i.to_string(),
                    key: i.to_string(),
                    rows: t.into_rows(),
                })
                .collect();
            info!("Report: {} pre-partitioned sheets", sheets.len());
            Report { sheets }
        }
    }
}
