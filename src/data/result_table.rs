//! Augmented result rows produced by the ΔΔCt pipeline

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::measurement::{MeasurementTable, TimePoint};
use super::well::WellPosition;
use crate::error::Result;

/// One measurement with every derived column.
///
/// Derived fields start out `None` and are filled stage by stage; a value
/// that stays `None` means "no data" and is written as an empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "Well")]
    pub well: String,
    #[serde(rename = "Well Row")]
    pub well_row: String,
    #[serde(rename = "Well Column")]
    pub well_column: u32,
    #[serde(rename = "Gene")]
    pub gene: String,
    #[serde(rename = "Condition")]
    pub condition: String,
    #[serde(rename = "Time Point")]
    pub time_point: TimePoint,
    #[serde(rename = "Ct Value")]
    pub ct_value: Option<f64>,
    #[serde(rename = "Ct_HK")]
    pub ct_housekeeping: Option<f64>,
    #[serde(rename = "av Ct")]
    pub avg_ct: Option<f64>,
    #[serde(rename = "delta Ct")]
    pub delta_ct: Option<f64>,
    #[serde(rename = "delta Ct Control")]
    pub delta_ct_control: Option<f64>,
    #[serde(rename = "delta delta Ct")]
    pub delta_delta_ct: Option<f64>,
    #[serde(rename = "Fold Induction")]
    pub fold_induction: Option<f64>,
    #[serde(rename = "Condition & Gene")]
    pub condition_gene: String,
}

impl ResultRow {
    /// Well coordinates, for plate-order sorting
    pub fn position(&self) -> WellPosition {
        WellPosition {
            row: self.well_row.clone(),
            column: self.well_column,
        }
    }

    /// Borrowed view without the `Well Row` column, as emitted in reports
    pub fn report_view(&self) -> ReportRow<'_> {
        ReportRow {
            well: &self.well,
            well_column: self.well_column,
            gene: &self.gene,
            condition: &self.condition,
            time_point: self.time_point.as_str(),
            ct_value: self.ct_value,
            ct_housekeeping: self.ct_housekeeping,
            avg_ct: self.avg_ct,
            delta_ct: self.delta_ct,
            delta_ct_control: self.delta_ct_control,
            delta_delta_ct: self.delta_delta_ct,
            fold_induction: self.fold_induction,
            condition_gene: &self.condition_gene,
        }
    }
}

/// Report layout of a result row (`Well Row` dropped)
#[derive(Debug, Serialize)]
pub struct ReportRow<'a> {
    #[serde(rename = "Well")]
    pub well: &'a str,
    #[serde(rename = "Well Column")]
    pub well_column: u32,
    #[serde(rename = "Gene")]
    pub gene: &'a str,
    #[serde(rename = "Condition")]
    pub condition: &'a str,
    #[serde(rename = "Time Point")]
    pub time_point: &'a str,
    #[serde(rename = "Ct Value")]
    pub ct_value: Option<f64>,
    #[serde(rename = "Ct_HK")]
    pub ct_housekeeping: Option<f64>,
    #[serde(rename = "av Ct")]
    pub avg_ct: Option<f64>,
    #[serde(rename = "delta Ct")]
    pub delta_ct: Option<f64>,
    #[serde(rename = "delta Ct Control")]
    pub delta_ct_control: Option<f64>,
    #[serde(rename = "delta delta Ct")]
    pub delta_delta_ct: Option<f64>,
    #[serde(rename = "Fold Induction")]
    pub fold_induction: Option<f64>,
    #[serde(rename = "Condition & Gene")]
    pub condition_gene: &'a str,
}

/// Snapshot of the table between pipeline stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    /// Decompose every well label and set up empty derived columns.
    ///
    /// This is the well-parsing stage; a malformed label aborts with
    /// `MalformedWellLabel` naming the row.
    pub fn from_measurements(table: &MeasurementTable) -> Result<Self> {
        let rows = table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let position = WellPosition::parse(&m.well, i)?;
                Ok(ResultRow {
                    well: m.well.clone(),
                    well_row: position.row,
                    well_column: position.column,
                    gene: m.gene.clone(),
                    condition: m.condition.clone(),
                    time_point: m.time_point.clone(),
                    ct_value: m.ct_value,
                    ct_housekeeping: None,
                    avg_ct: None,
                    delta_ct: None,
                    delta_ct_control: None,
                    delta_delta_ct: None,
                    fold_induction: None,
                    condition_gene: String::new(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ResultRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct genes in order of first appearance
    pub fn genes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|r| seen.insert(r.gene.as_str()))
            .map(|r| r.gene.as_str())
            .collect()
    }

    /// Rows carrying a fold induction value
    pub fn n_with_fold_induction(&self) -> usize {
        self.rows.iter().filter(|r| r.fold_induction.is_some()).count()
    }
}
