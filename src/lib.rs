//! qpcr_ddct: relative qPCR expression analysis (ΔΔCt method) in Rust
//!
//! Takes per-well Ct readings annotated with gene, condition and time point,
//! normalises them against a housekeeping gene, references them against a
//! control condition and reports fold induction per gene.
//!
//! # Example
//!
//! ```ignore
//! use qpcr_ddct::prelude::*;
//!
//! let table = read_measurements("plate.csv")?;
//! let config = AnalysisConfig::new("Gapdh", "PBS")?;
//!
//! let analysis = run_ddct(&table, &config)?;
//! write_results("plate_ddct.csv", &analysis.results)?;
//! write_report("report/", &analysis.report())?;
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod delta;
pub mod error;
pub mod io;
pub mod normalization;
pub mod report;
pub mod stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AnalysisConfig, ConfigOverrides};
    pub use crate::data::{Measurement, MeasurementTable, ResultRow, ResultTable, TimePoint, WellPosition};
    pub use crate::delta::{attach_delta_ct, attach_delta_delta_ct, attach_fold_induction, fold_induction};
    pub use crate::error::{AnalysisWarning, QpcrError, Result};
    pub use crate::io::{
        read_measurements, read_raw_export, read_results, write_measurements, write_report,
        write_results, write_run_metadata, RawExportLayout, RunMetadata,
    };
    pub use crate::normalization::{attach_average_ct, attach_housekeeping_ct};
    pub use crate::report::{build_report, pivot_by_gene, Report, ReportInput, ReportSheet};
}

use log::{info, warn};

use prelude::*;

/// Output of a ΔΔCt run
#[derive(Debug, Clone)]
pub struct DdctAnalysis {
    /// Input rows, in input order, with every derived column attached
    pub results: ResultTable,
    /// Non-fatal problems found along the way
    pub warnings: Vec<AnalysisWarning>,
}

impl DdctAnalysis {
    /// Per-gene report of the results
    pub fn report(&self) -> Report {
        pivot_by_gene(&self.results)
    }
}

/// Run the complete ΔΔCt pipeline
///
/// Stages, each producing a new table from the previous one:
/// well parsing -> housekeeping Ct -> replicate average Ct -> ΔCt ->
/// control ΔCt and ΔΔCt -> fold induction.
///
/// Fails on malformed well labels; unmatched groups and references absent
/// from the data only produce warnings and missing values.
pub fn run_ddct(table: &MeasurementTable, config: &AnalysisConfig) -> Result<DdctAnalysis> {
    config.validate()?;
    if table.is_empty() {
        return Err(QpcrError::EmptyData {
            reason: "No measurements in input table".to_string(),
        });
    }

    info!(
        "ΔΔCt analysis: {} measurements ({} without Ct), {} genes",
        table.len(),
        table.n_missing_ct(),
        table.genes().len()
    );

    let mut warnings = config.check_against(table);

    // Step 1: Decompose well labels
    let results = ResultTable::from_measurements(table)?;

    // Step 2: Housekeeping Ct per (condition, time point)
    let (results, hk_warnings) = attach_housekeeping_ct(results, &config.housekeeping_gene);
    warnings.extend(hk_warnings);

    // Step 3: Average Ct per (condition, gene, time point)
    let results = attach_average_ct(results);

    // Step 4: ΔCt, then control ΔCt per (time point, gene) and ΔΔCt
    let results = attach_delta_ct(results);
    let (results, control_warnings) = attach_delta_delta_ct(results, &config.control_condition);
    warnings.extend(control_warnings);

    // Step 5: Fold induction
    let results = attach_fold_induction(results);

    for w in &warnings {
        warn!("{}", w);
    }
    info!(
        "ΔΔCt analysis complete: {}/{} rows with fold induction",
        results.n_with_fold_induction(),
        results.len()
    );

    Ok(DdctAnalysis { results, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn example_table() -> MeasurementTable {
        MeasurementTable::new(vec![
            Measurement::new("A1", "Gapdh", "PBS", "24h", Some(20.0)),
            Measurement::new("A2", "Gapdh", "PBS", "24h", Some(20.2)),
            Measurement::new("B1", "Gapdh", "LPS", "24h", Some(20.1)),
            Measurement::new("B2", "Gapdh", "LPS", "24h", Some(19.9)),
            Measurement::new("C1", "Il6", "PBS", "24h", Some(28.0)),
            Measurement::new("C2", "Il6", "PBS", "24h", Some(28.4)),
            Measurement::new("D1", "Il6", "LPS", "24h", Some(24.0)),
            Measurement::new("D2", "Il6", "LPS", "24h", Some(24.2)),
        ])
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig::new("Gapdh", "PBS").unwrap()
    }

    fn close(value: Option<f64>, expected: f64) -> bool {
        value.map_or(false, |v| (v - expected).abs() < TOL)
    }

    #[test]
    fn test_full_pipeline() {
        let analysis = run_ddct(&example_table(), &config()).unwrap();
        assert!(analysis.warnings.is_empty());

        let rows = analysis.results.rows();
        assert_eq!(rows.len(), 8);

        // Housekeeping reference per (condition, time point)
        assert!(close(rows[0].ct_housekeeping, 20.1));
        assert!(close(rows[4].ct_housekeeping, 20.1));
        assert!(close(rows[2].ct_housekeeping, 20.0));
        assert!(close(rows[6].ct_housekeeping, 20.0));

        // Il6 averages and ΔCt
        assert!(close(rows[4].avg_ct, 28.2));
        assert!(close(rows[6].avg_ct, 24.1));
        assert!(close(rows[4].delta_ct, 8.1));
        assert!(close(rows[6].delta_ct, 4.1));

        // Control ΔCt is broadcast to both conditions
        assert!(close(rows[4].delta_ct_control, 8.1));
        assert!(close(rows[6].delta_ct_control, 8.1));

        // Control rows: ΔΔCt exactly zero, fold induction exactly one
        assert_eq!(rows[4].delta_delta_ct, Some(0.0));
        assert_eq!(rows[4].fold_induction, Some(1.0));
        assert_eq!(rows[5].fold_induction, Some(1.0));

        // LPS rows: ΔΔCt -4, 16-fold induction
        assert!(close(rows[6].delta_delta_ct, -4.0));
        assert!((rows[6].fold_induction.unwrap() - 16.0).abs() < 1e-6);
        assert_eq!(rows[6].fold_induction, rows[7].fold_induction);

        assert_eq!(rows[6].condition_gene, "LPS-Il6");
        assert_eq!(rows[0].condition_gene, "PBS-Gapdh");
    }

    #[test]
    fn test_pipeline_row_order_invariance() {
        let forward = run_ddct(&example_table(), &config()).unwrap();
        let mut reversed_rows = example_table().rows().to_vec();
        reversed_rows.reverse();
        let reversed = run_ddct(&MeasurementTable::new(reversed_rows), &config()).unwrap();

        for row in forward.results.rows() {
            let other = reversed
                .results
                .rows()
                .iter()
                .find(|r| r.well == row.well)
                .unwrap();
            assert!(close(other.ct_housekeeping, row.ct_housekeeping.unwrap()));
            assert!(close(other.avg_ct, row.avg_ct.unwrap()));
            assert!(close(other.delta_ct_control, row.delta_ct_control.unwrap()));
        }
    }

    #[test]
    fn test_missing_ct_group_does_not_abort() {
        let mut rows = example_table().rows().to_vec();
        rows.push(Measurement::new("E1", "Tnf", "LPS", "24h", None));
        rows.push(Measurement::new("E2", "Tnf", "LPS", "24h", None));
        rows.push(Measurement::new("F1", "Tnf", "PBS", "24h", Some(30.0)));

        let analysis = run_ddct(&MeasurementTable::new(rows), &config()).unwrap();
        let results = analysis.results.rows();
        assert_eq!(results.len(), 11);

        let tnf_lps = &results[8];
        assert_eq!(tnf_lps.avg_ct, None);
        assert_eq!(tnf_lps.delta_ct, None);
        assert_eq!(tnf_lps.delta_delta_ct, None);
        assert_eq!(tnf_lps.fold_induction, None);
        // Housekeeping is still known for the sample
        assert!(close(tnf_lps.ct_housekeeping, 20.0));

        let tnf_pbs = &results[10];
        assert_eq!(tnf_pbs.fold_induction, Some(1.0));
    }

    #[test]
    fn test_missingness_is_monotone() {
        let mut rows = example_table().rows().to_vec();
        rows.push(Measurement::new("G1", "Il6", "LPS", "48h", Some(23.0)));
        let analysis = run_ddct(&MeasurementTable::new(rows), &config()).unwrap();

        for row in analysis.results.rows() {
            if row.ct_housekeeping.is_none() || row.avg_ct.is_none() {
                assert!(row.delta_ct.is_none());
            }
            if row.delta_ct.is_none() || row.delta_ct_control.is_none() {
                assert!(row.delta_delta_ct.is_none());
                assert!(row.fold_induction.is_none());
            }
        }
        // 48h has neither housekeeping nor control data
        assert_eq!(analysis.warnings.len(), 2);
    }

    #[test]
    fn test_unknown_references_warn() {
        let config = AnalysisConfig::new("Actb", "Vehicle").unwrap();
        let analysis = run_ddct(&example_table(), &config).unwrap();

        assert!(analysis
            .warnings
            .iter()
            .any(|w| matches!(w, AnalysisWarning::AmbiguousConfiguration { field: "housekeeping gene", .. })));
        assert!(analysis
            .warnings
            .iter()
            .any(|w| matches!(w, AnalysisWarning::AmbiguousConfiguration { field: "control condition", .. })));
        assert!(analysis.results.rows().iter().all(|r| r.fold_induction.is_none()));
        assert_eq!(analysis.results.len(), 8);
    }

    #[test]
    fn test_malformed_well_aborts() {
        let mut rows = example_table().rows().to_vec();
        rows.push(Measurement::new("NTC", "Il6", "PBS", "24h", None));
        let err = run_ddct(&MeasurementTable::new(rows), &config()).unwrap_err();
        assert!(matches!(err, QpcrError::MalformedWellLabel { row: 8, .. }));
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = run_ddct(&MeasurementTable::default(), &config()).unwrap_err();
        assert!(matches!(err, QpcrError::EmptyData { .. }));
    }

    #[test]
    fn test_report_from_analysis() {
        let analysis = run_ddct(&example_table(), &config()).unwrap();
        let report = analysis.report();
        assert_eq!(report.len(), 2);
        assert_eq!(report.sheets()[0].key, "Gapdh");
        assert_eq!(report.sheets()[1].key, "Il6");
        assert_eq!(report.n_rows(), 8);

        let wells: Vec<&str> = report.sheets()[1].rows.iter().map(|r| r.well.as_str()).collect();
        assert_eq!(wells, vec!["C1", "D1", "C2", "D2"]);
    }
}
