//! Housekeeping-gene normalization
//!
//! The housekeeping gene's mean Ct per (condition, time point) is the
//! reference every other gene in the same sample group is normalised against.

use log::{debug, info};

use crate::data::{ResultRow, ResultTable, TimePoint};
use crate::error::AnalysisWarning;
use crate::stats::{broadcast_join, GroupMeans};

pub(crate) type SampleKey = (String, TimePoint);

fn sample_key(row: &ResultRow) -> SampleKey {
    (row.condition.clone(), row.time_point.clone())
}

/// Mean housekeeping Ct for every (condition, time point) with a housekeeping measurement
pub fn housekeeping_means(table: &ResultTable, housekeeping_gene: &str) -> GroupMeans<SampleKey> {
    GroupMeans::from_pairs(
        table
            .rows()
            .iter()
            .filter(|r| r.gene == housekeeping_gene)
            .map(|r| (sample_key(r), r.ct_value)),
    )
}

/// Attach `ct_housekeeping` to every row.
///
/// Rows whose (condition, time point) has no housekeeping measurement are kept
/// with a missing value and reported as `UnmatchedGroupKey`.
pub fn attach_housekeeping_ct(
    table: ResultTable,
    housekeeping_gene: &str,
) -> (ResultTable, Vec<AnalysisWarning>) {
    let index = housekeeping_means(&table, housekeeping_gene);
    info!(
        "Housekeeping normalization ({}): {} sample groups",
        housekeeping_gene,
        index.n_groups()
    );
    for ((condition, time_point), mean) in index.iter() {
        debug!("  Ct_HK[{}, {}] = {:?}", condition, time_point, mean);
    }

    let joined = broadcast_join(table.into_rows(), &index, sample_key, |row, v| {
        row.ct_housekeeping = v
    });

    let warnings = AnalysisWarning::unmatched("housekeeping", joined.unmatched, |(c, t): &SampleKey| {
        format!("(condition={}, time_point={})", c, t)
    });

    (ResultTable::new(joined.rows), warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Measurement, MeasurementTable};

    fn table(rows: Vec<Measurement>) -> ResultTable {
        ResultTable::from_measurements(&MeasurementTable::new(rows)).unwrap()
    }

    #[test]
    fn test_housekeeping_broadcast_to_all_genes() {
        let t = table(vec![
            Measurement::new("A1", "Gapdh", "PBS", "24h", Some(20.0)),
            Measurement::new("A2", "Gapdh", "PBS", "24h", Some(20.2)),
            Measurement::new("B1", "Il6", "PBS", "24h", Some(28.0)),
            Measurement::new("C1", "Gapdh", "LPS", "24h", Some(19.0)),
            Measurement::new("C2", "Il6", "LPS", "24h", Some(24.0)),
        ]);

        let (out, warnings) = attach_housekeeping_ct(t, "Gapdh");
        assert!(warnings.is_empty());
        let hk: Vec<f64> = out.rows().iter().map(|r| r.ct_housekeeping.unwrap()).collect();
        assert!((hk[0] - 20.1).abs() < 1e-9);
        assert_eq!(hk[0], hk[1]);
        assert_eq!(hk[0], hk[2]);
        assert!((hk[3] - 19.0).abs() < 1e-12);
        assert_eq!(hk[3], hk[4]);
    }

    #[test]
    fn test_missing_housekeeping_group_keeps_rows() {
        let t = table(vec![
            Measurement::new("A1", "Gapdh", "PBS", "24h", Some(20.0)),
            Measurement::new("B1", "Il6", "PBS", "48h", Some(28.0)),
            Measurement::new("B2", "Il6", "PBS", "48h", Some(28.2)),
        ]);

        let (out, warnings) = attach_housekeeping_ct(t, "Gapdh");
        assert_eq!(out.len(), 3);
        assert!(out.rows()[0].ct_housekeeping.is_some());
        assert!(out.rows()[1].ct_housekeeping.is_none());
        assert!(out.rows()[2].ct_housekeeping.is_none());

        assert_eq!(
            warnings,
            vec![AnalysisWarning::UnmatchedGroupKey {
                stage: "housekeeping",
                key: "(condition=PBS, time_point=48h)".to_string(),
                n_rows: 2,
            }]
        );
    }

    #[test]
    fn test_all_missing_housekeeping_is_missing_not_zero() {
        let t = table(vec![
            Measurement::new("A1", "Gapdh", "PBS", "24h", None),
            Measurement::new("A2", "Gapdh", "PBS", "24h", None),
            Measurement::new("B1", "Il6", "PBS", "24h", Some(28.0)),
        ]);

        let (out, warnings) = attach_housekeeping_ct(t, "Gapdh");
        // The group exists, it just has no value
        assert!(warnings.is_empty());
        assert!(out.rows().iter().all(|r| r.ct_housekeeping.is_none()));
    }
}
