//! ΔCt and ΔΔCt
//!
//! ΔCt normalises a group's average Ct against the housekeeping gene of the
//! same sample: `delta_ct = avg_ct - ct_housekeeping`. ΔΔCt then references
//! each ΔCt against the control condition's mean ΔCt for the same
//! (time point, gene): `delta_delta_ct = delta_ct - delta_ct_control`.

use log::info;

use crate::data::{ResultRow, ResultTable, TimePoint};
use crate::error::AnalysisWarning;
use crate::stats::{broadcast_join, difference, GroupMeans};

type TargetKey = (TimePoint, String);

fn target_key(row: &ResultRow) -> TargetKey {
    (row.time_point.clone(), row.gene.clone())
}

/// Attach `delta_ct`; missing when either operand is missing
pub fn attach_delta_ct(table: ResultTable) -> ResultTable {
    let rows = table
        .into_rows()
        .into_iter()
        .map(|mut row| {
            row.delta_ct = difference(row.avg_ct, row.ct_housekeeping);
            row
        })
        .collect();
    ResultTable::new(rows)
}

/// Mean control-condition ΔCt per (time point, gene)
pub fn control_delta_ct_means(table: &ResultTable, control_condition: &str) -> GroupMeans<TargetKey> {
    GroupMeans::from_pairs(
        table
            .rows()
            .iter()
            .filter(|r| r.condition == control_condition)
            .map(|r| (target_key(r), r.delta_ct)),
    )
}

/// Attach `delta_ct_control` and `delta_delta_ct`.
///
/// Rows of a (time point, gene) never measured under the control condition
/// keep missing values and are reported as `UnmatchedGroupKey`.
pub fn attach_delta_delta_ct(
    table: ResultTable,
    control_condition: &str,
) -> (ResultTable, Vec<AnalysisWarning>) {
    let index = control_delta_ct_means(&table, control_condition);
    info!(
        "Control referencing ({}): {} (time point, gene) groups",
        control_condition,
        index.n_groups()
    );

    let joined = broadcast_join(table.into_rows(), &index, target_key, |row, v| {
        row.delta_ct_control = v;
        row.delta_delta_ct = difference(row.delta_ct, v);
    });

    let warnings = AnalysisWarning::unmatched("control", joined.unmatched, |(t, g): &TargetKey| {
        format!("(time_point={}, gene={})", t, g)
    });

    (ResultTable::new(joined.rows), warnings)
}
