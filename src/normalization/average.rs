//! Replicate averaging: mean Ct per (condition, gene, time point)

use log::info;

use crate::data::{ResultRow, ResultTable, TimePoint};
use crate::stats::{broadcast_join, GroupMeans};

type ReplicateKey = (String, String, TimePoint);

fn replicate_key(row: &ResultRow) -> ReplicateKey {
    (row.condition.clone(), row.gene.clone(), row.time_point.clone())
}

/// Attach `avg_ct` to every row.
///
/// Every row belongs to its own replicate group, so no row is ever unmatched;
/// a group whose Ct values are all missing gets a missing average.
pub fn attach_average_ct(table: ResultTable) -> ResultTable {
    let index = GroupMeans::from_pairs(table.rows().iter().map(|r| (replicate_key(r), r.ct_value)));

    let n_empty = index.iter().filter(|(_, mean)| mean.is_none()).count();
    info!(
        "Replicate averaging: {} groups ({} without any Ct value)",
        index.n_groups(),
        n_empty
    );

    let joined = broadcast_join(table.into_rows(), &index, replicate_key, |row, v| row.avg_ct = v);
    ResultTable::new(joined.rows)
}
