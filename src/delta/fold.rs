//! Fold induction: linear-scale expression relative to control

use crate::data::ResultTable;

/// 2^(-ΔΔCt); missing in, missing out. No clamping.
pub fn fold_induction(delta_delta_ct: Option<f64>) -> Option<f64> {
    delta_delta_ct.map(|ddct| (-ddct).exp2())
}

/// "<condition>-<gene>" label used to tag series in reports
pub fn condition_gene_label(condition: &str, gene: &str) -> String {
    format!("{}-{}", condition, gene)
}

/// Attach `fold_induction` and `condition_gene`
pub fn attach_fold_induction(table: ResultTable) -> ResultTable {
    let rows = table
        .into_rows()
        .into_iter()
        .map(|mut row| {
            row.fold_induction = fold_induction(row.delta_delta_ct);
            row.condition_gene = condition_gene_label(&row.condition, &row.gene);
            row
        })
        .collect();
    ResultTable::new(rows)
}
