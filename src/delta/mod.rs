//! Relative quantification: ΔCt, ΔΔCt and fold induction

mod delta_ct;
mod fold;

pub use delta_ct::{attach_delta_ct, attach_delta_delta_ct, control_delta_ct_means};
pub use fold::{attach_fold_induction, condition_gene_label, fold_induction};
