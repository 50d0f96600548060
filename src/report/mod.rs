//! Report assembly: per-gene sheets for export

mod pivot;
mod sheet_name;

pub use pivot::{build_report, pivot_by_gene, sort_by_well, Report, ReportInput, ReportSheet};
pub use sheet_name::{sanitize_sheet_name, SheetNamer, MAX_SHEET_NAME_LEN};
