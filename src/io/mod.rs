//! Input/Output adapters: instrument exports, CSV tables and report directories

mod csv;
mod report;

pub use self::csv::{
    parse_raw_export, read_measurements, read_raw_export, read_results, write_measurements,
    write_results, write_run_metadata, MetadataEntry, RawExportLayout, RunMetadata,
};
pub use report::{read_report_manifest, write_report, ReportManifest, SheetEntry, MANIFEST_FILE, REPORT_COLUMNS};
