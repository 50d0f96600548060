//! Data structures for qPCR measurements and results

mod measurement;
mod result_table;
mod well;

pub use measurement::{parse_ct, ColumnMap, Measurement, MeasurementTable, RequiredColumn, TimePoint};
pub use result_table::{ReportRow, ResultRow, ResultTable};
pub use well::{compare_rows, parse_wells, WellPosition};
