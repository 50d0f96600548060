//! Report export: one CSV per sheet plus a JSON manifest

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::report::Report;
use crate::error::Result;

/// Column headings of a report sheet (`Well Row` is not exported)
pub const REPORT_COLUMNS: [&str; 13] = [
    "Well",
    "Well Column",
    "Gene",
    "Condition",
    "Time Point",
    "Ct Value",
    "Ct_HK",
    "av Ct",
    "delta Ct",
    "delta Ct Control",
    "delta delta Ct",
    "Fold Induction",
    "Condition & Gene",
];

pub const MANIFEST_FILE: &str = "report.json";

/// Manifest entry for one written sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetEntry {
    pub name: String,
    pub key: String,
    pub file: String,
    pub n_rows: usize,
}

/// Description of a written report directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportManifest {
    pub sheets: Vec<SheetEntry>,
}

/// Write every sheet of `report` as `<dir>/<sheet name>.csv` and a manifest
pub fn write_report<P: AsRef<Path>>(dir: P, report: &Report) -> Result<ReportManifest> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut entries = Vec::with_capacity(report.len());
    for sheet in report.sheets() {
        let file_name = format!("{}.csv", sheet.name);
        let mut writer = csv::Writer::from_path(dir.join(&file_name))?;
        if sheet.rows.is_empty() {
            writer.write_record(REPORT_COLUMNS)?;
        }
        for row in &sheet.rows {
            writer.serialize(row.report_view())?;
        }
        writer.flush()?;

        log::debug!("Wrote sheet '{}' ({} rows) to {}", sheet.name, sheet.rows.len(), file_name);
        entries.push(SheetEntry {
            name: sheet.name.clone(),
            key: sheet.key.clone(),
            file: file_name,
            n_rows: sheet.rows.len(),
        });
    }

    let manifest = ReportManifest { sheets: entries };
    let writer = BufWriter::new(File::create(dir.join(MANIFEST_FILE))?);
    serde_json::to_writer_pretty(writer, &manifest)?;
    Ok(manifest)
}

/// Read the manifest of a report directory
pub fn read_report_manifest<P: AsRef<Path>>(dir: P) -> Result<ReportManifest> {
    let file = File::open(dir.as_ref().join(MANIFEST_FILE))?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Measurement, MeasurementTable, ResultTable};
    use crate::report::{build_report, ReportInput};

    #[test]
    fn test_write_report() {
        let table = ResultTable::from_measurements(&MeasurementTable::new(vec![
            Measurement::new("B1", "Il6", "PBS", "24h", Some(28.0)),
            Measurement::new("A1", "Gapdh", "PBS", "24h", Some(20.0)),
            Measurement::new("A2", "Il6", "LPS", "24h", None),
        ]))
        .unwrap();
        let report = build_report(ReportInput::ByGene(table));

        let dir = tempfile::tempdir().unwrap();
        let manifest = write_report(dir.path(), &report).unwrap();
        assert_eq!(manifest.sheets.len(), 2);
        assert_eq!(manifest.sheets[0].file, "Il6.csv");
        assert_eq!(manifest.sheets[0].n_rows, 2);

        let il6 = std::fs::read_to_string(dir.path().join("Il6.csv")).unwrap();
        let mut lines = il6.lines();
        assert_eq!(lines.next().unwrap(), REPORT_COLUMNS.join(","));
        assert!(lines.next().unwrap().starts_with("B1,1,Il6,PBS,24h,28.0,"));
        assert!(lines.next().unwrap().starts_with("A2,2,Il6,LPS,24h,,"));

        assert_eq!(read_report_manifest(dir.path()).unwrap(), manifest);
    }

    #[test]
    fn test_empty_sheet_has_header() {
        let report = build_report(ReportInput::Indexed(vec![ResultTable::default()]));
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), &report).unwrap();

        let content = std::fs::read_to_string(dir.path().join("0.csv")).unwrap();
        assert_eq!(content.trim_end(), REPORT_COLUMNS.join(","));
    }
}
