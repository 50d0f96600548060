//! CSV reading and writing for measurement and result tables

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{MeasurementTable, ResultTable};
use crate::error::{QpcrError, Result};

/// Tab if the first non-blank line contains one, comma otherwise
fn detect_delimiter(content: &str) -> u8 {
    let first = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if first.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

fn csv_reader(content: &str, delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes())
}

/// Parse headered CSV text into a measurement table
fn parse_measurements(content: &str) -> Result<MeasurementTable> {
    let delimiter = detect_delimiter(content);
    let mut reader = csv_reader(content, delimiter);

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(header) => header?.iter().map(|s| s.to_string()).collect(),
        None => {
            return Err(QpcrError::EmptyData {
                reason: "Empty measurement table".to_string(),
            })
        }
    };

    let rows: Vec<Vec<String>> = records
        .map(|r| r.map(|rec| rec.iter().map(|s| s.to_string()).collect()))
        .collect::<std::result::Result<_, csv::Error>>()?;

    MeasurementTable::from_records(headers.as_slice(), rows)
}

/// Read a measurement table (well, gene, condition, time point, Ct) from CSV or TSV
pub fn read_measurements<P: AsRef<Path>>(path: P) -> Result<MeasurementTable> {
    let content = fs::read_to_string(path)?;
    parse_measurements(&content)
}

/// Layout of an instrument results export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawExportLayout {
    /// Lines before the results table header
    pub skip_rows: usize,
    /// Leading `Variable,Value` lines describing the run
    pub metadata_rows: usize,
}

impl Default for RawExportLayout {
    fn default() -> Self {
        Self {
            skip_rows: 19,
            metadata_rows: 17,
        }
    }
}

/// One `Variable,Value` line of the export preamble
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    #[serde(rename = "Variable")]
    pub variable: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Run-level information from the export preamble
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMetadata {
    pub entries: Vec<MetadataEntry>,
}

impl RunMetadata {
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.variable == variable)
            .map(|e| e.value.as_str())
    }
}

/// Split an instrument export into its metadata preamble and results table
pub fn parse_raw_export(content: &str, layout: RawExportLayout) -> Result<(RunMetadata, MeasurementTable)> {
    if layout.metadata_rows > layout.skip_rows {
        return Err(QpcrError::InvalidInput {
            reason: format!(
                "metadata rows ({}) overlap the results table (starts after {} rows)",
                layout.metadata_rows, layout.skip_rows
            ),
        });
    }

    let lines: Vec<&str> = content.lines().collect();
    if lines.len() <= layout.skip_rows {
        return Err(QpcrError::EmptyData {
            reason: format!(
                "export has {} lines, results table expected after line {}",
                lines.len(),
                layout.skip_rows
            ),
        });
    }

    let preamble = lines[..layout.metadata_rows].join("\n");
    let mut reader = csv_reader(&preamble, detect_delimiter(&preamble));
    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let variable = record.get(0).unwrap_or("").to_string();
        if variable.is_empty() {
            continue;
        }
        entries.push(MetadataEntry {
            variable,
            value: record.get(1).unwrap_or("").to_string(),
        });
    }

    let table = parse_measurements(&lines[layout.skip_rows..].join("\n"))?;
    Ok((RunMetadata { entries }, table))
}

/// Read an instrument export from disk
pub fn read_raw_export<P: AsRef<Path>>(
    path: P,
    layout: RawExportLayout,
) -> Result<(RunMetadata, MeasurementTable)> {
    let content = fs::read_to_string(path)?;
    parse_raw_export(&content, layout)
}

/// Write a measurement table with canonical column names
pub fn write_measurements<P: AsRef<Path>>(path: P, table: &MeasurementTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Well", "Gene", "Condition", "Time Point", "Ct Value"])?;
    for m in table.rows() {
        let ct = m.ct_value.map(|v| v.to_string()).unwrap_or_default();
        writer.write_record([
            m.well.as_str(),
            m.gene.as_str(),
            m.condition.as_str(),
            m.time_point.as_str(),
            ct.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write run metadata as a two-column CSV
pub fn write_run_metadata<P: AsRef<Path>>(path: P, metadata: &RunMetadata) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Variable", "Value"])?;
    for entry in &metadata.entries {
        writer.write_record([entry.variable.as_str(), entry.value.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the augmented result table; missing values become empty cells
pub fn write_results<P: AsRef<Path>>(path: P, table: &ResultTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in table.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read an augmented result table written by `write_results`
pub fn read_results<P: AsRef<Path>>(path: P) -> Result<ResultTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;
    Ok(ResultTable::new(rows))
}
