//! Raw Ct measurements as delivered by the ingestion adapter

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QpcrError, Result};

/// Experimental time point.
///
/// Numeric labels ("24", "24.0", " 24 ") are canonicalised so that they group
/// together and order by value; anything else ("24h", "day 1") is kept as text.
/// Numeric time points sort before text ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TimePoint(String);

impl TimePoint {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => TimePoint(format!("{}", v)),
            _ => TimePoint(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl From<String> for TimePoint {
    fn from(s: String) -> Self {
        TimePoint::new(&s)
    }
}

impl From<&str> for TimePoint {
    fn from(s: &str) -> Self {
        TimePoint::new(s)
    }
}

impl From<TimePoint> for String {
    fn from(t: TimePoint) -> Self {
        t.0
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for TimePoint {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for TimePoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One well/gene reading
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub well: String,
    pub gene: String,
    pub condition: String,
    pub time_point: TimePoint,
    /// `None` when amplification never crossed the threshold
    pub ct_value: Option<f64>,
}

impl Measurement {
    pub fn new(
        well: &str,
        gene: &str,
        condition: &str,
        time_point: &str,
        ct_value: Option<f64>,
    ) -> Self {
        Self {
            well: well.trim().to_string(),
            gene: gene.trim().to_string(),
            condition: condition.trim().to_string(),
            time_point: TimePoint::new(time_point),
            ct_value,
        }
    }
}

/// The columns every measurement table must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredColumn {
    Well,
    Gene,
    Condition,
    TimePoint,
    CtValue,
}

impl RequiredColumn {
    pub fn name(self) -> &'static str {
        match self {
            RequiredColumn::Well => "well",
            RequiredColumn::Gene => "gene",
            RequiredColumn::Condition => "condition",
            RequiredColumn::TimePoint => "time_point",
            RequiredColumn::CtValue => "ct_value",
        }
    }

    /// Accepted header spellings after normalisation, most specific first.
    /// QuantStudio exports carry a numeric "Well" next to "Well Position".
    fn aliases(self) -> &'static [&'static str] {
        match self {
            RequiredColumn::Well => &["wellposition", "well"],
            RequiredColumn::Gene => &["gene", "targetname", "target", "detector"],
            RequiredColumn::Condition => &["condition", "treatment", "samplename", "sample"],
            RequiredColumn::TimePoint => &["timepoint", "time"],
            RequiredColumn::CtValue => &["ctvalue", "ct", "cq", "cqvalue"],
        }
    }

    /// Index of the best-matching header
    fn locate<S: AsRef<str>>(self, headers: &[S]) -> Option<usize> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
        self.aliases()
            .iter()
            .find_map(|alias| normalized.iter().position(|h| h.as_str() == *alias))
    }
}

/// Lowercase and drop spaces, underscores and hyphens: "Time Point" -> "timepoint"
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Positions of the required columns within a header row
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    well: usize,
    gene: usize,
    condition: usize,
    time_point: usize,
    ct_value: usize,
}

impl ColumnMap {
    /// Resolve the required columns, failing on the first one that is absent
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let find = |column: RequiredColumn| -> Result<usize> {
            column
                .locate(headers)
                .ok_or_else(|| QpcrError::MissingRequiredColumn {
                    column: column.name().to_string(),
                })
        };

        Ok(Self {
            well: find(RequiredColumn::Well)?,
            gene: find(RequiredColumn::Gene)?,
            condition: find(RequiredColumn::Condition)?,
            time_point: find(RequiredColumn::TimePoint)?,
            ct_value: find(RequiredColumn::CtValue)?,
        })
    }

    fn max_index(&self) -> usize {
        self.well
            .max(self.gene)
            .max(self.condition)
            .max(self.time_point)
            .max(self.ct_value)
    }
}

/// Parse a Ct cell. Instrument "no amplification" markers become `None`.
pub fn parse_ct(value: &str, row: usize) -> Result<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let lower = trimmed.to_ascii_lowercase();
    if matches!(lower.as_str(), "undetermined" | "na" | "n/a" | "nan" | "-") {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(QpcrError::InvalidCtValue {
            value: trimmed.to_string(),
            row,
        }),
    }
}

/// Table of Ct measurements, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    rows: Vec<Measurement>,
}

impl MeasurementTable {
    pub fn new(rows: Vec<Measurement>) -> Self {
        Self { rows }
    }

    /// Build a table from a header row and string records.
    ///
    /// Fails with `MissingRequiredColumn` before looking at any record.
    /// Fully blank records are skipped.
    pub fn from_records<H, R, S>(headers: &[H], records: R) -> Result<Self>
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<S>>,
        S: AsRef<str>,
    {
        let columns = ColumnMap::resolve(headers)?;
        let width = columns.max_index() + 1;

        let mut rows = Vec::new();
        for (i, record) in records.into_iter().enumerate() {
            if record.iter().all(|f| f.as_ref().trim().is_empty()) {
                continue;
            }
            if record.len() < width {
                return Err(QpcrError::InvalidInput {
                    reason: format!(
                        "Row {} has {} columns, expected at least {}",
                        i,
                        record.len(),
                        width
                    ),
                });
            }
            let field = |idx: usize| record[idx].as_ref();
            let ct_value = parse_ct(field(columns.ct_value), i)?;
            rows.push(Measurement::new(
                field(columns.well),
                field(columns.gene),
                field(columns.condition),
                field(columns.time_point),
                ct_value,
            ));
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any row carries the given gene
    pub fn has_gene(&self, gene: &str) -> bool {
        self.rows.iter().any(|r| r.gene == gene)
    }

    /// Whether any row carries the given condition
    pub fn has_condition(&self, condition: &str) -> bool {
        self.rows.iter().any(|r| r.condition == condition)
    }

    /// Distinct genes in order of first appearance
    pub fn genes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|r| seen.insert(r.gene.as_str()))
            .map(|r| r.gene.as_str())
            .collect()
    }

    /// Number of rows without a Ct value
    pub fn n_missing_ct(&self) -> usize {
        self.rows.iter().filter(|r| r.ct_value.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_point_canonical() {
        assert_eq!(TimePoint::new("24"), TimePoint::new("24.0"));
        assert_eq!(TimePoint::new(" 24h "), TimePoint::new("24h"));
        assert_ne!(TimePoint::new("24"), TimePoint::new("24h"));
        assert_eq!(TimePoint::new("6.50").as_str(), "6.5");
    }

    #[test]
    fn test_time_point_order() {
        let mut tps: Vec<TimePoint> = ["48", "day1", "6", "24h", "24"]
            .iter()
            .map(|s| TimePoint::new(s))
            .collect();
        tps.sort();
        let labels: Vec<&str> = tps.iter().map(|t| t.as_str()).collect();
        assert_eq!(labels, vec!["6", "24", "48", "24h", "day1"]);
    }

    #[test]
    fn test_parse_ct() {
        assert_eq!(parse_ct("23.5", 0).unwrap(), Some(23.5));
        assert_eq!(parse_ct("", 0).unwrap(), None);
        assert_eq!(parse_ct("Undetermined", 0).unwrap(), None);
        assert_eq!(parse_ct(" N/A ", 0).unwrap(), None);
        assert!(matches!(
            parse_ct("abc", 7),
            Err(QpcrError::InvalidCtValue { row: 7, .. })
        ));
        assert!(parse_ct("inf", 0).is_err());
    }

    #[test]
    fn test_from_records_with_aliases() {
        let headers = ["Well", "Target Name", "Sample Name", "Time Point", "CT", "Extra"];
        let records = vec![
            vec!["A1", "Gapdh", "PBS", "24h", "20.0", "x"],
            vec!["", "", "", "", "", ""],
            vec!["A2", "Il6", "PBS", "24h", "Undetermined", "y"],
        ];
        let table = MeasurementTable::from_records(&headers, records).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].gene, "Gapdh");
        assert_eq!(table.rows()[0].ct_value, Some(20.0));
        assert_eq!(table.rows()[1].ct_value, None);
        assert_eq!(table.n_missing_ct(), 1);
        assert_eq!(table.genes(), vec!["Gapdh", "Il6"]);
    }

    #[test]
    fn test_well_position_preferred_over_well_number() {
        let headers = ["Well", "Well Position", "Sample Name", "Target Name", "Time", "CT"];
        let columns = ColumnMap::resolve(&headers).unwrap();
        assert_eq!(columns.well, 1);
        assert_eq!(columns.condition, 2);
        assert_eq!(columns.gene, 3);
    }

    #[test]
    fn test_missing_required_column() {
        let headers = ["Well", "Gene", "Condition", "Ct Value"];
        let records: Vec<Vec<&str>> = vec![vec!["A1", "Gapdh", "PBS", "20.0"]];
        match MeasurementTable::from_records(&headers, records) {
            Err(QpcrError::MissingRequiredColumn { column }) => assert_eq!(column, "time_point"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_short_record_rejected() {
        let headers = ["well", "gene", "condition", "time_point", "ct_value"];
        let records = vec![vec!["A1", "Gapdh", "PBS"]];
        assert!(matches!(
            MeasurementTable::from_records(&headers, records),
            Err(QpcrError::InvalidInput { .. })
        ));
    }
}
