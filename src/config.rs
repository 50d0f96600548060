//! Analysis configuration: which gene is the housekeeping reference and
//! which condition is the control baseline

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::MeasurementTable;
use crate::error::{AnalysisWarning, QpcrError, Result};

/// Reference choices for a ΔΔCt run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Gene used to normalise every sample (e.g. "Gapdh")
    pub housekeeping_gene: String,
    /// Condition every other condition is compared against (e.g. "PBS")
    pub control_condition: String,
}

/// Partially specified configuration, as read from a file or the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub housekeeping_gene: Option<String>,
    pub control_condition: Option<String>,
}

impl ConfigOverrides {
    /// Read a JSON file such as `{"housekeeping_gene": "Gapdh", "control_condition": "PBS"}`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Fields set in `other` win
    pub fn merge(self, other: ConfigOverrides) -> Self {
        Self {
            housekeeping_gene: other.housekeeping_gene.or(self.housekeeping_gene),
            control_condition: other.control_condition.or(self.control_condition),
        }
    }

    /// Turn into a full configuration, failing if a field is absent
    pub fn resolve(self) -> Result<AnalysisConfig> {
        let housekeeping_gene = self.housekeeping_gene.ok_or_else(|| QpcrError::InvalidConfig {
            reason: "housekeeping gene is not set (use --housekeeping or the config file)".to_string(),
        })?;
        let control_condition = self.control_condition.ok_or_else(|| QpcrError::InvalidConfig {
            reason: "control condition is not set (use --control or the config file)".to_string(),
        })?;
        AnalysisConfig::new(&housekeeping_gene, &control_condition)
    }
}

impl AnalysisConfig {
    /// Both values are trimmed and must be non-empty
    pub fn new(housekeeping_gene: &str, control_condition: &str) -> Result<Self> {
        let config = Self {
            housekeeping_gene: housekeeping_gene.trim().to_string(),
            control_condition: control_condition.trim().to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.housekeeping_gene.trim().is_empty() {
            return Err(QpcrError::InvalidConfig {
                reason: "housekeeping gene must not be empty".to_string(),
            });
        }
        if self.control_condition.trim().is_empty() {
            return Err(QpcrError::InvalidConfig {
                reason: "control condition must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Warn about reference values that never occur in the data
    pub fn check_against(&self, table: &MeasurementTable) -> Vec<AnalysisWarning> {
        let mut warnings = Vec::new();
        if !table.has_gene(&self.housekeeping_gene) {
            warnings.push(AnalysisWarning::AmbiguousConfiguration {
                field: "housekeeping gene",
                value: self.housekeeping_gene.clone(),
            });
        }
        if !table.has_condition(&self.control_condition) {
            warnings.push(AnalysisWarning::AmbiguousConfiguration {
                field: "control condition",
                value: self.control_condition.clone(),
            });
        }
        warnings
    }
}
