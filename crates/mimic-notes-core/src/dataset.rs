//! Dataset, named configuration, and split identifiers.
//!
//! A configuration fixes which gzip files are read and in which order. The
//! order matters: ids are assigned across files without resetting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const NOTEEVENTS_FILE: &str = "NOTEEVENTS.csv.gz";
pub const DISCHARGE_FILE: &str = "discharge.csv.gz";
pub const RADIOLOGY_FILE: &str = "radiology.csv.gz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dataset {
    /// MIMIC-III `NOTEEVENTS` table.
    MimicIiiNoteEvents,
    /// MIMIC-IV-Note discharge summaries and radiology reports.
    MimicIvNote,
}

impl Dataset {
    pub fn name(self) -> &'static str {
        match self {
            Dataset::MimicIiiNoteEvents => "mimic_iii_noteevents",
            Dataset::MimicIvNote => "mimic_iv_note",
        }
    }

    /// Configuration used when the caller does not name one.
    pub fn default_config(self) -> DatasetConfig {
        match self {
            Dataset::MimicIiiNoteEvents => DatasetConfig::NoteEvents,
            Dataset::MimicIvNote => DatasetConfig::All,
        }
    }

    /// Named configurations this dataset accepts.
    pub fn configs(self) -> &'static [DatasetConfig] {
        match self {
            Dataset::MimicIiiNoteEvents => &[DatasetConfig::NoteEvents],
            Dataset::MimicIvNote => &[
                DatasetConfig::All,
                DatasetConfig::Discharge,
                DatasetConfig::Radiology,
            ],
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetConfig {
    NoteEvents,
    All,
    Discharge,
    Radiology,
}

impl DatasetConfig {
    pub fn name(self) -> &'static str {
        match self {
            DatasetConfig::NoteEvents => "noteevents",
            DatasetConfig::All => "all",
            DatasetConfig::Discharge => "discharge",
            DatasetConfig::Radiology => "radiology",
        }
    }

    pub fn dataset(self) -> Dataset {
        match self {
            DatasetConfig::NoteEvents => Dataset::MimicIiiNoteEvents,
            DatasetConfig::All | DatasetConfig::Discharge | DatasetConfig::Radiology => {
                Dataset::MimicIvNote
            }
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DatasetConfig::NoteEvents => "MIMIC-III clinical notes",
            DatasetConfig::All => "Discharge summaries and radiology reports",
            DatasetConfig::Discharge => "Discharge summaries only",
            DatasetConfig::Radiology => "Radiology reports only",
        }
    }

    /// Files read for this configuration, in emission order.
    pub fn source_files(self) -> &'static [&'static str] {
        match self {
            DatasetConfig::NoteEvents => &[NOTEEVENTS_FILE],
            DatasetConfig::All => &[DISCHARGE_FILE, RADIOLOGY_FILE],
            DatasetConfig::Discharge => &[DISCHARGE_FILE],
            DatasetConfig::Radiology => &[RADIOLOGY_FILE],
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Dataset::MimicIvNote.default_config()
    }
}

impl fmt::Display for DatasetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "noteevents" => Ok(DatasetConfig::NoteEvents),
            "all" => Ok(DatasetConfig::All),
            "discharge" => Ok(DatasetConfig::Discharge),
            "radiology" => Ok(DatasetConfig::Radiology),
            other => Err(Error::Config(format!(
                "unknown dataset configuration '{other}' (expected noteevents, all, discharge or radiology)"
            ))),
        }
    }
}

/// Logical partitions exposed to consumers. Both datasets only have `train`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    #[default]
    Train,
}

impl Split {
    pub fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
        }
    }

    pub fn all() -> &'static [Split] {
        &[Split::Train]
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_reads_discharge_before_radiology() {
        assert_eq!(
            DatasetConfig::All.source_files(),
            &["discharge.csv.gz", "radiology.csv.gz"]
        );
        assert_eq!(DatasetConfig::Discharge.source_files(), &["discharge.csv.gz"]);
        assert_eq!(DatasetConfig::Radiology.source_files(), &["radiology.csv.gz"]);
        assert_eq!(DatasetConfig::NoteEvents.source_files(), &["NOTEEVENTS.csv.gz"]);
    }

    #[test]
    fn config_names_round_trip() {
        for cfg in [
            DatasetConfig::NoteEvents,
            DatasetConfig::All,
            DatasetConfig::Discharge,
            DatasetConfig::Radiology,
        ] {
            assert_eq!(cfg.name().parse::<DatasetConfig>().unwrap(), cfg);
            assert!(cfg.dataset().configs().contains(&cfg));
        }
    }

    #[test]
    fn unknown_config_is_rejected() {
        let err = "ALL".parse::<DatasetConfig>().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("'ALL'"));
    }

    #[test]
    fn defaults() {
        assert_eq!(DatasetConfig::default(), DatasetConfig::All);
        assert_eq!(
            Dataset::MimicIiiNoteEvents.default_config(),
            DatasetConfig::NoteEvents
        );
        assert_eq!(Split::all(), &[Split::Train]);
        assert_eq!(Split::Train.to_string(), "train");
    }
}
