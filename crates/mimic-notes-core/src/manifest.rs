//! Audit summary of one emission run.
//!
//! Built by the caller while it drains an emitter; nothing here reads files.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dataset::{Dataset, DatasetConfig, Split};
use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    /// File name relative to `data_dir`.
    pub file: String,
    /// Data rows emitted from this file (header excluded).
    pub rows: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitManifest {
    pub id: ManifestId,
    pub dataset: Dataset,
    pub config: DatasetConfig,
    pub split: Split,
    pub version: String,
    pub files: Vec<FileSummary>,
    pub total_rows: u64,

    /// Digest of the emitted `(id, record)` stream, see `hash::StreamDigest`.
    pub records_digest: Option<Hash256>,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl EmitManifest {
    pub fn new(config: DatasetConfig, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            dataset: config.dataset(),
            config,
            split: Split::Train,
            version: crate::VERSION.to_string(),
            files: Vec::new(),
            total_rows: 0,
            records_digest: None,
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn finish(
        mut self,
        finished_ms: u64,
        files: Vec<FileSummary>,
        records_digest: Option<Hash256>,
    ) -> Self {
        self.total_rows = files.iter().map(|f| f.rows).sum();
        self.files = files;
        self.finished_ms = finished_ms;
        self.records_digest = records_digest;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_sums_rows_across_files() {
        let m = EmitManifest::new(DatasetConfig::All, 10).finish(
            25,
            vec![
                FileSummary {
                    file: "discharge.csv.gz".into(),
                    rows: 3,
                },
                FileSummary {
                    file: "radiology.csv.gz".into(),
                    rows: 2,
                },
            ],
            None,
        );
        assert_eq!(m.total_rows, 5);
        assert_eq!(m.dataset, Dataset::MimicIvNote);
        assert_eq!(m.split, Split::Train);
        assert_eq!(m.finished_ms - m.started_ms, 15);

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["config"], "all");
        assert_eq!(json["split"], "train");
    }
}
