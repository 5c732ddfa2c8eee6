//! `RecordEmitter`: the pull-based `(id, record)` stream over one
//! configuration's files.
//!
//! Cursor state is the index of the next file, the currently open reader, and
//! the next id. Exactly one file is open at a time; its handle is dropped as
//! soon as its rows run out, an error ends the stream, or the emitter itself
//! is dropped. Ids start at 0 and keep counting across files.
//!
//! After the first error the iterator is fused: it yields that error once and
//! then `None`. Records already handed out stay valid.

use std::path::{Path, PathBuf};

use mimic_notes_core::config::{require_data_dir, LoaderConfig, DEFAULT_BUFFER_CAPACITY};
use mimic_notes_core::dataset::DatasetConfig;
use mimic_notes_core::manifest::FileSummary;
use mimic_notes_core::record::{Note, NoteEvent, NoteRecord, Record};

use crate::error::{Error, Result};
use crate::readers::csv::NoteCsvReader;

pub struct RecordEmitter<R: NoteRecord> {
    data_dir: PathBuf,
    files: Vec<String>,
    next_file: usize,
    current: Option<NoteCsvReader<R>>,
    next_id: u64,
    buffer_capacity: usize,
    summaries: Vec<FileSummary>,
    done: bool,
}

impl<R: NoteRecord> RecordEmitter<R> {
    /// Emit the rows of `files` (relative to `data_dir`) in the given order.
    ///
    /// Fails before touching any file when `data_dir` is missing or is not a
    /// directory. The files themselves are only opened when reached.
    pub fn new(data_dir: Option<&Path>, files: &[&str]) -> Result<Self> {
        let data_dir = require_data_dir(data_dir)?.to_path_buf();
        Ok(Self {
            data_dir,
            files: files.iter().map(|f| f.to_string()).collect(),
            next_file: 0,
            current: None,
            next_id: 0,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            summaries: Vec::with_capacity(files.len()),
            done: false,
        })
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }

    /// Id the next record will get; equals the number emitted so far.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Rows emitted per file, for every file opened so far.
    pub fn file_summaries(&self) -> &[FileSummary] {
        &self.summaries
    }

    fn open_next_file(&mut self) -> Result<bool> {
        let Some(file) = self.files.get(self.next_file) else {
            return Ok(false);
        };
        self.next_file += 1;
        let path = self.data_dir.join(file);

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), first_id = self.next_id, "opening note table");

        let reader = NoteCsvReader::<R>::open(&path, self.buffer_capacity)?;
        self.summaries.push(FileSummary {
            file: file.clone(),
            rows: 0,
        });
        self.current = Some(reader);
        Ok(true)
    }

    fn advance(&mut self) -> Result<Option<(u64, R)>> {
        loop {
            if self.current.is_none() && !self.open_next_file()? {
                return Ok(None);
            }
            let Some(reader) = self.current.as_mut() else {
                return Err(Error::Internal("no open reader after open".into()));
            };

            match reader.next_record()? {
                Some(record) => {
                    let id = self.next_id;
                    self.next_id += 1;
                    if let Some(summary) = self.summaries.last_mut() {
                        summary.rows += 1;
                    }
                    return Ok(Some((id, record)));
                }
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        path = %reader.path().display(),
                        rows = reader.rows_read(),
                        "finished note table"
                    );
                    self.current = None;
                }
            }
        }
    }
}

impl<R: NoteRecord> Iterator for RecordEmitter<R> {
    type Item = Result<(u64, R)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, emitted = self.next_id, "emission aborted");
                self.done = true;
                self.current = None;
                Some(Err(e))
            }
        }
    }
}

impl<R: NoteRecord> std::iter::FusedIterator for RecordEmitter<R> {}

impl RecordEmitter<NoteEvent> {
    /// MIMIC-III: `NOTEEVENTS.csv.gz`.
    pub fn noteevents(data_dir: Option<&Path>) -> Result<Self> {
        Self::new(data_dir, DatasetConfig::NoteEvents.source_files())
    }
}

impl RecordEmitter<Note> {
    /// MIMIC-IV-Note: `discharge`, `radiology`, or `all` (discharge first).
    pub fn mimic_iv_note(data_dir: Option<&Path>, config: DatasetConfig) -> Result<Self> {
        if config == DatasetConfig::NoteEvents {
            return Err(Error::Config(
                "'noteevents' is a MIMIC-III configuration, not MIMIC-IV-Note".into(),
            ));
        }
        Self::new(data_dir, config.source_files())
    }
}

/// Emitter chosen at runtime from a named configuration.
pub enum RecordStream {
    NoteEvents(RecordEmitter<NoteEvent>),
    Notes(RecordEmitter<Note>),
}

impl RecordStream {
    pub fn file_summaries(&self) -> &[FileSummary] {
        match self {
            RecordStream::NoteEvents(e) => e.file_summaries(),
            RecordStream::Notes(e) => e.file_summaries(),
        }
    }
}

impl Iterator for RecordStream {
    type Item = Result<(u64, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            RecordStream::NoteEvents(e) => e
                .next()
                .map(|item| item.map(|(id, r)| (id, r.into_record()))),
            RecordStream::Notes(e) => e
                .next()
                .map(|item| item.map(|(id, r)| (id, r.into_record()))),
        }
    }
}

impl std::iter::FusedIterator for RecordStream {}

/// `emit(data_dir, dataset_config)`: lazy `(id, record)` stream for `cfg`.
pub fn emit(cfg: &LoaderConfig) -> Result<RecordStream> {
    let data_dir = cfg.data_dir.as_deref();
    let stream = match cfg.dataset_config {
        DatasetConfig::NoteEvents => RecordStream::NoteEvents(
            RecordEmitter::noteevents(data_dir)?.with_buffer_capacity(cfg.buffer_capacity),
        ),
        other => RecordStream::Notes(
            RecordEmitter::mimic_iv_note(data_dir, other)?
                .with_buffer_capacity(cfg.buffer_capacity),
        ),
    };
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn missing_data_dir_fails_before_io() {
        let err = RecordEmitter::<Note>::new(None, &["discharge.csv.gz"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = emit(&LoaderConfig::default()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn noteevents_config_is_not_a_mimic_iv_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = RecordEmitter::mimic_iv_note(Some(dir.path()), DatasetConfig::NoteEvents)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_file_yields_not_found_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut em = RecordEmitter::mimic_iv_note(Some(dir.path()), DatasetConfig::Discharge)
            .unwrap();
        match em.next() {
            Some(Err(Error::NotFound { path })) => {
                assert!(path.ends_with("discharge.csv.gz"))
            }
            other => panic!("expected not-found, got {:?}", other.map(|r| r.map(|(id, _)| id))),
        }
        assert!(em.next().is_none());
        assert_eq!(em.next_id(), 0);
    }
}
