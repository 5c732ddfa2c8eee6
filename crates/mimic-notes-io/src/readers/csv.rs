//! CSV row reader producing one typed record per data row.
//!
//! The first row is the header. It is mapped once onto the record's declared
//! columns (lower-cased first when the record type asks for it); every later
//! row is zipped against that mapping. Rows shorter than the header leave the
//! trailing columns absent, rows wider than the header are an error.

use std::fs::File;
use std::io::Read;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use ::csv::{Reader, ReaderBuilder, StringRecord};
use flate2::read::MultiGzDecoder;

use mimic_notes_core::record::NoteRecord;

use crate::error::{Error, Result};
use crate::gzip::open_gzip;
use crate::readers::guard::QuoteGuard;

/// Source column index -> declared field index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    slots: Vec<usize>,
    width: usize,
}

impl HeaderMap {
    pub fn new<R: NoteRecord>(header: &StringRecord) -> Result<Self> {
        let mut slots = Vec::with_capacity(header.len());
        let mut seen = vec![false; R::FIELDS.len()];
        for raw in header.iter() {
            let name = if R::LOWERCASE_HEADER {
                raw.to_lowercase()
            } else {
                raw.to_string()
            };
            let idx = R::FIELDS
                .iter()
                .position(|f| *f == name)
                .ok_or_else(|| {
                    Error::Schema(format!(
                        "column '{raw}' is not part of the {} schema",
                        R::DATASET
                    ))
                })?;
            if std::mem::replace(&mut seen[idx], true) {
                return Err(Error::Schema(format!("column '{name}' appears twice in header")));
            }
            slots.push(idx);
        }
        Ok(Self {
            slots,
            width: R::FIELDS.len(),
        })
    }

    /// Number of columns in the source header.
    pub fn columns(&self) -> usize {
        self.slots.len()
    }

    /// Zip `row` against the header. The caller has already rejected rows
    /// wider than the header.
    pub fn build<R: NoteRecord>(&self, row: &StringRecord) -> Result<R> {
        let mut values = vec![None; self.width];
        for (cell, &slot) in row.iter().zip(&self.slots) {
            values[slot] = Some(cell.to_string());
        }
        Ok(R::from_values(values)?)
    }
}

pub struct NoteCsvReader<R: NoteRecord, S: Read = MultiGzDecoder<File>> {
    path: PathBuf,
    inner: Reader<QuoteGuard<S>>,
    header: HeaderMap,
    row: StringRecord,
    rows: u64,
    _record: PhantomData<fn() -> R>,
}

impl<R: NoteRecord> NoteCsvReader<R> {
    /// Open a gzip-compressed table and read its header.
    pub fn open(path: &Path, buffer_capacity: usize) -> Result<Self> {
        let source = open_gzip(path)?;
        Self::from_reader(path, source, buffer_capacity)
    }
}

impl<R: NoteRecord, S: Read> NoteCsvReader<R, S> {
    /// Wrap an already-decompressed byte stream. `path` is only used in errors.
    pub fn from_reader(path: &Path, source: S, buffer_capacity: usize) -> Result<Self> {
        let mut inner = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .buffer_capacity(buffer_capacity.max(1))
            .from_reader(QuoteGuard::new(source));

        let header_row = inner
            .headers()
            .map_err(|e| csv_error(path, e))?
            .clone();
        if ended_in_open_quote(&inner) {
            return Err(Error::Parse {
                path: path.to_path_buf(),
                line: 1,
                message: "unterminated quoted field in header".into(),
            });
        }
        let header = HeaderMap::new::<R>(&header_row)?;

        Ok(Self {
            path: path.to_path_buf(),
            inner,
            header,
            row: StringRecord::new(),
            rows: 0,
            _record: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows returned so far.
    pub fn rows_read(&self) -> u64 {
        self.rows
    }

    /// Next record, `Ok(None)` at end of input.
    pub fn next_record(&mut self) -> Result<Option<R>> {
        let more = self
            .inner
            .read_record(&mut self.row)
            .map_err(|e| csv_error(&self.path, e))?;
        if !more {
            return Ok(None);
        }

        let line = self.row.position().map(|p| p.line()).unwrap_or(0);
        if ended_in_open_quote(&self.inner) {
            return Err(self.parse_error(line, "unterminated quoted field".into()));
        }
        if self.row.len() > self.header.columns() {
            return Err(self.parse_error(
                line,
                format!(
                    "row has {} fields but the header has {}",
                    self.row.len(),
                    self.header.columns()
                ),
            ));
        }

        let record = self.header.build::<R>(&self.row)?;
        self.rows += 1;
        Ok(Some(record))
    }

    fn parse_error(&self, line: u64, message: String) -> Error {
        Error::Parse {
            path: self.path.clone(),
            line,
            message,
        }
    }
}

/// The record just returned reached end of input inside an open quote.
fn ended_in_open_quote<S: Read>(rdr: &Reader<QuoteGuard<S>>) -> bool {
    let guard = rdr.get_ref();
    guard.ends_inside_quotes() && rdr.position().byte() >= guard.bytes_read()
}

/// After open, the only I/O under the csv layer is the gzip decoder, so I/O
/// failures surface as decompression errors.
fn csv_error(path: &Path, err: ::csv::Error) -> Error {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = err.to_string();
    match err.into_kind() {
        ::csv::ErrorKind::Io(source) => Error::Decompress {
            path: path.to_path_buf(),
            source,
        },
        _ => Error::Parse {
            path: path.to_path_buf(),
            line,
            message,
        },
    }
}
