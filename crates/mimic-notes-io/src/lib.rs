#![forbid(unsafe_code)]
//! mimic-notes-io: turns gzip-compressed CSV note tables into a pull-based
//! stream of `(id, record)` pairs.
//!
//! Layering, bottom-up:
//! - `gzip`: open a file as a (multi-member) gzip stream.
//! - `readers::guard`: pass-through reader tracking CSV quote state.
//! - `readers::csv`: header mapping + one typed record per row.
//! - `emitter`: walks a configuration's files in order with one id counter.
//! - `writers::jsonl`: NDJSON output for the CLI.

pub mod emitter;
pub mod error;
pub mod gzip;
pub mod readers;
pub mod writers;

pub use emitter::{emit, RecordEmitter, RecordStream};
pub use error::{Error, ErrorKind, Result};
