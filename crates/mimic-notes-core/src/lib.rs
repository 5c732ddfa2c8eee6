#![forbid(unsafe_code)]
//! mimic-notes-core: everything about the MIMIC note tables that does not
//! touch the filesystem.
//!
//! - `schema`: field/schema declarations (all columns are `Utf8`).
//! - `record`: the fixed-shape `NoteEvent` / `Note` structs and `NoteRecord`.
//! - `dataset`: dataset, named configuration, and split identifiers.
//! - `config`: `LoaderConfig` (env / YAML / explicit).
//! - `manifest` + `hash`: per-run audit summary.
//!
//! Reading gzip/CSV lives in `mimic-notes-io`.

pub mod config;
pub mod dataset;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod prelude;
pub mod record;
pub mod schema;

/// Crate version recorded in emission manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
