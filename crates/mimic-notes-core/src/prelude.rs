//! Convenient re-exports for downstream crates.

pub use crate::config::LoaderConfig;
pub use crate::dataset::{Dataset, DatasetConfig, Split};
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::manifest::{EmitManifest, FileSummary};
pub use crate::record::{Note, NoteEvent, NoteRecord, Record};
pub use crate::schema::{DataType, Field, Schema};
