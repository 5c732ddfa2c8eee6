//! Fixed-shape note records.
//!
//! Each table gets a struct with one `Option<String>` per declared column, in
//! declared order. `None` means the source row had no cell for the column
//! (short row, or the header lacked it); an empty cell is `Some("")`.
//! Serialization emits exactly the declared field set, in order.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::schema::Schema;

/// A row type with a statically known column set.
pub trait NoteRecord: Sized + Serialize {
    /// Column names in declared order.
    const FIELDS: &'static [&'static str];

    /// Lower-case source header names before matching them to `FIELDS`.
    const LOWERCASE_HEADER: bool;

    const DATASET: Dataset;

    fn schema() -> Schema {
        Schema::utf8(Self::FIELDS)
    }

    /// Build a record from values laid out in `FIELDS` order.
    ///
    /// Fails if `values.len()` differs from the declared column count.
    fn from_values(values: Vec<Option<String>>) -> Result<Self>;

    /// Value of a declared column, `None` if absent or not a declared name.
    fn get(&self, name: &str) -> Option<&str>;

    fn into_record(self) -> Record;
}

macro_rules! note_record {
    (
        $(#[$meta:meta])*
        $name:ident, $variant:ident, dataset = $dataset:expr, lowercase = $lower:expr,
        [$($field:ident),+ $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $(pub $field: Option<String>,)+
        }

        impl NoteRecord for $name {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];
            const LOWERCASE_HEADER: bool = $lower;
            const DATASET: Dataset = $dataset;

            fn from_values(values: Vec<Option<String>>) -> Result<Self> {
                if values.len() != Self::FIELDS.len() {
                    return Err(Error::Schema(format!(
                        "{} expects {} values, got {}",
                        stringify!($name),
                        Self::FIELDS.len(),
                        values.len()
                    )));
                }
                let mut values = values.into_iter();
                Ok(Self {
                    $($field: values.next().flatten(),)+
                })
            }

            fn get(&self, name: &str) -> Option<&str> {
                match name {
                    $(stringify!($field) => self.$field.as_deref(),)+
                    _ => None,
                }
            }

            fn into_record(self) -> Record {
                Record::$variant(self)
            }
        }
    };
}

note_record!(
    /// One row of MIMIC-III `NOTEEVENTS.csv.gz`. The source header is upper
    /// case (`ROW_ID`, ...) and is lower-cased before mapping.
    NoteEvent, NoteEvent, dataset = Dataset::MimicIiiNoteEvents, lowercase = true,
    [
        row_id,
        subject_id,
        hadm_id,
        chartdate,
        charttime,
        storetime,
        category,
        description,
        cgid,
        iserror,
        text,
    ]
);

note_record!(
    /// One row of MIMIC-IV-Note `discharge.csv.gz` or `radiology.csv.gz`.
    /// Header names are matched as-is.
    Note, Note, dataset = Dataset::MimicIvNote, lowercase = false,
    [
        note_id,
        subject_id,
        hadm_id,
        note_type,
        note_seq,
        charttime,
        storetime,
        text,
    ]
);

/// A record whose table is only known at runtime (selected by configuration).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    NoteEvent(NoteEvent),
    Note(Note),
}

impl Record {
    pub fn dataset(&self) -> Dataset {
        match self {
            Record::NoteEvent(_) => NoteEvent::DATASET,
            Record::Note(_) => Note::DATASET,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Record::NoteEvent(r) => r.get(name),
            Record::Note(r) => r.get(name),
        }
    }
}
