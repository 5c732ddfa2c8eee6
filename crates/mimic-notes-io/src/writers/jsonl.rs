//! Streaming NDJSON writer: one `{"id": .., <fields>..}` object per line.

use std::io::{BufWriter, Write};

use serde::Serialize;

use mimic_notes_core::hash::IdRecord;

use crate::error::Result;

pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
    rows: u64,
}

impl<W: Write> JsonlWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            rows: 0,
        }
    }

    /// Write one record; the id goes first, then the record's fields in
    /// declared order.
    pub fn write_record<T: Serialize>(&mut self, id: u64, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &IdRecord { id, record })?;
        self.writer.write_all(b"\n")?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimic_notes_core::hash::{hash_bytes, StreamDigest};
    use mimic_notes_core::record::{Note, NoteEvent, NoteRecord};

    #[test]
    fn writes_id_then_declared_fields() {
        let mut values = vec![None; Note::FIELDS.len()];
        values[0] = Some("A-1".to_string());
        values[7] = Some("line\nbreak".to_string());
        let note = Note::from_values(values).unwrap();

        let mut w = JsonlWriter::to_writer(Vec::new());
        w.write_record(0, &note).unwrap();
        w.write_record(1, &note).unwrap();
        assert_eq!(w.rows(), 2);

        let out = String::from_utf8(w.finish().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"{"id":0,"note_id":"A-1","subject_id":null"#));
        assert!(lines[1].ends_with(r#""text":"line\nbreak"}"#));
    }

    #[test]
    fn runtime_record_is_flattened_and_matches_digest() {
        let mut values = vec![None; NoteEvent::FIELDS.len()];
        values[0] = Some("1".to_string());
        values[10] = Some("a".to_string());
        let record = NoteEvent::from_values(values).unwrap().into_record();

        let mut w = JsonlWriter::to_writer(Vec::new());
        let mut digest = StreamDigest::new();
        for id in 0..2 {
            w.write_record(id, &record).unwrap();
            digest.update(id, &record).unwrap();
        }
        let out = w.finish().unwrap();

        let text = String::from_utf8(out.clone()).unwrap();
        let first = text.lines().next().unwrap();
        assert!(first.starts_with(r#"{"id":0,"row_id":"1","subject_id":null"#));
        assert!(first.ends_with(r#""text":"a"}"#));
        assert!(!first.contains("NoteEvent"));

        assert_eq!(digest.count(), 2);
        assert_eq!(digest.finalize(), hash_bytes(&out));
    }
}
