//! Stable hashing helpers for manifests and emitted record streams.

use blake3::Hasher;
use serde::Serialize;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(64);
        for b in &self.0 {
            use std::fmt::Write as _;
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Hash256 {
    let mut h = Hasher::new();
    h.update(bytes);
    Hash256(h.finalize().into())
}

/// Incremental digest over `(id, record)` pairs in emission order.
///
/// Each pair is fed as its JSON encoding followed by a newline, so the digest
/// equals `hash_bytes` of the JSONL the CLI writes for the same stream.
pub struct StreamDigest {
    hasher: Hasher,
    count: u64,
}

impl StreamDigest {
    pub fn new() -> Self {
        Self {
            hasher: Hasher::new(),
            count: 0,
        }
    }

    pub fn update<T: Serialize>(&mut self, id: u64, record: &T) -> Result<(), Error> {
        let line = serde_json::to_vec(&IdRecord { id, record })?;
        self.hasher.update(&line);
        self.hasher.update(b"\n");
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn finalize(&self) -> Hash256 {
        Hash256(self.hasher.finalize().into())
    }
}

impl Default for StreamDigest {
    fn default() -> Self {
        Self::new()
    }
}

/// `{"id": .., <record fields>..}` as one flat JSON object.
#[derive(Serialize)]
pub struct IdRecord<'a, T: Serialize> {
    pub id: u64,
    #[serde(flatten)]
    pub record: &'a T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_64_chars() {
        let h = hash_bytes(b"noteevents");
        assert_eq!(h.to_hex().len(), 64);
        assert_eq!(h, hash_bytes(b"noteevents"));
    }

    #[test]
    fn stream_digest_matches_jsonl_bytes() {
        #[derive(Serialize)]
        struct Row {
            text: &'static str,
        }

        let mut d = StreamDigest::new();
        d.update(0, &Row { text: "a" }).unwrap();
        d.update(1, &Row { text: "b" }).unwrap();
        assert_eq!(d.count(), 2);

        let jsonl = "{\"id\":0,\"text\":\"a\"}\n{\"id\":1,\"text\":\"b\"}\n";
        assert_eq!(d.finalize(), hash_bytes(jsonl.as_bytes()));
    }
}
