//! Opening a note table as a decompressed byte stream.
//!
//! The decoder wraps the file in its own buffer, so callers only size the
//! buffer of whatever reads the decompressed side. The gzip header is parsed
//! lazily: a corrupt container surfaces on the first read, not here.

use std::fs::File;
use std::io;
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{Error, Result};

/// Open `path` for streaming decompression.
///
/// Concatenated gzip members are read through to the end, the same as
/// `gzip -d` does.
pub fn open_gzip(path: &Path) -> Result<MultiGzDecoder<File>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })?;
    Ok(MultiGzDecoder::new(file))
}
