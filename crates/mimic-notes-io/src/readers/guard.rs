//! Pass-through reader that follows the CSV quoting state of the bytes it
//! hands out.
//!
//! The `csv` crate accepts a quoted field that is still open at end of input
//! and returns it as a normal final record. Note text is always quoted, so a
//! truncated or hand-edited export would silently fold the rest of the file
//! into one `text` cell. The guard lets the row reader detect that case.
//!
//! The state machine mirrors the default `csv_core` dialect: `,` delimiter,
//! `"` quote, doubled quotes as escape, `\n` / `\r` terminators.
//!
//! A leading UTF-8 byte-order mark is dropped here. `csv` only strips it when
//! the whole mark lands in its first buffer fill, which small buffers or
//! short decoder reads do not guarantee.

use std::io::{self, Read};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// Saw `"` inside a quoted field: either an escape or the closing quote.
    QuoteInQuoted,
}

impl QuoteState {
    fn step(self, b: u8) -> Self {
        use QuoteState::*;
        match (self, b) {
            (FieldStart, b'"') => Quoted,
            (FieldStart, b',' | b'\n' | b'\r') => FieldStart,
            (FieldStart, _) => Unquoted,
            (Unquoted, b',' | b'\n' | b'\r') => FieldStart,
            (Unquoted, _) => Unquoted,
            (Quoted, b'"') => QuoteInQuoted,
            (Quoted, _) => Quoted,
            (QuoteInQuoted, b'"') => Quoted,
            (QuoteInQuoted, b',' | b'\n' | b'\r') => FieldStart,
            (QuoteInQuoted, _) => Unquoted,
        }
    }
}

pub struct QuoteGuard<R: Read> {
    inner: R,
    state: QuoteState,
    bytes: u64,
    eof: bool,
    /// First bytes of the stream, held back until the BOM check is done.
    head: [u8; 3],
    head_pos: usize,
    head_len: usize,
    started: bool,
}

impl<R: Read> QuoteGuard<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: QuoteState::FieldStart,
            bytes: 0,
            eof: false,
            head: [0; 3],
            head_pos: 0,
            head_len: 0,
            started: false,
        }
    }

    /// Bytes forwarded so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes
    }

    /// The inner reader has reported end of input.
    pub fn at_eof(&self) -> bool {
        self.eof
    }

    /// Input ended while a quoted field was still open.
    pub fn ends_inside_quotes(&self) -> bool {
        self.eof && self.state == QuoteState::Quoted
    }

    fn fill_head(&mut self) -> io::Result<()> {
        while self.head_len < self.head.len() {
            match self.inner.read(&mut self.head[self.head_len..]) {
                Ok(0) => break,
                Ok(n) => self.head_len += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        if &self.head[..self.head_len] == UTF8_BOM {
            self.head_len = 0;
        }
        self.started = true;
        Ok(())
    }
}

impl<R: Read> Read for QuoteGuard<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.started {
            self.fill_head()?;
        }
        let n = if self.head_pos < self.head_len {
            let n = (self.head_len - self.head_pos).min(buf.len());
            buf[..n].copy_from_slice(&self.head[self.head_pos..self.head_pos + n]);
            self.head_pos += n;
            n
        } else {
            let n = self.inner.read(buf)?;
            if n == 0 {
                self.eof = true;
            }
            n
        };
        for &b in &buf[..n] {
            self.state = self.state.step(b);
        }
        self.bytes += n as u64;
        Ok(n)
    }
}
