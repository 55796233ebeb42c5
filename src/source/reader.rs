use std::io::{ErrorKind, Read};

use super::DEFAULT_CHUNK_SIZE;
use crate::error::Result;
use crate::stream::{Source, Window};

/// Forward-only source over any [`Read`] implementation.
///
/// Each fetch performs a single `read` into an owned buffer, so windows are
/// as large as whatever the reader hands back. Backward fetches are not
/// supported; a reset can only move forward.
pub struct ReaderSource<R: Read> {
    reader: R,
    buf: Vec<u8>,
    exhausted: bool,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_CHUNK_SIZE, reader)
    }

    /// # Panics
    ///
    /// If `capacity` is zero.
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        assert!(capacity > 0, "buffer capacity must be positive");
        Self {
            reader,
            buf: vec![0u8; capacity],
            exhausted: false,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Source for ReaderSource<R> {
    fn buffer(&self) -> &[u8] {
        &self.buf
    }

    fn fetch_forward(&mut self, window: &mut Window) -> Result<()> {
        if self.exhausted {
            window.clear();
            return Ok(());
        }
        let n = loop {
            match self.reader.read(&mut self.buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        if n == 0 {
            self.exhausted = true;
            window.clear();
        } else {
            window.install(0, n);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("reader[{} byte buffer]", self.buf.len())
    }
}
