use super::DEFAULT_CHUNK_SIZE;
use crate::error::Result;
use crate::stream::{Source, Window};

/// In-memory source that serves its bytes in fixed-size chunks.
///
/// Chunks are aligned to multiples of the chunk size, so every position maps
/// to exactly one window. Supports backward fetches and addressed resets.
pub struct MemorySource {
    data: Vec<u8>,
    chunk_size: usize,
    /// Bounds of the current window within `data`.
    start: usize,
    end: usize,
}

impl MemorySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_chunk_size(data, DEFAULT_CHUNK_SIZE)
    }

    /// # Panics
    ///
    /// If `chunk_size` is zero.
    pub fn with_chunk_size(data: Vec<u8>, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");
        Self {
            data,
            chunk_size,
            start: 0,
            end: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn install_chunk(&mut self, start: usize, window: &mut Window, skip: usize) {
        self.start = start;
        self.end = (start + self.chunk_size).min(self.data.len());
        window.install_at(start, self.end - start, skip);
    }

    fn park_at_end(&mut self, window: &mut Window) {
        self.start = self.data.len();
        self.end = self.data.len();
        window.clear();
    }
}

impl Source for MemorySource {
    fn buffer(&self) -> &[u8] {
        &self.data
    }

    fn fetch_forward(&mut self, window: &mut Window) -> Result<()> {
        let next = self.end;
        if next >= self.data.len() {
            self.park_at_end(window);
        } else {
            self.install_chunk(next, window, 0);
        }
        Ok(())
    }

    fn fetch_backward(&mut self, window: &mut Window) -> Result<()> {
        if self.start == 0 {
            self.end = 0;
            window.clear();
            return Ok(());
        }
        let prev = (self.start - 1) / self.chunk_size * self.chunk_size;
        self.install_chunk(prev, window, 0);
        Ok(())
    }

    fn fetch_at(&mut self, offset: u64, window: &mut Window) -> Option<Result<()>> {
        let offset = offset as usize;
        assert!(offset <= self.data.len(), "reset past end of memory source");
        let start = offset / self.chunk_size * self.chunk_size;
        if start >= self.data.len() {
            self.park_at_end(window);
        } else {
            self.install_chunk(start, window, offset - start);
        }
        Some(Ok(()))
    }

    fn describe(&self) -> String {
        format!("memory[{} bytes]", self.data.len())
    }
}
