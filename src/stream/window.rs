//! The buffer window: which bytes of the source's buffer are currently readable.

use std::ops::Range;

/// Three positions over the buffer exposed by a [`Source`](super::Source).
///
/// The window never owns memory. `start <= cursor <= end` always holds, and
/// the indices are only meaningful against the slice returned by the source's
/// `buffer()` at the time the window was installed. An empty window (after
/// [`clear`](Window::clear)) means no data is available without another fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    start: usize,
    cursor: usize,
    end: usize,
}

impl Window {
    /// Install a new window of `len` bytes beginning at `start`, with the
    /// cursor on its first byte.
    pub fn install(&mut self, start: usize, len: usize) {
        debug_assert!(start.checked_add(len).is_some(), "window overflows usize");
        self.start = start;
        self.cursor = start;
        self.end = start + len;
    }

    /// Install a window and place the cursor `skip` bytes into it.
    pub fn install_at(&mut self, start: usize, len: usize, skip: usize) {
        debug_assert!(skip <= len, "cursor placed past window end");
        self.install(start, len);
        self.cursor = start + skip;
    }

    /// Install the canonical empty window, signalling end-of-stream.
    pub fn clear(&mut self) {
        self.install(0, 0);
    }

    /// Bytes between the cursor and the end of the window.
    pub fn available(&self) -> usize {
        self.end - self.cursor
    }

    /// Bytes between the start of the window and the cursor.
    pub fn consumed(&self) -> usize {
        self.cursor - self.start
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.end
    }

    /// Range of unread bytes, for indexing into the source buffer.
    pub(crate) fn unread(&self) -> Range<usize> {
        self.cursor..self.end
    }

    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.available());
        self.cursor += n;
    }

    pub(crate) fn retreat(&mut self, n: usize) {
        debug_assert!(n <= self.consumed());
        self.cursor -= n;
    }

    /// Put the cursor `n` bytes before the end of the window.
    pub(crate) fn rewind_from_end(&mut self, n: usize) {
        debug_assert!(n <= self.len());
        self.cursor = self.end - n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_places_cursor_at_start() {
        let mut w = Window::default();
        w.install(16, 8);
        assert_eq!(w.available(), 8);
        assert_eq!(w.consumed(), 0);
        assert_eq!(w.unread(), 16..24);
    }

    #[test]
    fn clear_is_empty_and_exhausted() {
        let mut w = Window::default();
        w.install(4, 4);
        w.advance(1);
        w.clear();
        assert!(w.is_empty());
        assert!(w.is_exhausted());
        assert_eq!(w.available(), 0);
        assert_eq!(w.consumed(), 0);
    }

    #[test]
    fn cursor_arithmetic() {
        let mut w = Window::default();
        w.install_at(0, 10, 3);
        assert_eq!((w.consumed(), w.available()), (3, 7));
        w.advance(7);
        assert!(w.is_exhausted());
        w.retreat(2);
        assert_eq!(w.available(), 2);
        w.rewind_from_end(10);
        assert_eq!(w.consumed(), 0);
    }
}
