//! Buffered byte input streams.
//!
//! An [`InputStream`] reads through a sequence of windows supplied by a
//! [`Source`]. Consumers never see window boundaries unless they ask for them:
//!
//! - [`InputStream::read_bytes`] and [`InputStream::read_value`] copy across
//!   any number of windows.
//! - [`InputStream::read_pointer`] / [`InputStream::consume_read_pointer`] hand
//!   out the current window without copying. The returned slice borrows the
//!   stream, so it cannot be held across the next fetch.
//! - [`InputStream::seek_forward`] and [`InputStream::seek_backward`] move the
//!   absolute offset; markers (see [`ByteInput`]) remember and restore it.
//!
//! ## Errors
//!
//! End-of-stream is not an error. Misuse (zero-copy spans larger than the
//! window, consuming more than is buffered, seeking past the end, resetting
//! with an unmarked marker) panics.
//!
//! A source failure aborts the operation in progress. If it struck after a
//! backward seek or a reset had already moved the source, the stream puts
//! the window back at its offset through [`Source::fetch_at`]. When that is
//! not possible every later read and seek fails with
//! [`Error::Desynchronized`] until a reset through direct addressing
//! succeeds.

mod marker;
mod source;
mod value;
mod window;

pub use marker::{ByteInput, Marker, StreamId, replay_to};
pub use source::Source;
pub use value::Value;
pub use window::Window;

use std::io::{self, BufRead, Read};

use log::{debug, trace, warn};

use crate::error::{Error, Result};

/// Buffered, window-based reader over a [`Source`].
///
/// ## Example
///
/// ```
/// use bytewin::{InputStream, MemorySource};
///
/// let source = MemorySource::with_chunk_size((1..=16).collect(), 8);
/// let mut stream = InputStream::new(source);
///
/// let mut dest = [0u8; 10];
/// assert_eq!(stream.read_bytes(&mut dest).unwrap(), 10);
/// assert_eq!(stream.offset(), 10);
///
/// let window = stream.read_pointer(2).unwrap().unwrap();
/// assert_eq!(window, &[11, 12, 13, 14, 15, 16]);
/// ```
pub struct InputStream<S: Source> {
    id: StreamId,
    source: S,
    window: Window,
    offset: u64,
    fetches: u64,
    /// Set when the window no longer matches `offset`.
    lost: bool,
}

impl<S: Source> InputStream<S> {
    /// Create a stream positioned at offset 0.
    ///
    /// No fetch happens until the first read.
    pub fn new(source: S) -> Self {
        Self {
            id: StreamId::next(),
            source,
            window: Window::default(),
            offset: 0,
            fetches: 0,
            lost: false,
        }
    }

    /// Absolute number of bytes consumed since creation.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Bytes left in the current window.
    pub fn bytes_available(&self) -> usize {
        self.window.available()
    }

    /// Bytes already consumed from the current window.
    pub fn bytes_consumed(&self) -> usize {
        self.window.consumed()
    }

    /// Number of fetches (forward, backward or addressed) issued to the source.
    pub fn fetches(&self) -> u64 {
        self.fetches
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    fn fetch_forward(&mut self) -> Result<()> {
        self.source.fetch_forward(&mut self.window)?;
        self.fetches += 1;
        self.check_window();
        trace!(
            "{}: forward fetch at offset {} -> {} bytes",
            self.source.describe(),
            self.offset,
            self.window.available()
        );
        Ok(())
    }

    fn fetch_backward(&mut self) -> Result<()> {
        self.source.fetch_backward(&mut self.window)?;
        self.fetches += 1;
        self.check_window();
        trace!(
            "{}: backward fetch -> {} bytes",
            self.source.describe(),
            self.window.len()
        );
        Ok(())
    }

    fn ensure_positioned(&self) -> Result<()> {
        if self.lost {
            return Err(Error::Desynchronized {
                offset: self.offset,
            });
        }
        Ok(())
    }

    /// Reinstall the window at the current offset after a fetch failed
    /// part-way through moving it.
    fn resync(&mut self) {
        match self.source.fetch_at(self.offset, &mut self.window) {
            Some(Ok(())) => {
                self.fetches += 1;
                self.check_window();
                self.lost = false;
                debug!(
                    "{}: window restored at offset {}",
                    self.source.describe(),
                    self.offset
                );
            }
            Some(Err(e)) => {
                warn!(
                    "{}: cannot restore offset {}: {}",
                    self.source.describe(),
                    self.offset,
                    e
                );
                self.lost = true;
            }
            None => {
                warn!(
                    "{}: position lost at offset {}, source has no direct addressing",
                    self.source.describe(),
                    self.offset
                );
                self.lost = true;
            }
        }
    }

    fn check_window(&self) {
        debug_assert!(
            self.window.unread().end <= self.source.buffer().len(),
            "source installed a window outside its buffer"
        );
    }

    /// Move up to `count` bytes past the cursor, fetching as windows run
    /// out, and hand each contiguous run to `sink`. Returns the number of
    /// bytes moved, short only at end-of-stream.
    fn transfer(&mut self, count: u64, mut sink: impl FnMut(&[u8])) -> Result<u64> {
        self.ensure_positioned()?;
        let mut moved = 0u64;
        if self.window.is_exhausted() {
            self.fetch_forward()?;
        }
        loop {
            let available = self.window.available();
            if available == 0 {
                break;
            }
            let take = (count - moved).min(available as u64) as usize;
            let start = self.window.unread().start;
            sink(&self.source.buffer()[start..start + take]);
            self.window.advance(take);
            self.offset += take as u64;
            moved += take as u64;
            if moved == count {
                break;
            }
            self.fetch_forward()?;
        }
        Ok(moved)
    }

    /// Copy up to `dest.len()` bytes from the stream.
    ///
    /// Returns fewer bytes than requested only at end-of-stream, and 0 only
    /// when the stream was already at its end. If the source fails part-way,
    /// the error is returned and the offset reflects the bytes consumed
    /// before the failure.
    pub fn read_bytes(&mut self, dest: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        self.transfer(dest.len() as u64, |chunk| {
            dest[filled..filled + chunk.len()].copy_from_slice(chunk);
            filled += chunk.len();
        })?;
        Ok(filled)
    }

    /// Read a fixed-width value in native byte order.
    ///
    /// Returns the number of bytes read. `value` is only overwritten when the
    /// full width was available; a smaller count means the stream ended.
    pub fn read_value<T: Value>(&mut self, value: &mut T) -> Result<usize> {
        let mut bytes = T::zeroed();
        let n = self.read_bytes(bytes.as_mut())?;
        if n == T::width() {
            *value = T::from_bytes(bytes);
        }
        Ok(n)
    }

    /// Borrow the unread part of the current window without copying.
    ///
    /// If the window still holds bytes, `requested` must not exceed
    /// [`bytes_available`](Self::bytes_available): the zero-copy path never
    /// spans windows. If the window is exhausted, exactly one forward fetch
    /// is made. Returns `None` at end-of-stream; otherwise the slice holds
    /// everything currently buffered, which may be more than `requested`.
    ///
    /// The position does not move; follow up with
    /// [`consume_read_pointer`](Self::consume_read_pointer).
    pub fn read_pointer(&mut self, requested: usize) -> Result<Option<&[u8]>> {
        self.ensure_positioned()?;
        if self.window.is_exhausted() {
            self.fetch_forward()?;
            if self.window.is_exhausted() {
                return Ok(None);
            }
        } else {
            debug_assert!(
                requested <= self.window.available(),
                "read_pointer({requested}) spans past the {} buffered bytes",
                self.window.available()
            );
        }
        Ok(Some(&self.source.buffer()[self.window.unread()]))
    }

    /// Advance past `used` bytes of the slice returned by
    /// [`read_pointer`](Self::read_pointer).
    ///
    /// # Panics
    ///
    /// If `used` exceeds the bytes available in the current window.
    pub fn consume_read_pointer(&mut self, used: usize) {
        assert!(
            used <= self.window.available(),
            "consume_read_pointer({used}) exceeds the {} buffered bytes",
            self.window.available()
        );
        self.window.advance(used);
        self.offset += used as u64;
    }

    /// Skip `count` bytes.
    ///
    /// # Panics
    ///
    /// If the stream ends before `count` bytes were skipped.
    pub fn seek_forward(&mut self, count: u64) -> Result<()> {
        let skipped = self.transfer(count, |_| {})?;
        assert_eq!(skipped, count, "seek_forward past end of stream");
        Ok(())
    }

    /// Step back `count` bytes.
    ///
    /// Bytes already consumed from the current window are reused without a
    /// fetch; beyond that the source must support backward fetches, otherwise
    /// [`Error::Unsupported`] is returned and the offset is unchanged. The
    /// offset is also unchanged when a later backward fetch fails; the window
    /// is then restored through direct addressing, or the stream is left
    /// [`Desynchronized`](Error::Desynchronized).
    ///
    /// # Panics
    ///
    /// If `count` exceeds the current offset.
    pub fn seek_backward(&mut self, count: u64) -> Result<()> {
        assert!(
            count <= self.offset,
            "seek_backward({count}) before start of stream (offset {})",
            self.offset
        );
        self.ensure_positioned()?;
        let consumed = self.window.consumed() as u64;
        if count <= consumed {
            self.window.retreat(count as usize);
            self.offset -= count;
            return Ok(());
        }

        debug!(
            "{}: seeking back {} bytes from offset {}",
            self.source.describe(),
            count,
            self.offset
        );
        let mut remaining = count - consumed;
        let mut moved = false;
        loop {
            if let Err(e) = self.fetch_backward() {
                if moved {
                    self.resync();
                }
                return Err(e);
            }
            moved = true;
            let len = self.window.len() as u64;
            assert!(len > 0, "source ran out of windows while seeking backward");
            if remaining <= len {
                self.window.rewind_from_end(remaining as usize);
                break;
            }
            remaining -= len;
        }
        self.offset -= count;
        Ok(())
    }
}

impl<S: Source> ByteInput for InputStream<S> {
    fn stream_id(&self) -> StreamId {
        self.id
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn seek_forward(&mut self, count: u64) -> Result<()> {
        InputStream::seek_forward(self, count)
    }

    fn seek_backward(&mut self, count: u64) -> Result<()> {
        InputStream::seek_backward(self, count)
    }

    /// Reset within the current window when possible, then through the
    /// source's direct addressing, and only then by sequential replay.
    ///
    /// A successful addressed reset also recovers a desynchronized stream.
    fn reset(&mut self, marker: &Marker) -> Result<()> {
        let target = marker.target(self.id);
        let behind = self.window.consumed() as u64;
        let ahead = self.window.available() as u64;
        if !self.lost && target <= self.offset && self.offset - target <= behind {
            self.window.retreat((self.offset - target) as usize);
            self.offset = target;
            return Ok(());
        }
        if !self.lost && target > self.offset && target - self.offset <= ahead {
            self.consume_read_pointer((target - self.offset) as usize);
            return Ok(());
        }

        if let Some(result) = self.source.fetch_at(target, &mut self.window) {
            if let Err(e) = result {
                if !self.lost {
                    self.resync();
                }
                return Err(e);
            }
            self.lost = false;
            self.fetches += 1;
            self.check_window();
            debug!(
                "{}: addressed reset from offset {} to {}",
                self.source.describe(),
                self.offset,
                target
            );
            self.offset = target;
            return Ok(());
        }

        self.ensure_positioned()?;
        replay_to(self, target)
    }
}

impl<S: Source> Read for InputStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_bytes(buf)?)
    }
}

impl<S: Source> BufRead for InputStream<S> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.read_pointer(0)?.unwrap_or(&[]))
    }

    fn consume(&mut self, amt: usize) {
        self.consume_read_pointer(amt)
    }
}
