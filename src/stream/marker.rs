//! Position markers and the sequential reset fallback.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;

/// Identity of a stream instance, used to bind markers to their stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(u64);

impl StreamId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        StreamId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Opaque memento of a stream position.
///
/// Created unmarked by [`ByteInput::new_marker`], filled by
/// [`ByteInput::mark`] and consumed (any number of times) by
/// [`ByteInput::reset`]. How long a marked position stays usable is up to the
/// source behind the stream: an in-memory source keeps every position valid,
/// a forward-only source can only ever reset forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    owner: StreamId,
    offset: Option<u64>,
}

impl Marker {
    pub fn owner(&self) -> StreamId {
        self.owner
    }

    pub fn is_marked(&self) -> bool {
        self.offset.is_some()
    }

    /// The recorded absolute offset, if the marker has been marked.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Offset to reset `stream` to.
    ///
    /// # Panics
    ///
    /// If the marker belongs to another stream or was never marked.
    pub(crate) fn target(&self, stream: StreamId) -> u64 {
        assert_eq!(self.owner, stream, "marker used with a foreign stream");
        match self.offset {
            Some(offset) => offset,
            None => panic!("reset with an unmarked marker"),
        }
    }
}

/// The read-engine operations markers are built from.
///
/// `new_marker`, `mark` and `reset` have sequential defaults expressed only
/// in terms of the other methods; implementors with direct addressing
/// override `reset`.
pub trait ByteInput {
    fn stream_id(&self) -> StreamId;

    /// Absolute number of bytes consumed since the stream was created.
    fn offset(&self) -> u64;

    fn seek_forward(&mut self, count: u64) -> Result<()>;

    fn seek_backward(&mut self, count: u64) -> Result<()>;

    fn new_marker(&self) -> Marker {
        Marker {
            owner: self.stream_id(),
            offset: None,
        }
    }

    /// Record the current position in `marker`, forgetting any earlier one.
    fn mark(&self, marker: &mut Marker) {
        assert_eq!(marker.owner, self.stream_id(), "marker used with a foreign stream");
        marker.offset = Some(self.offset());
    }

    /// Return to the position recorded in `marker`.
    fn reset(&mut self, marker: &Marker) -> Result<()> {
        let target = marker.target(self.stream_id());
        replay_to(self, target)
    }
}

/// Move `input` to absolute `target` using only relative seeks.
///
/// Costs O(distance); resetting backward fails with
/// [`Error::Unsupported`](crate::Error::Unsupported) when the input cannot
/// seek backward.
pub fn replay_to<I: ByteInput + ?Sized>(input: &mut I, target: u64) -> Result<()> {
    let current = input.offset();
    if target > current {
        input.seek_forward(target - current)
    } else if target < current {
        input.seek_backward(current - target)
    } else {
        Ok(())
    }
}
