//! # bytewin
//!
//! Buffered, window-based byte input streams for storage engines.
//!
//! A [`Source`] knows how to fetch bytes from some medium (a page file, a
//! memory block, a socket) one window at a time. An [`InputStream`] sits on
//! top of it and gives consumers a uniform read API that does not care where
//! the window boundaries fall, plus a zero-copy path for callers that can
//! work within a single window.
//!
//! ## Features
//!
//! - Copying reads that span any number of windows, and fixed-width value reads
//! - Zero-copy read pointers whose lifetime ends at the next fetch
//! - Forward and backward seeking with exact absolute-offset bookkeeping
//! - Position markers with a sequential reset fallback and O(1) resets for
//!   addressable sources
//! - Reference sources for memory, any `std::io::Read`, and page files over
//!   local files or HTTP Range requests
//!
//! ## Example
//!
//! ```
//! use bytewin::{ByteInput, InputStream, PagedSource};
//!
//! # fn main() -> bytewin::Result<()> {
//! let medium: Vec<u8> = (0..=255).collect();
//! let mut stream = InputStream::new(PagedSource::with_page_size(medium, 64));
//!
//! let mut marker = stream.new_marker();
//! stream.seek_forward(100)?;
//! stream.mark(&mut marker);
//!
//! let mut header = [0u8; 4];
//! stream.read_bytes(&mut header)?;
//! assert_eq!(header, [100, 101, 102, 103]);
//!
//! stream.reset(&marker)?;
//! assert_eq!(stream.offset(), 100);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod dump;
pub mod error;
pub mod io;
pub mod source;
pub mod stream;

pub use cli::{Cli, Format};
pub use error::{Error, Result};
pub use io::{HttpRangeReader, LocalFileReader, ReadAt};
pub use source::{MemorySource, PagedSource, ReaderSource};
pub use stream::{ByteInput, InputStream, Marker, Source, StreamId, Value, Window, replay_to};
