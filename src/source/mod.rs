//! Reference [`Source`](crate::Source) implementations.
//!
//! | Source            | Medium                 | Backward | Addressed reset |
//! |-------------------|------------------------|----------|-----------------|
//! | [`MemorySource`]  | owned `Vec<u8>`        | yes      | yes             |
//! | [`ReaderSource`]  | any `std::io::Read`    | no       | no              |
//! | [`PagedSource`]   | any [`ReadAt`] medium  | yes      | yes             |
//!
//! Markers stay valid for as long as the source lives, except that a
//! [`ReaderSource`] can only reset to positions at or ahead of the current
//! window.
//!
//! [`ReadAt`]: crate::io::ReadAt

mod memory;
mod paged;
mod reader;

pub use memory::MemorySource;
pub use paged::PagedSource;
pub use reader::ReaderSource;

/// Default window size for [`MemorySource`] and [`ReaderSource`].
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Default page size for [`PagedSource`].
pub const DEFAULT_PAGE_SIZE: usize = 4096;
