use std::io::ErrorKind;

use log::trace;

use super::DEFAULT_PAGE_SIZE;
use crate::error::Result;
use crate::io::ReadAt;
use crate::stream::{Source, Window};

/// Page-file source over a random-access medium.
///
/// The medium is split into fixed-size pages (the last one may be short) and
/// each window is exactly one page, read with [`ReadAt::read_at`] into an
/// owned page buffer. Because every offset maps directly to a page, resets
/// jump straight to the marked page instead of replaying the stream. The most
/// recently loaded page is kept, so moving within it never touches the
/// medium.
///
/// Pages are read into a spare buffer and swapped in once complete, so a
/// failed fetch leaves the current page and window as they were.
pub struct PagedSource<R: ReadAt> {
    medium: R,
    page_size: usize,
    size: u64,
    page: Vec<u8>,
    scratch: Vec<u8>,
    /// Page index held in `page`.
    loaded: Option<u64>,
    /// Page index of the current window; `None` before the first page,
    /// `page_count()` once the stream has ended.
    current: Option<u64>,
    pages_read: u64,
}

impl<R: ReadAt> PagedSource<R> {
    pub fn new(medium: R) -> Self {
        Self::with_page_size(medium, DEFAULT_PAGE_SIZE)
    }

    /// # Panics
    ///
    /// If `page_size` is zero.
    pub fn with_page_size(medium: R, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        let size = medium.size();
        Self {
            medium,
            page_size,
            size,
            page: Vec::with_capacity(page_size),
            scratch: Vec::with_capacity(page_size),
            loaded: None,
            current: None,
            pages_read: 0,
        }
    }

    pub fn medium(&self) -> &R {
        &self.medium
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Size of the medium in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn page_count(&self) -> u64 {
        self.size.div_ceil(self.page_size as u64)
    }

    /// Number of pages actually read from the medium.
    pub fn pages_read(&self) -> u64 {
        self.pages_read
    }

    fn load(&mut self, index: u64) -> Result<()> {
        if self.loaded == Some(index) {
            return Ok(());
        }
        let start = index * self.page_size as u64;
        let len = (self.size - start).min(self.page_size as u64) as usize;
        self.scratch.resize(len, 0);

        let mut filled = 0;
        while filled < len {
            let n = self
                .medium
                .read_at(start + filled as u64, &mut self.scratch[filled..])?;
            if n == 0 {
                return Err(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("medium ended inside page {index} ({filled} of {len} bytes)"),
                )
                .into());
            }
            filled += n;
        }

        trace!("loaded page {index} ({len} bytes)");
        std::mem::swap(&mut self.page, &mut self.scratch);
        self.loaded = Some(index);
        self.pages_read += 1;
        Ok(())
    }

    fn install_page(&mut self, index: u64, window: &mut Window, skip: usize) -> Result<()> {
        self.load(index)?;
        self.current = Some(index);
        window.install_at(0, self.page.len(), skip);
        Ok(())
    }

    fn park_at_end(&mut self, window: &mut Window) {
        self.current = Some(self.page_count());
        window.clear();
    }
}

impl<R: ReadAt> Source for PagedSource<R> {
    fn buffer(&self) -> &[u8] {
        &self.page
    }

    fn fetch_forward(&mut self, window: &mut Window) -> Result<()> {
        let next = self.current.map_or(0, |p| p + 1);
        if next >= self.page_count() {
            self.park_at_end(window);
            return Ok(());
        }
        self.install_page(next, window, 0)
    }

    fn fetch_backward(&mut self, window: &mut Window) -> Result<()> {
        match self.current {
            Some(index) if index > 0 => self.install_page(index - 1, window, 0),
            _ => {
                self.current = None;
                window.clear();
                Ok(())
            }
        }
    }

    fn fetch_at(&mut self, offset: u64, window: &mut Window) -> Option<Result<()>> {
        assert!(offset <= self.size, "reset past end of paged source");
        let index = offset / self.page_size as u64;
        if index >= self.page_count() {
            self.park_at_end(window);
            return Some(Ok(()));
        }
        let skip = (offset - index * self.page_size as u64) as usize;
        Some(self.install_page(index, window, skip))
    }

    fn describe(&self) -> String {
        format!("paged[{} x {} bytes]", self.page_count(), self.page_size)
    }
}
