use super::Window;
use crate::error::{Error, Result};

/// Trait for a medium that supplies an [`InputStream`](super::InputStream)
/// with windows of bytes.
///
/// A fetch must finish by either installing a new window or clearing it (end
/// of stream); it must never hand back the window that was just exhausted.
/// A fetch that fails should leave the window and the buffer as they were.
/// Window indices refer to the slice returned by [`buffer`](Source::buffer),
/// which may be overwritten by the next fetch.
pub trait Source {
    /// The bytes the current window indexes into.
    fn buffer(&self) -> &[u8];

    /// Install the window that follows the current one, or clear the window
    /// at end-of-stream.
    fn fetch_forward(&mut self, window: &mut Window) -> Result<()>;

    /// Install the window that precedes the current one, cursor at its start.
    ///
    /// Forward-only sources keep the default, which reports
    /// [`Error::Unsupported`] without touching the window.
    fn fetch_backward(&mut self, window: &mut Window) -> Result<()> {
        let _ = window;
        Err(Error::unsupported("fetch_backward"))
    }

    /// Install a window whose cursor sits at absolute stream `offset`.
    ///
    /// Returns `None` when the source has no direct addressing, in which case
    /// marker resets replay the stream sequentially instead.
    fn fetch_at(&mut self, offset: u64, window: &mut Window) -> Option<Result<()>> {
        let _ = (offset, window);
        None
    }

    /// Short human-readable name, used in log lines.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn buffer(&self) -> &[u8] {
        (**self).buffer()
    }

    fn fetch_forward(&mut self, window: &mut Window) -> Result<()> {
        (**self).fetch_forward(window)
    }

    fn fetch_backward(&mut self, window: &mut Window) -> Result<()> {
        (**self).fetch_backward(window)
    }

    fn fetch_at(&mut self, offset: u64, window: &mut Window) -> Option<Result<()>> {
        (**self).fetch_at(offset, window)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
