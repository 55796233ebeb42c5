use thiserror::Error;

/// Result type used throughout bytewin.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by streams and their sources.
///
/// End-of-stream is never an error: it is reported as a zero-length read or a
/// `None` read pointer.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying medium failed while a window was being fetched.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source cannot perform the requested operation (e.g. a backward
    /// fetch on a forward-only source).
    #[error("operation not supported by this source: {operation}")]
    Unsupported { operation: &'static str },

    /// A remote medium answered with something other than the requested bytes.
    #[error("remote medium error: {0}")]
    Remote(String),

    /// A failed seek or reset left the stream without a known position and
    /// the source could not restore it. Every read and seek fails with this
    /// until a reset through the source's direct addressing succeeds.
    #[error("stream position lost at offset {offset}, reset to a marker to continue")]
    Desynchronized { offset: u64 },
}

impl Error {
    pub fn unsupported(operation: &'static str) -> Self {
        Error::Unsupported { operation }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Remote(err.to_string())
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::Unsupported { .. } => {
                std::io::Error::new(std::io::ErrorKind::Unsupported, err.to_string())
            }
            Error::Remote(msg) => std::io::Error::other(msg),
            Error::Desynchronized { .. } => std::io::Error::other(err.to_string()),
        }
    }
}
