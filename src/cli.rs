use clap::{Parser, ValueEnum};

use crate::source::DEFAULT_PAGE_SIZE;

/// How `bytewin` prints the bytes it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Offset, hex bytes and printable ASCII, 16 bytes per line
    Hex,
    /// Bytes written unchanged to stdout
    Raw,
    /// Little-endian unsigned 32-bit integers, one per line
    U32le,
    /// Little-endian unsigned 64-bit integers, one per line
    U64le,
}

#[derive(Parser, Debug)]
#[command(name = "bytewin")]
#[command(version)]
#[command(
    about = "Dump a byte range of a file or HTTP URL through a paged input stream",
    long_about = None
)]
#[command(after_help = "Examples:\n  \
  bytewin data.bin -s 4096 -n 64          hex dump 64 bytes starting at offset 4096\n  \
  bytewin -f raw data.bin -s 10 | xxd      copy bytes from offset 10 onwards to stdout\n  \
  bytewin -f u32le https://example.com/index.bin -n 16   decode four integers from a remote file")]
pub struct Cli {
    /// File path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Page size used to read the input
    #[arg(short = 'p', long, value_name = "BYTES", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Bytes to skip before dumping
    #[arg(short = 's', long, value_name = "BYTES", default_value_t = 0)]
    pub skip: u64,

    /// Bytes to dump (default: to the end of the input)
    #[arg(short = 'n', long, value_name = "BYTES")]
    pub length: Option<u64>,

    /// Attempts per HTTP range request before giving up
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub retries: u32,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Hex)]
    pub format: Format,

    /// More log output (-v => debug, -vv => trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode, no summary
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet || self.format == Format::Raw
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Number of bytes to dump from an input of `size` bytes, or an error
    /// message when the options do not fit the input.
    pub fn span(&self, size: u64) -> Result<u64, String> {
        if self.page_size == 0 {
            return Err("page size must be positive".to_string());
        }
        if self.skip > size {
            return Err(format!(
                "cannot skip {} bytes, input is only {} bytes",
                self.skip, size
            ));
        }
        let rest = size - self.skip;
        Ok(self.length.map_or(rest, |n| n.min(rest)))
    }
}
