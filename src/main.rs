//! Main entry point for the bytewin CLI application.
//!
//! Opens a local file or HTTP URL as a paged source, skips to the requested
//! offset and dumps a byte range in the chosen format.

use anyhow::{Result, anyhow};
use clap::Parser;
use log::debug;
use std::io::{self, Write};
use std::path::Path;

use bytewin::dump::{HexDumper, dump_le_integers, for_each_window};
use bytewin::{Cli, Format, HttpRangeReader, InputStream, LocalFileReader, PagedSource, ReadAt};

/// Application entry point.
///
/// Parses command-line arguments, sets up logging and dispatches on whether
/// the input is a local file or HTTP URL.
fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    if cli.is_http_url() {
        let reader = HttpRangeReader::new(cli.file.clone())?.with_max_retry(cli.retries);
        debug!("{}: up to {} attempts per range", reader.url(), cli.retries);
        let stream = dump(reader, &cli)?;

        // Display network transfer statistics for HTTP sources
        if !cli.is_quiet() {
            let transferred = stream.source().medium().transferred_bytes();
            eprintln!("Total bytes transferred: {}", format_size(transferred));
        }
    } else {
        let reader = LocalFileReader::new(Path::new(&cli.file))?;
        dump(reader, &cli)?;
    }

    Ok(())
}

/// Dump the range selected by `cli` from `medium`.
///
/// Returns the stream so callers can inspect the source afterwards.
fn dump<R: ReadAt>(medium: R, cli: &Cli) -> Result<InputStream<PagedSource<R>>> {
    let size = medium.size();
    let length = cli.span(size).map_err(|e| anyhow!(e))?;
    debug!(
        "{}: {} bytes, dumping {} from offset {}",
        cli.file, size, length, cli.skip
    );

    let mut stream = InputStream::new(PagedSource::with_page_size(medium, cli.page_size));
    stream.seek_forward(cli.skip)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let dumped = match cli.format {
        Format::Hex => {
            let mut dumper = HexDumper::new(&mut out, cli.skip);
            let n = for_each_window(&mut stream, length, |w| dumper.push(w))?;
            dumper.finish()?;
            n
        }
        Format::Raw => for_each_window(&mut stream, length, |w| out.write_all(w))?,
        Format::U32le => {
            dump_le_integers(&mut stream, 4, length / 4, &mut out)?;
            length / 4 * 4
        }
        Format::U64le => {
            dump_le_integers(&mut stream, 8, length / 8, &mut out)?;
            length / 8 * 8
        }
    };
    out.flush()?;

    if !cli.is_quiet() {
        eprintln!(
            "{} dumped, {} pages read",
            format_size(dumped),
            stream.source().pages_read()
        );
    }

    Ok(stream)
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
