//! Output formats for the `bytewin` binary.

use std::io::{self, Write};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::Result;
use crate::stream::{InputStream, Source};

const BYTES_PER_LINE: usize = 16;

/// Classic `offset  hex  |ascii|` dump, fed in arbitrary pieces.
///
/// Pieces may end anywhere; a partial line is carried over until the next
/// call to [`push`](HexDumper::push) or [`finish`](HexDumper::finish).
pub struct HexDumper<W: Write> {
    out: W,
    offset: u64,
    line: Vec<u8>,
}

impl<W: Write> HexDumper<W> {
    /// `offset` is the stream offset of the first byte pushed.
    pub fn new(out: W, offset: u64) -> Self {
        Self {
            out,
            offset,
            line: Vec::with_capacity(BYTES_PER_LINE),
        }
    }

    pub fn push(&mut self, mut bytes: &[u8]) -> io::Result<()> {
        while !bytes.is_empty() {
            let take = (BYTES_PER_LINE - self.line.len()).min(bytes.len());
            self.line.extend_from_slice(&bytes[..take]);
            bytes = &bytes[take..];
            if self.line.len() == BYTES_PER_LINE {
                self.flush_line()?;
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<W> {
        if !self.line.is_empty() {
            self.flush_line()?;
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn flush_line(&mut self) -> io::Result<()> {
        write!(self.out, "{:08x} ", self.offset)?;
        for i in 0..BYTES_PER_LINE {
            if i == BYTES_PER_LINE / 2 {
                write!(self.out, " ")?;
            }
            match self.line.get(i) {
                Some(b) => write!(self.out, " {:02x}", b)?,
                None => write!(self.out, "   ")?,
            }
        }
        let ascii: String = self
            .line
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        writeln!(self.out, "  |{}|", ascii)?;
        self.offset += self.line.len() as u64;
        self.line.clear();
        Ok(())
    }
}

/// Walk up to `length` bytes of `stream` window by window, without copying
/// them out of the source, handing each piece to `visit`.
///
/// Returns the number of bytes visited, short only at end-of-stream.
pub fn for_each_window<S, F>(stream: &mut InputStream<S>, length: u64, mut visit: F) -> Result<u64>
where
    S: Source,
    F: FnMut(&[u8]) -> io::Result<()>,
{
    let mut remaining = length;
    while remaining > 0 {
        let Some(window) = stream.read_pointer(0)? else {
            break;
        };
        let take = (window.len() as u64).min(remaining) as usize;
        visit(&window[..take])?;
        stream.consume_read_pointer(take);
        remaining -= take as u64;
    }
    Ok(length - remaining)
}

/// Decode `count` little-endian integers of `width` bytes (4 or 8), one per
/// line, prefixed with their stream offset.
pub fn dump_le_integers<S, W>(
    stream: &mut InputStream<S>,
    width: usize,
    count: u64,
    out: &mut W,
) -> io::Result<()>
where
    S: Source,
    W: Write,
{
    for _ in 0..count {
        let offset = stream.offset();
        match width {
            4 => writeln!(out, "{:08x}  {}", offset, stream.read_u32::<LittleEndian>()?)?,
            8 => writeln!(out, "{:08x}  {}", offset, stream.read_u64::<LittleEndian>()?)?,
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("unsupported integer width {width}"),
                ));
            }
        }
    }
    Ok(())
}
