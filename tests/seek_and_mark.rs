use bytewin::{
    ByteInput, Error, InputStream, LocalFileReader, MemorySource, PagedSource, ReadAt,
    ReaderSource, Result, Source, Window,
};
use rstest::rstest;
use std::cell::Cell;
use std::io::{Cursor, Write};

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn next_bytes<S: Source>(stream: &mut InputStream<S>, n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    let got = stream.read_bytes(&mut buf).unwrap();
    buf.truncate(got);
    buf
}

/// Backward-capable source without direct addressing, so resets must replay.
struct Sequential<S>(S);

impl<S: Source> Source for Sequential<S> {
    fn buffer(&self) -> &[u8] {
        self.0.buffer()
    }

    fn fetch_forward(&mut self, window: &mut Window) -> Result<()> {
        self.0.fetch_forward(window)
    }

    fn fetch_backward(&mut self, window: &mut Window) -> Result<()> {
        self.0.fetch_backward(window)
    }
}

#[rstest]
#[case(0, 1)]
#[case(3, 20)]
#[case(10, 50)]
#[case(63, 37)]
fn mark_read_reset_round_trip(#[case] start: u64, #[case] k: usize) {
    let data = sample(100);
    let mut memory = InputStream::new(MemorySource::with_chunk_size(data.clone(), 8));
    let mut sequential =
        InputStream::new(Sequential(MemorySource::with_chunk_size(data.clone(), 8)));
    let mut paged = InputStream::new(PagedSource::with_page_size(data.clone(), 16));

    for stream in [&mut memory as &mut dyn Walk, &mut sequential, &mut paged] {
        stream.seek_to(start);
        let before = stream.peek(10);

        let mut marker = stream.marker();
        stream.mark_here(&mut marker);
        stream.skip(k);
        stream.reset_to(&marker);

        assert_eq!(stream.position(), start);
        assert_eq!(stream.peek(10), before);
    }
}

/// Object-safe view of the streams under test.
trait Walk {
    fn seek_to(&mut self, offset: u64);
    fn peek(&mut self, n: usize) -> Vec<u8>;
    fn skip(&mut self, n: usize);
    fn marker(&self) -> bytewin::Marker;
    fn mark_here(&self, marker: &mut bytewin::Marker);
    fn reset_to(&mut self, marker: &bytewin::Marker);
    fn position(&self) -> u64;
}

impl<S: Source> Walk for InputStream<S> {
    fn seek_to(&mut self, offset: u64) {
        self.seek_forward(offset).unwrap();
    }

    /// Read `n` bytes and step back over them.
    fn peek(&mut self, n: usize) -> Vec<u8> {
        let bytes = next_bytes(self, n);
        self.seek_backward(bytes.len() as u64).unwrap();
        bytes
    }

    fn skip(&mut self, n: usize) {
        assert_eq!(next_bytes(self, n).len(), n);
    }

    fn marker(&self) -> bytewin::Marker {
        self.new_marker()
    }

    fn mark_here(&self, marker: &mut bytewin::Marker) {
        self.mark(marker)
    }

    fn reset_to(&mut self, marker: &bytewin::Marker) {
        self.reset(marker).unwrap()
    }

    fn position(&self) -> u64 {
        self.offset()
    }
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(8)]
#[case(9)]
#[case(40)]
fn seek_forward_then_backward_restores_position(#[case] count: u64) {
    let data = sample(64);
    let mut stream = InputStream::new(MemorySource::with_chunk_size(data.clone(), 8));
    stream.seek_forward(5).unwrap();
    stream.seek_forward(count).unwrap();
    stream.seek_backward(count).unwrap();
    assert_eq!(stream.offset(), 5);
    assert_eq!(next_bytes(&mut stream, 12), data[5..17].to_vec());
}

#[test]
fn seek_backward_from_end_of_stream() {
    let data = sample(20);
    let mut stream = InputStream::new(PagedSource::with_page_size(data.clone(), 6));
    stream.seek_forward(20).unwrap();
    assert!(stream.read_pointer(1).unwrap().is_none());
    stream.seek_backward(9).unwrap();
    assert_eq!(stream.offset(), 11);
    assert_eq!(next_bytes(&mut stream, 100), data[11..].to_vec());
}

#[test]
fn seek_backward_to_start() {
    let data = sample(30);
    let mut stream =
        InputStream::new(Sequential(MemorySource::with_chunk_size(data.clone(), 4)));
    stream.seek_forward(30).unwrap();
    stream.seek_backward(30).unwrap();
    assert_eq!(stream.offset(), 0);
    assert_eq!(next_bytes(&mut stream, 30), data);
}

#[test]
fn forward_only_backend_rejects_backward_seek() {
    let mut stream = InputStream::new(ReaderSource::with_capacity(4, Cursor::new(sample(16))));
    stream.seek_forward(4).unwrap();
    // the next read pulls in a fresh window, dropping the consumed one
    next_bytes(&mut stream, 1);

    let err = stream.seek_backward(2).unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));
    assert_eq!(stream.offset(), 5);
    assert_eq!(next_bytes(&mut stream, 1), vec![5]);
}

#[test]
fn sequential_reset_replays_forward_across_windows() {
    let data = sample(80);
    let mut stream =
        InputStream::new(Sequential(MemorySource::with_chunk_size(data.clone(), 8)));
    stream.seek_forward(50).unwrap();
    let mut marker = stream.new_marker();
    stream.mark(&mut marker);

    stream.seek_backward(45).unwrap();
    let fetches = stream.fetches();
    stream.reset(&marker).unwrap();

    assert_eq!(stream.offset(), 50);
    assert!(stream.fetches() > fetches);
    assert_eq!(next_bytes(&mut stream, 3), data[50..53].to_vec());
}

#[test]
fn paged_reset_is_addressed() {
    let data = sample(4096);
    let mut stream = InputStream::new(PagedSource::with_page_size(data.clone(), 256));
    stream.seek_forward(300).unwrap();
    let mut marker = stream.new_marker();
    stream.mark(&mut marker);

    stream.seek_forward(3000).unwrap();
    let fetches = stream.fetches();
    stream.reset(&marker).unwrap();

    assert_eq!(stream.fetches(), fetches + 1);
    assert_eq!(stream.offset(), 300);
    assert_eq!(stream.bytes_consumed(), 300 - 256);
    assert_eq!(next_bytes(&mut stream, 4), data[300..304].to_vec());
}

#[test]
fn page_file_on_disk() {
    let data = sample(10_000);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();
    file.flush().unwrap();

    let reader = LocalFileReader::new(file.path()).unwrap();
    let mut stream = InputStream::new(PagedSource::with_page_size(reader, 1024));

    stream.seek_forward(1500).unwrap();
    let mut marker = stream.new_marker();
    stream.mark(&mut marker);
    assert_eq!(next_bytes(&mut stream, 2000), data[1500..3500].to_vec());

    stream.reset(&marker).unwrap();
    let window = stream.read_pointer(1).unwrap().unwrap();
    assert_eq!(window, &data[1500..2048]);

    stream.seek_forward(8500).unwrap();
    assert_eq!(next_bytes(&mut stream, 10), Vec::<u8>::new());
    // pages 0-3, page 1 again for the reset, then pages 2-9
    assert_eq!(stream.source().pages_read(), 13);
}

/// Sixteen byte medium that fails once when read at an armed offset.
struct BadSector {
    data: Vec<u8>,
    fail_at: Cell<Option<u64>>,
}

impl BadSector {
    fn new() -> Self {
        Self {
            data: (0..16).collect(),
            fail_at: Cell::new(None),
        }
    }
}

impl ReadAt for BadSector {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if self.fail_at.get() == Some(offset) {
            self.fail_at.set(None);
            return Err(std::io::Error::other("bad sector").into());
        }
        self.data.read_at(offset, buf)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[test]
fn failed_backward_seek_keeps_position() {
    let medium = BadSector::new();
    let mut stream = InputStream::new(PagedSource::with_page_size(&medium, 4));
    stream.seek_forward(14).unwrap();

    medium.fail_at.set(Some(4));
    let err = stream.seek_backward(10).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(stream.offset(), 14);
    assert_eq!(next_bytes(&mut stream, 2), vec![14, 15]);

    stream.seek_backward(10).unwrap();
    assert_eq!(stream.offset(), 6);
    assert_eq!(next_bytes(&mut stream, 3), vec![6, 7, 8]);
}

#[test]
fn failed_addressed_reset_keeps_position() {
    let medium = BadSector::new();
    let mut stream = InputStream::new(PagedSource::with_page_size(&medium, 4));
    stream.seek_forward(5).unwrap();
    let mut marker = stream.new_marker();
    stream.mark(&mut marker);
    stream.seek_forward(8).unwrap();

    medium.fail_at.set(Some(4));
    let err = stream.reset(&marker).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(stream.offset(), 13);
    assert_eq!(next_bytes(&mut stream, 3), vec![13, 14, 15]);

    stream.reset(&marker).unwrap();
    assert_eq!(next_bytes(&mut stream, 2), vec![5, 6]);
}

#[test]
fn unaddressable_stream_stays_failed_after_broken_seek() {
    let medium = BadSector::new();
    let mut stream = InputStream::new(Sequential(PagedSource::with_page_size(&medium, 4)));
    let mut marker = stream.new_marker();
    stream.mark(&mut marker);
    stream.seek_forward(14).unwrap();

    medium.fail_at.set(Some(4));
    assert!(matches!(stream.seek_backward(10), Err(Error::Io(_))));
    assert_eq!(stream.offset(), 14);

    let mut buf = [0u8; 2];
    assert!(matches!(
        stream.read_bytes(&mut buf),
        Err(Error::Desynchronized { offset: 14 })
    ));
    assert!(stream.read_pointer(1).is_err());
    assert!(stream.seek_forward(1).is_err());
    assert!(stream.seek_backward(1).is_err());
    assert!(matches!(
        stream.reset(&marker),
        Err(Error::Desynchronized { .. })
    ));
}

#[test]
#[should_panic(expected = "unmarked")]
fn reset_before_mark_is_a_contract_violation() {
    let mut stream = InputStream::new(MemorySource::new(sample(8)));
    let marker = stream.new_marker();
    let _ = stream.reset(&marker);
}

#[test]
#[should_panic(expected = "foreign stream")]
fn markers_do_not_travel_between_streams() {
    let mut a = InputStream::new(MemorySource::new(sample(8)));
    let b = InputStream::new(MemorySource::new(sample(8)));
    let mut marker = b.new_marker();
    b.mark(&mut marker);
    let _ = a.reset(&marker);
}
