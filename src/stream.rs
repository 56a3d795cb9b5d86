//! Byte-stream ports backing the tape devices.
//!
//! A port is a seekable byte channel viewed through the capability-limited
//! interface a tape needs: positioned reads, positioned writes, zero-filled
//! growth and cursor repositioning. Two backends are provided — a growable
//! in-memory buffer and a regular file — plus adapters that mask a
//! bidirectional backend down to a single capability.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::TapeError;

/// Common surface of every byte-stream port.
///
/// The capability constants are part of the static contract: a tape built
/// over a stream inherits them, and the sort engine selects tapes by
/// bounding on [`ReadStream`] / [`WriteStream`] so that misuse is rejected
/// at compile time.
pub trait Stream {
    /// Whether positioned reads are available ([`ReadStream`] is implemented).
    const READABLE: bool;
    /// Whether positioned writes are available ([`WriteStream`] is implemented).
    const WRITABLE: bool;

    /// Current length of the backing storage in bytes.
    fn byte_len(&mut self) -> Result<u64, TapeError>;

    /// Grows the backing storage with zero bytes until it holds at least
    /// `byte_len` bytes. Never shrinks. Only invoked on streams whose
    /// `WRITABLE` is `true`; read-only adapters implement it as a no-op.
    fn extend_with_zeros_to(&mut self, byte_len: u64) -> Result<(), TapeError>;

    /// Moves the stream's read and write cursors to the absolute byte
    /// `offset`. Backends without cursor state accept any offset.
    fn seek_to(&mut self, offset: u64) -> Result<(), TapeError>;
}

/// Read half of a port.
pub trait ReadStream: Stream {
    /// Reads up to `buf.len()` bytes at the absolute byte `offset`.
    /// A short (possibly zero) count at end-of-stream is not an error.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, TapeError>;
}

/// Write half of a port.
pub trait WriteStream: Stream {
    /// Writes all of `buf` at the absolute byte `offset`, growing the
    /// backing storage if the write lands past its end.
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<(), TapeError>;

    /// Flushes buffered data to the backing medium.
    fn flush(&mut self) -> Result<(), TapeError>;
}

/// Growable in-memory byte buffer, the memory twin of [`FileStream`].
#[derive(Debug, Default)]
pub struct MemStream {
    data: Vec<u8>,
}

impl MemStream {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        MemStream::default()
    }

    /// Wraps existing bytes.
    pub fn from_vec(data: Vec<u8>) -> Self {
        MemStream { data }
    }

    /// Returns the underlying bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Borrows the underlying bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Stream for MemStream {
    const READABLE: bool = true;
    const WRITABLE: bool = true;

    fn byte_len(&mut self) -> Result<u64, TapeError> {
        Ok(self.data.len() as u64)
    }

    fn extend_with_zeros_to(&mut self, byte_len: u64) -> Result<(), TapeError> {
        if (self.data.len() as u64) < byte_len {
            self.data.resize(byte_len as usize, 0);
        }
        Ok(())
    }

    fn seek_to(&mut self, _offset: u64) -> Result<(), TapeError> {
        // positioned I/O keeps no cursor state
        Ok(())
    }
}

impl ReadStream for MemStream {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, TapeError> {
        let len = self.data.len() as u64;
        if offset >= len {
            return Ok(0);
        }
        let available = (len - offset) as usize;
        let count = buf.len().min(available);
        let start = offset as usize;
        buf[..count].copy_from_slice(&self.data[start..start + count]);
        Ok(count)
    }
}

impl WriteStream for MemStream {
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<(), TapeError> {
        let end = offset + buf.len() as u64;
        if (self.data.len() as u64) < end {
            self.data.resize(end as usize, 0);
        }
        let start = offset as usize;
        self.data[start..start + buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TapeError> {
        Ok(())
    }
}

/// Regular-file port.
///
/// Reads and writes go through an explicit absolute seek followed by the
/// transfer, so positioning failures surface as [`TapeError::Seek`] and
/// transfer failures as [`TapeError::Io`] — the two planes the tape layer
/// propagates unchanged.
#[derive(Debug)]
pub struct FileStream {
    file: File,
}

impl FileStream {
    /// Opens an existing file for reading only.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(FileStream { file: File::open(path)? })
    }

    /// Creates (or truncates) a file for writing only.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(FileStream { file: File::create(path)? })
    }

    /// Opens a file for reading and writing, creating it if absent.
    pub fn open_rw<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).create(true).open(path)?;
        Ok(FileStream { file })
    }

    /// Wraps an already-open file.
    pub fn from_file(file: File) -> Self {
        FileStream { file }
    }

    /// Returns the underlying file.
    pub fn into_file(self) -> File {
        self.file
    }
}

impl Stream for FileStream {
    const READABLE: bool = true;
    const WRITABLE: bool = true;

    fn byte_len(&mut self) -> Result<u64, TapeError> {
        let meta = self.file.metadata().map_err(TapeError::Io)?;
        Ok(meta.len())
    }

    fn extend_with_zeros_to(&mut self, byte_len: u64) -> Result<(), TapeError> {
        let current = self.byte_len()?;
        if current < byte_len {
            self.file.set_len(byte_len).map_err(TapeError::Io)?;
        }
        Ok(())
    }

    fn seek_to(&mut self, offset: u64) -> Result<(), TapeError> {
        self.file.seek(SeekFrom::Start(offset)).map_err(TapeError::Seek)?;
        Ok(())
    }
}

impl ReadStream for FileStream {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, TapeError> {
        self.file.seek(SeekFrom::Start(offset)).map_err(TapeError::Seek)?;

        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(count) => filled += count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(TapeError::Io(err)),
            }
        }
        Ok(filled)
    }
}

impl WriteStream for FileStream {
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<(), TapeError> {
        self.file.seek(SeekFrom::Start(offset)).map_err(TapeError::Seek)?;
        self.file.write_all(buf).map_err(TapeError::Io)
    }

    fn flush(&mut self) -> Result<(), TapeError> {
        self.file.flush().map_err(TapeError::Io)
    }
}

/// Masks a bidirectional stream down to its read capability.
#[derive(Debug)]
pub struct ReadOnly<S>(S);

impl<S: ReadStream> ReadOnly<S> {
    /// Restricts `stream` to positioned reads.
    pub fn new(stream: S) -> Self {
        ReadOnly(stream)
    }

    /// Returns the unrestricted stream.
    pub fn into_inner(self) -> S {
        self.0
    }
}

impl<S: ReadStream> Stream for ReadOnly<S> {
    const READABLE: bool = true;
    const WRITABLE: bool = false;

    fn byte_len(&mut self) -> Result<u64, TapeError> {
        self.0.byte_len()
    }

    fn extend_with_zeros_to(&mut self, _byte_len: u64) -> Result<(), TapeError> {
        // never invoked: WRITABLE is false
        Ok(())
    }

    fn seek_to(&mut self, offset: u64) -> Result<(), TapeError> {
        self.0.seek_to(offset)
    }
}

impl<S: ReadStream> ReadStream for ReadOnly<S> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, TapeError> {
        self.0.read_at(offset, buf)
    }
}

/// Masks a bidirectional stream down to its write capability.
#[derive(Debug)]
pub struct WriteOnly<S>(S);

impl<S: WriteStream> WriteOnly<S> {
    /// Restricts `stream` to positioned writes.
    pub fn new(stream: S) -> Self {
        WriteOnly(stream)
    }

    /// Returns the unrestricted stream.
    pub fn into_inner(self) -> S {
        self.0
    }
}

impl<S: WriteStream> Stream for WriteOnly<S> {
    const READABLE: bool = false;
    const WRITABLE: bool = true;

    fn byte_len(&mut self) -> Result<u64, TapeError> {
        self.0.byte_len()
    }

    fn extend_with_zeros_to(&mut self, byte_len: u64) -> Result<(), TapeError> {
        self.0.extend_with_zeros_to(byte_len)
    }

    fn seek_to(&mut self, offset: u64) -> Result<(), TapeError> {
        self.0.seek_to(offset)
    }
}

impl<S: WriteStream> WriteStream for WriteOnly<S> {
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<(), TapeError> {
        self.0.write_at(offset, buf)
    }

    fn flush(&mut self) -> Result<(), TapeError> {
        self.0.flush()
    }
}

#[cfg(test)]
mod test {
    use super::{FileStream, MemStream, ReadOnly, ReadStream, Stream, WriteOnly, WriteStream};

    #[test]
    fn test_mem_stream_read_write() {
        let mut stream = MemStream::new();
        stream.write_at(0, &[1, 2, 3, 4]).unwrap();
        stream.write_at(2, &[9, 9]).unwrap();

        let mut buf = [0u8; 4];
        let count = stream.read_at(0, &mut buf).unwrap();
        assert_eq!(count, 4);
        assert_eq!(buf, [1, 2, 9, 9]);
    }

    #[test]
    fn test_mem_stream_short_read_at_end() {
        let mut stream = MemStream::from_vec(vec![7, 8]);

        let mut buf = [0u8; 4];
        assert_eq!(stream.read_at(0, &mut buf).unwrap(), 2);
        assert_eq!(stream.read_at(2, &mut buf).unwrap(), 0);
        assert_eq!(stream.read_at(100, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_mem_stream_write_past_end_grows() {
        let mut stream = MemStream::new();
        stream.write_at(4, &[5]).unwrap();
        assert_eq!(stream.as_slice(), &[0, 0, 0, 0, 5]);
    }

    #[test]
    fn test_mem_stream_extension_never_shrinks() {
        let mut stream = MemStream::from_vec(vec![1; 8]);
        stream.extend_with_zeros_to(4).unwrap();
        assert_eq!(stream.byte_len().unwrap(), 8);

        stream.extend_with_zeros_to(12).unwrap();
        assert_eq!(stream.byte_len().unwrap(), 12);
        assert_eq!(&stream.as_slice()[8..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_file_stream_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stream.bin");

        let mut stream = FileStream::open_rw(&path).unwrap();
        stream.write_at(0, &[10, 20, 30]).unwrap();
        stream.write_at(1, &[99]).unwrap();
        stream.flush().unwrap();

        let mut buf = [0u8; 3];
        assert_eq!(stream.read_at(0, &mut buf).unwrap(), 3);
        assert_eq!(buf, [10, 99, 30]);
    }

    #[test]
    fn test_file_stream_extension_zero_fills() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grow.bin");

        let mut stream = FileStream::open_rw(&path).unwrap();
        stream.write_at(0, &[1]).unwrap();
        stream.extend_with_zeros_to(6).unwrap();
        assert_eq!(stream.byte_len().unwrap(), 6);

        let mut buf = [0xffu8; 6];
        assert_eq!(stream.read_at(0, &mut buf).unwrap(), 6);
        assert_eq!(buf, [1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_file_stream_short_read_at_eof() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eof.bin");

        let mut stream = FileStream::open_rw(&path).unwrap();
        stream.write_at(0, &[1, 2]).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(stream.read_at(0, &mut buf).unwrap(), 2);
        assert_eq!(stream.read_at(10, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_capability_masks() {
        assert!(MemStream::READABLE && MemStream::WRITABLE);
        assert!(FileStream::READABLE && FileStream::WRITABLE);

        assert!(ReadOnly::<MemStream>::READABLE);
        assert!(!ReadOnly::<MemStream>::WRITABLE);
        assert!(!WriteOnly::<MemStream>::READABLE);
        assert!(WriteOnly::<MemStream>::WRITABLE);
    }

    #[test]
    fn test_adapters_pass_through() {
        let mut reader = ReadOnly::new(MemStream::from_vec(vec![1, 2, 3]));
        let mut buf = [0u8; 3];
        assert_eq!(reader.read_at(0, &mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);

        let mut writer = WriteOnly::new(MemStream::new());
        writer.write_at(0, &[4, 5]).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner().into_inner(), vec![4, 5]);
    }
}
