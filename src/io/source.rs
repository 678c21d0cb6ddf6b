use std::io::{self, Read, Seek, SeekFrom};

use crate::error::IoError;
use crate::format::tiff::ByteOrder;

/// Seekable byte source used while walking a TIFF file.
///
/// Wraps any `Read + Seek` and reports failures as [`IoError`], keeping
/// short reads distinct from hard I/O errors. The stream length is measured
/// once up front so out-of-line reads can be bounds-checked before anything
/// is allocated.
///
/// The cursor is tracked here rather than queried from the reader, so a
/// field read never turns into a seek on the underlying stream.
///
/// Seek-then-read sequences are not atomic. A source must not be shared
/// with another reader while a parse is running.
pub struct TiffSource<R> {
    inner: R,
    len: u64,
    pos: u64,
}

impl<R: Read + Seek> TiffSource<R> {
    /// Wrap a reader, measuring its length and restoring the cursor.
    pub fn new(mut inner: R) -> Result<Self, IoError> {
        let start = inner.stream_position().map_err(|e| IoError::Seek {
            offset: 0,
            message: e.to_string(),
        })?;
        let len = inner.seek(SeekFrom::End(0)).map_err(|e| IoError::Seek {
            offset: 0,
            message: e.to_string(),
        })?;
        inner
            .seek(SeekFrom::Start(start))
            .map_err(|e| IoError::Seek {
                offset: start,
                message: e.to_string(),
            })?;
        Ok(Self {
            inner,
            len,
            pos: start,
        })
    }

    /// Current absolute cursor position.
    ///
    /// After a failed read this is the offset the read started at.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Seek to an absolute offset.
    pub fn seek_to(&mut self, offset: u64) -> Result<(), IoError> {
        self.inner
            .seek(SeekFrom::Start(offset))
            .map_err(|e| IoError::Seek {
                offset,
                message: e.to_string(),
            })?;
        self.pos = offset;
        Ok(())
    }

    /// Fill `buf` from the current position.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        let offset = self.pos;
        self.inner
            .read_exact(buf)
            .map_err(|e| map_read_error(e, offset, buf.len()))?;
        self.pos = offset + buf.len() as u64;
        Ok(())
    }

    /// Read `N` bytes from the current position.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], IoError> {
        let mut buf = [0u8; N];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Read an unsigned integer of `width` bytes (1, 2, 4 or 8) stored in
    /// `byte_order`.
    pub fn read_uint(&mut self, width: usize, byte_order: ByteOrder) -> Result<u64, IoError> {
        let mut buf = [0u8; 8];
        let field = &mut buf[..width];
        self.read_into(field)?;
        Ok(byte_order.read_uint(field))
    }

    /// Read `len` bytes at `offset`, restoring the cursor afterwards.
    ///
    /// The range is checked against the stream length first, so an absurd
    /// length fails with [`IoError::UnexpectedEof`] without allocating.
    pub fn read_at(&mut self, offset: u64, len: u64) -> Result<Vec<u8>, IoError> {
        let end = offset.checked_add(len);
        if end.map_or(true, |end| end > self.len) {
            return Err(IoError::UnexpectedEof {
                offset,
                requested: len,
            });
        }
        let size = usize::try_from(len).map_err(|_| IoError::UnexpectedEof {
            offset,
            requested: len,
        })?;

        let saved = self.pos;
        self.seek_to(offset)?;
        let mut buf = vec![0u8; size];
        let result = self.read_into(&mut buf);
        self.seek_to(saved)?;
        result.map(|()| buf)
    }
}

fn map_read_error(err: io::Error, offset: u64, requested: usize) -> IoError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        IoError::UnexpectedEof {
            offset,
            requested: requested as u64,
        }
    } else {
        IoError::Read {
            offset,
            message: err.to_string(),
        }
    }
}
