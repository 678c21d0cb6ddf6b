use std::io::{self, Read, Seek, SeekFrom};

/// Reader wrapper that fails once a fixed number of bytes has been read.
///
/// Parsing has no timeouts and no cap on chain length of its own. Wrapping
/// the source in a `BudgetedReader` bounds the total work a hostile file can
/// cause. Seeks are free and delegated untouched.
#[derive(Debug)]
pub struct BudgetedReader<R> {
    inner: R,
    remaining: u64,
}

impl<R> BudgetedReader<R> {
    pub fn new(inner: R, budget: u64) -> Self {
        Self {
            inner,
            remaining: budget,
        }
    }

    /// Bytes that may still be read.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

}

impl<R: Read> Read for BudgetedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.remaining == 0 {
            return Err(io::Error::other("read budget exhausted"));
        }
        let max = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        let n = self.inner.read(&mut buf[..max])?;
        self.remaining -= n as u64;
        Ok(n)
    }
}

impl<R: Seek> Seek for BudgetedReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }

    // The default goes through `seek(Current(0))`, which makes a wrapped
    // `BufReader` drop its buffer.
    fn stream_position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }
}
