use std::{
    fmt,
    fs::File,
    io::{self, Read, Seek, SeekFrom, Write},
};

use crate::Result;

pub trait ReadSeek: Read + Seek + Send {}
impl<T: Read + Seek + Send> ReadSeek for T {}

/// A readable, seekable handle on a file of the search path.
pub struct ReadStream {
    inner: Box<dyn ReadSeek>,
    length: u64,
}

impl ReadStream {
    #[must_use]
    pub fn new<R>(inner: R, length: u64) -> Self
    where
        R: ReadSeek + 'static,
    {
        Self {
            inner: Box::new(inner),
            length,
        }
    }

    /// Length of the file in bytes
    #[must_use]
    pub fn len(&self) -> u64 {
        self.length
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the current read offset
    ///
    /// # Errors
    ///
    /// Will return an error if the underlying reader cannot report its position
    pub fn tell(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Checks whether the read offset reached the end of the file
    ///
    /// # Errors
    ///
    /// Will return an error if the underlying reader cannot report its position
    pub fn eof(&mut self) -> Result<bool> {
        Ok(self.tell()? >= self.length)
    }

    /// Reads the remaining content of the stream
    ///
    /// # Errors
    ///
    /// Will return an error if the underlying reader fails
    pub fn read_all(mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(usize::try_from(self.length).unwrap_or(0));
        self.inner.read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

impl Read for ReadStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for ReadStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl fmt::Debug for ReadStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadStream")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// A writable handle on a file of the write directory.
#[derive(Debug)]
pub struct WriteStream {
    file: File,
}

impl WriteStream {
    pub(crate) fn new(file: File) -> Self {
        Self { file }
    }
}

impl Write for WriteStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for WriteStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}
