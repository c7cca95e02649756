use std::io::{self, BufReader, ErrorKind, Read, Seek, SeekFrom};

use thiserror::Error;

macro_rules! impl_read {
    ($fn_name:ident, $typ:ty) => {
        pub fn $fn_name(&mut self) -> Result<$typ, VeroBufReaderError> {
            let mut buf = [0u8; size_of::<$typ>()];
            self.read_exact(&mut buf)?;

            Ok(<$typ>::from_be_bytes(buf))
        }
    };
}

/// Represents the possible errors that can occur when using `VeroBufReader`.
#[derive(Error, Debug)]
pub enum VeroBufReaderError {
    /// The stream ended before a field or array could be read completely.
    #[error("Unexpected end of data at offset {offset}, needed {wanted} more bytes")]
    Truncated { offset: u64, wanted: usize },

    /// An error occurred during a read operation on the underlying buffer.
    /// This variant transparently wraps `std::io::Error`.
    #[error(transparent)]
    ReadError(#[from] io::Error),

    /// An error occurred during a seek operation on the underlying buffer.
    /// This variant contains the `std::io::Error` that caused the seek failure.
    #[error("Failed to seek, error context: {0}")]
    FailedToSeek(io::Error),
}

/// A Struct which encapsulates and provides a robust API
/// for interacting with a seekable font buffer.
///
/// All multi-byte reads are big-endian, as every sfnt table is.
pub struct VeroBufReader<B: Read + Seek> {
    inner: BufReader<B>,
}

impl<B> VeroBufReader<B>
where
    B: Read + Seek,
{
    /// Returns a new buf reader from anything which implements read
    /// the most obvious use case would be a File
    /// but it's also useful for loading fonts off a network buffer
    /// and such
    pub fn from_buffer(buffer: B) -> Self {
        Self {
            inner: BufReader::new(buffer),
        }
    }

    /// Seeks to a specifc place in the buffer
    /// from the start of the file
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use vero_tables::buffer::VeroBufReader;
    ///
    /// let data = vec![0, 0, 0, 10, 0, 0, 0, 20];
    /// let mut reader = VeroBufReader::from_buffer(Cursor::new(data));
    ///
    /// reader.seek_to(4).unwrap();
    /// assert_eq!(reader.read_u32().unwrap(), 20);
    /// ```
    pub fn seek_to(&mut self, pos: u64) -> Result<(), VeroBufReaderError> {
        self.inner
            .seek(SeekFrom::Start(pos))
            .map_err(VeroBufReaderError::FailedToSeek)?;

        Ok(())
    }

    /// Skips n bytes from the CURRENT cursor positon
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use vero_tables::buffer::VeroBufReader;
    ///
    /// let data = vec![0, 0, 0, 10, 0, 0, 0, 20];
    /// let mut reader = VeroBufReader::from_buffer(Cursor::new(data));
    ///
    /// assert_eq!(reader.read_u32().unwrap(), 10);
    /// reader.skip(4).unwrap();
    ///
    /// // Attempting to read should now result in an EOF error
    /// assert!(reader.read_u32().is_err());
    /// ```
    pub fn skip(&mut self, n: i64) -> Result<(), VeroBufReaderError> {
        self.inner
            .seek_relative(n)
            .map_err(VeroBufReaderError::FailedToSeek)?;

        Ok(())
    }

    /// Returns the absolute position of the cursor
    pub fn position(&mut self) -> Result<u64, VeroBufReaderError> {
        self.inner
            .stream_position()
            .map_err(VeroBufReaderError::FailedToSeek)
    }

    /// Fills `buf` completely or fails with [`VeroBufReaderError::Truncated`].
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), VeroBufReaderError> {
        let offset = self.position()?;
        let wanted = buf.len();

        self.inner.read_exact(buf).map_err(|err| match err.kind() {
            ErrorKind::UnexpectedEof => VeroBufReaderError::Truncated { offset, wanted },
            _ => VeroBufReaderError::ReadError(err),
        })
    }

    /// Reads exactly `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, VeroBufReaderError> {
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;

        Ok(buf)
    }

    impl_read!(read_i64, i64);
    impl_read!(read_u64, u64);
    impl_read!(read_i32, i32);
    impl_read!(read_u32, u32);
    impl_read!(read_i16, i16);
    impl_read!(read_u16, u16);
    impl_read!(read_i8, i8);
    impl_read!(read_u8, u8);
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_big_endian() {
        let mut reader = VeroBufReader::from_buffer(Cursor::new(vec![0xFF, 0xFE, 0x01, 0x02]));
        assert_eq!(reader.read_i16().unwrap(), -2);
        assert_eq!(reader.read_u16().unwrap(), 0x0102);
        assert_eq!(reader.position().unwrap(), 4);
    }

    #[test]
    fn short_read_is_truncated() {
        let mut reader = VeroBufReader::from_buffer(Cursor::new(vec![0, 1, 2]));
        reader.seek_to(1).unwrap();

        match reader.read_u32() {
            Err(VeroBufReaderError::Truncated { offset, wanted }) => {
                assert_eq!(offset, 1);
                assert_eq!(wanted, 4);
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn skip_is_relative() {
        let mut reader = VeroBufReader::from_buffer(Cursor::new(vec![1, 2, 3, 4, 5]));
        reader.read_u8().unwrap();
        reader.skip(2).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 4);
        reader.skip(-2).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 3);
    }
}
