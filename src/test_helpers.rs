//! small utilities used in tests, here and under `tests/`

use std::io::Cursor;

use crate::buffer::VeroBufReader;

/// A scalar which can be written big-endian
pub trait BeScalar: Copy {
    fn write_be(self, out: &mut Vec<u8>);
}

macro_rules! impl_be_scalar {
    ($($typ:ty),*) => {
        $(impl BeScalar for $typ {
            fn write_be(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }
        })*
    };
}

impl_be_scalar!(u8, i8, u16, i16, u32, i32, i64);

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer(Vec<u8>);

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl BeScalar) -> Self {
        item.write_be(&mut self.0);
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: BeScalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            item.write_be(&mut self.0);
        }
        self
    }

    /// Appends raw bytes, such as an already encoded subtable
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    /// A reader over a copy of the bytes written so far
    pub fn reader(&self) -> VeroBufReader<Cursor<Vec<u8>>> {
        VeroBufReader::from_buffer(Cursor::new(self.0.clone()))
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for BeBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
