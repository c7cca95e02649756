use buffer::VeroBufReaderError;
use tables::TableEncodingError;
use thiserror::Error;

pub mod buffer;
pub mod font;
pub mod ids;
pub mod schema;
pub mod tables;
pub mod types;

#[doc(hidden)]
pub mod test_helpers;

pub use font::{Font, LoadOptions};

#[derive(Debug, Error)]
pub enum VeroTypeError {
    #[error(transparent)]
    TableEncodingError(#[from] TableEncodingError),

    #[error(transparent)]
    VeroBufReaderError(#[from] VeroBufReaderError),
}

/// Broad classes of decoding failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The data ended before a field or array was complete
    Truncated,
    /// A valid feature of the format which this crate does not decode
    Unsupported,
    /// The data contradicts the format, the font is malformed
    Structural,
    /// The underlying stream failed
    Io,
}

impl VeroTypeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::VeroBufReaderError(VeroBufReaderError::Truncated { .. }) => ErrorKind::Truncated,
            Self::VeroBufReaderError(_) => ErrorKind::Io,
            Self::TableEncodingError(TableEncodingError::InvalidBufferLength(..)) => {
                ErrorKind::Truncated
            }
            Self::TableEncodingError(TableEncodingError::Unsupported { .. }) => {
                ErrorKind::Unsupported
            }
            Self::TableEncodingError(
                TableEncodingError::Structural { .. }
                | TableEncodingError::MissingField { .. }
                | TableEncodingError::MissingTable(_)
                | TableEncodingError::ChecksumMismatch { .. },
            ) => ErrorKind::Structural,
        }
    }
}
