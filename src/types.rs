//! Scalar types which appear in sfnt tables but have no native Rust equivalent.

use std::fmt;

/// A signed 16.16 fixed point number
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i32);

impl Fixed {
    pub const HALF: Self = Self(0x0000_8000);
    pub const ONE: Self = Self(0x0001_0000);
    pub const THREE: Self = Self(0x0003_0000);

    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / 65536.0
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

/// Seconds since 1904-01-01 00:00:00 UTC
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LongDateTime(i64);

impl LongDateTime {
    /// Seconds between the Macintosh epoch (1904) and the Unix epoch (1970)
    const UNIX_EPOCH_OFFSET: i64 = 2_082_844_800;

    #[inline]
    pub const fn new(seconds: i64) -> Self {
        Self(seconds)
    }

    #[inline]
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// The same instant expressed as seconds since 1970-01-01
    pub const fn to_unix_secs(self) -> i64 {
        self.0.saturating_sub(Self::UNIX_EPOCH_OFFSET)
    }
}

/// A 4 byte table identifier such as `head` or `OS/2`
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag([u8; 4]);

impl Tag {
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Self(*bytes)
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}
