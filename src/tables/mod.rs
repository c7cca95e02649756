use std::{
    collections::{BTreeMap, btree_map::IntoIter},
    io::{Read, Seek},
};

use thiserror::Error;

use crate::{VeroTypeError, buffer::VeroBufReader, types::Tag};

pub mod cmap;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod maxp;
pub mod name;
pub mod os2;
pub mod post;

/// An enum for the required tables
/// tables where every TrueType formatted font must include in it's
/// file's table directory, plus `OS/2` which OpenType requires as well.
/// For more information, see the [Apple Documentation Table 2](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6.html)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RequiredTables {
    Cmap,
    Glyf,
    Head,
    Hhea,
    Hmtx,
    Loca,
    Maxp,
    Name,
    Os2,
    Post,
}

impl RequiredTables {
    pub const fn tag(self) -> Tag {
        match self {
            Self::Cmap => cmap::TAG,
            Self::Glyf => Tag::new(b"glyf"),
            Self::Head => head::TAG,
            Self::Hhea => hhea::TAG,
            Self::Hmtx => hmtx::TAG,
            Self::Loca => Tag::new(b"loca"),
            Self::Maxp => maxp::TAG,
            Self::Name => name::TAG,
            Self::Os2 => os2::TAG,
            Self::Post => post::TAG,
        }
    }
}

impl TryFrom<&[u8]> for RequiredTables {
    type Error = ();

    fn try_from(value: &[u8]) -> Result<Self, ()> {
        Ok(match value {
            b"cmap" => Self::Cmap,
            b"glyf" => Self::Glyf,
            b"head" => Self::Head,
            b"hhea" => Self::Hhea,
            b"hmtx" => Self::Hmtx,
            b"loca" => Self::Loca,
            b"maxp" => Self::Maxp,
            b"name" => Self::Name,
            b"OS/2" => Self::Os2,
            b"post" => Self::Post,
            _ => Err(())?,
        })
    }
}

/// Represents the error messages which may occur when trying
/// to parse tables from raw binary buffers
#[derive(Error, Debug)]
pub enum TableEncodingError {
    #[error("The required buffer length for this table is {0} bytes, got {1} bytes")]
    InvalidBufferLength(usize, usize),

    /// The table uses a format this crate does not decode
    #[error("Unsupported '{table}' format: {detail}")]
    Unsupported { table: Tag, detail: String },

    /// The table contradicts its own layout rules
    #[error("Malformed '{table}' table: {detail}")]
    Structural { table: Tag, detail: String },

    /// A field was looked up before it was decoded
    #[error("Field '{field}' has not been decoded")]
    MissingField { field: &'static str },

    #[error("Table '{0}' is missing from the table directory")]
    MissingTable(Tag),

    #[error("Checksum mismatch for '{table}': directory says {expected:#010x}, data sums to {actual:#010x}")]
    ChecksumMismatch {
        table: Tag,
        expected: u32,
        actual: u32,
    },
}

impl TableEncodingError {
    pub(crate) fn unsupported(table: Tag, detail: impl Into<String>) -> Self {
        Self::Unsupported {
            table,
            detail: detail.into(),
        }
    }

    pub(crate) fn structural(table: Tag, detail: impl Into<String>) -> Self {
        Self::Structural {
            table,
            detail: detail.into(),
        }
    }
}

fn be_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([buf[at], buf[at + 1]])
}

fn be_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

/// Represents the offset subtable directory and it's metadata
/// providing us with a important info such as the number of tables
#[derive(Debug)]
pub struct OffsetTable {
    scalar_type: u32,
    num_tables: u16,
    search_range: u16,
    entry_selector: u16,
    range_shift: u16,
}

impl OffsetTable {
    /// Constructs the offset sub table from a raw buffer
    /// the offset sub table buffer size must be 12 per the reference manual.
    pub fn from_buffer(buf: &[u8]) -> Result<Self, TableEncodingError> {
        if buf.len() != 12 {
            return Err(TableEncodingError::InvalidBufferLength(12, buf.len()));
        }

        Ok(Self {
            scalar_type: be_u32(buf, 0),
            num_tables: be_u16(buf, 4),
            search_range: be_u16(buf, 6),
            entry_selector: be_u16(buf, 8),
            range_shift: be_u16(buf, 10),
        })
    }

    /// Parses an offset table from the very start of the file
    pub(crate) fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
    ) -> Result<Self, VeroTypeError> {
        reader.seek_to(0)?;

        let mut buffer = [0u8; 12];
        reader.read_exact(&mut buffer)?;

        Ok(Self::from_buffer(&buffer)?)
    }

    /// `0x00010000` for TrueType outlines, `OTTO` for CFF
    pub fn scalar_type(&self) -> u32 {
        self.scalar_type
    }

    /// Returns the number of tables exists in the font file
    pub fn num_tables(&self) -> u16 {
        self.num_tables
    }

    pub fn search_range(&self) -> u16 {
        self.search_range
    }

    pub fn entry_selector(&self) -> u16 {
        self.entry_selector
    }

    pub fn range_shift(&self) -> u16 {
        self.range_shift
    }
}

/// Represents all of the tables and their respective data types.
#[derive(Debug)]
pub struct Tables {
    /// The offset table, which provides the starting offsets of other tables.
    pub offset: OffsetTable,
    pub headers: TablesHeaders,
}

impl Tables {
    /// Reads the offset table at the start of the file followed by the
    /// table records it announces.
    ///
    /// # Errors
    ///
    /// Fails when the directory is cut short.
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
    ) -> Result<Self, VeroTypeError> {
        let offset_table = OffsetTable::from_reader(reader)?;
        let headers = TablesHeaders::from_reader(reader, offset_table.num_tables())?;
        Ok(Self {
            offset: offset_table,
            headers,
        })
    }
}

/// Represents the table headers and maps a table tag to it's offset
/// in the file / buffer
#[derive(Debug, Default)]
pub struct TablesHeaders {
    /// Tables this crate knows about, keyed by kind. Records for any other
    /// tag are dropped while reading.
    inner: BTreeMap<RequiredTables, TableMetadata>,
}

impl TablesHeaders {
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        num_tables: u16,
    ) -> Result<Self, VeroTypeError> {
        // every table record is 16 bytes and they directly follow the offset table
        let buffer = reader.read_bytes(usize::from(num_tables) * 16)?;

        let mut headers = BTreeMap::new();

        for raw_table in buffer.chunks(16) {
            let metadata = TableMetadata::from_buffer(raw_table)?;

            match RequiredTables::try_from(&raw_table[0..4]) {
                Ok(table_type) => {
                    headers.insert(table_type, metadata);
                }
                Err(()) => log::trace!("skipping table record '{}'", metadata.tag),
            }
        }

        Ok(Self { inner: headers })
    }

    pub fn get(&self, table: RequiredTables) -> Option<&TableMetadata> {
        self.inner.get(&table)
    }

    /// Like [`Self::get`], but a missing table is an error
    pub fn require(&self, table: RequiredTables) -> Result<&TableMetadata, TableEncodingError> {
        self.get(table)
            .ok_or(TableEncodingError::MissingTable(table.tag()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RequiredTables, &TableMetadata)> {
        self.inner.iter()
    }
}

impl IntoIterator for TablesHeaders {
    type Item = (RequiredTables, TableMetadata);

    type IntoIter = IntoIter<RequiredTables, TableMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// Represents metadata for a table within a larger data structure.
#[derive(Debug, Clone, Copy)]
pub struct TableMetadata {
    tag: Tag,
    /// The checksum of the table. This value can be used to verify the
    /// integrity of the table data.
    checksum: u32,
    /// The offset of the table, in bytes, from the beginning of the file
    /// or buffer containing the data structure. This indicates where the
    /// actual table data starts.
    offset: u32,
    /// The length of this table in bytes. This represents the actual size
    /// of the table data and does not include any padding that might be
    /// present.
    length: u32,
}

impl TableMetadata {
    /// Constructs a `TableMetadata` instance from a raw byte buffer.
    ///
    /// This method expects a buffer of exactly 16 bytes, all values big-endian:
    ///
    /// * Bytes 0-3: Table tag
    /// * Bytes 4-7: Checksum of the table
    /// * Bytes 8-11: Offset of the table from the beginning of the file
    /// * Bytes 12-15: Length of the table in bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use vero_tables::tables::TableMetadata;
    ///
    /// let buffer: [u8; 16] = [
    ///     b'h', b'e', b'a', b'd',
    ///     0x12, 0x34, 0x56, 0x78, // Checksum: 0x12345678
    ///     0x00, 0x01, 0x00, 0x00, // Offset: 0x00010000
    ///     0x00, 0x00, 0x0A, 0x00, // Length: 0x00000A00
    /// ];
    ///
    /// let metadata = TableMetadata::from_buffer(&buffer).unwrap();
    /// assert_eq!(metadata.checksum(), 0x12345678);
    /// assert_eq!(metadata.offset(), 0x00010000);
    /// assert_eq!(metadata.length(), 0x00000A00);
    ///
    /// let invalid_buffer: [u8; 10] = [0; 10];
    /// assert!(TableMetadata::from_buffer(&invalid_buffer).is_err());
    /// ```
    pub fn from_buffer(buf: &[u8]) -> Result<Self, TableEncodingError> {
        // Each table metadata should be EXACTLY 16 bytes
        if buf.len() != 16 {
            return Err(TableEncodingError::InvalidBufferLength(16, buf.len()));
        }

        Ok(Self {
            tag: Tag::new(&[buf[0], buf[1], buf[2], buf[3]]),
            checksum: be_u32(buf, 4),
            offset: be_u32(buf, 8),
            length: be_u32(buf, 12),
        })
    }

    /// Describes a table whose location was resolved elsewhere
    pub fn new(tag: Tag, checksum: u32, offset: u32, length: u32) -> Self {
        Self {
            tag,
            checksum,
            offset,
            length,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn offset(&self) -> u64 {
        self.offset.into()
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Sums the table as big-endian `u32` words, zero padding the final word.
    /// The `checkSumAdjustment` word of `head` is left out of the sum.
    pub fn compute_checksum<B: Read + Seek>(
        &self,
        reader: &mut VeroBufReader<B>,
    ) -> Result<u32, VeroTypeError> {
        reader.seek_to(self.offset())?;

        let mut sum = 0u32;
        for index in 0..self.length / 4 {
            let word = reader.read_u32()?;
            if !(self.tag == head::TAG && index == 2) {
                sum = sum.wrapping_add(word);
            }
        }

        let tail = (self.length % 4) as usize;
        if tail > 0 {
            let mut padded = [0u8; 4];
            reader.read_exact(&mut padded[..tail])?;
            sum = sum.wrapping_add(u32::from_be_bytes(padded));
        }

        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::BeBuffer;

    #[test]
    fn directory_keeps_known_tables() {
        let data = BeBuffer::new()
            .push(0x0001_0000u32)
            .extend([2u16, 32, 1, 0])
            .extend(*b"head")
            .extend([0u32, 44, 54])
            .extend(*b"GDEF")
            .extend([0u32, 100, 10]);

        let tables = Tables::from_reader(&mut data.reader()).unwrap();
        assert_eq!(tables.offset.num_tables(), 2);

        let head = tables.headers.get(RequiredTables::Head).unwrap();
        assert_eq!(head.tag(), head::TAG);
        assert_eq!(head.offset(), 44);
        assert_eq!(head.length(), 54);
        assert_eq!(tables.headers.iter().count(), 1);
        assert!(matches!(
            tables.headers.require(RequiredTables::Cmap),
            Err(TableEncodingError::MissingTable(tag)) if tag == cmap::TAG
        ));
    }

    #[test]
    fn checksum_pads_last_word() {
        let data = BeBuffer::new().extend([0u8, 0, 0, 1, 0, 0, 0, 2, 1]);
        let metadata = TableMetadata::new(Tag::new(b"test"), 0, 0, 9);

        assert_eq!(
            metadata.compute_checksum(&mut data.reader()).unwrap(),
            3 + 0x0100_0000
        );
    }

    #[test]
    fn checksum_skips_head_adjustment() {
        let data = BeBuffer::new().extend([1u32, 2, 0xFFFF_FFFF, 4]);
        let metadata = TableMetadata::new(head::TAG, 0, 0, 16);

        assert_eq!(metadata.compute_checksum(&mut data.reader()).unwrap(), 7);
    }

    #[test]
    fn checksum_length_past_end_is_truncated() {
        let data = BeBuffer::new().extend([1u32, 2, 3]);
        let metadata = TableMetadata::new(name::TAG, 0, 0, 0xFFFF_FFF0);
        let err = metadata.compute_checksum(&mut data.reader()).unwrap_err();

        assert_eq!(err.kind(), crate::ErrorKind::Truncated);
    }
}
