//! The [head](https://learn.microsoft.com/en-us/typography/opentype/spec/head) table

use std::io::{Read, Seek};

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    schema::{Field, FieldType, Record, decode_record},
    types::{LongDateTime, Tag},
};

pub const TAG: Tag = Tag::new(b"head");

static SCHEMA: [Field; 17] = [
    Field::named("version", FieldType::Fixed),
    Field::named("fontRevision", FieldType::Fixed),
    Field::named("checkSumAdjustment", FieldType::ULong),
    Field::named("magicNumber", FieldType::ULong),
    Field::named("flags", FieldType::UShort),
    Field::named("unitsPerEm", FieldType::UShort),
    Field::named("created", FieldType::LongDateTime),
    Field::named("modified", FieldType::LongDateTime),
    Field::named("xMin", FieldType::Short),
    Field::named("yMin", FieldType::Short),
    Field::named("xMax", FieldType::Short),
    Field::named("yMax", FieldType::Short),
    Field::named("macStyle", FieldType::UShort),
    Field::named("lowestRecPPEM", FieldType::UShort),
    Field::named("fontDirectionHint", FieldType::Short),
    Field::named("indexToLocFormat", FieldType::Short),
    Field::named("glyphDataFormat", FieldType::Short),
];

/// Represents the flags field of the 'head' table.
/// Each field corresponds to a specific bit in the 16-bit flags value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadFlags {
    /// Bit 0: a Y coordinate of 0 is the baseline
    pub y_value_zero_is_baseline: bool,
    /// Bit 1: the left sidebearing point is at x = 0
    pub x_pos_leftmost_black_bit_lsb: bool,
    /// Bit 2: instructions may depend on point size
    pub instructions_depend_on_point_size: bool,
    /// Bit 3: force ppem to integer values for all internal scaler math
    pub use_integer_scaling: bool,
    /// Bit 4: instructions may alter advance width
    pub instructions_alter_advance_width: bool,
    /// Bit 11: the font data is lossless after a transforming compression
    pub lossless: bool,
    /// Bit 12: the font has been converted
    pub converted: bool,
    /// Bit 13: optimized for ClearType
    pub cleartype_optimized: bool,
    /// Bit 14: a last resort font
    pub last_resort: bool,
}

impl HeadFlags {
    pub fn from_bits(bits: u16) -> Self {
        let bit = |n: u16| bits & (1 << n) != 0;

        HeadFlags {
            y_value_zero_is_baseline: bit(0),
            x_pos_leftmost_black_bit_lsb: bit(1),
            instructions_depend_on_point_size: bit(2),
            use_integer_scaling: bit(3),
            instructions_alter_advance_width: bit(4),
            lossless: bit(11),
            converted: bit(12),
            cleartype_optimized: bit(13),
            last_resort: bit(14),
        }
    }
}

/// The union of all glyph bounding boxes, in design units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

/// A representation of the font header
#[derive(Debug, Clone)]
pub struct Head {
    record: Record,
    bounding_box: BoundingBox,
    units_per_em: u16,
    flags: u16,
    created: LongDateTime,
    modified: LongDateTime,
}

impl Head {
    /// Decodes the table starting at `offset`
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        offset: u64,
    ) -> Result<Self, VeroTypeError> {
        reader.seek_to(offset)?;
        let record = decode_record(reader, &SCHEMA)?;

        let bounding_box = BoundingBox {
            x_min: record.require_i16("xMin")?,
            y_min: record.require_i16("yMin")?,
            x_max: record.require_i16("xMax")?,
            y_max: record.require_i16("yMax")?,
        };

        Ok(Self {
            bounding_box,
            units_per_em: record.require_u16("unitsPerEm")?,
            flags: record.require_u16("flags")?,
            created: record.require("created", |v| v.as_date_time())?,
            modified: record.require("modified", |v| v.as_date_time())?,
            record,
        })
    }

    /// All decoded fields keyed by their OpenType names
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// `(xMin, yMin, xMax, yMax)` over all glyphs
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn flags(&self) -> HeadFlags {
        HeadFlags::from_bits(self.flags)
    }

    pub fn created(&self) -> LongDateTime {
        self.created
    }

    pub fn modified(&self) -> LongDateTime {
        self.modified
    }
}
