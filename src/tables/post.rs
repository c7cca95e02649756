//! The [post](https://learn.microsoft.com/en-us/typography/opentype/spec/post) table
//!
//! Only version 3.0 is decoded, since it carries no glyph names.

use std::io::{Read, Seek};

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    schema::{Field, FieldType, Record, decode_record},
    tables::TableEncodingError,
    types::{Fixed, Tag},
};

pub const TAG: Tag = Tag::new(b"post");

static SCHEMA: [Field; 9] = [
    Field::named("version", FieldType::Fixed),
    Field::named("italicAngle", FieldType::Fixed),
    Field::named("underlinePosition", FieldType::FWord),
    Field::named("underlineThickness", FieldType::FWord),
    Field::named("isFixedPitch", FieldType::ULong),
    Field::named("minMemType42", FieldType::ULong),
    Field::named("maxMemType42", FieldType::ULong),
    Field::named("minMemType1", FieldType::ULong),
    Field::named("maxMemType1", FieldType::ULong),
];

/// PostScript information
#[derive(Debug, Clone)]
pub struct Post {
    record: Record,
}

impl Post {
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        offset: u64,
    ) -> Result<Self, VeroTypeError> {
        reader.seek_to(offset)?;
        let record = decode_record(reader, &SCHEMA)?;

        let version = record.require_fixed("version")?;
        if version != Fixed::THREE {
            return Err(TableEncodingError::unsupported(
                TAG,
                format!("version {version} has glyph name data"),
            )
            .into());
        }

        Ok(Self { record })
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Degrees counter-clockwise from the vertical
    pub fn italic_angle(&self) -> Option<Fixed> {
        self.record.get("italicAngle")?.as_fixed()
    }

    pub fn is_fixed_pitch(&self) -> bool {
        self.record
            .get("isFixedPitch")
            .and_then(|v| v.as_u32())
            .is_some_and(|pitch| pitch != 0)
    }
}
