//! The [maxp](https://learn.microsoft.com/en-us/typography/opentype/spec/maxp) table
//!
//! Version 0.5 fonts (CFF outlines) only carry the glyph count. Version 1.0
//! adds the limits TrueType instructions need.

use std::io::{Read, Seek};

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    schema::{Discriminant, Dispatch, Field, FieldType, MultiFormat, Record},
    types::{Fixed, Tag},
};

pub const TAG: Tag = Tag::new(b"maxp");

static MAXP: MultiFormat = MultiFormat {
    common: &[
        Field::named("version", FieldType::Fixed),
        Field::named("numGlyphs", FieldType::UShort),
        Field::named("maxPoints", FieldType::UShort),
    ],
    discriminator: "version",
    formats: &[(
        Discriminant::Fixed(Fixed::ONE),
        &[
            Field::named("maxContours", FieldType::UShort),
            Field::named("maxCompositePoints", FieldType::UShort),
            Field::named("maxCompositeContours", FieldType::UShort),
            Field::named("maxZones", FieldType::UShort),
            Field::named("maxTwilightPoints", FieldType::UShort),
            Field::named("maxStorage", FieldType::UShort),
            Field::named("maxFunctionDefs", FieldType::UShort),
            Field::named("maxInstructionDefs", FieldType::UShort),
            Field::named("maxStackElements", FieldType::UShort),
            Field::named("maxSizeOfInstructions", FieldType::UShort),
            Field::named("maxComponentElements", FieldType::UShort),
            Field::named("maxComponentDepth", FieldType::UShort),
        ],
    )],
};

/// Which layout the table was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxpProfile {
    /// Version 1.0 with the TrueType resource limits
    TrueType,
    /// Any other version, carrying only the common fields
    Basic(Fixed),
}

/// Maximum profile
#[derive(Debug, Clone)]
pub struct Maxp {
    record: Record,
    profile: MaxpProfile,
    num_glyphs: u16,
}

impl Maxp {
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        offset: u64,
    ) -> Result<Self, VeroTypeError> {
        reader.seek_to(offset)?;
        let (record, dispatch) = MAXP.decode(reader)?;

        let profile = match dispatch {
            Dispatch::Matched(_) => MaxpProfile::TrueType,
            Dispatch::Unmatched => MaxpProfile::Basic(record.require_fixed("version")?),
        };

        Ok(Self {
            profile,
            num_glyphs: record.require_u16("numGlyphs")?,
            record,
        })
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn profile(&self) -> MaxpProfile {
        self.profile
    }

    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{schema::Value, test_helpers::BeBuffer};

    fn sample_v1(num_glyphs: u16) -> BeBuffer {
        BeBuffer::new()
            .push(0x0001_0000i32)
            .push(num_glyphs)
            .push(60u16)
            .extend(1u16..=12)
    }

    #[test]
    fn version_one_has_extended_fields() {
        let maxp = Maxp::from_reader(&mut sample_v1(5).reader(), 0).unwrap();

        assert_eq!(maxp.profile(), MaxpProfile::TrueType);
        assert_eq!(maxp.num_glyphs(), 5);
        assert_eq!(maxp.record().len(), 15);
        assert_eq!(maxp.record().get("maxContours"), Some(&Value::UShort(1)));
        assert_eq!(maxp.record().get("maxComponentDepth"), Some(&Value::UShort(12)));
    }

    #[test]
    fn half_version_has_common_fields_only() {
        // version 0.5 is written 0x00005000 by CFF fonts; trailing bytes
        // must not be picked up as extended fields
        let data = BeBuffer::new()
            .push(0x0000_5000i32)
            .push(7u16)
            .push(0u16)
            .extend([9u16; 12]);
        let maxp = Maxp::from_reader(&mut data.reader(), 0).unwrap();

        assert_eq!(maxp.profile(), MaxpProfile::Basic(Fixed::from_bits(0x5000)));
        assert_eq!(maxp.num_glyphs(), 7);
        assert_eq!(
            maxp.record().iter().map(|(name, _)| name).collect::<Vec<_>>(),
            ["version", "numGlyphs", "maxPoints"]
        );
    }

    #[test]
    fn other_versions_are_basic() {
        let data = BeBuffer::new()
            .push(Fixed::HALF.to_bits())
            .push(300u16)
            .push(0u16);
        let maxp = Maxp::from_reader(&mut data.reader(), 0).unwrap();

        assert_eq!(maxp.profile(), MaxpProfile::Basic(Fixed::HALF));
        assert!(!maxp.record().contains("maxStorage"));
    }
}
