//! The [OS/2](https://learn.microsoft.com/en-us/typography/opentype/spec/os2) table

use std::io::{Read, Seek};

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    schema::{Field, FieldType, Record, decode_record},
    types::Tag,
};

pub const TAG: Tag = Tag::new(b"OS/2");

static SCHEMA: [Field; 37] = [
    Field::named("version", FieldType::UShort),
    Field::named("xAvgCharWidth", FieldType::Short),
    Field::named("usWeightClass", FieldType::UShort),
    Field::named("usWidthClass", FieldType::UShort),
    Field::named("fsType", FieldType::UShort),
    Field::named("ySubscriptXSize", FieldType::Short),
    Field::named("ySubscriptYSize", FieldType::Short),
    Field::named("ySubscriptXOffset", FieldType::Short),
    Field::named("ySubscriptYOffset", FieldType::Short),
    Field::named("ySuperscriptXSize", FieldType::Short),
    Field::named("ySuperscriptYSize", FieldType::Short),
    Field::named("ySuperscriptXOffset", FieldType::Short),
    Field::named("ySuperscriptYOffset", FieldType::Short),
    Field::named("yStrikeoutSize", FieldType::Short),
    Field::named("yStrikeoutPosition", FieldType::Short),
    Field::named("sFamilyClass", FieldType::Short),
    Field::named("panose", FieldType::Array(&FieldType::Byte, 10)),
    Field::named("ulUnicodeRange1", FieldType::ULong),
    Field::named("ulUnicodeRange2", FieldType::ULong),
    Field::named("ulUnicodeRange3", FieldType::ULong),
    Field::named("ulUnicodeRange4", FieldType::ULong),
    Field::named("achVendID", FieldType::String),
    Field::named("fsSelection", FieldType::UShort),
    Field::named("usFirstCharIndex", FieldType::UShort),
    Field::named("usLastCharIndex", FieldType::UShort),
    Field::named("sTypoAscender", FieldType::Short),
    Field::named("sTypoDescender", FieldType::Short),
    Field::named("sTypoLineGap", FieldType::Short),
    Field::named("usWinAscent", FieldType::UShort),
    Field::named("usWinDescent", FieldType::UShort),
    Field::named("ulCodePageRange1", FieldType::ULong),
    Field::named("ulCodePageRange2", FieldType::ULong),
    Field::named("sxHeight", FieldType::Short),
    Field::named("sCapHeight", FieldType::Short),
    Field::named("usDefaultChar", FieldType::UShort),
    Field::named("usBreakChar", FieldType::UShort),
    Field::named("usMaxContext", FieldType::UShort),
];

/// OS/2 and Windows specific metrics, in the version 2+ layout
#[derive(Debug, Clone)]
pub struct Os2 {
    record: Record,
}

impl Os2 {
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        offset: u64,
    ) -> Result<Self, VeroTypeError> {
        reader.seek_to(offset)?;

        Ok(Self {
            record: decode_record(reader, &SCHEMA)?,
        })
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// 100 (thin) to 900 (black)
    pub fn weight_class(&self) -> Option<u16> {
        self.record.get("usWeightClass")?.as_u16()
    }

    /// Four character font vendor identifier
    pub fn vendor_id(&self) -> Option<&str> {
        self.record.get("achVendID")?.as_str()
    }

    /// The ten PANOSE classification digits
    pub fn panose(&self) -> Option<[u8; 10]> {
        let digits = self.record.get("panose")?.as_array()?;
        let mut panose = [0u8; 10];

        for (slot, digit) in panose.iter_mut().zip(digits) {
            *slot = digit.as_u8()?;
        }

        Some(panose)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_helpers::BeBuffer;

    fn sample() -> BeBuffer {
        BeBuffer::new()
            .push(4u16)
            .push(500i16)
            .extend([700u16, 5, 0])
            .extend([0i16; 11])
            .extend([2u8, 11, 8, 3, 0, 0, 0, 0, 0, 0])
            .extend([1u32, 0, 0, 0])
            .extend(*b"ABC ")
            .extend([0x40u16, 0x20, 0xFFFF])
            .extend([800i16, -200, 0])
            .extend([1000u16, 300])
            .extend([1u32, 0])
            .extend([500i16, 700])
            .extend([0u16, 0x20, 2])
    }

    #[test]
    fn decodes_version_two_layout() {
        let os2 = Os2::from_reader(&mut sample().reader(), 0).unwrap();

        assert_eq!(os2.record().len(), 37);
        assert_eq!(os2.weight_class(), Some(700));
        assert_eq!(os2.vendor_id(), Some("ABC"));
        assert_eq!(os2.panose(), Some([2, 11, 8, 3, 0, 0, 0, 0, 0, 0]));
        assert_eq!(
            os2.record().get("usMaxContext").and_then(|v| v.as_u16()),
            Some(2)
        );
    }
}
