//! The [hhea](https://learn.microsoft.com/en-us/typography/opentype/spec/hhea) table

use std::io::{Read, Seek};

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    schema::{Field, FieldType, Record, decode_record},
    types::Tag,
};

pub const TAG: Tag = Tag::new(b"hhea");

static SCHEMA: [Field; 17] = [
    Field::named("version", FieldType::Fixed),
    Field::named("ascender", FieldType::FWord),
    Field::named("descender", FieldType::FWord),
    Field::named("lineGap", FieldType::FWord),
    Field::named("advanceWidthMax", FieldType::UFWord),
    Field::named("minLeftSideBearing", FieldType::FWord),
    Field::named("minRightSideBearing", FieldType::FWord),
    Field::named("xMaxExtent", FieldType::FWord),
    Field::named("caretSlopeRise", FieldType::Short),
    Field::named("caretSlopeRun", FieldType::Short),
    Field::named("caretOffset", FieldType::Short),
    Field::reserved(FieldType::Short),
    Field::reserved(FieldType::Short),
    Field::reserved(FieldType::Short),
    Field::reserved(FieldType::Short),
    Field::named("metricDataFormat", FieldType::Short),
    Field::named("numberOfHMetrics", FieldType::UShort),
];

/// Horizontal header
#[derive(Debug, Clone)]
pub struct Hhea {
    record: Record,
    number_of_h_metrics: u16,
}

impl Hhea {
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        offset: u64,
    ) -> Result<Self, VeroTypeError> {
        reader.seek_to(offset)?;
        let record = decode_record(reader, &SCHEMA)?;

        Ok(Self {
            number_of_h_metrics: record.require_u16("numberOfHMetrics")?,
            record,
        })
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Number of explicit advance widths in `hmtx`
    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }

    pub fn ascender(&self) -> Option<i16> {
        self.record.get("ascender")?.as_i16()
    }

    pub fn descender(&self) -> Option<i16> {
        self.record.get("descender")?.as_i16()
    }

    pub fn line_gap(&self) -> Option<i16> {
        self.record.get("lineGap")?.as_i16()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_helpers::BeBuffer;

    fn sample(number_of_h_metrics: u16) -> BeBuffer {
        BeBuffer::new()
            .push(0x0001_0000i32)
            .extend([800i16, -200, 90])
            .push(1200u16)
            .extend([-50i16, -60, 1100, 1, 0, 0])
            .extend([0x7777i16; 4])
            .push(0i16)
            .push(number_of_h_metrics)
    }

    #[test]
    fn reserved_words_are_dropped() {
        let hhea = Hhea::from_reader(&mut sample(3).reader(), 0).unwrap();

        assert_eq!(hhea.record().len(), 13);
        assert_eq!(hhea.number_of_h_metrics(), 3);
        assert_eq!(hhea.ascender(), Some(800));
        assert_eq!(hhea.descender(), Some(-200));
        assert_eq!(hhea.line_gap(), Some(90));
        assert_eq!(hhea.record().get("metricDataFormat").and_then(|v| v.as_i16()), Some(0));
    }
}
