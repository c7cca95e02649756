//! The [hmtx](https://learn.microsoft.com/en-us/typography/opentype/spec/hmtx) table
//!
//! The first `numberOfHMetrics` glyphs store an advance width and a left side
//! bearing. Every glyph after them stores only a left side bearing and shares
//! the last stored advance width.

use std::io::{Read, Seek};

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    tables::TableEncodingError,
    types::Tag,
};

pub const TAG: Tag = Tag::new(b"hmtx");

/// Horizontal metrics, indexed by glyph id
#[derive(Debug, Clone)]
pub struct Hmtx {
    advance_widths: Vec<u16>,
    left_side_bearings: Vec<i16>,
}

impl Hmtx {
    /// `number_of_h_metrics` comes from `hhea` and `num_glyphs` from `maxp`.
    ///
    /// # Errors
    ///
    /// `number_of_h_metrics` must be between 1 and `num_glyphs`, otherwise the
    /// result could not hold exactly one entry per glyph and a structural
    /// error is returned.
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        offset: u64,
        number_of_h_metrics: u16,
        num_glyphs: u16,
    ) -> Result<Self, VeroTypeError> {
        if number_of_h_metrics == 0 {
            return Err(TableEncodingError::structural(
                TAG,
                "numberOfHMetrics is 0, no advance width to carry forward",
            )
            .into());
        }
        if number_of_h_metrics > num_glyphs {
            return Err(TableEncodingError::structural(
                TAG,
                format!("numberOfHMetrics {number_of_h_metrics} exceeds numGlyphs {num_glyphs}"),
            )
            .into());
        }

        reader.seek_to(offset)?;

        let mut advance_widths = Vec::with_capacity(num_glyphs.into());
        let mut left_side_bearings = Vec::with_capacity(num_glyphs.into());

        for _ in 0..number_of_h_metrics {
            advance_widths.push(reader.read_u16()?);
            left_side_bearings.push(reader.read_i16()?);
        }

        // number_of_h_metrics > 0 was checked above
        let last_advance = advance_widths[advance_widths.len() - 1];
        for _ in number_of_h_metrics..num_glyphs {
            advance_widths.push(last_advance);
            left_side_bearings.push(reader.read_i16()?);
        }

        Ok(Self {
            advance_widths,
            left_side_bearings,
        })
    }

    pub fn num_glyphs(&self) -> usize {
        self.advance_widths.len()
    }

    pub fn advance_width(&self, glyph_id: u16) -> Option<u16> {
        self.advance_widths.get(usize::from(glyph_id)).copied()
    }

    pub fn left_side_bearing(&self, glyph_id: u16) -> Option<i16> {
        self.left_side_bearings.get(usize::from(glyph_id)).copied()
    }

    pub fn advance_widths(&self) -> &[u16] {
        &self.advance_widths
    }

    pub fn left_side_bearings(&self) -> &[i16] {
        &self.left_side_bearings
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ErrorKind, test_helpers::BeBuffer};

    #[test]
    fn tail_shares_last_advance_width() {
        let data = BeBuffer::new()
            .push(10u16)
            .push(1i16)
            .push(20u16)
            .push(2i16)
            .extend([3i16, 4, 5]);
        let hmtx = Hmtx::from_reader(&mut data.reader(), 0, 2, 5).unwrap();

        assert_eq!(hmtx.num_glyphs(), 5);
        assert_eq!(hmtx.advance_widths(), [10, 20, 20, 20, 20]);
        assert_eq!(hmtx.left_side_bearings(), [1, 2, 3, 4, 5]);
        for glyph in 2..5 {
            assert_eq!(hmtx.advance_width(glyph), Some(20));
        }
        assert_eq!(hmtx.left_side_bearing(4), Some(5));
        assert_eq!(hmtx.advance_width(5), None);
    }

    #[test]
    fn all_metrics_explicit() {
        let data = BeBuffer::new().extend([7u16, 0xFFFF, 9, 0x0001]);
        let hmtx = Hmtx::from_reader(&mut data.reader(), 0, 2, 2).unwrap();

        assert_eq!(hmtx.advance_widths(), [7, 9]);
        assert_eq!(hmtx.left_side_bearings(), [-1, 1]);
    }

    #[test]
    fn zero_h_metrics_is_an_error() {
        let data = BeBuffer::new().extend([1i16, 2, 3]);
        let err = Hmtx::from_reader(&mut data.reader(), 0, 0, 3).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn more_h_metrics_than_glyphs_is_an_error() {
        let data = BeBuffer::new().extend([10u16, 1, 20, 2, 30, 3]);
        let err = Hmtx::from_reader(&mut data.reader(), 0, 3, 2).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn missing_side_bearings_are_truncated() {
        let data = BeBuffer::new().push(10u16).push(1i16).push(2i16);
        let err = Hmtx::from_reader(&mut data.reader(), 0, 1, 4).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Truncated);
    }
}
