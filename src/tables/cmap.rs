//! A representation of the [cmap table](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap)
//!
//! Subtables in formats 0, 4 and 6 are expanded eagerly into a map from
//! character code to glyph index. Glyph index 0 (the missing glyph) is kept
//! in the output like any other index.

use std::{
    collections::BTreeMap,
    io::{Read, Seek},
};

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    schema::{Field, FieldType, Record, Value, decode_record},
    tables::TableEncodingError,
    types::Tag,
};

pub const TAG: Tag = Tag::new(b"cmap");

static ENCODING_RECORD: [Field; 3] = [
    Field::named("platformID", FieldType::UShort),
    Field::named("encodingID", FieldType::UShort),
    Field::named("offset", FieldType::ULong),
];

static HEADER: [Field; 3] = [
    Field::named("version", FieldType::UShort),
    Field::named("numTables", FieldType::UShort),
    Field::named(
        "encodingRecord",
        FieldType::ContextArray {
            count_field: "numTables",
            schema: &ENCODING_RECORD,
        },
    ),
];

static FORMAT4_HEADER: [Field; 4] = [
    Field::named("segCountX2", FieldType::UShort),
    Field::named("searchRange", FieldType::UShort),
    Field::named("entrySelector", FieldType::UShort),
    Field::named("rangeShift", FieldType::UShort),
];

/// Character code → glyph index
pub type CodeMap = BTreeMap<u32, u16>;

/// One decoded character mapping
#[derive(Debug, Clone, PartialEq)]
pub struct CmapSubtable {
    format: u16,
    language: Option<u16>,
    glyphs: CodeMap,
}

impl CmapSubtable {
    pub fn format(&self) -> u16 {
        self.format
    }

    /// Macintosh language of the mapping, 0 when language independent
    pub fn language(&self) -> Option<u16> {
        self.language
    }

    pub fn glyphs(&self) -> &CodeMap {
        &self.glyphs
    }

    /// The glyph `code` maps to. `Some(0)` means the font maps the code to
    /// the missing glyph.
    pub fn glyph_index(&self, code: u32) -> Option<u16> {
        self.glyphs.get(&code).copied()
    }
}

/// Character to glyph index mapping table
#[derive(Debug, Clone)]
pub struct Cmap {
    record: Record,
    subtables: BTreeMap<(u16, u16), CmapSubtable>,
}

impl Cmap {
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        offset: u64,
    ) -> Result<Self, VeroTypeError> {
        reader.seek_to(offset)?;
        let record = decode_record(reader, &HEADER)?;

        let mut subtables = BTreeMap::new();
        // several encoding records often point at the same subtable
        let mut decoded: BTreeMap<u32, CmapSubtable> = BTreeMap::new();

        for encoding_record in record.require("encodingRecord", Value::as_records)? {
            let platform_id = encoding_record.require_u16("platformID")?;
            let encoding_id = encoding_record.require_u16("encodingID")?;
            let subtable_offset = encoding_record.require_u32("offset")?;

            let subtable = match decoded.get(&subtable_offset) {
                Some(subtable) => subtable.clone(),
                None => {
                    let subtable =
                        decode_subtable(reader, offset + u64::from(subtable_offset))?;
                    decoded.insert(subtable_offset, subtable.clone());
                    subtable
                }
            };
            log::trace!(
                "cmap ({platform_id}, {encoding_id}): format {} with {} codes",
                subtable.format,
                subtable.glyphs.len()
            );

            if subtables
                .insert((platform_id, encoding_id), subtable)
                .is_some()
            {
                log::warn!(
                    "duplicate cmap encoding record ({platform_id}, {encoding_id}), keeping the later one"
                );
            }
        }

        Ok(Self { record, subtables })
    }

    /// The header fields and the encoding records
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn subtable(&self, platform_id: u16, encoding_id: u16) -> Option<&CmapSubtable> {
        self.subtables.get(&(platform_id, encoding_id))
    }

    pub fn subtables(&self) -> impl Iterator<Item = ((u16, u16), &CmapSubtable)> {
        self.subtables.iter().map(|(key, subtable)| (*key, subtable))
    }

    pub fn glyph_index(&self, platform_id: u16, encoding_id: u16, code: u32) -> Option<u16> {
        self.subtable(platform_id, encoding_id)?.glyph_index(code)
    }
}

fn decode_subtable<B: Read + Seek>(
    reader: &mut VeroBufReader<B>,
    start: u64,
) -> Result<CmapSubtable, VeroTypeError> {
    reader.seek_to(start)?;

    let format = reader.read_u16()?;
    if matches!(format, 8 | 10 | 12 | 13) {
        reader.skip(2)?;
    }
    let length = reader.read_u16()?;
    let language = if format != 14 {
        Some(reader.read_u16()?)
    } else {
        None
    };

    let glyphs = match format {
        0 => decode_format0(reader)?,
        4 => decode_format4(reader, start + u64::from(length))?,
        6 => decode_format6(reader)?,
        other => {
            return Err(
                TableEncodingError::unsupported(TAG, format!("subtable format {other}")).into(),
            );
        }
    };

    Ok(CmapSubtable {
        format,
        language,
        glyphs,
    })
}

/// Byte encoding table: 256 one byte glyph indices
fn decode_format0<B: Read + Seek>(reader: &mut VeroBufReader<B>) -> Result<CodeMap, VeroTypeError> {
    let indices = reader.read_bytes(256)?;

    Ok((0u32..).zip(indices.into_iter().map(u16::from)).collect())
}

/// Segment mapping to delta values
fn decode_format4<B: Read + Seek>(
    reader: &mut VeroBufReader<B>,
    subtable_end: u64,
) -> Result<CodeMap, VeroTypeError> {
    let header = decode_record(reader, &FORMAT4_HEADER)?;
    let seg_count = usize::from(header.require_u16("segCountX2")? / 2);
    if seg_count == 0 {
        return Err(TableEncodingError::structural(TAG, "format 4 subtable without segments").into());
    }

    let end_codes = read_u16s(reader, seg_count)?;
    // reservedPad
    reader.skip(2)?;
    let start_codes = read_u16s(reader, seg_count)?;
    let id_deltas = (0..seg_count)
        .map(|_| reader.read_i16())
        .collect::<Result<Vec<_>, _>>()?;
    let id_range_offsets = read_u16s(reader, seg_count)?;

    let position = reader.position()?;
    if subtable_end < position {
        log::warn!(
            "format 4 length ends at {subtable_end}, before its segment arrays end at {position}; assuming no glyphIdArray"
        );
    }
    let remaining = subtable_end.saturating_sub(position);
    let glyph_id_array = read_u16s(reader, (remaining / 2) as usize)?;

    let sentinel = end_codes[seg_count - 1];
    if sentinel != 0xFFFF {
        return Err(TableEncodingError::structural(
            TAG,
            format!("last format 4 segment ends at {sentinel:#06x} instead of 0xffff"),
        )
        .into());
    }

    let mut glyphs = CodeMap::new();

    for i in 0..seg_count - 1 {
        let (start, end) = (start_codes[i], end_codes[i]);
        if start > end {
            log::warn!("format 4 segment {i} starts at {start:#06x} after its end {end:#06x}, skipping it");
            continue;
        }

        let range_offset = id_range_offsets[i];
        for (j, code) in (start..=end).enumerate() {
            let glyph = if range_offset == 0 {
                code.wrapping_add_signed(id_deltas[i])
            } else {
                // idRangeOffset counts bytes from its own slot in the
                // idRangeOffset array, which sits seg_count - i slots before
                // glyphIdArray[0]
                let index = (usize::from(range_offset / 2) + i + j)
                    .checked_sub(seg_count)
                    .ok_or_else(|| {
                        TableEncodingError::structural(
                            TAG,
                            format!("format 4 segment {i} points before glyphIdArray"),
                        )
                    })?;
                *glyph_id_array.get(index).ok_or_else(|| {
                    TableEncodingError::structural(
                        TAG,
                        format!(
                            "format 4 segment {i} reads glyphIdArray[{index}] of {}",
                            glyph_id_array.len()
                        ),
                    )
                })?
            };
            glyphs.insert(u32::from(code), glyph);
        }
    }

    Ok(glyphs)
}

/// Trimmed table mapping: one dense run of codes
fn decode_format6<B: Read + Seek>(reader: &mut VeroBufReader<B>) -> Result<CodeMap, VeroTypeError> {
    let first_code = u32::from(reader.read_u16()?);
    let entry_count = reader.read_u16()?;
    let indices = read_u16s(reader, entry_count.into())?;

    Ok((first_code..).zip(indices).collect())
}

fn read_u16s<B: Read + Seek>(
    reader: &mut VeroBufReader<B>,
    count: usize,
) -> Result<Vec<u16>, VeroTypeError> {
    let bytes = reader.read_bytes(count * 2)?;

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ErrorKind, test_helpers::BeBuffer};

    /// `(startCode, endCode, idDelta, idRangeOffset)`, sentinel included
    fn format4(segments: &[(u16, u16, i16, u16)], glyph_ids: &[u16]) -> BeBuffer {
        let seg_count = segments.len() as u16;
        let length = 16 + 8 * seg_count + 2 * glyph_ids.len() as u16;

        BeBuffer::new()
            .extend([4u16, length, 0])
            .extend([seg_count * 2, 0, 0, 0])
            .extend(segments.iter().map(|s| s.1))
            .push(0u16)
            .extend(segments.iter().map(|s| s.0))
            .extend(segments.iter().map(|s| s.2))
            .extend(segments.iter().map(|s| s.3))
            .extend(glyph_ids.iter().copied())
    }

    /// `(platform, encoding, index into subtables)`
    fn build(records: &[(u16, u16, usize)], subtables: &[BeBuffer]) -> BeBuffer {
        let mut offsets = Vec::new();
        let mut next = 4 + 8 * records.len() as u32;
        for subtable in subtables {
            offsets.push(next);
            next += subtable.len() as u32;
        }

        let mut data = BeBuffer::new().push(0u16).push(records.len() as u16);
        for &(platform, encoding, index) in records {
            data = data.extend([platform, encoding]).push(offsets[index]);
        }
        for subtable in subtables {
            data = data.extend(subtable.iter().copied());
        }
        data
    }

    fn decode_single(subtable: BeBuffer) -> Result<CmapSubtable, VeroTypeError> {
        let cmap = Cmap::from_reader(&mut build(&[(3, 1, 0)], &[subtable]).reader(), 0)?;
        Ok(cmap.subtable(3, 1).cloned().expect("subtable (3, 1)"))
    }

    #[test]
    fn format0_maps_every_byte() {
        let indices: Vec<u8> = (0..=255u8).rev().collect();
        let subtable = BeBuffer::new()
            .extend([0u16, 262, 0])
            .extend(indices.iter().copied());
        let subtable = decode_single(subtable).unwrap();

        assert_eq!(subtable.format(), 0);
        assert_eq!(subtable.glyphs().len(), 256);
        for code in 0..256u32 {
            assert_eq!(subtable.glyph_index(code), Some(255 - code as u16));
        }
        assert_eq!(subtable.glyph_index(256), None);
    }

    #[test]
    fn format4_delta_segment() {
        let subtable = format4(&[(10, 20, 3, 0), (0xFFFF, 0xFFFF, 1, 0)], &[]);
        let subtable = decode_single(subtable).unwrap();

        assert_eq!(subtable.glyphs().len(), 11);
        for code in 10..=20u32 {
            assert_eq!(subtable.glyph_index(code), Some(((code + 3) % 65536) as u16));
        }
        assert_eq!(subtable.glyph_index(9), None);
        assert_eq!(subtable.glyph_index(21), None);
        // the sentinel segment is never mapped
        assert_eq!(subtable.glyph_index(0xFFFF), None);
    }

    #[test]
    fn format4_delta_wraps() {
        let subtable = format4(
            &[(0x41, 0x42, -0x40, 0), (0xFFF0, 0xFFF1, 0x20, 0), (0xFFFF, 0xFFFF, 1, 0)],
            &[],
        );
        let subtable = decode_single(subtable).unwrap();

        assert_eq!(subtable.glyph_index(0x41), Some(1));
        assert_eq!(subtable.glyph_index(0x42), Some(2));
        assert_eq!(subtable.glyph_index(0xFFF0), Some(0x10));
        assert_eq!(subtable.glyph_index(0xFFF1), Some(0x11));
    }

    #[test]
    fn format4_range_offsets() {
        // segCount = 4. Segment 1 reads from glyphIdArray[0] (offset 2 * (4 - 1)),
        // segment 2 from glyphIdArray[3] (offset 2 * (4 - 2 + 3)).
        let subtable = format4(
            &[
                (65, 67, -64, 0),
                (100, 102, 0, 6),
                (200, 201, 0, 10),
                (0xFFFF, 0xFFFF, 1, 0),
            ],
            &[10, 20, 30, 40, 0],
        );
        let subtable = decode_single(subtable).unwrap();

        let expected: CodeMap = [
            (65, 1),
            (66, 2),
            (67, 3),
            (100, 10),
            (101, 20),
            (102, 30),
            (200, 40),
            (201, 0),
        ]
        .into_iter()
        .collect();
        assert_eq!(subtable.glyphs(), &expected);
    }

    #[test]
    fn format4_range_offset_outside_glyph_array() {
        let subtable = format4(&[(100, 103, 0, 4), (0xFFFF, 0xFFFF, 1, 0)], &[1, 2]);
        let err = decode_single(subtable).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn format4_requires_sentinel() {
        let subtable = format4(&[(10, 20, 0, 0), (30, 40, 0, 0)], &[]);
        let err = decode_single(subtable).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn format4_inverted_segment_is_empty() {
        let subtable = format4(
            &[(0x20, 0x10, 0, 0), (0x41, 0x41, -0x40, 0), (0xFFFF, 0xFFFF, 1, 0)],
            &[],
        );
        let subtable = decode_single(subtable).unwrap();

        let expected: CodeMap = [(0x41, 1)].into_iter().collect();
        assert_eq!(subtable.glyphs(), &expected);
    }

    #[test]
    fn format4_short_length_means_no_glyph_array() {
        // declared length stops inside the segment arrays
        let mut subtable = format4(&[(0x41, 0x42, -0x40, 0), (0xFFFF, 0xFFFF, 1, 0)], &[]);
        subtable[2..4].copy_from_slice(&20u16.to_be_bytes());
        let subtable = decode_single(subtable).unwrap();

        let expected: CodeMap = [(0x41, 1), (0x42, 2)].into_iter().collect();
        assert_eq!(subtable.glyphs(), &expected);
    }

    #[test]
    fn format4_short_length_fails_indirect_lookups() {
        let mut subtable = format4(&[(0x41, 0x41, 0, 4), (0xFFFF, 0xFFFF, 1, 0)], &[7]);
        subtable[2..4].copy_from_slice(&20u16.to_be_bytes());
        let err = decode_single(subtable).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn format6_trimmed_range() {
        let subtable = BeBuffer::new()
            .extend([6u16, 16, 0])
            .extend([0x20u16, 3])
            .extend([5u16, 0, 7]);
        let subtable = decode_single(subtable).unwrap();

        assert_eq!(subtable.format(), 6);
        assert_eq!(subtable.glyph_index(0x20), Some(5));
        assert_eq!(subtable.glyph_index(0x21), Some(0));
        assert_eq!(subtable.glyph_index(0x22), Some(7));
        assert_eq!(subtable.glyph_index(0x1F), None);
        assert_eq!(subtable.glyph_index(0x23), None);
    }

    #[test]
    fn unsupported_formats() {
        for format in [2u16, 12, 14] {
            let subtable = BeBuffer::new().extend([format, 0, 0, 0, 0, 0, 0]);
            let err = decode_single(subtable).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unsupported, "format {format}");
        }
    }

    #[test]
    fn records_sharing_a_subtable() {
        let data = build(
            &[(0, 3, 0), (3, 1, 0), (1, 0, 1)],
            &[
                format4(&[(0x20, 0x21, 1, 0), (0xFFFF, 0xFFFF, 1, 0)], &[]),
                BeBuffer::new().extend([6u16, 12, 0, 0x20, 1, 9]),
            ],
        );
        let cmap = Cmap::from_reader(&mut data.reader(), 0).unwrap();

        assert_eq!(cmap.subtables().count(), 3);
        assert_eq!(cmap.subtable(0, 3), cmap.subtable(3, 1));
        assert_eq!(cmap.glyph_index(3, 1, 0x21), Some(0x22));
        assert_eq!(cmap.glyph_index(1, 0, 0x20), Some(9));
        assert_eq!(cmap.glyph_index(1, 0, 0x21), None);
        assert_eq!(cmap.glyph_index(3, 10, 0x20), None);
    }

    #[test]
    fn later_record_overwrites() {
        let data = build(
            &[(3, 1, 0), (3, 1, 1)],
            &[
                BeBuffer::new().extend([6u16, 12, 0, 0x20, 1, 1]),
                BeBuffer::new().extend([6u16, 12, 0, 0x20, 1, 2]),
            ],
        );
        let cmap = Cmap::from_reader(&mut data.reader(), 0).unwrap();

        assert_eq!(cmap.subtables().count(), 1);
        assert_eq!(cmap.glyph_index(3, 1, 0x20), Some(2));
    }

    #[test]
    fn offsets_are_relative_to_the_table() {
        let table = build(
            &[(3, 1, 0)],
            &[BeBuffer::new().extend([6u16, 12, 0, 0x41, 1, 4])],
        );
        let data = BeBuffer::new().extend([0xEEu8; 20]).extend(table.iter().copied());
        let cmap = Cmap::from_reader(&mut data.reader(), 20).unwrap();

        assert_eq!(cmap.glyph_index(3, 1, 0x41), Some(4));
        assert_eq!(
            cmap.record().get("numTables").and_then(|v| v.as_u16()),
            Some(1)
        );
    }
}
