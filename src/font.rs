//! Loading every required table of a font in one go

use std::io::{Read, Seek};

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    tables::{
        RequiredTables, TableEncodingError, Tables, cmap::Cmap, head::Head, hhea::Hhea,
        hmtx::Hmtx, maxp::Maxp, name::Name, os2::Os2, post::Post,
    },
};

/// Knobs for [`Font::from_reader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Compare every table against its directory checksum
    pub verify_checksums: bool,
    /// Fail on a checksum mismatch instead of logging it
    pub strict_checksums: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            verify_checksums: true,
            strict_checksums: true,
        }
    }
}

/// The decoded required tables of an OpenType font
#[derive(Debug)]
pub struct Font {
    pub tables: Tables,
    pub head: Head,
    pub hhea: Hhea,
    pub maxp: Maxp,
    pub os2: Os2,
    pub post: Post,
    pub name: Name,
    pub cmap: Cmap,
    pub hmtx: Hmtx,
}

impl Font {
    /// Reads the table directory at the start of `reader`, then decodes
    /// every required table it points at.
    ///
    /// # Errors
    ///
    /// Fails when a required table is absent or any of them fails to decode.
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        options: &LoadOptions,
    ) -> Result<Self, VeroTypeError> {
        let tables = Tables::from_reader(reader)?;
        log::debug!(
            "table directory lists {} tables, {} of them known",
            tables.offset.num_tables(),
            tables.headers.iter().count()
        );

        if options.verify_checksums {
            verify_checksums(reader, &tables, options.strict_checksums)?;
        }

        let offset_of = |table: RequiredTables| -> Result<u64, TableEncodingError> {
            let metadata = tables.headers.require(table)?;
            log::debug!(
                "decoding '{}' at offset {}",
                metadata.tag(),
                metadata.offset()
            );
            Ok(metadata.offset())
        };

        let head = Head::from_reader(reader, offset_of(RequiredTables::Head)?)?;
        let hhea = Hhea::from_reader(reader, offset_of(RequiredTables::Hhea)?)?;
        let maxp = Maxp::from_reader(reader, offset_of(RequiredTables::Maxp)?)?;
        let os2 = Os2::from_reader(reader, offset_of(RequiredTables::Os2)?)?;
        let post = Post::from_reader(reader, offset_of(RequiredTables::Post)?)?;
        let name = Name::from_reader(reader, offset_of(RequiredTables::Name)?)?;
        let cmap = Cmap::from_reader(reader, offset_of(RequiredTables::Cmap)?)?;
        let hmtx = Hmtx::from_reader(
            reader,
            offset_of(RequiredTables::Hmtx)?,
            hhea.number_of_h_metrics(),
            maxp.num_glyphs(),
        )?;

        Ok(Self {
            tables,
            head,
            hhea,
            maxp,
            os2,
            post,
            name,
            cmap,
            hmtx,
        })
    }

    /// Advance width of the glyph `code` maps to through the Windows
    /// Unicode BMP subtable
    pub fn advance_width_for(&self, code: u32) -> Option<u16> {
        let glyph = self.cmap.glyph_index(
            crate::ids::PLATFORM_WINDOWS,
            crate::ids::WINDOWS_UNICODE_BMP,
            code,
        )?;
        self.hmtx.advance_width(glyph)
    }
}

fn verify_checksums<B: Read + Seek>(
    reader: &mut VeroBufReader<B>,
    tables: &Tables,
    strict: bool,
) -> Result<(), VeroTypeError> {
    for (_, metadata) in tables.headers.iter() {
        let actual = metadata.compute_checksum(reader)?;
        if actual == metadata.checksum() {
            continue;
        }

        let mismatch = TableEncodingError::ChecksumMismatch {
            table: metadata.tag(),
            expected: metadata.checksum(),
            actual,
        };
        if strict {
            return Err(mismatch.into());
        }
        log::warn!("{mismatch}");
    }

    Ok(())
}
