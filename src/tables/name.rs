//! The [name](https://learn.microsoft.com/en-us/typography/opentype/spec/name) table
//!
//! Every name record points into a shared string storage area. Strings are
//! decoded per record, so records sharing bytes each get their own copy.

use std::{
    collections::BTreeMap,
    io::{Read, Seek},
};

use encoding_rs::{Encoding, MACINTOSH, UTF_16BE};

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    ids,
    schema::{Discriminant, Dispatch, Field, FieldType, MultiFormat, Record, Value},
    tables::TableEncodingError,
    types::Tag,
};

pub const TAG: Tag = Tag::new(b"name");

static NAME_RECORD: [Field; 6] = [
    Field::named("platformID", FieldType::UShort),
    Field::named("encodingID", FieldType::UShort),
    Field::named("languageID", FieldType::UShort),
    Field::named("nameID", FieldType::UShort),
    Field::named("length", FieldType::UShort),
    Field::named("offset", FieldType::UShort),
];

static LANG_TAG_RECORD: [Field; 2] = [
    Field::named("length", FieldType::UShort),
    Field::named("offset", FieldType::UShort),
];

static NAME: MultiFormat = MultiFormat {
    common: &[
        Field::named("format", FieldType::UShort),
        Field::named("count", FieldType::UShort),
        Field::named("stringOffset", FieldType::UShort),
        Field::named(
            "nameRecord",
            FieldType::ContextArray {
                count_field: "count",
                schema: &NAME_RECORD,
            },
        ),
    ],
    discriminator: "format",
    formats: &[(
        Discriminant::UShort(1),
        &[
            Field::named("langTagCount", FieldType::UShort),
            Field::named(
                "langTagRecord",
                FieldType::ContextArray {
                    count_field: "langTagCount",
                    schema: &LANG_TAG_RECORD,
                },
            ),
        ],
    )],
};

/// nameID → platformID → languageID → text
pub type NameStrings = BTreeMap<u16, BTreeMap<u16, BTreeMap<u16, String>>>;

/// Naming table
#[derive(Debug, Clone)]
pub struct Name {
    record: Record,
    strings: NameStrings,
}

impl Name {
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        offset: u64,
    ) -> Result<Self, VeroTypeError> {
        reader.seek_to(offset)?;
        let (record, dispatch) = NAME.decode(reader)?;

        let format = record.require_u16("format")?;
        match (dispatch, format) {
            (Dispatch::Unmatched, 0) => {}
            (Dispatch::Matched(_), _) => {
                return Err(TableEncodingError::unsupported(TAG, "format 1 language tags").into());
            }
            (Dispatch::Unmatched, other) => {
                return Err(TableEncodingError::unsupported(TAG, format!("format {other}")).into());
            }
        }

        let storage = offset + u64::from(record.require_u16("stringOffset")?);
        let mut strings = NameStrings::new();

        for name_record in record.require("nameRecord", Value::as_records)? {
            let platform_id = name_record.require_u16("platformID")?;
            let language_id = name_record.require_u16("languageID")?;
            let name_id = name_record.require_u16("nameID")?;
            let length = name_record.require_u16("length")?;

            reader.seek_to(storage + u64::from(name_record.require_u16("offset")?))?;
            let data = reader.read_bytes(length.into())?;

            let encoding = encoding_for(platform_id)?;
            let (text, had_errors) = encoding.decode_without_bom_handling(&data);
            if had_errors {
                log::warn!(
                    "name {name_id} (platform {platform_id}, language {language_id:#x}) is not valid {}",
                    encoding.name()
                );
            }
            log::trace!("name {name_id} platform {platform_id} language {language_id:#x}: {text:?}");

            let previous = strings
                .entry(name_id)
                .or_default()
                .entry(platform_id)
                .or_default()
                .insert(language_id, text.into_owned());
            if previous.is_some() {
                log::warn!(
                    "duplicate name {name_id} (platform {platform_id}, language {language_id:#x}), keeping the later one"
                );
            }
        }

        Ok(Self { record, strings })
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// The raw name records, in table order
    pub fn name_records(&self) -> &[Record] {
        self.record
            .get("nameRecord")
            .and_then(Value::as_records)
            .unwrap_or_default()
    }

    pub fn strings(&self) -> &NameStrings {
        &self.strings
    }

    pub fn get(&self, name_id: u16, platform_id: u16, language_id: u16) -> Option<&str> {
        self.strings
            .get(&name_id)?
            .get(&platform_id)?
            .get(&language_id)
            .map(String::as_str)
    }

    /// The PostScript name, preferring the Windows English (US) entry
    pub fn postscript_name(&self) -> Option<&str> {
        self.get(
            ids::NAME_PS_NAME,
            ids::PLATFORM_WINDOWS,
            ids::LANGUAGE_WINDOWS_EN_US,
        )
        .or_else(|| {
            self.strings
                .get(&ids::NAME_PS_NAME)?
                .values()
                .flat_map(BTreeMap::values)
                .next()
                .map(String::as_str)
        })
    }
}

fn encoding_for(platform_id: u16) -> Result<&'static Encoding, TableEncodingError> {
    match platform_id {
        ids::PLATFORM_UNICODE | ids::PLATFORM_WINDOWS => Ok(UTF_16BE),
        // TODO: honour the Macintosh encoding id instead of assuming Roman
        ids::PLATFORM_MACINTOSH => Ok(MACINTOSH),
        other => Err(TableEncodingError::unsupported(
            TAG,
            format!("strings for platform {other}"),
        )),
    }
}
