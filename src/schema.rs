//! Declarative record decoding.
//!
//! A table layout is written down once as an ordered slice of [`Field`]s and
//! interpreted by [`decode_fields`], which reads every field in declaration
//! order into a [`Record`]. Fields without a name are read and dropped, so
//! reserved words still consume their bytes.

use std::io::{Read, Seek};

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    tables::TableEncodingError,
    types::{Fixed, LongDateTime, Tag},
};

/// The on-disk representation of a single field
#[derive(Clone, Copy, Debug)]
pub enum FieldType {
    Byte,
    Char,
    UShort,
    Short,
    ULong,
    Long,
    Fixed,
    /// Signed distance in design units
    FWord,
    /// Unsigned distance in design units
    UFWord,
    LongDateTime,
    Tag,
    /// Four ASCII bytes with surrounding whitespace trimmed
    String,
    /// A fixed number of repetitions of one element type
    Array(&'static FieldType, usize),
    /// A group of sub-records repeated as many times as the value of an
    /// earlier field of the same record says
    ContextArray {
        count_field: &'static str,
        schema: &'static [Field],
    },
}

#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub name: Option<&'static str>,
    pub ty: FieldType,
}

impl Field {
    pub const fn named(name: &'static str, ty: FieldType) -> Self {
        Self {
            name: Some(name),
            ty,
        }
    }

    /// A reserved or padding field
    pub const fn reserved(ty: FieldType) -> Self {
        Self { name: None, ty }
    }
}

/// A decoded field value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Byte(u8),
    Char(i8),
    UShort(u16),
    Short(i16),
    ULong(u32),
    Long(i32),
    Fixed(Fixed),
    LongDateTime(LongDateTime),
    Tag(Tag),
    Text(String),
    Array(Vec<Value>),
    Records(Vec<Record>),
}

impl Value {
    pub fn as_u8(&self) -> Option<u8> {
        match *self {
            Value::Byte(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match *self {
            Value::UShort(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match *self {
            Value::Short(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Value::ULong(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_fixed(&self) -> Option<Fixed> {
        match *self {
            Value::Fixed(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<LongDateTime> {
        match *self {
            Value::LongDateTime(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            Value::Records(v) => Some(v),
            _ => None,
        }
    }

    /// Interprets an unsigned integer value as a repetition count
    pub fn as_count(&self) -> Option<usize> {
        match *self {
            Value::Byte(v) => Some(usize::from(v)),
            Value::UShort(v) => Some(usize::from(v)),
            Value::ULong(v) => usize::try_from(v).ok(),
            _ => None,
        }
    }
}

/// An ordered, read-only mapping from field name to decoded value
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates the fields in the order they were decoded
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub(crate) fn insert(&mut self, name: &'static str, value: Value) {
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Looks up a field which the table's own schema guarantees
    pub(crate) fn require<'a, T>(
        &'a self,
        name: &'static str,
        project: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T, TableEncodingError> {
        self.get(name)
            .and_then(project)
            .ok_or(TableEncodingError::MissingField { field: name })
    }

    pub(crate) fn require_u16(&self, name: &'static str) -> Result<u16, TableEncodingError> {
        self.require(name, Value::as_u16)
    }

    pub(crate) fn require_i16(&self, name: &'static str) -> Result<i16, TableEncodingError> {
        self.require(name, Value::as_i16)
    }

    pub(crate) fn require_u32(&self, name: &'static str) -> Result<u32, TableEncodingError> {
        self.require(name, Value::as_u32)
    }

    pub(crate) fn require_fixed(&self, name: &'static str) -> Result<Fixed, TableEncodingError> {
        self.require(name, Value::as_fixed)
    }
}

/// Decodes `schema` in order at the reader's current position, appending
/// every named field to `record`.
pub fn decode_fields<B: Read + Seek>(
    reader: &mut VeroBufReader<B>,
    schema: &[Field],
    record: &mut Record,
) -> Result<(), VeroTypeError> {
    for field in schema {
        let value = decode_value(reader, &field.ty, record)?;
        if let Some(name) = field.name {
            record.insert(name, value);
        }
    }

    Ok(())
}

/// Decodes a whole record from `schema`
pub fn decode_record<B: Read + Seek>(
    reader: &mut VeroBufReader<B>,
    schema: &[Field],
) -> Result<Record, VeroTypeError> {
    let mut record = Record::new();
    decode_fields(reader, schema, &mut record)?;

    Ok(record)
}

fn decode_value<B: Read + Seek>(
    reader: &mut VeroBufReader<B>,
    ty: &FieldType,
    context: &Record,
) -> Result<Value, VeroTypeError> {
    Ok(match *ty {
        FieldType::Byte => Value::Byte(reader.read_u8()?),
        FieldType::Char => Value::Char(reader.read_i8()?),
        FieldType::UShort | FieldType::UFWord => Value::UShort(reader.read_u16()?),
        FieldType::Short | FieldType::FWord => Value::Short(reader.read_i16()?),
        FieldType::ULong => Value::ULong(reader.read_u32()?),
        FieldType::Long => Value::Long(reader.read_i32()?),
        FieldType::Fixed => Value::Fixed(Fixed::from_bits(reader.read_i32()?)),
        FieldType::LongDateTime => Value::LongDateTime(LongDateTime::new(reader.read_i64()?)),
        FieldType::Tag => {
            let mut bytes = [0u8; 4];
            reader.read_exact(&mut bytes)?;
            Value::Tag(Tag::new(&bytes))
        }
        FieldType::String => {
            let mut bytes = [0u8; 4];
            reader.read_exact(&mut bytes)?;
            let text: String = bytes.iter().map(|&b| char::from(b)).collect();
            Value::Text(text.trim().to_owned())
        }
        FieldType::Array(element, count) => Value::Array(
            (0..count)
                .map(|_| decode_value(reader, element, context))
                .collect::<Result<_, _>>()?,
        ),
        FieldType::ContextArray {
            count_field,
            schema,
        } => {
            let count = context.require(count_field, Value::as_count)?;
            let mut records = Vec::with_capacity(count);
            for _ in 0..count {
                records.push(decode_record(reader, schema)?);
            }
            Value::Records(records)
        }
    })
}

/// A value a discriminator field is compared against
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Discriminant {
    UShort(u16),
    Fixed(Fixed),
}

impl Discriminant {
    fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Discriminant::UShort(expected), Value::UShort(actual)) => expected == *actual,
            (Discriminant::Fixed(expected), Value::Fixed(actual)) => expected == *actual,
            _ => false,
        }
    }
}

/// Which format-specific suffix, if any, followed the common fields
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Index into [`MultiFormat::formats`]
    Matched(usize),
    /// The discriminator named no known format; only the common fields exist
    Unmatched,
}

/// A record whose trailing fields depend on a discriminator decoded earlier
#[derive(Clone, Copy, Debug)]
pub struct MultiFormat {
    pub common: &'static [Field],
    /// Must name a field of `common`
    pub discriminator: &'static str,
    pub formats: &'static [(Discriminant, &'static [Field])],
}

impl MultiFormat {
    pub fn decode<B: Read + Seek>(
        &self,
        reader: &mut VeroBufReader<B>,
    ) -> Result<(Record, Dispatch), VeroTypeError> {
        let mut record = decode_record(reader, self.common)?;
        let discriminator = record.require(self.discriminator, |value| Some(value.clone()))?;

        let matched = self
            .formats
            .iter()
            .position(|(key, _)| key.matches(&discriminator));

        match matched {
            Some(index) => {
                decode_fields(reader, self.formats[index].1, &mut record)?;
                Ok((record, Dispatch::Matched(index)))
            }
            None => Ok((record, Dispatch::Unmatched)),
        }
    }
}
