//! Well known identifiers shared by the `name` and `cmap` tables

pub const PLATFORM_UNICODE: u16 = 0;
pub const PLATFORM_MACINTOSH: u16 = 1;
pub const PLATFORM_ISO: u16 = 2;
pub const PLATFORM_WINDOWS: u16 = 3;
pub const PLATFORM_CUSTOM: u16 = 4;

pub const WINDOWS_SYMBOL: u16 = 0;
pub const WINDOWS_UNICODE_BMP: u16 = 1;
pub const WINDOWS_UNICODE_UCS4: u16 = 10;

pub const MACINTOSH_ROMAN: u16 = 0;

/// Windows language id for English (United States)
pub const LANGUAGE_WINDOWS_EN_US: u16 = 0x0409;
/// Macintosh language id for English
pub const LANGUAGE_MACINTOSH_ENGLISH: u16 = 0;

pub const NAME_COPYRIGHT: u16 = 0;
pub const NAME_FAMILY: u16 = 1;
pub const NAME_SUBFAMILY: u16 = 2;
pub const NAME_UNIQUE_ID: u16 = 3;
pub const NAME_FULL: u16 = 4;
pub const NAME_VERSION: u16 = 5;
pub const NAME_PS_NAME: u16 = 6;
pub const NAME_TRADEMARK: u16 = 7;
pub const NAME_MANUFACTURER: u16 = 8;
pub const NAME_DESIGNER: u16 = 9;
pub const NAME_DESCRIPTION: u16 = 10;
pub const NAME_VENDOR_URL: u16 = 11;
pub const NAME_DESIGNER_URL: u16 = 12;
pub const NAME_LICENSE: u16 = 13;
pub const NAME_LICENSE_URL: u16 = 14;
pub const NAME_TYPOGRAPHIC_FAMILY: u16 = 16;
pub const NAME_TYPOGRAPHIC_SUBFAMILY: u16 = 17;
pub const NAME_SAMPLE_TEXT: u16 = 19;
