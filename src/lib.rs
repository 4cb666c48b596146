//! Library for extracting embedded images from Apple Icon Image (.icns) files
//!
//! Modern ICNS files store most of their icons as complete PNG (or, more
//! rarely, JPEG) files.  This crate locates those payloads through the file's
//! table of contents and hands them back verbatim, tagged with the icon type
//! and pixel dimensions that the record's OSType implies.  Legacy
//! RLE-compressed icons and masks are recognized by the parser but skipped.
//!
//! ```
//! use icns_extract::{IconFamily, ImageFormat};
//!
//! let bytes: &[u8] = b"icns\0\0\0\x1eTOC \0\0\0\x08ic07\0\0\0\x06\
//!                      \x89PNG\r\n";
//! let family = IconFamily::parse(bytes).unwrap();
//! let record = &family.records()[0];
//! assert_eq!(record.format(), ImageFormat::Png);
//! assert_eq!((record.width(), record.height()), (128, 128));
//! ```
//!
//! See https://en.wikipedia.org/wiki/Apple_Icon_Image_format for more
//! information about the file format.

#![warn(missing_docs)]

macro_rules! invalid_data {
    ($e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         format!($fmt, $($arg)+)))
    };
}

mod extract;
pub use self::extract::{output_file_name, ExtractError, ExtractOptions,
                        ExtractSummary, Extractor, Fallback, Sips};

mod family;
pub use self::family::IconFamily;

mod format;
pub use self::format::ImageFormat;

mod icontype;
pub use self::icontype::{IconType, OSType};

mod reader;
pub use self::reader::{Endianness, StreamReader};

mod record;
pub use self::record::IconRecord;

#[cfg(feature = "pngio")]
mod pngio;
