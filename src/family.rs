use log::{debug, trace, warn};
use std::io;
use std::slice;
use std::vec;

use super::icontype::{IconType, OSType};
use super::reader::{Endianness, StreamReader};
use super::record::IconRecord;

/// The first four bytes of an ICNS file:
const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The OSType of the table-of-contents record:
const TOC_MAGIC_LITERAL: &[u8; 4] = b"TOC ";

/// The length of one table-of-contents entry, in bytes:
const TOC_ENTRY_LENGTH: u32 = 8;

/// One entry in the table of contents: the type and length of a record.
struct TocEntry {
    ostype: OSType,
    length: u32,
}

/// The images extracted from a single ICNS file, in file order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IconFamily {
    records: Vec<IconRecord>,
}

impl IconFamily {
    /// Parses an ICNS file held entirely in memory.
    ///
    /// Only files with a table of contents are understood.  A buffer that is
    /// not an ICNS file, or an ICNS file without a `TOC ` record, yields an
    /// empty family rather than an error, as does any truncation.  Records
    /// whose OSType is not a supported [`IconType`](enum.IconType.html) are
    /// skipped.
    ///
    /// The only error is a table of contents whose length is not a multiple
    /// of eight bytes, in which case nothing from the file can be trusted.
    pub fn parse(bytes: &[u8]) -> io::Result<IconFamily> {
        let mut reader = StreamReader::new(bytes);
        let mut family = IconFamily::default();
        let magic = reader.read_bytes(4, Endianness::LittleEndian);
        if magic != ICNS_MAGIC_LITERAL {
            debug!("not an icns file (wrong magic literal)");
            return Ok(family);
        }
        let file_length = reader.read_u32(Endianness::BigEndian);
        trace!("declared file length {} (buffer is {} bytes)",
               file_length,
               reader.len());
        let entries = read_toc(&mut reader)?;
        let mut truncated = false;
        for entry in entries {
            let data = if truncated {
                Vec::new()
            } else {
                let data = reader.read_bytes(entry.length as usize,
                                             Endianness::LittleEndian);
                if data.len() != entry.length as usize {
                    warn!("'{}' record truncated ({} bytes declared, {} \
                           remaining); following records are empty",
                          entry.ostype,
                          entry.length,
                          reader.remaining());
                    truncated = true;
                }
                data
            };
            match IconType::from_ostype(entry.ostype) {
                Some(icon_type) => {
                    let record = IconRecord::new(icon_type, data);
                    debug!("'{}' record: {}x{} {:?}, {} bytes",
                           record.ostype(),
                           record.width(),
                           record.height(),
                           record.format(),
                           record.data().len());
                    family.records.push(record);
                }
                None => trace!("skipping unsupported '{}' record",
                               entry.ostype),
            }
        }
        Ok(family)
    }

    /// Returns the records in the order they appear in the file.
    pub fn records(&self) -> &[IconRecord] {
        &self.records
    }

    /// Returns the number of records in the family.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no images could be extracted from the file.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records whose payload is a PNG or JPEG image.
    pub fn extractable(&self) -> impl Iterator<Item = &IconRecord> {
        self.records.iter().filter(|record| record.format().is_known())
    }
}

impl IntoIterator for IconFamily {
    type Item = IconRecord;
    type IntoIter = vec::IntoIter<IconRecord>;

    fn into_iter(self) -> vec::IntoIter<IconRecord> {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a IconFamily {
    type Item = &'a IconRecord;
    type IntoIter = slice::Iter<'a, IconRecord>;

    fn into_iter(self) -> slice::Iter<'a, IconRecord> {
        self.records.iter()
    }
}

/// Reads the `TOC ` record that follows the file header.  Returns no entries
/// if the record is missing.
fn read_toc(reader: &mut StreamReader) -> io::Result<Vec<TocEntry>> {
    let ostype = reader.read_bytes(4, Endianness::LittleEndian);
    if ostype != TOC_MAGIC_LITERAL {
        debug!("icns file has no table of contents");
        return Ok(Vec::new());
    }
    let toc_length = reader.read_u32(Endianness::BigEndian);
    if toc_length % TOC_ENTRY_LENGTH != 0 {
        invalid_data!("invalid TOC record length ({}, but must be a \
                       multiple of {})",
                      toc_length,
                      TOC_ENTRY_LENGTH);
    }
    let num_entries = toc_length / TOC_ENTRY_LENGTH;
    debug!("table of contents lists {} record(s)", num_entries);
    let mut entries = Vec::new();
    for _ in 0..num_entries {
        let raw_ostype = reader.read_bytes(4, Endianness::LittleEndian);
        let length = reader.read_u32(Endianness::BigEndian);
        let ostype = match <[u8; 4]>::try_from(raw_ostype.as_slice()) {
            Ok(raw) => OSType(raw),
            Err(_) => {
                warn!("table of contents truncated after {} of {} entries",
                      entries.len(),
                      num_entries);
                break;
            }
        };
        entries.push(TocEntry { ostype, length });
    }
    Ok(entries)
}
