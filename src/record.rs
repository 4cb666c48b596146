use super::format::ImageFormat;
use super::icontype::{IconType, OSType};

/// One image extracted from an ICNS file: the raw payload of a supported
/// record, along with its type, pixel dimensions, and detected format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconRecord {
    icon_type: IconType,
    format: ImageFormat,
    data: Vec<u8>,
}

impl IconRecord {
    /// Creates a record of the given type, sniffing the payload's format.
    pub fn new(icon_type: IconType, data: Vec<u8>) -> IconRecord {
        IconRecord {
            icon_type,
            format: ImageFormat::sniff(&data),
            data,
        }
    }

    /// Returns the OSType for this record (e.g. `ic07` or `SB24`).
    pub fn ostype(&self) -> OSType {
        self.icon_type.ostype()
    }

    /// Returns the type of icon stored in this record.
    pub fn icon_type(&self) -> IconType {
        self.icon_type
    }

    /// Returns the format of the payload, as identified by its magic bytes.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the width of the icon, in pixels.
    pub fn width(&self) -> u32 {
        self.icon_type.pixel_width()
    }

    /// Returns the height of the icon, in pixels.
    pub fn height(&self) -> u32 {
        self.icon_type.pixel_height()
    }

    /// Returns the payload exactly as stored in the ICNS file.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the record, returning its payload.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_record() {
        let record = IconRecord::new(IconType::RGBA32_128x128,
                                     b"\x89PNG\r\n\x1a\n".to_vec());
        assert_eq!(record.ostype(), OSType(*b"ic07"));
        assert_eq!(record.format(), ImageFormat::Png);
        assert_eq!(record.width(), 128);
        assert_eq!(record.height(), 128);
        assert_eq!(record.data().len(), 8);
    }

    #[test]
    fn empty_record_is_unknown() {
        let record = IconRecord::new(IconType::RGBA32_24x24_2x, Vec::new());
        assert_eq!(record.format(), ImageFormat::Unknown);
        assert_eq!((record.width(), record.height()), (48, 48));
        assert!(record.into_data().is_empty());
    }
}
