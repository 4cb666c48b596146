/// The first four bytes of a PNG file.
const PNG_MAGIC: &[u8] = b"\x89PNG";

/// A JPEG start-of-image marker followed by the first byte of the next
/// marker.
const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff";

/// The encoding of an icon record's data payload, as identified by its
/// leading bytes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ImageFormat {
    /// A PNG file.
    Png,
    /// A JPEG file.
    Jpeg,
    /// Anything else (including JPEG 2000 and empty payloads).
    Unknown,
}

impl ImageFormat {
    /// Identifies the format of a payload from its magic bytes.
    pub fn sniff(data: &[u8]) -> ImageFormat {
        if data.starts_with(PNG_MAGIC) {
            ImageFormat::Png
        } else if data.starts_with(JPEG_MAGIC) {
            ImageFormat::Jpeg
        } else {
            ImageFormat::Unknown
        }
    }

    /// Returns true for any format other than `Unknown`.
    pub fn is_known(self) -> bool {
        self != ImageFormat::Unknown
    }

    /// Returns the file extension used when writing a payload of this
    /// format to disk, or `None` if the format is unknown.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            ImageFormat::Png => Some("png"),
            ImageFormat::Jpeg => Some("jpeg"),
            ImageFormat::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_png() {
        let data = b"\x89PNG\r\n\x1a\n\0\0\0\x0dIHDR";
        assert_eq!(ImageFormat::sniff(data), ImageFormat::Png);
    }

    #[test]
    fn sniff_jpeg() {
        assert_eq!(ImageFormat::sniff(b"\xff\xd8\xff\xe0\0\x10JFIF"),
                   ImageFormat::Jpeg);
    }

    #[test]
    fn sniff_unknown() {
        assert_eq!(ImageFormat::sniff(b""), ImageFormat::Unknown);
        assert_eq!(ImageFormat::sniff(b"\x89PN"), ImageFormat::Unknown);
        assert_eq!(ImageFormat::sniff(b"\xff\xd8"), ImageFormat::Unknown);
        // JPEG 2000 codestream and file signature box.
        assert_eq!(ImageFormat::sniff(b"\xff\x4f\xff\x51"),
                   ImageFormat::Unknown);
        assert_eq!(ImageFormat::sniff(b"\0\0\0\x0cjP  \r\n\x87\n"),
                   ImageFormat::Unknown);
    }

    #[test]
    fn extensions() {
        assert_eq!(ImageFormat::Png.extension(), Some("png"));
        assert_eq!(ImageFormat::Jpeg.extension(), Some("jpeg"));
        assert_eq!(ImageFormat::Unknown.extension(), None);
        assert!(ImageFormat::Jpeg.is_known());
        assert!(!ImageFormat::Unknown.is_known());
    }
}
