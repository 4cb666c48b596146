use std::fmt;
use std::str::FromStr;

/// Everything known about a supported icon type.
struct IconTypeInfo {
    ostype: OSType,
    pixel_width: u32,
    pixel_height: u32,
}

macro_rules! icon_types {
    ($($(#[$doc:meta])* $variant:ident => ($ostype:expr, $width:expr,
                                            $height:expr),)+) => {
        /// Types of icon elements whose payload may be an embedded PNG or
        /// JPEG image.
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub enum IconType {
            $($(#[$doc])* $variant,)+
        }

        /// The supported icon types, in declaration order.  An OSType is
        /// supported if and only if it appears in this table.
        const ICON_TYPES: &[(IconType, IconTypeInfo)] = &[
            $((IconType::$variant, IconTypeInfo {
                ostype: OSType(*$ostype),
                pixel_width: $width,
                pixel_height: $height,
            }),)+
        ];
    };
}

icon_types! {
    /// 48x48 icon.
    RGBA32_48x48 => (b"icp6", 48, 48),
    /// 128x128 icon.
    RGBA32_128x128 => (b"ic07", 128, 128),
    /// 256x256 icon.
    RGBA32_256x256 => (b"ic08", 256, 256),
    /// 512x512 icon.
    RGBA32_512x512 => (b"ic09", 512, 512),
    /// 512x512 icon at 2x "retina" density (so, 1024 by 1024 pixels).
    RGBA32_512x512_2x => (b"ic10", 1024, 1024),
    /// 16x16 icon at 2x "retina" density (so, 32 by 32 pixels).
    RGBA32_16x16_2x => (b"ic11", 32, 32),
    /// 32x32 icon at 2x "retina" density (so, 64 by 64 pixels).
    RGBA32_32x32_2x => (b"ic12", 64, 64),
    /// 128x128 icon at 2x "retina" density (so, 256 by 256 pixels).
    RGBA32_128x128_2x => (b"ic13", 256, 256),
    /// 256x256 icon at 2x "retina" density (so, 512 by 512 pixels).
    RGBA32_256x256_2x => (b"ic14", 512, 512),
    /// 18x18 icon at 2x "retina" density (so, 36 by 36 pixels).
    RGBA32_18x18_2x => (b"icsB", 36, 36),
    /// 24x24 icon.
    RGBA32_24x24 => (b"sb24", 24, 24),
    /// 24x24 icon at 2x "retina" density (so, 48 by 48 pixels).
    RGBA32_24x24_2x => (b"SB24", 48, 48),
}

impl IconType {
    /// Get the icon type associated with the given OSType, if any.
    ///
    /// # Examples
    /// ```
    /// use icns_extract::{IconType, OSType};
    /// assert_eq!(IconType::from_ostype(OSType(*b"ic11")),
    ///            Some(IconType::RGBA32_16x16_2x));
    /// assert_eq!(IconType::from_ostype(OSType(*b"is32")), None);
    /// ```
    pub fn from_ostype(ostype: OSType) -> Option<IconType> {
        ICON_TYPES
            .iter()
            .find(|(_, info)| info.ostype == ostype)
            .map(|&(icon_type, _)| icon_type)
    }

    /// Returns every supported icon type, in table order.
    pub fn all() -> impl Iterator<Item = IconType> {
        ICON_TYPES.iter().map(|&(icon_type, _)| icon_type)
    }

    /// Get the OSType that represents this icon type.
    pub fn ostype(self) -> OSType {
        self.info().ostype
    }

    /// Returns the pixel data width of this icon type.  For 2x "retina"
    /// density icons, this is twice the screen width.
    ///
    /// # Examples
    /// ```
    /// use icns_extract::IconType;
    /// assert_eq!(IconType::RGBA32_48x48.pixel_width(), 48);
    /// assert_eq!(IconType::RGBA32_512x512_2x.pixel_width(), 1024);
    /// ```
    pub fn pixel_width(self) -> u32 {
        self.info().pixel_width
    }

    /// Returns the pixel data height of this icon type.  For 2x "retina"
    /// density icons, this is twice the screen height.
    ///
    /// # Examples
    /// ```
    /// use icns_extract::IconType;
    /// assert_eq!(IconType::RGBA32_18x18_2x.pixel_height(), 36);
    /// assert_eq!(IconType::RGBA32_24x24.pixel_height(), 24);
    /// ```
    pub fn pixel_height(self) -> u32 {
        self.info().pixel_height
    }

    fn info(self) -> &'static IconTypeInfo {
        &ICON_TYPES[self as usize].1
    }
}

/// A Macintosh OSType (also known as a ResType), used in ICNS files to
/// identify the type of each record.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        let &OSType(raw) = self;
        for &byte in &raw {
            write!(out, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl FromStr for OSType {
    type Err = String;

    fn from_str(input: &str) -> Result<OSType, String> {
        let bytes = input.as_bytes();
        if bytes.len() != 4 {
            Err(format!("OSType string must be 4 bytes (was {})", bytes.len()))
        } else {
            let mut raw = [0u8; 4];
            raw.clone_from_slice(bytes);
            Ok(OSType(raw))
        }
    }
}
