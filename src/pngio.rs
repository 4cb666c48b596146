use crate::record::IconRecord;
use std::io::{self, Cursor};

impl IconRecord {
    /// Reads the header of the record's embedded PNG and returns the image's
    /// actual `(width, height)`.  Returns an error if the payload is not a
    /// well-formed PNG.  No pixel data is decoded.
    pub fn png_dimensions(&self) -> io::Result<(u32, u32)> {
        let mut decoder = png::Decoder::new(Cursor::new(self.data()));
        let info = decoder.read_header_info()?;
        Ok((info.width, info.height))
    }
}

#[cfg(test)]
mod tests {
    use crate::icontype::IconType;
    use crate::record::IconRecord;

    #[test]
    fn png_dimensions() {
        let mut data = Vec::<u8>::new();
        {
            let mut encoder = png::Encoder::new(&mut data, 32, 32);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0u8; 32 * 32 * 4]).unwrap();
        }
        let record = IconRecord::new(IconType::RGBA32_16x16_2x, data);
        assert_eq!(record.png_dimensions().unwrap(), (32, 32));
    }

    #[test]
    fn png_dimensions_of_garbage() {
        let record = IconRecord::new(IconType::RGBA32_16x16_2x,
                                     b"\x89PNG garbage".to_vec());
        assert!(record.png_dimensions().is_err());
    }
}
