//! Image XObjects for PDF documents
//!
//! JPEG files are embedded as-is behind DCTDecode. PNG files are decoded,
//! flattened onto white, and re-compressed with FlateDecode.

use crate::{PdfError, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use lopdf::{Dictionary, Object, Stream};
use std::io::Cursor;

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// Display size in points for an image of `pixels` drawn `width` points wide
pub(crate) fn fit_width(pixels: (u32, u32), width: f64) -> (f64, f64) {
    let (pw, ph) = (pixels.0.max(1) as f64, pixels.1.max(1) as f64);
    (width, width * ph / pw)
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Ok(ImageFormat::Jpeg)
    } else if data.starts_with(&PNG_MAGIC) {
        Ok(ImageFormat::Png)
    } else {
        Err(PdfError::ImageError("Unknown image format".to_string()))
    }
}

/// Width, height and component count read from a JPEG frame header
fn jpeg_frame_info(data: &[u8]) -> Result<(u32, u32, u8)> {
    let mut i = 2;
    while i + 9 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        // SOFn, excluding DHT (C4), JPG (C8) and DAC (CC)
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok((width, height, data[i + 9]));
        }
        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            break;
        }
        i += 2 + length;
    }
    Err(PdfError::ImageError("JPEG frame header not found".to_string()))
}

/// An image ready to be written as a PDF XObject
#[derive(Debug, Clone)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub color_space: &'static str,
    pub filter: &'static str,
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Build an XObject from JPEG or PNG file bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match detect_format(data)? {
            ImageFormat::Jpeg => Self::from_jpeg(data),
            ImageFormat::Png => Self::from_png(data),
        }
    }

    fn from_jpeg(data: &[u8]) -> Result<Self> {
        let (width, height, components) = jpeg_frame_info(data)?;
        let color_space = match components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        };
        Ok(Self {
            width,
            height,
            color_space,
            filter: "DCTDecode",
            data: data.to_vec(),
        })
    }

    fn from_png(data: &[u8]) -> Result<Self> {
        let decoder = ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .into_decoder()?;
        let (width, height) = decoder.dimensions();
        let has_alpha = decoder.color_type().has_alpha();
        let is_gray = !decoder.color_type().has_color();
        let image = DynamicImage::from_decoder(decoder)?;

        let over_white = |value: u8, alpha: u8| -> u8 {
            let a = alpha as u16;
            ((value as u16 * a + 255 * (255 - a)) / 255) as u8
        };

        let (raw, color_space) = match (is_gray, has_alpha) {
            (true, false) => (image.to_luma8().into_raw(), "DeviceGray"),
            (true, true) => (
                image
                    .to_luma_alpha8()
                    .pixels()
                    .map(|p| over_white(p[0], p[1]))
                    .collect(),
                "DeviceGray",
            ),
            (false, false) => (image.to_rgb8().into_raw(), "DeviceRGB"),
            (false, true) => (
                image
                    .to_rgba8()
                    .pixels()
                    .flat_map(|p| {
                        [
                            over_white(p[0], p[3]),
                            over_white(p[1], p[3]),
                            over_white(p[2], p[3]),
                        ]
                    })
                    .collect(),
                "DeviceRGB",
            ),
        };

        Ok(Self {
            width,
            height,
            color_space,
            filter: "FlateDecode",
            data: crate::deflate(&raw)?,
        })
    }

    /// Convert to a lopdf stream
    pub fn to_pdf_stream(&self) -> Stream {
        let dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(self.width as i64)),
            ("Height", Object::Integer(self.height as i64)),
            ("ColorSpace", Object::Name(self.color_space.as_bytes().to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
            ("Filter", Object::Name(self.filter.as_bytes().to_vec())),
        ]);
        Stream::new(dict, self.data.clone())
    }
}

/// Generate operators that paint image resource `name` into a box
///
/// `x`/`y` are the lower-left corner in PDF coordinates.
pub fn generate_image_operators(name: &str, x: f64, y: f64, width: f64, height: f64) -> Vec<u8> {
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{name} Do\nQ\n").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .expect("encode png");
        buffer
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(
            detect_format(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]).unwrap(),
            ImageFormat::Png
        );
        assert!(detect_format(&[0x00; 8]).is_err());
        assert!(detect_format(&[0xFF]).is_err());
    }

    #[test]
    fn test_jpeg_frame_info() {
        let jpeg = vec![
            0xFF, 0xD8, // SOI
            0xFF, 0xC0, 0x00, 0x11, 0x08, // SOF0, length, precision
            0x00, 0x64, // height 100
            0x00, 0xC8, // width 200
            0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01, 0xFF, 0xD9,
        ];
        let xobject = ImageXObject::from_bytes(&jpeg).unwrap();
        assert_eq!((xobject.width, xobject.height), (200, 100));
        assert_eq!(xobject.color_space, "DeviceRGB");
        assert_eq!(xobject.filter, "DCTDecode");
        assert_eq!(xobject.data, jpeg);
    }

    #[test]
    fn test_jpeg_without_frame_header() {
        assert!(ImageXObject::from_bytes(&[0xFF, 0xD8, 0xFF, 0x00, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_png_gray() {
        let img = DynamicImage::ImageLuma8(image::ImageBuffer::new(16, 8));
        let xobject = ImageXObject::from_bytes(&png_bytes(img)).unwrap();
        assert_eq!((xobject.width, xobject.height), (16, 8));
        assert_eq!(xobject.color_space, "DeviceGray");
        assert_eq!(xobject.filter, "FlateDecode");
    }

    #[test]
    fn test_png_alpha_flattened_to_white() {
        // Fully transparent black pixels become white
        let img = DynamicImage::ImageRgba8(image::ImageBuffer::from_pixel(
            2,
            2,
            image::Rgba([0, 0, 0, 0]),
        ));
        let xobject = ImageXObject::from_bytes(&png_bytes(img)).unwrap();
        assert_eq!(xobject.color_space, "DeviceRGB");

        let mut raw = Vec::new();
        std::io::Read::read_to_end(
            &mut flate2::read::ZlibDecoder::new(&xobject.data[..]),
            &mut raw,
        )
        .unwrap();
        assert_eq!(raw, vec![255u8; 12]);
    }

    #[test]
    fn test_to_pdf_stream() {
        let xobject = ImageXObject {
            width: 100,
            height: 50,
            color_space: "DeviceRGB",
            filter: "DCTDecode",
            data: vec![1, 2, 3],
        };
        let stream = xobject.to_pdf_stream();
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 100);
        assert_eq!(
            stream.dict.get(b"Subtype").unwrap().as_name().unwrap(),
            b"Image"
        );
        assert_eq!(stream.content, vec![1, 2, 3]);
    }

    #[test]
    fn test_generate_image_operators() {
        let ops = String::from_utf8(generate_image_operators("Im1", 100.0, 200.0, 50.0, 75.0))
            .unwrap();
        assert!(ops.contains("50 0 0 75 100 200 cm"));
        assert!(ops.contains("/Im1 Do"));
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width((800, 600), 100.0), (100.0, 75.0));
        assert_eq!(fit_width((600, 800), 75.0), (75.0, 100.0));
        assert_eq!(fit_width((0, 0), 10.0), (10.0, 10.0));
    }
}
