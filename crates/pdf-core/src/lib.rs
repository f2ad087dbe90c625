//! PDF Core - Low-level PDF generation
//!
//! This crate provides functionality for:
//! - Building PDF documents page by page
//! - Embedding TrueType fonts (Type0 / Identity-H)
//! - Inserting text at specific coordinates
//! - Inserting images (JPEG, PNG)
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, FontFamily, PageSize, PdfDocument};
//!
//! let mut doc = PdfDocument::new(PageSize::A4);
//! let page = doc.add_page();
//! doc.register_font_family("body", FontFamily::from_ttf("body", &ttf, None)?)?;
//! doc.set_font("body", 12.0)?;
//! doc.insert_text("Hello, World!", page, 100.0, 72.0, Align::Left)?;
//! std::fs::write("output.pdf", doc.into_bytes()?)?;
//! ```

mod document;
mod font;
mod image;
mod text;

pub use document::{PageSize, PdfDocument};
pub use font::{FontData, FontFamily, FontWeight};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Points per millimetre
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimetres to points
pub fn mm(value: f64) -> f64 {
    value * PT_PER_MM
}

/// Zlib-compress a stream body for `/Filter /FlateDecode`
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_mm() {
        assert!((mm(25.4) - 72.0).abs() < 1e-9);
        assert!((mm(210.0) - PageSize::A4.width).abs() < 0.01);
    }

    #[test]
    fn test_deflate_roundtrip() {
        let data = b"BT /F1 12 Tf ET\n".repeat(20);
        let compressed = deflate(&data).unwrap();
        assert!(compressed.len() < data.len());

        let mut out = Vec::new();
        flate2::read::ZlibDecoder::new(&compressed[..])
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, data);
    }
}
