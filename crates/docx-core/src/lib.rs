//! DOCX Core - Word-processing document writer
//!
//! Builds the subset of WordprocessingML needed for letterhead documents:
//! - Paragraphs with alignment, right-to-left flag, bold/RTL runs, line breaks
//! - Page breaks
//! - Tables with a grid style
//! - Inline pictures (PNG, JPEG) in the body and in the page header
//!
//! # Example
//!
//! ```ignore
//! use docx_core::{Alignment, DocxDocument, Length, Paragraph};
//!
//! let mut doc = DocxDocument::new();
//! doc.add_paragraph(Paragraph::new().align(Alignment::Center).text("دولة الكويت"));
//! std::fs::write("out.docx", doc.to_bytes()?)?;
//! ```

mod document;
mod package;
mod xml;

pub use document::{
    Alignment, DocxDocument, Inline, Length, Paragraph, Picture, Run, Table, TableCell,
};

use thiserror::Error;

/// Errors that can occur while building or writing a document
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Invalid table cell: row {row}, column {col}")]
    InvalidCell { row: usize, col: usize },

    #[error("Package error: {0}")]
    PackageError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<image::ImageError> for DocxError {
    fn from(err: image::ImageError) -> Self {
        DocxError::ImageError(err.to_string())
    }
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocxError>;
