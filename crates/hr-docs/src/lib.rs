//! HR Docs - employee rosters and generated HR documents
//!
//! This crate provides:
//! - Configuration and the company catalog
//! - Per-company employee rosters stored as CSV
//! - Letters (salary certificate, leave, unpaid leave, deduction) as PDF
//! - Employment contracts as DOCX
//! - Filename sanitizing and operator authentication
//!
//! # Example
//!
//! ```ignore
//! use hr_docs::{Catalog, HrConfig, LetterFonts, LetterRequest, LetterType};
//!
//! let config = HrConfig::from_file("hr.json")?;
//! let catalog = Catalog::from_config(&config)?;
//! let fonts = LetterFonts::load(&config)?;
//! let request = LetterRequest {
//!     company: "khalij".into(),
//!     letter_type: LetterType::SalaryCertificate,
//!     name: "Ali".into(),
//!     civil_id: "123".into(),
//!     job_title: "Engineer".into(),
//!     salary: "500".into(),
//!     ..Default::default()
//! };
//! let pdf = hr_docs::generate_letter(&catalog, &fonts, &request)?;
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod contract;
pub mod letter;
pub mod naming;
pub mod roster;

pub use auth::{ConfiguredCredentials, IdentityProvider};
pub use catalog::{Catalog, Company, CompanyKey, LibraryDocument, LibraryKind};
pub use config::HrConfig;
pub use contract::{contract_file_name, generate_contract, ContractRequest, LaborOffice};
pub use letter::{
    compose_letter, generate_letter, letter_file_name, render_letter, LetterFonts, LetterLayout,
    LetterRequest, LetterType,
};
pub use naming::sanitize_filename;
pub use roster::{Employee, Roster, RosterStore, COLUMNS};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during HR document operations
#[derive(Debug, Error)]
pub enum HrError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse {path}: {reason}")]
    ParseFailure { path: PathBuf, reason: String },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown company: {0}")]
    UnknownCompany(String),

    #[error("Unknown library document: {0}")]
    UnknownLibraryEntry(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("DOCX error: {0}")]
    Docx(#[from] docx_core::DocxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for HR document operations
pub type Result<T> = std::result::Result<T, HrError>;

/// Fail with `MissingField` when `value` is empty after trimming
pub(crate) fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(HrError::MissingField(field));
    }
    Ok(value)
}

/// Read an optional image file
///
/// Images are decoration: a missing or unreadable file is logged and
/// skipped rather than failing the document.
pub(crate) fn read_optional_image(path: Option<&Path>) -> Option<Vec<u8>> {
    let path = path?;
    match std::fs::read(path) {
        Ok(data) => Some(data),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "image not found, skipping");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "image unreadable, skipping");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert_eq!(require("name", "  Ali ").unwrap(), "Ali");
        assert!(matches!(
            require("civil_id", "   "),
            Err(HrError::MissingField("civil_id"))
        ));
    }
}
