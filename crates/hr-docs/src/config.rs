//! Configuration
//!
//! Loaded from JSON. Every field has a default, so a config file only needs
//! the values it overrides. The defaults describe a stock deployment:
//! six companies, two managers and three library entries, with all files in
//! the working directory.

use crate::{HrError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HrConfig {
    /// Base directory for images, fonts and library documents
    pub assets_dir: PathBuf,
    /// Directory holding roster CSV files
    pub roster_dir: PathBuf,
    pub fonts: FontConfig,
    /// Signature used for every manager without a company-specific one
    pub default_signature: PathBuf,
    /// Exactly two names; the second signs with company-specific signatures
    pub managers: Vec<String>,
    pub companies: Vec<CompanyConfig>,
    pub library: Vec<LibraryConfig>,
    pub credentials: Option<CredentialsConfig>,
}

/// TrueType fonts for PDF letters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    pub regular: PathBuf,
    /// Falls back to `regular` when absent
    #[serde(default)]
    pub bold: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyConfig {
    /// Stable lookup key
    pub key: String,
    pub display_name: String,
    pub roster_file: PathBuf,
    #[serde(default)]
    pub logo: Option<PathBuf>,
    #[serde(default)]
    pub manager_signature: Option<PathBuf>,
    /// Field of business named in the contract recital
    #[serde(default = "default_industry")]
    pub industry: String,
}

/// A company's static license and signature attestation documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub key: String,
    pub display_name: String,
    pub license: PathBuf,
    pub attestation: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub username: String,
    /// Lowercase hex SHA-256 of the password
    pub password_sha256: String,
}

fn default_industry() -> String {
    "المباني".to_string()
}

fn company(
    key: &str,
    display_name: &str,
    roster_file: &str,
    logo: &str,
    manager_signature: &str,
) -> CompanyConfig {
    CompanyConfig {
        key: key.to_string(),
        display_name: display_name.to_string(),
        roster_file: roster_file.into(),
        logo: Some(logo.into()),
        manager_signature: Some(manager_signature.into()),
        industry: default_industry(),
    }
}

fn library(key: &str, display_name: &str, license: &str, attestation: &str) -> LibraryConfig {
    LibraryConfig {
        key: key.to_string(),
        display_name: display_name.to_string(),
        license: license.into(),
        attestation: attestation.into(),
    }
}

impl Default for HrConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("."),
            roster_dir: PathBuf::from("."),
            fonts: FontConfig {
                regular: PathBuf::from("arial.ttf"),
                bold: None,
            },
            default_signature: PathBuf::from("sig2.png"),
            managers: vec![
                "أحمد محمد عباس البلوشي".to_string(),
                "منة الله احمد محمود السيد".to_string(),
            ],
            companies: vec![
                company(
                    "khalij",
                    "الخليج العالمية لتشييد المباني",
                    "موظفي_الخليج.csv",
                    "logo_khalij.png",
                    "sig1.png",
                ),
                company(
                    "misrkwt",
                    "الشركة المصرية الكويتية لتشيد المباني",
                    "موظفي_المصرية_الكويتية.csv",
                    "logo_misr_kwt.png",
                    "sig1_misrkwt.png",
                ),
                company(
                    "ai",
                    "شركة الذكاء العالي لاصلاح وصيانه الحواسيب الشخصيه او المحموله",
                    "موظفي_الذكاء.csv",
                    "logo_ai.png",
                    "sig1_ai.png",
                ),
                company(
                    "gulfhome",
                    "شركة جلف هوم العالميه للاستيراد والتصدير",
                    "موظفي_جلفهوم.csv",
                    "logo_gulfhome.png",
                    "sig1_gulfhome.png",
                ),
                company(
                    "harmonykids",
                    "شركة هارموني كيدز لبيع ملابس الاطفال",
                    "موظفي_هارمونيكيدز.csv",
                    "logo_harmonykids.png",
                    "sig1_harmonykids.png",
                ),
                company(
                    "realestate",
                    "شركة جلف العالميه العقاريه",
                    "موظفي_جلف_العقارية.csv",
                    "logo_realestate.png",
                    "sig1_realestate.png",
                ),
            ],
            library: vec![
                library(
                    "khalij",
                    "شركه الخليج العالميه لتشيد المباني",
                    "رخصه الخليج.pdf",
                    "اعتماد الخليج.pdf",
                ),
                library(
                    "misrkwt",
                    "الشركه المصريه الكويتيه لتشيد المباني",
                    "رخصه المصريه.pdf",
                    "اعتماد المصريه الكويتيه.pdf",
                ),
                library(
                    "ai",
                    "الذكاء العالي لاصلاح وصيانه الحواسيب الشخصيه والمحموله",
                    "رخصه الذكاء.pdf",
                    "اعتماد الذكاء.pdf",
                ),
            ],
            credentials: None,
        }
    }
}

impl HrConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: HrConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HrError::NotFound(path.to_path_buf()),
            _ => HrError::Io(e),
        })?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), companies = config.companies.len(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.managers.len() != 2 {
            return Err(HrError::InvalidConfig(format!(
                "expected exactly 2 managers, found {}",
                self.managers.len()
            )));
        }

        let mut keys = HashSet::new();
        for company in &self.companies {
            if company.key.trim().is_empty() {
                return Err(HrError::InvalidConfig("empty company key".to_string()));
            }
            if !keys.insert(company.key.as_str()) {
                return Err(HrError::InvalidConfig(format!(
                    "duplicate company key: {}",
                    company.key
                )));
            }
        }

        let mut keys = HashSet::new();
        for entry in &self.library {
            if !keys.insert(entry.key.as_str()) {
                return Err(HrError::InvalidConfig(format!(
                    "duplicate library key: {}",
                    entry.key
                )));
            }
        }
        Ok(())
    }

    /// Resolve a path relative to `assets_dir`; absolute paths pass through
    pub fn asset_path(&self, path: &Path) -> PathBuf {
        self.assets_dir.join(path)
    }

    pub fn roster_path(&self, path: &Path) -> PathBuf {
        self.roster_dir.join(path)
    }
}
