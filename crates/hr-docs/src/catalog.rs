//! Company catalog and document library

use crate::config::HrConfig;
use crate::{HrError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Stable company identifier, independent of the display name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyKey(String);

impl CompanyKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CompanyKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for CompanyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A company with all paths resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub key: CompanyKey,
    pub display_name: String,
    pub roster_file: PathBuf,
    pub logo: Option<PathBuf>,
    pub manager_signature: Option<PathBuf>,
    pub industry: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    License,
    Attestation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDocument {
    pub key: String,
    pub display_name: String,
    pub license: PathBuf,
    pub attestation: PathBuf,
}

impl LibraryDocument {
    pub fn path(&self, kind: LibraryKind) -> &Path {
        match kind {
            LibraryKind::License => &self.license,
            LibraryKind::Attestation => &self.attestation,
        }
    }
}

/// Read-only company metadata shared by the roster store and generators
#[derive(Debug, Clone)]
pub struct Catalog {
    companies: BTreeMap<CompanyKey, Company>,
    /// Display order of the config file
    order: Vec<CompanyKey>,
    managers: Vec<String>,
    default_signature: PathBuf,
    library: BTreeMap<String, LibraryDocument>,
}

impl Catalog {
    pub fn from_config(config: &HrConfig) -> Result<Self> {
        config.validate()?;

        let mut companies = BTreeMap::new();
        let mut order = Vec::with_capacity(config.companies.len());
        for c in &config.companies {
            let key = CompanyKey::new(c.key.clone());
            order.push(key.clone());
            companies.insert(
                key.clone(),
                Company {
                    key,
                    display_name: c.display_name.clone(),
                    roster_file: config.roster_path(&c.roster_file),
                    logo: c.logo.as_deref().map(|p| config.asset_path(p)),
                    manager_signature: c.manager_signature.as_deref().map(|p| config.asset_path(p)),
                    industry: c.industry.clone(),
                },
            );
        }

        let library = config
            .library
            .iter()
            .map(|entry| {
                (
                    entry.key.clone(),
                    LibraryDocument {
                        key: entry.key.clone(),
                        display_name: entry.display_name.clone(),
                        license: config.asset_path(&entry.license),
                        attestation: config.asset_path(&entry.attestation),
                    },
                )
            })
            .collect();

        Ok(Self {
            companies,
            order,
            managers: config.managers.clone(),
            default_signature: config.asset_path(&config.default_signature),
            library,
        })
    }

    pub fn company(&self, key: &CompanyKey) -> Result<&Company> {
        self.companies
            .get(key)
            .ok_or_else(|| HrError::UnknownCompany(key.to_string()))
    }

    /// Companies in configuration order
    pub fn companies(&self) -> impl Iterator<Item = &Company> {
        self.order.iter().filter_map(|key| self.companies.get(key))
    }

    pub fn managers(&self) -> &[String] {
        &self.managers
    }

    pub fn default_signature(&self) -> &Path {
        &self.default_signature
    }

    /// Signature image for a contract signed by `manager` on behalf of `company`
    ///
    /// Only the second configured manager signs with the company's own
    /// signature image; everyone else uses the shared default.
    pub fn resolve_signature(&self, company: &Company, manager: &str) -> PathBuf {
        let is_second = self.managers.get(1).is_some_and(|m| m == manager);
        match (&company.manager_signature, is_second) {
            (Some(signature), true) => signature.clone(),
            _ => self.default_signature.clone(),
        }
    }

    pub fn library(&self) -> impl Iterator<Item = &LibraryDocument> {
        self.library.values()
    }

    /// Read a library document; returns its file name and bytes
    pub fn library_document(&self, key: &str, kind: LibraryKind) -> Result<(String, Vec<u8>)> {
        let entry = self
            .library
            .get(key)
            .ok_or_else(|| HrError::UnknownLibraryEntry(key.to_string()))?;
        let path = entry.path(kind);

        let data = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HrError::NotFound(path.to_path_buf()),
            _ => HrError::Io(e),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok((name, data))
    }
}
