//! Per-company employee rosters
//!
//! Each company keeps its roster in one CSV file with a header row of the
//! canonical Arabic column names. Records keep insertion order.

use crate::catalog::Company;
use crate::{require, HrError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Canonical column names: name, civil ID, nationality, job title
pub const COLUMNS: [&str; 4] = ["الاسم", "الرقم المدني", "الجنسية", "المهنة"];

/// One roster row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub civil_id: String,
    pub nationality: String,
    pub job_title: String,
}

impl Employee {
    fn from_columns(mut columns: [String; 4]) -> Self {
        Self {
            name: std::mem::take(&mut columns[0]),
            civil_id: std::mem::take(&mut columns[1]),
            nationality: std::mem::take(&mut columns[2]),
            job_title: std::mem::take(&mut columns[3]),
        }
    }

    fn columns(&self) -> [&str; 4] {
        [&self.name, &self.civil_id, &self.nationality, &self.job_title]
    }
}

pub type Roster = Vec<Employee>;

/// Parse roster CSV
///
/// Columns are matched by header name: missing columns read as empty
/// strings and unknown columns are dropped. Short rows are padded with
/// empty fields. Empty input is an empty roster.
pub fn parse_roster<R: Read>(reader: R) -> std::result::Result<Roster, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let positions: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{FEFF}').trim() == *column)
        })
        .collect();

    let mut roster = Vec::new();
    for record in reader.records() {
        let record = record?;
        let columns = [0, 1, 2, 3].map(|i| {
            positions[i]
                .and_then(|pos| record.get(pos))
                .unwrap_or_default()
                .to_string()
        });
        roster.push(Employee::from_columns(columns));
    }
    Ok(roster)
}

/// Write roster CSV with the canonical header
pub fn write_roster<W: Write>(writer: W, roster: &[Employee]) -> std::result::Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer.write_record(COLUMNS)?;
    for employee in roster {
        writer.write_record(employee.columns())?;
    }
    writer.flush()?;
    Ok(())
}

/// Roster persistence with per-company serialization of mutations
#[derive(Debug, Default)]
pub struct RosterStore {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .entry(path.to_path_buf())
            .or_default()
            .clone()
    }

    /// Read a company's roster
    ///
    /// An absent file is an empty roster. A file that exists but cannot be
    /// parsed is a `ParseFailure`, so corruption is never mistaken for an
    /// empty company.
    pub fn load(&self, company: &Company) -> Result<Roster> {
        let path = &company.roster_file;
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(company = %company.key, path = %path.display(), "no roster file");
                return Ok(Vec::new());
            }
            Err(e) => return Err(HrError::Io(e)),
        };

        let roster = parse_roster(file).map_err(|e| HrError::ParseFailure {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(company = %company.key, employees = roster.len(), "loaded roster");
        Ok(roster)
    }

    /// Read a company's roster, treating any failure as an empty roster
    pub fn load_or_empty(&self, company: &Company) -> Roster {
        self.load(company).unwrap_or_else(|e| {
            tracing::warn!(company = %company.key, error = %e, "roster unreadable, using empty roster");
            Vec::new()
        })
    }

    /// Replace a company's roster file
    ///
    /// Written to a temporary file in the same directory and renamed into
    /// place, so readers never see a partial file.
    pub fn save(&self, company: &Company, roster: &[Employee]) -> Result<()> {
        let lock = self.lock_for(&company.roster_file);
        let _guard = lock.lock();
        self.save_locked(company, roster)
    }

    fn save_locked(&self, company: &Company, roster: &[Employee]) -> Result<()> {
        let path = &company.roster_file;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        write_roster(&mut temp, roster)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| HrError::Io(e.error))?;

        tracing::debug!(company = %company.key, employees = roster.len(), "saved roster");
        Ok(())
    }

    /// Append an employee and persist
    pub fn add(&self, company: &Company, employee: Employee) -> Result<Roster> {
        require("name", &employee.name)?;
        require("civil_id", &employee.civil_id)?;

        let lock = self.lock_for(&company.roster_file);
        let _guard = lock.lock();

        let mut roster = self.load(company)?;
        tracing::info!(company = %company.key, name = %employee.name, "adding employee");
        roster.push(employee);
        self.save_locked(company, &roster)?;
        Ok(roster)
    }

    /// Remove every employee named `name` and persist the rest in order
    ///
    /// Returns the remaining roster and the number of removed records.
    pub fn delete(&self, company: &Company, name: &str) -> Result<(Roster, usize)> {
        let lock = self.lock_for(&company.roster_file);
        let _guard = lock.lock();

        let mut roster = self.load(company)?;
        let before = roster.len();
        roster.retain(|e| e.name != name);
        let removed = before - roster.len();

        if removed > 0 {
            tracing::info!(company = %company.key, name, removed, "deleted employee");
            self.save_locked(company, &roster)?;
        }
        Ok((roster, removed))
    }

    /// Look up an employee by name; the last matching row wins
    pub fn find(&self, company: &Company, name: &str) -> Result<Option<Employee>> {
        Ok(self
            .load(company)?
            .into_iter()
            .rev()
            .find(|e| e.name == name))
    }
}
