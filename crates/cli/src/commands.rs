//! Subcommand handlers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use hr_docs::{
    contract_file_name, generate_contract, generate_letter, letter_file_name, Catalog, Company,
    CompanyKey, ContractRequest, Employee, HrConfig, LaborOffice, LetterFonts, LetterRequest,
    LetterType, LibraryKind, RosterStore,
};

#[derive(Subcommand, Debug)]
pub enum RosterCommands {
    /// Print a company's roster
    List {
        /// Company key
        company: String,
    },
    /// Append an employee
    Add {
        /// Company key
        company: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        civil_id: String,
        #[arg(long, default_value = "")]
        nationality: String,
        #[arg(long, default_value = "")]
        job: String,
    },
    /// Remove every employee with the given name
    Delete {
        /// Company key
        company: String,
        /// Employee name
        name: String,
    },
}

#[derive(Args, Debug)]
pub struct LetterArgs {
    /// Company key
    company: String,

    /// Letter type (SalaryCertificate, UnpaidLeave, Leave, Deduction or the Arabic title)
    #[arg(short = 't', long = "type")]
    letter_type: LetterType,

    /// Employee name; civil ID and job are taken from the roster when omitted
    #[arg(long)]
    name: String,

    #[arg(long)]
    civil_id: Option<String>,

    #[arg(long)]
    job: Option<String>,

    #[arg(long, default_value = "")]
    salary: String,

    #[arg(long, default_value = "")]
    leave_start: String,

    #[arg(long, default_value = "")]
    leave_end: String,

    #[arg(long, default_value = "")]
    reason: String,

    /// Manager name or 1-based index
    #[arg(long, default_value = "")]
    manager: String,

    /// Date printed on deduction letters
    #[arg(long, default_value = "")]
    date: String,

    #[arg(long)]
    deduction_amount: Option<String>,

    #[arg(long)]
    deduction_reason: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ContractArgs {
    /// Company key
    company: String,

    /// Labor office (Hawalli, Capital, Farwaniya or the Arabic name)
    #[arg(long, default_value = "Hawalli")]
    office: LaborOffice,

    /// Manager name or 1-based index
    #[arg(long)]
    manager: String,

    #[arg(long)]
    manager_civil_id: String,

    #[arg(long)]
    worker: String,

    #[arg(long)]
    worker_civil_id: String,

    #[arg(long)]
    nationality: String,

    #[arg(long)]
    job: String,

    #[arg(long)]
    passport: String,

    #[arg(long)]
    salary: String,

    #[arg(long)]
    contract_date: String,

    /// Date the contract takes effect
    #[arg(long)]
    start_date: String,

    /// Start of the contract term
    #[arg(long)]
    real_start: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Kind {
    License,
    Attestation,
}

impl From<Kind> for LibraryKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::License => LibraryKind::License,
            Kind::Attestation => LibraryKind::Attestation,
        }
    }
}

#[derive(Args, Debug)]
pub struct LibraryArgs {
    /// Library entry key; omit to list entries
    key: Option<String>,

    #[arg(short, long, value_enum, default_value = "license")]
    kind: Kind,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

/// Accept a manager by 1-based index as well as by name
fn resolve_manager(catalog: &Catalog, manager: &str) -> String {
    manager
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| catalog.managers().get(i))
        .cloned()
        .unwrap_or_else(|| manager.trim().to_string())
}

fn company<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a Company> {
    Ok(catalog.company(&CompanyKey::from(key))?)
}

fn write_output(dir: &Path, name: &str, data: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, data).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

pub fn companies(catalog: &Catalog) -> Result<()> {
    for company in catalog.companies() {
        println!("{}\t{}", company.key, company.display_name);
    }
    println!();
    for (i, manager) in catalog.managers().iter().enumerate() {
        println!("manager {}\t{}", i + 1, manager);
    }
    Ok(())
}

pub fn roster(catalog: &Catalog, cmd: RosterCommands) -> Result<()> {
    let store = RosterStore::new();
    match cmd {
        RosterCommands::List { company: key } => {
            let company = company(catalog, &key)?;
            let roster = store.load(company)?;
            println!("{}", hr_docs::COLUMNS.join("\t"));
            for e in &roster {
                println!("{}\t{}\t{}\t{}", e.name, e.civil_id, e.nationality, e.job_title);
            }
        }
        RosterCommands::Add {
            company: key,
            name,
            civil_id,
            nationality,
            job,
        } => {
            let company = company(catalog, &key)?;
            let employee = Employee {
                name: name.trim().to_string(),
                civil_id: civil_id.trim().to_string(),
                nationality: nationality.trim().to_string(),
                job_title: job.trim().to_string(),
            };
            let roster = store.add(company, employee)?;
            println!("{} employees in {}", roster.len(), company.display_name);
        }
        RosterCommands::Delete { company: key, name } => {
            let company = company(catalog, &key)?;
            let (roster, removed) = store.delete(company, name.trim())?;
            if removed == 0 {
                anyhow::bail!("no employee named {:?} in {}", name, company.display_name);
            }
            println!("removed {removed}, {} remaining", roster.len());
        }
    }
    Ok(())
}

pub fn letter(config: &HrConfig, catalog: &Catalog, args: LetterArgs) -> Result<()> {
    let company = company(catalog, &args.company)?;

    let known = if args.civil_id.is_none() || args.job.is_none() {
        RosterStore::new().find(company, args.name.trim())?
    } else {
        None
    };
    let civil_id = args
        .civil_id
        .or_else(|| known.as_ref().map(|e| e.civil_id.clone()))
        .unwrap_or_default();
    let job_title = args
        .job
        .or_else(|| known.as_ref().map(|e| e.job_title.clone()))
        .unwrap_or_default();

    let request = LetterRequest {
        company: company.key.clone(),
        letter_type: args.letter_type,
        name: args.name,
        civil_id,
        job_title,
        salary: args.salary,
        leave_start: args.leave_start,
        leave_end: args.leave_end,
        reason: args.reason,
        manager: resolve_manager(catalog, &args.manager),
        manual_date: args.date,
        deduction_amount: args.deduction_amount,
        deduction_reason: args.deduction_reason,
    };

    // Validate before loading fonts
    hr_docs::compose_letter(company, &request)?;
    let fonts = LetterFonts::load(config).context("failed to load letter fonts")?;
    let pdf = generate_letter(catalog, &fonts, &request)?;

    let path = write_output(&args.out_dir, &letter_file_name(&request), &pdf)?;
    println!("{}", path.display());
    Ok(())
}

pub fn contract(catalog: &Catalog, args: ContractArgs) -> Result<()> {
    let company = company(catalog, &args.company)?;
    let manager = resolve_manager(catalog, &args.manager);
    let manager_signature = catalog.resolve_signature(company, &manager);

    let request = ContractRequest {
        labor_office: args.office,
        company: company.key.clone(),
        manager,
        manager_civil_id: args.manager_civil_id,
        worker_name: args.worker,
        worker_civil_id: args.worker_civil_id,
        nationality: args.nationality,
        job: args.job,
        passport: args.passport,
        salary: args.salary,
        contract_date: args.contract_date,
        effective_start_date: args.start_date,
        nominal_start_date: args.real_start,
        manager_signature,
    };

    let docx = generate_contract(catalog, &request)?;
    let path = write_output(&args.out_dir, &contract_file_name(catalog, &request)?, &docx)?;
    println!("{}", path.display());
    Ok(())
}

pub fn library(catalog: &Catalog, args: LibraryArgs) -> Result<()> {
    let Some(key) = args.key else {
        for entry in catalog.library() {
            println!("{}\t{}", entry.key, entry.display_name);
        }
        return Ok(());
    };

    let (name, data) = catalog.library_document(&key, args.kind.into())?;
    let path = write_output(&args.out_dir, &name, &data)?;
    println!("{}", path.display());
    Ok(())
}
