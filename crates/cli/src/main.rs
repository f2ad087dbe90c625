//! hr-docs - HR clerical shell
//!
//! Manages per-company employee rosters and writes letters (PDF) and
//! employment contracts (DOCX) to disk.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hr_docs::{Catalog, ConfiguredCredentials, HrConfig, IdentityProvider};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

/// hr-docs - HR rosters, letters and contracts
#[derive(Parser, Debug)]
#[command(name = "hr-docs")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to JSON configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Operator username
    #[arg(short, long, env = "HR_DOCS_USER")]
    user: Option<String>,

    /// Operator password
    #[arg(long, env = "HR_DOCS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the SHA-256 digest to put in the config's credentials
    HashPassword {
        /// Password to hash
        password: String,
    },

    /// List companies and managers
    Companies,

    /// Roster management
    #[command(subcommand)]
    Roster(commands::RosterCommands),

    /// Generate a letter PDF
    Letter(commands::LetterArgs),

    /// Generate an employment contract DOCX
    Contract(commands::ContractArgs),

    /// Copy a company's license or attestation document
    Library(commands::LibraryArgs),
}

fn load_config(path: Option<&PathBuf>) -> Result<HrConfig> {
    match path {
        Some(path) => HrConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(HrConfig::default()),
    }
}

fn login(config: &HrConfig, user: Option<&str>, password: Option<&str>) -> Result<()> {
    let Some(credentials) = &config.credentials else {
        bail!("no operator credentials configured; add \"credentials\" to the config");
    };
    let (Some(user), Some(password)) = (user, password) else {
        bail!("login required: pass --user and set HR_DOCS_PASSWORD");
    };
    if !ConfiguredCredentials::from_config(credentials).authenticate(user, password) {
        bail!("invalid username or password");
    }
    tracing::debug!(user, "operator authenticated");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Commands::HashPassword { password } = &cli.command {
        println!("{}", hr_docs::auth::hash_password(password));
        return Ok(());
    }

    let config = load_config(cli.config.as_ref())?;
    login(&config, cli.user.as_deref(), cli.password.as_deref())?;
    let catalog = Catalog::from_config(&config).context("invalid company catalog")?;

    match cli.command {
        Commands::HashPassword { .. } => Ok(()),
        Commands::Companies => commands::companies(&catalog),
        Commands::Roster(cmd) => commands::roster(&catalog, cmd),
        Commands::Letter(args) => commands::letter(&config, &catalog, args),
        Commands::Contract(args) => commands::contract(&catalog, args),
        Commands::Library(args) => commands::library(&catalog, args),
    }
}
