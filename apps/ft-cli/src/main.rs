use chrono::Utc;
use clap::{Parser, Subcommand};
use ft_orchestrator::Orchestrator;
use ft_profile::ProfileError;
use ft_refrigerants::SaturationCurve;
use ft_store::{OverrideStore, PtOverrideEntry, StoreError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod render;

#[derive(Parser)]
#[command(name = "ft-cli")]
#[command(about = "FieldTherm CLI - heat-pump field measurement diagnostics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a case file and print the diagnostic report
    Evaluate {
        /// Path to the case file (YAML, or JSON by extension)
        case_path: PathBuf,
        /// Emit the full report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Manage stored PT override tables
    #[command(subcommand)]
    Pt(PtCommands),
}

#[derive(Subcommand)]
enum PtCommands {
    /// Import a PT table for the profile in a case file
    Import {
        /// Path to the case file the table belongs to
        case_path: PathBuf,
        /// JSON file containing [[temp_f, pressure_psig], ...] pairs
        table_path: PathBuf,
        /// Free-text provenance note
        #[arg(long)]
        description: Option<String>,
    },
    /// List stored PT tables for a case file's store
    List {
        case_path: PathBuf,
    },
    /// Show one stored PT table
    Show {
        case_path: PathBuf,
        profile_id: String,
    },
    /// Remove a stored PT table
    Remove {
        case_path: PathBuf,
        profile_id: String,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed PT table: {0}")]
    MalformedTable(String),
}

impl CliError {
    /// 2 for missing input, 3 for malformed input, 1 otherwise.
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Io(err) if err.kind() == std::io::ErrorKind::NotFound => ExitCode::from(2),
            CliError::Profile(ProfileError::Io(err))
                if err.kind() == std::io::ErrorKind::NotFound =>
            {
                ExitCode::from(2)
            }
            CliError::Store(StoreError::NotFound { .. }) => ExitCode::from(2),
            CliError::Store(StoreError::Io(err))
                if err.kind() == std::io::ErrorKind::NotFound =>
            {
                ExitCode::from(2)
            }
            CliError::Profile(ProfileError::Yaml(_) | ProfileError::Json(_))
            | CliError::Store(StoreError::Json(_))
            | CliError::Json(_)
            | CliError::MalformedTable(_) => ExitCode::from(3),
            _ => ExitCode::FAILURE,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Evaluate { case_path, json } => cmd_evaluate(&case_path, json),
        Commands::Pt(pt) => match pt {
            PtCommands::Import {
                case_path,
                table_path,
                description,
            } => cmd_pt_import(&case_path, &table_path, description),
            PtCommands::List { case_path } => cmd_pt_list(&case_path),
            PtCommands::Show {
                case_path,
                profile_id,
            } => cmd_pt_show(&case_path, &profile_id),
            PtCommands::Remove {
                case_path,
                profile_id,
            } => cmd_pt_remove(&case_path, &profile_id),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    }
}

fn load_case(case_path: &Path) -> Result<ft_profile::FieldCase, CliError> {
    let case = if case_path.extension().is_some_and(|ext| ext == "json") {
        ft_profile::load_json(case_path)?
    } else {
        ft_profile::load_yaml(case_path)?
    };
    Ok(case)
}

fn cmd_evaluate(case_path: &Path, json: bool) -> Result<(), CliError> {
    let case = load_case(case_path)?;

    // A stored PT table for this profile rides along; the engines only
    // honor it for unrecognized refrigerants.
    let store = OverrideStore::for_case(case_path);
    let stored_curve = match store.get(&case.profile.id) {
        Ok(entry) => Some(SaturationCurve::new(entry.pt)),
        Err(StoreError::NotFound { .. }) => None,
        Err(err) => return Err(err.into()),
    };

    let report = Orchestrator::new()
        .with_stored_pt_override(stored_curve)
        .run(&case);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_report(&report));
    }
    Ok(())
}

fn cmd_pt_import(
    case_path: &Path,
    table_path: &Path,
    description: Option<String>,
) -> Result<(), CliError> {
    let case = load_case(case_path)?;
    let content = std::fs::read_to_string(table_path)?;
    let pt: Vec<(f64, f64)> = serde_json::from_str(&content)?;

    let curve = SaturationCurve::new(pt.clone());
    if !curve.is_well_formed() {
        return Err(CliError::MalformedTable(
            "need at least two finite points with strictly increasing pressures".to_string(),
        ));
    }

    let store = OverrideStore::for_case(case_path);
    store.put(PtOverrideEntry {
        profile_id: case.profile.id.clone(),
        pt,
        description,
        saved_at: Utc::now(),
    })?;
    println!(
        "✓ Stored PT table for profile '{}' in {}",
        case.profile.id,
        store.path().display()
    );
    Ok(())
}

fn cmd_pt_list(case_path: &Path) -> Result<(), CliError> {
    let store = OverrideStore::for_case(case_path);
    let entries = store.list()?;
    if entries.is_empty() {
        println!("No stored PT tables in {}", store.path().display());
    } else {
        println!("Stored PT tables:");
        for entry in entries {
            println!(
                "  {} ({} points, saved {})",
                entry.profile_id,
                entry.pt.len(),
                entry.saved_at.format("%Y-%m-%d")
            );
        }
    }
    Ok(())
}

fn cmd_pt_show(case_path: &Path, profile_id: &str) -> Result<(), CliError> {
    let store = OverrideStore::for_case(case_path);
    let entry = store.get(profile_id)?;
    println!("PT table for profile '{}':", entry.profile_id);
    if let Some(description) = &entry.description {
        println!("  {description}");
    }
    println!("  saved {}", entry.saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  temp_f    pressure_psig");
    for (temp_f, pressure_psig) in &entry.pt {
        println!("  {temp_f:>7.1}  {pressure_psig:>12.1}");
    }
    Ok(())
}

fn cmd_pt_remove(case_path: &Path, profile_id: &str) -> Result<(), CliError> {
    let store = OverrideStore::for_case(case_path);
    let removed = store.remove(profile_id)?;
    println!("✓ Removed PT table for profile '{}'", removed.profile_id);
    Ok(())
}
