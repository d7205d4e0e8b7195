//! ft-profile: case file format and structural pre-validation.
//!
//! A *case file* bundles the long-lived equipment profile with one visit's
//! field measurements. Profiles are supplied by the caller on every
//! evaluation and treated as immutable input by the engines.

pub mod prevalidate;
pub mod schema;

pub use prevalidate::{IssueSeverity, ValidationIssue, blocked_domains, prevalidate};
pub use schema::*;

pub type ProfileResult<T> = Result<T, ProfileError>;

#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProfileResult<FieldCase> {
    let content = std::fs::read_to_string(path)?;
    let case: FieldCase = serde_yaml::from_str(&content)?;
    Ok(case)
}

pub fn save_yaml(path: &std::path::Path, case: &FieldCase) -> ProfileResult<()> {
    let content = serde_yaml::to_string(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProfileResult<FieldCase> {
    let content = std::fs::read_to_string(path)?;
    let case: FieldCase = serde_json::from_str(&content)?;
    Ok(case)
}

pub fn save_json(path: &std::path::Path, case: &FieldCase) -> ProfileResult<()> {
    let content = serde_json::to_string_pretty(case)?;
    std::fs::write(path, content)?;
    Ok(())
}
