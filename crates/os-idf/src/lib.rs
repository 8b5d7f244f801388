//! os-idf: EnergyPlus IDF workspace, text format and schema.

pub mod idd;
pub mod object;
pub mod parse;
pub mod print;
pub mod validate;
pub mod workspace;

use std::path::Path;

pub use idd::{ExtensibleGroup, IddObjectType};
pub use object::{IdfObject, format_real};
pub use parse::parse_idf;
pub use print::{PrintOptions, print_object, print_workspace};
pub use validate::{ValidationError, validate_workspace};
pub use workspace::Workspace;

pub type IdfResult<T> = Result<T, IdfError>;

#[derive(thiserror::Error, Debug)]
pub enum IdfError {
    #[error("Parse error at line {line}: {what}")]
    Parse { line: usize, what: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_idf(path: &Path) -> IdfResult<Workspace> {
    let content = std::fs::read_to_string(path)?;
    let workspace = parse_idf(&content)?;
    validate_workspace(&workspace)?;
    Ok(workspace)
}

pub fn save_idf(path: &Path, workspace: &Workspace, options: PrintOptions) -> IdfResult<()> {
    validate_workspace(workspace)?;
    std::fs::write(path, print_workspace(workspace, options))?;
    Ok(())
}

pub fn load_yaml(path: &Path) -> IdfResult<Workspace> {
    let content = std::fs::read_to_string(path)?;
    let workspace: Workspace = serde_yaml::from_str(&content)?;
    validate_workspace(&workspace)?;
    Ok(workspace)
}

pub fn save_yaml(path: &Path, workspace: &Workspace) -> IdfResult<()> {
    validate_workspace(workspace)?;
    let content = serde_yaml::to_string(workspace)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> IdfResult<Workspace> {
    let content = std::fs::read_to_string(path)?;
    let workspace: Workspace = serde_json::from_str(&content)?;
    validate_workspace(&workspace)?;
    Ok(workspace)
}

pub fn save_json(path: &Path, workspace: &Workspace) -> IdfResult<()> {
    validate_workspace(workspace)?;
    let content = serde_json::to_string_pretty(workspace)?;
    std::fs::write(path, content)?;
    Ok(())
}
