//! Reading company data from disk.
//!
//! A whole `CompanyList` can come from a JSON or TOML file; single companies
//! can come from plain text files in the "first line is the name" form.

use crate::company::{Company, CompanyKind, CompanyList, MAX_COMPARISON_COMPANIES};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompanyFileError {
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    JsonError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid TOML in {path}: {source}")]
    TomlError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unsupported company file format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),
    #[error("at most {max} comparison companies are supported, got {got}")]
    TooManyComparisons { max: usize, got: usize },
}

fn read(path: &Path) -> Result<String, CompanyFileError> {
    fs::read_to_string(path).map_err(|source| CompanyFileError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a company list; the format follows the file extension.
pub fn load_company_list(path: &Path) -> Result<CompanyList, CompanyFileError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let mut companies: CompanyList = match extension.as_deref() {
        Some("json") => {
            let raw = read(path)?;
            serde_json::from_str(&raw).map_err(|source| CompanyFileError::JsonError {
                path: path.to_path_buf(),
                source,
            })?
        }
        Some("toml") => {
            let raw = read(path)?;
            toml::from_str(&raw).map_err(|source| CompanyFileError::TomlError {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => return Err(CompanyFileError::UnsupportedFormat(path.to_path_buf())),
    };

    companies.normalize();
    log::debug!(
        "loaded {} comparison companies from {}",
        companies.comparison_companies.len(),
        path.display()
    );
    Ok(companies)
}

/// Load one company from a text file: first line name, rest summary.
pub fn load_company_text(path: &Path, kind: CompanyKind) -> Result<Company, CompanyFileError> {
    Ok(Company::from_text(kind, &read(path)?))
}

/// Build a list from one base text file and comparison text files.
pub fn load_company_texts(base: &Path, comparisons: &[PathBuf]) -> Result<CompanyList, CompanyFileError> {
    if comparisons.len() > MAX_COMPARISON_COMPANIES {
        return Err(CompanyFileError::TooManyComparisons {
            max: MAX_COMPARISON_COMPANIES,
            got: comparisons.len(),
        });
    }

    let base_company = load_company_text(base, CompanyKind::Base)?;
    let comparison_companies = comparisons
        .iter()
        .map(|path| load_company_text(path, CompanyKind::Comparison))
        .collect::<Result<Vec<_>, _>>()?;

    let mut companies = CompanyList::with_companies(base_company, comparison_companies);
    companies.normalize();
    Ok(companies)
}
