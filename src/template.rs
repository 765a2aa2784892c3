//! Prompt templates: Markdown files with YAML front matter plus the two
//! templates that ship with the binary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const TEMPLATE_EXTENSION: &str = "md";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read template {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template {0} must start with '---' front matter")]
    MissingFrontMatter(PathBuf),
    #[error("template {0} is missing the closing '---' delimiter")]
    UnterminatedFrontMatter(PathBuf),
    #[error("invalid front matter in {path}: {source}")]
    InvalidFrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("template {0} needs both an id and a name")]
    MissingIdentity(PathBuf),
}

/// Front matter of a template file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// A parsed template file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub metadata: TemplateMetadata,
    /// Body after the front matter, trimmed
    pub content: String,
    pub path: PathBuf,
}

impl TemplateFile {
    /// Parse file contents. `path` is only used in errors.
    pub fn parse(path: &Path, raw: &str) -> Result<Self, TemplateError> {
        let normalized = raw.replace("\r\n", "\n");
        if !normalized.starts_with("---") {
            return Err(TemplateError::MissingFrontMatter(path.to_path_buf()));
        }

        let first_newline = normalized
            .find('\n')
            .ok_or_else(|| TemplateError::UnterminatedFrontMatter(path.to_path_buf()))?;
        let rest = &normalized[first_newline + 1..];
        let closing = rest
            .find("\n---")
            .or_else(|| rest.starts_with("---").then_some(0))
            .ok_or_else(|| TemplateError::UnterminatedFrontMatter(path.to_path_buf()))?;

        let yaml = &rest[..closing];
        let after = &rest[closing..];
        let after = after.trim_start_matches('\n');
        // Drop the closing delimiter line itself
        let body = after.split_once('\n').map(|(_, body)| body).unwrap_or("");

        let metadata: TemplateMetadata = if yaml.trim().is_empty() {
            TemplateMetadata::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|source| TemplateError::InvalidFrontMatter {
                path: path.to_path_buf(),
                source,
            })?
        };

        if metadata.id.trim().is_empty() || metadata.name.trim().is_empty() {
            return Err(TemplateError::MissingIdentity(path.to_path_buf()));
        }

        Ok(Self {
            metadata,
            content: body.trim().to_string(),
            path: path.to_path_buf(),
        })
    }

    pub fn into_template(self) -> Template {
        let now = Utc::now();
        Template {
            created_at: parse_date(self.metadata.created.as_deref()).unwrap_or(now),
            updated_at: parse_date(self.metadata.updated.as_deref()).unwrap_or(now),
            id: self.metadata.id,
            name: self.metadata.name,
            content: self.content,
        }
    }
}

/// A prompt template ready for resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates.
fn parse_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

const DEFAULT_COMPARISON: &str = "以下の企業のIR情報を比較分析してください：

基準企業: {baseCompany}

比較企業:
{comparisonCompanies}

以下の観点で比較分析を行い、共通点と差異を明確にしてください：
1. 事業戦略・方向性
2. 財務状況・業績
3. 市場環境認識
4. 今後の課題・リスク
5. 投資家への訴求ポイント";

const SWOT_ANALYSIS: &str = "{baseCompany}と以下の比較企業のSWOT分析を行ってください：

比較企業:
{comparisonCompanies}

各企業について以下の4つの観点で分析し、最後に業界内での位置づけを比較してください：
- Strengths (強み)
- Weaknesses (弱み)
- Opportunities (機会)
- Threats (脅威)";

/// Templates available without any template directory
pub fn builtin_templates() -> Vec<Template> {
    vec![
        Template::new("default-comparison", "基本比較分析", DEFAULT_COMPARISON),
        Template::new("swot-analysis", "SWOT分析", SWOT_ANALYSIS),
    ]
}

/// Reads templates from a directory of `*.md` files.
pub struct TemplateLoader {
    dir: PathBuf,
}

impl TemplateLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load one file by name, relative to the template directory.
    pub fn load_file(&self, file_name: &str) -> Result<TemplateFile, TemplateError> {
        let path = self.dir.join(file_name);
        if !path.exists() {
            return Err(TemplateError::NotFound(path));
        }
        let raw = fs::read_to_string(&path).map_err(|source| TemplateError::ReadError {
            path: path.clone(),
            source,
        })?;
        TemplateFile::parse(&path, &raw)
    }

    /// Names of the `.md` files in the directory, sorted
    pub fn list_files(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("template directory {} unavailable: {}", self.dir.display(), e);
                return Vec::new();
            }
        };

        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION))
            .filter_map(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
            .collect();
        files.sort();
        files
    }

    /// Every valid template file; broken files are logged and skipped.
    pub fn load_all(&self) -> Vec<TemplateFile> {
        self.list_files()
            .iter()
            .filter_map(|name| match self.load_file(name) {
                Ok(file) => Some(file),
                Err(e) => {
                    log::warn!("skipping template: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn load_by_id(&self, id: &str) -> Option<Template> {
        self.load_all()
            .into_iter()
            .find(|file| file.metadata.id == id)
            .map(TemplateFile::into_template)
    }

    pub fn load_by_category(&self, category: &str) -> Vec<Template> {
        self.load_all()
            .into_iter()
            .filter(|file| file.metadata.category.as_deref() == Some(category))
            .map(TemplateFile::into_template)
            .collect()
    }

    pub fn metadata_list(&self) -> Vec<TemplateMetadata> {
        self.load_all().into_iter().map(|file| file.metadata).collect()
    }

    /// File templates followed by any built-in whose id no file overrides
    pub fn templates(&self) -> Vec<Template> {
        let mut templates: Vec<Template> = self
            .load_all()
            .into_iter()
            .map(TemplateFile::into_template)
            .collect();
        for builtin in builtin_templates() {
            if !templates.iter().any(|t| t.id == builtin.id) {
                templates.push(builtin);
            }
        }
        templates
    }

    /// Look up a template by id, files first
    pub fn find(&self, id: &str) -> Option<Template> {
        self.load_by_id(id)
            .or_else(|| builtin_templates().into_iter().find(|t| t.id == id))
    }
}
