//! Checks and statistics for the prompt being edited.

use crate::locale::Locale;
use crate::placeholder;
use crate::validate::ValidationReport;
use serde::Serialize;

/// Shortest prompt body that is not flagged as too short.
pub const MIN_PROMPT_LENGTH: usize = 20;

/// Placeholders found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableReport {
    /// Every distinct `{...}` token, in order of first use
    pub all_variables: Vec<String>,
    pub valid_variables: Vec<String>,
    pub invalid_variables: Vec<String>,
}

impl VariableReport {
    pub fn has_variables(&self) -> bool {
        !self.all_variables.is_empty()
    }
}

pub fn analyze_variables(template: &str) -> VariableReport {
    let mut report = VariableReport::default();
    for token in placeholder::scan(template) {
        if report.all_variables.iter().any(|v| v == token.text) {
            continue;
        }
        report.all_variables.push(token.text.to_string());
        if token.placeholder.is_some() {
            report.valid_variables.push(token.text.to_string());
        } else {
            report.invalid_variables.push(token.text.to_string());
        }
    }
    report
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptStats {
    pub character_count: usize,
    pub word_count: usize,
    pub line_count: usize,
    pub variable_count: usize,
}

pub fn prompt_stats(template: &str) -> PromptStats {
    PromptStats {
        character_count: template.chars().count(),
        word_count: template.split_whitespace().count(),
        line_count: template.split('\n').count(),
        variable_count: analyze_variables(template).all_variables.len(),
    }
}

/// Name and body requirements for a prompt before it is sent.
pub fn validate_prompt(name: &str, content: &str, locale: Locale) -> ValidationReport {
    let labels = locale.labels();
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push(labels.prompt_name_required());
    }
    if content.trim().is_empty() {
        errors.push(labels.prompt_content_required());
    }
    if content.trim().chars().count() < MIN_PROMPT_LENGTH {
        errors.push(labels.prompt_too_short(MIN_PROMPT_LENGTH));
    }

    ValidationReport::from_parts(Vec::new(), errors)
}
