//! Consistency check between the placeholders a template uses and the
//! companies that have actually been filled in.

use crate::company::CompanyCount;
use crate::locale::Locale;
use crate::placeholder;
use serde::Serialize;

/// Outcome of a validation. Warnings never block; errors do.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_parts(warnings: Vec<String>, errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            warnings,
            errors,
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Validate template placeholders against company counts using the default locale.
pub fn validate(template: &str, count: CompanyCount) -> ValidationReport {
    validate_with(template, count, Locale::default())
}

/// Validate template placeholders against company counts.
///
/// Each distinct placeholder is reported at most once, in order of first use.
pub fn validate_with(template: &str, count: CompanyCount, locale: Locale) -> ValidationReport {
    let labels = locale.labels();
    let mut seen: Vec<&str> = Vec::new();
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    for token in placeholder::scan(template) {
        let Some(placeholder) = token.placeholder else {
            continue;
        };
        if seen.contains(&token.text) {
            continue;
        }
        seen.push(token.text);

        if placeholder.references_base() && !count.base {
            warnings.push(labels.base_not_filled(token.text));
        }
        if let Some(index) = placeholder.comparison_index() {
            if index > count.comparison {
                errors.push(labels.comparison_out_of_range(token.text, index, count.comparison));
            }
        }
    }

    ValidationReport::from_parts(warnings, errors)
}
