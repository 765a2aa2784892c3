//! Placeholder grammar shared by expansion, resolution and validation.
//!
//! A placeholder is any `{...}` run without nested braces. Only the names
//! below are recognized; everything else is inert text.
//!
//! | Token                     | Meaning                                  |
//! |---------------------------|------------------------------------------|
//! | `{baseCompany}`           | base company, name and summary           |
//! | `{基準企業}`              | legacy alias of `{baseCompany}`          |
//! | `{comparisonCompanies}`   | every complete comparison company        |
//! | `{base_corp_name}`        | base company name                        |
//! | `{base_corp_summary}`     | base company summary                     |
//! | `{comp<i>_corp_name}`     | name of comparison company `i`           |
//! | `{comp<i>_corp_summary}`  | summary of comparison company `i`        |
//! | `{比較企業<i>}`           | legacy name and summary of company `i`   |
//! | `{summary_list}`          | aggregate: one block per company         |
//! | `{comparison_corp_names}` | aggregate: comparison company names      |

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{([^{}]+)\}").expect("valid placeholder regex");
}

/// A recognized placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    BaseCompany,
    ComparisonCompanies,
    BaseName,
    BaseSummary,
    /// 1-based comparison position
    CompName(usize),
    CompSummary(usize),
    LegacyComparison(usize),
    SummaryList,
    ComparisonNames,
}

impl Placeholder {
    /// Classify the text between the braces.
    pub fn parse(name: &str) -> Option<Self> {
        let placeholder = match name {
            "baseCompany" | "基準企業" => Placeholder::BaseCompany,
            "comparisonCompanies" => Placeholder::ComparisonCompanies,
            "base_corp_name" => Placeholder::BaseName,
            "base_corp_summary" => Placeholder::BaseSummary,
            "summary_list" => Placeholder::SummaryList,
            "comparison_corp_names" => Placeholder::ComparisonNames,
            _ => return Self::parse_indexed(name),
        };
        Some(placeholder)
    }

    fn parse_indexed(name: &str) -> Option<Self> {
        if let Some(rest) = name.strip_prefix("comp") {
            if let Some(index) = rest.strip_suffix("_corp_name").and_then(parse_index) {
                return Some(Placeholder::CompName(index));
            }
            if let Some(index) = rest.strip_suffix("_corp_summary").and_then(parse_index) {
                return Some(Placeholder::CompSummary(index));
            }
            return None;
        }
        name.strip_prefix("比較企業")
            .and_then(parse_index)
            .map(Placeholder::LegacyComparison)
    }

    /// Expanded before substitution because the result depends on the company count.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Placeholder::SummaryList | Placeholder::ComparisonNames)
    }

    /// Refers to the base company's own data.
    pub fn references_base(&self) -> bool {
        matches!(
            self,
            Placeholder::BaseCompany | Placeholder::BaseName | Placeholder::BaseSummary
        )
    }

    /// 1-based comparison position this placeholder refers to, if any.
    pub fn comparison_index(&self) -> Option<usize> {
        match self {
            Placeholder::CompName(index)
            | Placeholder::CompSummary(index)
            | Placeholder::LegacyComparison(index) => Some(*index),
            _ => None,
        }
    }
}

/// Positions are 1-based and written without leading zeros.
fn parse_index(digits: &str) -> Option<usize> {
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// A `{...}` occurrence in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The full text including braces
    pub text: &'a str,
    /// Byte offset of the opening brace
    pub position: usize,
    pub placeholder: Option<Placeholder>,
}

/// Every `{...}` occurrence, recognized or not, in template order.
pub fn scan(template: &str) -> impl Iterator<Item = Token<'_>> {
    PLACEHOLDER_RE.captures_iter(template).filter_map(|caps| {
        let whole = caps.get(0)?;
        Some(Token {
            text: whole.as_str(),
            position: whole.start(),
            placeholder: Placeholder::parse(&caps[1]),
        })
    })
}

/// Replace recognized placeholders for which `value` returns `Some`.
///
/// Everything else, including unknown `{...}` text, is copied verbatim.
/// Replacement text is not scanned again.
pub fn substitute<F>(template: &str, mut value: F) -> String
where
    F: FnMut(Placeholder) -> Option<String>,
{
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            Placeholder::parse(&caps[1])
                .and_then(&mut value)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
