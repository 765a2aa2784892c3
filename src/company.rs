//! Company data - the input the prompt templates are resolved against.

use crate::locale::Locale;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of comparison companies a list may hold.
pub const MAX_COMPARISON_COMPANIES: usize = 4;

/// Letter of the base company in every rendered prompt.
pub const BASE_LETTER: char = 'A';

/// Letter of the comparison company at `index` (0-based): B, C, D, E...
///
/// Letters follow array position, not completeness.
pub fn comparison_letter(index: usize) -> char {
    char::from_u32('B' as u32 + index as u32).unwrap_or('?')
}

/// Role of a company in the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyKind {
    #[default]
    Base,
    Comparison,
}

impl fmt::Display for CompanyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanyKind::Base => write!(f, "base"),
            CompanyKind::Comparison => write!(f, "comparison"),
        }
    }
}

/// A labeled, ordered part of a company's IR summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySection {
    #[serde(default)]
    pub id: String,
    /// Headline of the section
    #[serde(default)]
    pub important_point: String,
    /// Full text of the section
    #[serde(default)]
    pub text: String,
}

impl SummarySection {
    pub fn new(important_point: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            important_point: important_point.into(),
            text: text.into(),
        }
    }
}

/// The two ways a company's summary can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryContent<'a> {
    Flat(&'a str),
    Sections(&'a [SummarySection]),
}

impl SummaryContent<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            SummaryContent::Flat(text) => text.trim().is_empty(),
            SummaryContent::Sections(sections) => sections.is_empty(),
        }
    }
}

/// One company entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Flat IR summary, kept even when sections are present
    #[serde(default)]
    pub summary: String,
    #[serde(rename = "type", default)]
    pub kind: CompanyKind,
    /// Structured summary; supersedes `summary` when non-empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub summary_sections: Vec<SummarySection>,
}

impl Company {
    /// Create a company with a flat summary
    pub fn new(kind: CompanyKind, name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: generate_id(kind, 0),
            name: name.into(),
            summary: summary.into(),
            kind,
            summary_sections: Vec::new(),
        }
    }

    /// Create an empty company placeholder
    pub fn empty(kind: CompanyKind, index: usize) -> Self {
        Self {
            id: generate_id(kind, index),
            kind,
            ..Default::default()
        }
    }

    /// Replace the summary with structured sections
    pub fn with_sections(mut self, sections: Vec<SummarySection>) -> Self {
        self.summary_sections = sections;
        self
    }

    /// Parse the single text box form: first line is the name, the rest the summary.
    pub fn from_text(kind: CompanyKind, text: &str) -> Self {
        let text = text.trim_start_matches('\u{feff}');
        let (name, summary) = match text.split_once('\n') {
            Some((first, rest)) => (first.trim(), rest.trim()),
            None => (text.trim(), ""),
        };
        Self::new(kind, name, summary)
    }

    /// The summary variant used for rendering.
    pub fn content(&self) -> SummaryContent<'_> {
        if self.summary_sections.is_empty() {
            SummaryContent::Flat(&self.summary)
        } else {
            SummaryContent::Sections(&self.summary_sections)
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn has_summary(&self) -> bool {
        !self.content().is_empty()
    }

    /// Name entered and some summary content present
    pub fn is_complete(&self) -> bool {
        self.has_name() && self.has_summary()
    }

    /// Nothing entered at all
    pub fn is_blank(&self) -> bool {
        !self.has_name() && !self.has_summary()
    }
}

fn generate_id(kind: CompanyKind, index: usize) -> String {
    format!("{}-{}-{}", kind, Utc::now().timestamp_millis(), index)
}

/// Progress of the company input form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputStatus {
    pub base_company_filled: bool,
    pub comparison_companies_filled: usize,
    pub total_companies_filled: usize,
    pub can_add_more: bool,
    pub can_remove: bool,
}

/// The base company and the companies it is compared with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyList {
    pub base_company: Company,
    #[serde(default)]
    pub comparison_companies: Vec<Company>,
}

impl Default for CompanyList {
    fn default() -> Self {
        Self::new()
    }
}

impl CompanyList {
    /// An empty base company and one empty comparison company
    pub fn new() -> Self {
        Self {
            base_company: Company::empty(CompanyKind::Base, 0),
            comparison_companies: vec![Company::empty(CompanyKind::Comparison, 1)],
        }
    }

    pub fn with_companies(base_company: Company, comparison_companies: Vec<Company>) -> Self {
        Self {
            base_company,
            comparison_companies,
        }
    }

    pub fn update_base(&mut self, company: Company) {
        self.base_company = company;
    }

    /// Replace the comparison company at `index`. Returns false when out of range.
    pub fn update_comparison(&mut self, index: usize, company: Company) -> bool {
        match self.comparison_companies.get_mut(index) {
            Some(slot) => {
                *slot = company;
                true
            }
            None => false,
        }
    }

    /// Append an empty comparison company unless the list is full.
    pub fn add_comparison(&mut self) -> bool {
        if self.comparison_companies.len() >= MAX_COMPARISON_COMPANIES {
            return false;
        }
        let position = self.comparison_companies.len() + 1;
        self.comparison_companies
            .push(Company::empty(CompanyKind::Comparison, position));
        true
    }

    pub fn remove_comparison(&mut self, index: usize) -> Option<Company> {
        if index < self.comparison_companies.len() {
            Some(self.comparison_companies.remove(index))
        } else {
            None
        }
    }

    /// Comparison company at 1-based `position`, with its letter.
    ///
    /// Positions beyond the fourth slot never resolve.
    pub fn comparison_at(&self, position: usize) -> Option<(char, &Company)> {
        if position == 0 || position > MAX_COMPARISON_COMPANIES {
            return None;
        }
        self.comparison_companies
            .get(position - 1)
            .map(|company| (comparison_letter(position - 1), company))
    }

    /// Comparison companies paired with their letters, in input order.
    ///
    /// Only the first four positions take part in a comparison.
    pub fn lettered_comparisons(&self) -> impl Iterator<Item = (char, &Company)> {
        self.comparison_companies
            .iter()
            .take(MAX_COMPARISON_COMPANIES)
            .enumerate()
            .map(|(index, company)| (comparison_letter(index), company))
    }

    /// Field-level problems with the entered companies.
    pub fn validate(&self, locale: Locale) -> Vec<String> {
        let labels = locale.labels();
        let mut errors = Vec::new();

        if !self.base_company.has_name() {
            errors.push(labels.base_name_required());
        }
        if !self.base_company.has_summary() {
            errors.push(labels.base_summary_required());
        }

        for (index, company) in self.comparison_companies.iter().enumerate() {
            if !company.has_name() {
                errors.push(labels.comparison_name_required(index + 1));
            }
            if !company.has_summary() {
                errors.push(labels.comparison_summary_required(index + 1));
            }
        }

        if self.comparison_companies.is_empty() {
            errors.push(labels.comparison_required());
        }

        errors
    }

    pub fn input_status(&self) -> InputStatus {
        let count = CompanyCount::filled(self);
        InputStatus {
            base_company_filled: count.base,
            comparison_companies_filled: count.comparison,
            total_companies_filled: count.comparison + usize::from(count.base),
            can_add_more: self.comparison_companies.len() < MAX_COMPARISON_COMPANIES,
            can_remove: self.comparison_companies.len() > 1,
        }
    }

    /// Set each company's kind from its position and fill in missing ids.
    pub fn normalize(&mut self) {
        self.base_company.kind = CompanyKind::Base;
        if self.base_company.id.is_empty() {
            self.base_company.id = generate_id(CompanyKind::Base, 0);
        }
        for (index, company) in self.comparison_companies.iter_mut().enumerate() {
            company.kind = CompanyKind::Comparison;
            if company.id.is_empty() {
                company.id = generate_id(CompanyKind::Comparison, index + 1);
            }
        }
    }
}

/// How many companies a template can draw on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyCount {
    pub base: bool,
    pub comparison: usize,
}

impl CompanyCount {
    pub fn new(base: bool, comparison: usize) -> Self {
        Self { base, comparison }
    }

    /// Complete companies only, as the prompt screen counts them.
    pub fn filled(companies: &CompanyList) -> Self {
        Self {
            base: companies.base_company.is_complete(),
            comparison: companies
                .comparison_companies
                .iter()
                .take(MAX_COMPARISON_COMPANIES)
                .filter(|company| company.is_complete())
                .count(),
        }
    }

    /// Every position in the list, blank or not, capped at the comparison limit.
    pub fn slots(companies: &CompanyList) -> Self {
        Self {
            base: !companies.base_company.is_blank(),
            comparison: companies
                .comparison_companies
                .len()
                .min(MAX_COMPARISON_COMPANIES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(name: &str, summary: &str) -> Company {
        Company::new(CompanyKind::Comparison, name, summary)
    }

    #[test]
    fn test_comparison_letters_follow_position() {
        assert_eq!(comparison_letter(0), 'B');
        assert_eq!(comparison_letter(1), 'C');
        assert_eq!(comparison_letter(2), 'D');
        assert_eq!(comparison_letter(3), 'E');
    }

    #[test]
    fn test_complete_requires_name_and_content() {
        assert!(company("Acme", "Grew 10%").is_complete());
        assert!(!company("Acme", "   ").is_complete());
        assert!(!company("  ", "Grew").is_complete());

        let sectioned = company("Acme", "").with_sections(vec![SummarySection::new("Growth", "Up")]);
        assert!(sectioned.is_complete());
    }

    #[test]
    fn test_content_prefers_sections() {
        let flat = company("Acme", "flat text");
        assert_eq!(flat.content(), SummaryContent::Flat("flat text"));

        let sections = vec![SummarySection::new("Point", "Text")];
        let sectioned = company("Acme", "flat text").with_sections(sections.clone());
        assert_eq!(sectioned.content(), SummaryContent::Sections(&sections));
        assert_eq!(sectioned.summary, "flat text");
    }

    #[test]
    fn test_from_text_splits_first_line() {
        let parsed = Company::from_text(CompanyKind::Base, "Acme Corp\nRevenue grew.\nMargins held.\n");
        assert_eq!(parsed.name, "Acme Corp");
        assert_eq!(parsed.summary, "Revenue grew.\nMargins held.");
        assert_eq!(parsed.kind, CompanyKind::Base);

        let name_only = Company::from_text(CompanyKind::Comparison, "Beta");
        assert_eq!(name_only.name, "Beta");
        assert!(name_only.summary.is_empty());
    }

    #[test]
    fn test_new_list_has_one_comparison_slot() {
        let list = CompanyList::new();
        assert_eq!(list.comparison_companies.len(), 1);
        assert_eq!(list.base_company.kind, CompanyKind::Base);
        assert_eq!(list.comparison_companies[0].kind, CompanyKind::Comparison);
    }

    #[test]
    fn test_add_comparison_stops_at_four() {
        let mut list = CompanyList::new();
        assert!(list.add_comparison());
        assert!(list.add_comparison());
        assert!(list.add_comparison());
        assert!(!list.add_comparison());
        assert_eq!(list.comparison_companies.len(), MAX_COMPARISON_COMPANIES);
    }

    #[test]
    fn test_update_and_remove_comparison() {
        let mut list = CompanyList::new();
        assert!(list.update_comparison(0, company("Beta", "Flat")));
        assert!(!list.update_comparison(3, company("Gamma", "Up")));

        let removed = list.remove_comparison(0).unwrap();
        assert_eq!(removed.name, "Beta");
        assert!(list.remove_comparison(0).is_none());
    }

    #[test]
    fn test_comparison_at_is_one_based_and_capped() {
        let list = CompanyList::with_companies(
            Company::new(CompanyKind::Base, "Acme", "Grew"),
            vec![company("", ""), company("Gamma", "Up")],
        );
        assert!(list.comparison_at(0).is_none());
        assert_eq!(list.comparison_at(1).map(|(l, _)| l), Some('B'));
        assert_eq!(list.comparison_at(2).map(|(l, c)| (l, c.name.as_str())), Some(('C', "Gamma")));
        assert!(list.comparison_at(3).is_none());
        assert!(list.comparison_at(5).is_none());
    }

    #[test]
    fn test_validate_reports_each_missing_field() {
        let list = CompanyList::with_companies(
            Company::new(CompanyKind::Base, "", "summary"),
            vec![company("Beta", "")],
        );
        let errors = list.validate(Locale::English);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("base company name"));
        assert!(errors[1].contains("comparison company 1"));
    }

    #[test]
    fn test_validate_requires_a_comparison_company() {
        let list = CompanyList::with_companies(Company::new(CompanyKind::Base, "Acme", "Grew"), vec![]);
        let errors = list.validate(Locale::Japanese);
        assert_eq!(errors, vec!["比較企業を少なくとも1社入力してください".to_string()]);
    }

    #[test]
    fn test_input_status() {
        let mut list = CompanyList::with_companies(
            Company::new(CompanyKind::Base, "Acme", "Grew"),
            vec![company("Beta", "Flat"), company("", "")],
        );
        let status = list.input_status();
        assert!(status.base_company_filled);
        assert_eq!(status.comparison_companies_filled, 1);
        assert_eq!(status.total_companies_filled, 2);
        assert!(status.can_add_more);
        assert!(status.can_remove);

        list.remove_comparison(1);
        assert!(!list.input_status().can_remove);
    }

    #[test]
    fn test_positions_past_fourth_are_ignored() {
        let list = CompanyList::with_companies(
            Company::new(CompanyKind::Base, "Acme", "Grew"),
            (0..6).map(|i| company(&format!("C{}", i), "x")).collect(),
        );
        let letters: Vec<char> = list.lettered_comparisons().map(|(letter, _)| letter).collect();
        assert_eq!(letters, vec!['B', 'C', 'D', 'E']);
        assert_eq!(CompanyCount::filled(&list), CompanyCount::new(true, 4));
        assert_eq!(CompanyCount::slots(&list), CompanyCount::new(true, 4));
    }

    #[test]
    fn test_filled_and_slot_counts_differ_on_blank_entries() {
        let list = CompanyList::with_companies(
            Company::new(CompanyKind::Base, "Acme", "Grew"),
            vec![company("", ""), company("Gamma", "Up")],
        );
        assert_eq!(CompanyCount::filled(&list), CompanyCount::new(true, 1));
        assert_eq!(CompanyCount::slots(&list), CompanyCount::new(true, 2));
    }

    #[test]
    fn test_deserialize_camel_case_json() {
        let json = r#"{
            "baseCompany": {"id": "b", "name": "Acme", "summary": "Grew", "type": "base"},
            "comparisonCompanies": [
                {"name": "Beta", "summarySections": [{"importantPoint": "Cost", "text": "Cut 5%"}]}
            ]
        }"#;
        let mut list: CompanyList = serde_json::from_str(json).unwrap();
        list.normalize();
        assert_eq!(list.base_company.name, "Acme");
        let beta = &list.comparison_companies[0];
        assert_eq!(beta.kind, CompanyKind::Comparison);
        assert!(!beta.id.is_empty());
        assert_eq!(beta.summary_sections[0].important_point, "Cost");
        assert!(beta.is_complete());
    }
}
