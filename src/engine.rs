use crate::company::{CompanyCount, CompanyList};
use crate::expand::expand_with;
use crate::locale::Locale;
use crate::resolve::resolve_with;
use crate::validate::{validate_with, ValidationReport};

/// The three prompt passes bound to one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PromptEngine {
    pub locale: Locale,
}

impl PromptEngine {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn expand(&self, template: &str, count: CompanyCount) -> String {
        expand_with(template, count, self.locale)
    }

    pub fn resolve(&self, template: &str, companies: &CompanyList) -> String {
        resolve_with(template, companies, self.locale)
    }

    pub fn validate(&self, template: &str, count: CompanyCount) -> ValidationReport {
        validate_with(template, count, self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::{Company, CompanyKind};

    #[test]
    fn test_engine_uses_its_locale() {
        let companies = CompanyList::with_companies(
            Company::new(CompanyKind::Base, "", ""),
            vec![Company::new(CompanyKind::Comparison, "Beta", "")],
        );
        let english = PromptEngine::new(Locale::English);
        assert_eq!(english.resolve("{baseCompany}", &companies), "(not entered)");
        assert_eq!(
            english.resolve("{comp1_corp_summary}", &companies),
            "(summary not entered)"
        );
        assert_eq!(PromptEngine::default().resolve("{baseCompany}", &companies), "（未入力）");
    }

    #[test]
    fn test_engine_validate_and_expand() {
        let engine = PromptEngine::new(Locale::English);
        let report = engine.validate("{comp2_corp_name}", CompanyCount::new(true, 1));
        assert!(report.errors[0].starts_with("{comp2_corp_name} refers to comparison company 2"));
        assert_eq!(
            engine.expand("{comparison_corp_names}", CompanyCount::new(true, 2)),
            "{comp1_corp_name}, {comp2_corp_name}"
        );
    }
}
