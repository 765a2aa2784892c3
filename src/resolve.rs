//! Variable resolution.
//!
//! Resolution runs in two stages over the same placeholder grammar:
//! `{summary_list}` is expanded first (one block per company slot), then a
//! single substitution pass replaces every recognized placeholder with text
//! taken from the company data. Unknown placeholders are left as they are
//! and out-of-range company references resolve to an empty string.

use crate::company::{Company, CompanyCount, CompanyList, SummaryContent, BASE_LETTER};
use crate::expand;
use crate::locale::{Labels, Locale};
use crate::placeholder::{self, Placeholder};

/// Resolve a template against the companies using the default locale.
pub fn resolve(template: &str, companies: &CompanyList) -> String {
    resolve_with(template, companies, Locale::default())
}

/// Resolve a template against the companies.
pub fn resolve_with(template: &str, companies: &CompanyList, locale: Locale) -> String {
    let labels = locale.labels();
    let count = CompanyCount::slots(companies);

    let expanded = placeholder::substitute(template, |p| match p {
        Placeholder::SummaryList => Some(expand::summary_list(count, labels)),
        _ => None,
    });

    let resolver = Resolver { companies, labels };
    placeholder::substitute(&expanded, |p| resolver.value(p))
}

/// Render a company's summary, dispatching on flat text or sections.
///
/// Returns `None` when there is nothing to render.
pub fn render_summary(company: &Company, letter: char, labels: &Labels) -> Option<String> {
    match company.content() {
        SummaryContent::Sections(sections) => Some(
            sections
                .iter()
                .enumerate()
                .map(|(index, section)| {
                    labels.section_entry(
                        &format!("{}:{}", letter, index + 1),
                        &section.important_point,
                        &section.text,
                    )
                })
                .collect::<Vec<_>>()
                .join("\n\n"),
        ),
        SummaryContent::Flat(text) if !text.trim().is_empty() => Some(text.to_string()),
        SummaryContent::Flat(_) => None,
    }
}

struct Resolver<'a> {
    companies: &'a CompanyList,
    labels: &'a Labels,
}

impl Resolver<'_> {
    fn value(&self, placeholder: Placeholder) -> Option<String> {
        let base = &self.companies.base_company;
        let value = match placeholder {
            Placeholder::BaseCompany => {
                if base.is_complete() {
                    self.name_and_summary(base, BASE_LETTER)
                } else {
                    self.labels.not_entered.to_string()
                }
            }
            Placeholder::ComparisonCompanies => self.complete_comparisons(),
            Placeholder::BaseName => self.name(base, BASE_LETTER),
            Placeholder::BaseSummary => self.summary(base, BASE_LETTER),
            Placeholder::CompName(position) => self
                .companies
                .comparison_at(position)
                .map(|(letter, company)| self.name(company, letter))
                .unwrap_or_default(),
            Placeholder::CompSummary(position) => self
                .companies
                .comparison_at(position)
                .map(|(letter, company)| self.summary(company, letter))
                .unwrap_or_default(),
            Placeholder::LegacyComparison(position) => self
                .companies
                .comparison_at(position)
                .map(|(letter, company)| self.name_and_summary(company, letter))
                .unwrap_or_default(),
            Placeholder::ComparisonNames => self.named_comparisons(),
            // Already expanded; a literal one can only come from company data.
            Placeholder::SummaryList => return None,
        };
        Some(value)
    }

    fn name(&self, company: &Company, letter: char) -> String {
        if company.has_name() {
            format!("{}:{}", letter, company.name)
        } else {
            format!("{}:{}", letter, self.labels.name_not_entered)
        }
    }

    fn summary(&self, company: &Company, letter: char) -> String {
        render_summary(company, letter, self.labels)
            .unwrap_or_else(|| self.labels.summary_not_entered.to_string())
    }

    fn name_and_summary(&self, company: &Company, letter: char) -> String {
        format!("{}\n{}", self.name(company, letter), self.summary(company, letter))
    }

    /// Complete comparison companies only; incomplete ones are dropped.
    fn complete_comparisons(&self) -> String {
        let entries: Vec<String> = self
            .companies
            .lettered_comparisons()
            .filter(|(_, company)| company.is_complete())
            .map(|(letter, company)| self.name_and_summary(company, letter))
            .collect();

        if entries.is_empty() {
            self.labels.not_entered.to_string()
        } else {
            entries.join("\n\n")
        }
    }

    /// Comparison companies with a name, letters still taken from position.
    fn named_comparisons(&self) -> String {
        self.companies
            .lettered_comparisons()
            .filter(|(_, company)| company.has_name())
            .map(|(letter, company)| format!("{}:{}", letter, company.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::{CompanyKind, SummarySection};

    fn base(name: &str, summary: &str) -> Company {
        Company::new(CompanyKind::Base, name, summary)
    }

    fn comp(name: &str, summary: &str) -> Company {
        Company::new(CompanyKind::Comparison, name, summary)
    }

    fn acme_beta() -> CompanyList {
        CompanyList::with_companies(base("Acme", "Grew 10%"), vec![comp("Beta", "Flat")])
    }

    #[test]
    fn test_template_without_placeholders_is_unchanged() {
        let template = "Plain text with {unknown} and { spaced } braces }{";
        assert_eq!(resolve(template, &acme_beta()), template);
    }

    #[test]
    fn test_base_name_and_summary() {
        let out = resolve("{base_corp_name} / {base_corp_summary}", &acme_beta());
        assert_eq!(out, "A:Acme / Grew 10%");
    }

    #[test]
    fn test_base_markers_when_blank() {
        let list = CompanyList::with_companies(base("", ""), vec![comp("Beta", "Flat")]);
        let out = resolve("{base_corp_name}|{base_corp_summary}|{baseCompany}", &list);
        assert_eq!(out, "A:（企業名未入力）|（要約未入力）|（未入力）");
    }

    #[test]
    fn test_base_company_and_legacy_alias() {
        let out = resolve("{baseCompany}\n---\n{基準企業}", &acme_beta());
        assert_eq!(out, "A:Acme\nGrew 10%\n---\nA:Acme\nGrew 10%");
    }

    #[test]
    fn test_comparison_companies_drops_incomplete() {
        let list = CompanyList::with_companies(
            base("Acme", "Grew"),
            vec![comp("Beta", ""), comp("Gamma", "Up"), comp("Delta", "Down")],
        );
        let out = resolve("{comparisonCompanies}", &list);
        assert_eq!(out, "C:Gamma\nUp\n\nD:Delta\nDown");
    }

    #[test]
    fn test_comparison_companies_marker_when_none_complete() {
        let list = CompanyList::with_companies(base("Acme", "Grew"), vec![comp("Beta", "")]);
        assert_eq!(resolve("{comparisonCompanies}", &list), "（未入力）");
    }

    #[test]
    fn test_indexed_comparison_tokens() {
        let list = CompanyList::with_companies(
            base("Acme", "Grew"),
            vec![comp("Beta", "Flat"), comp("", "")],
        );
        let out = resolve(
            "{comp1_corp_name}:{comp1_corp_summary}|{comp2_corp_name}:{comp2_corp_summary}",
            &list,
        );
        assert_eq!(out, "B:Beta:Flat|C:（企業名未入力）:（要約未入力）");
    }

    #[test]
    fn test_out_of_range_tokens_resolve_empty() {
        let out = resolve("[{comp2_corp_name}][{comp3_corp_summary}][{比較企業4}]", &acme_beta());
        assert_eq!(out, "[][][]");
    }

    #[test]
    fn test_fifth_slot_never_resolves() {
        let list = CompanyList::with_companies(
            base("Acme", "Grew"),
            (0..6).map(|i| comp(&format!("C{}", i), "x")).collect(),
        );
        assert_eq!(resolve("[{comp5_corp_name}]", &list), "[]");
        assert_eq!(resolve("{comp4_corp_name}", &list), "E:C3");
    }

    #[test]
    fn test_aggregates_stop_at_fourth_comparison() {
        let list = CompanyList::with_companies(
            base("Acme", "Grew"),
            (0..6).map(|i| comp(&format!("C{}", i), "x")).collect(),
        );
        assert_eq!(resolve("{comparison_corp_names}", &list), "B:C0, C:C1, D:C2, E:C3");
        assert_eq!(
            resolve("{comparisonCompanies}", &list),
            "B:C0\nx\n\nC:C1\nx\n\nD:C2\nx\n\nE:C3\nx"
        );
        let blocks = resolve("{summary_list}", &list);
        assert!(blocks.contains("E:C3"));
        assert!(!blocks.contains("F:"));
    }

    #[test]
    fn test_zero_and_zero_padded_positions_stay_literal() {
        let out = resolve("[{comp0_corp_name}][{comp0_corp_summary}][{比較企業0}][{comp01_corp_name}]", &acme_beta());
        assert_eq!(out, "[{comp0_corp_name}][{comp0_corp_summary}][{比較企業0}][{comp01_corp_name}]");
    }

    #[test]
    fn test_legacy_comparison_token() {
        let out = resolve("{比較企業1}", &acme_beta());
        assert_eq!(out, "B:Beta\nFlat");
    }

    #[test]
    fn test_comparison_names_filter_blank_names_but_keep_letters() {
        let list = CompanyList::with_companies(
            base("Acme", "Grew"),
            vec![comp("", ""), comp("Gamma", "Up")],
        );
        assert_eq!(resolve("{comparison_corp_names}", &list), "C:Gamma");
    }

    #[test]
    fn test_summary_list_fill_path_keeps_blank_position() {
        let list = CompanyList::with_companies(
            base("Acme", "Grew"),
            vec![comp("", ""), comp("Gamma", "Up")],
        );
        let out = resolve("{summary_list}", &list);
        assert_eq!(
            out,
            "##\nA:Acme\nGrew\n##\n\n##\nB:（企業名未入力）\n（要約未入力）\n##\n\n##\nC:Gamma\nUp\n##"
        );
    }

    #[test]
    fn test_summary_list_renders_sections() {
        let sectioned = comp("Beta", "ignored flat text").with_sections(vec![
            SummarySection::new("増収", "売上高10%増"),
            SummarySection::new("減益", "営業利益5%減"),
        ]);
        let list = CompanyList::with_companies(base("Acme", "Grew"), vec![sectioned]);
        let out = resolve("{summary_list}", &list);
        assert!(out.contains("##\nB:Beta\n【B:1】重要ポイント：増収\n売上高10%増\n\n【B:2】重要ポイント：減益\n営業利益5%減\n##"));
        assert!(!out.contains("ignored flat text"));
    }

    #[test]
    fn test_sections_used_by_individual_tokens_too() {
        let sectioned = base("Acme", "").with_sections(vec![SummarySection::new("Growth", "Up 10%")]);
        let list = CompanyList::with_companies(sectioned, vec![comp("Beta", "Flat")]);
        let out = resolve_with("{base_corp_summary}", &list, Locale::English);
        assert_eq!(out, "[A:1] Key point: Growth\nUp 10%");
    }

    #[test]
    fn test_company_text_is_not_rescanned() {
        let list = CompanyList::with_companies(base("Acme", "mentions {comp1_corp_name}"), vec![comp("Beta", "Flat")]);
        assert_eq!(resolve("{base_corp_summary}", &list), "mentions {comp1_corp_name}");
    }

    #[test]
    fn test_acme_beta_example() {
        let out = resolve("Base: {base_corp_name}\n{summary_list}", &acme_beta());
        assert_eq!(
            out,
            "Base: A:Acme\n##\nA:Acme\nGrew 10%\n##\n\n##\nB:Beta\nFlat\n##"
        );
    }
}
