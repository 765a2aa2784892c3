//! Dynamic list expansion.
//!
//! Rewrites the aggregate placeholders `{summary_list}` and
//! `{comparison_corp_names}` into per-company placeholders, so the
//! substitution pass never has to know how many companies exist.

use crate::company::{CompanyCount, BASE_LETTER};
use crate::locale::{Labels, Locale};
use crate::placeholder::{self, Placeholder};

/// Line that opens and closes every company block of `{summary_list}`.
pub const BLOCK_DELIMITER: &str = "##";

/// Expand aggregate placeholders using the default locale.
pub fn expand(template: &str, count: CompanyCount) -> String {
    expand_with(template, count, Locale::default())
}

/// Expand aggregate placeholders.
///
/// A template without aggregate placeholders is returned unchanged.
pub fn expand_with(template: &str, count: CompanyCount, locale: Locale) -> String {
    let labels = locale.labels();
    placeholder::substitute(template, |p| match p {
        Placeholder::SummaryList => Some(summary_list(count, labels)),
        Placeholder::ComparisonNames => Some(comparison_name_tokens(count)),
        _ => None,
    })
}

/// One block per company, base first.
///
/// Blank positions still get a block; their fields resolve to the
/// "not entered" markers later. A missing base company is written out
/// literally since there is nothing to resolve.
pub(crate) fn summary_list(count: CompanyCount, labels: &Labels) -> String {
    let mut blocks = Vec::with_capacity(count.comparison + 1);

    if count.base {
        blocks.push(block("{base_corp_name}", "{base_corp_summary}"));
    } else {
        blocks.push(block(
            &format!("{}:{}", BASE_LETTER, labels.name_not_entered),
            labels.summary_not_entered,
        ));
    }

    for position in 1..=count.comparison {
        blocks.push(block(
            &format!("{{comp{}_corp_name}}", position),
            &format!("{{comp{}_corp_summary}}", position),
        ));
    }

    blocks.join("\n\n")
}

fn block(header: &str, body: &str) -> String {
    format!(
        "{delim}\n{header}\n{body}\n{delim}",
        delim = BLOCK_DELIMITER,
        header = header,
        body = body
    )
}

/// `{comp1_corp_name}, {comp2_corp_name}, ...` for every counted position.
fn comparison_name_tokens(count: CompanyCount) -> String {
    (1..=count.comparison)
        .map(|position| format!("{{comp{}_corp_name}}", position))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_without_aggregates_is_unchanged() {
        let template = "Compare {base_corp_name} with {comp1_corp_name}. {unknown}";
        assert_eq!(expand(template, CompanyCount::new(true, 2)), template);
    }

    #[test]
    fn test_summary_list_one_block_per_company() {
        let out = expand("{summary_list}", CompanyCount::new(true, 2));
        assert_eq!(
            out,
            "##\n{base_corp_name}\n{base_corp_summary}\n##\n\n\
             ##\n{comp1_corp_name}\n{comp1_corp_summary}\n##\n\n\
             ##\n{comp2_corp_name}\n{comp2_corp_summary}\n##"
        );
    }

    #[test]
    fn test_summary_list_without_companies_keeps_base_fallback() {
        let out = expand("{summary_list}", CompanyCount::new(false, 0));
        assert_eq!(out, "##\nA:（企業名未入力）\n（要約未入力）\n##");
    }

    #[test]
    fn test_summary_list_fallback_in_english() {
        let out = expand_with("{summary_list}", CompanyCount::new(false, 1), Locale::English);
        assert!(out.starts_with("##\nA:(name not entered)\n(summary not entered)\n##"));
        assert!(out.ends_with("##\n{comp1_corp_name}\n{comp1_corp_summary}\n##"));
    }

    #[test]
    fn test_comparison_names_tokens_numbered_without_gaps() {
        let out = expand("比較企業：{comparison_corp_names}", CompanyCount::new(true, 3));
        assert_eq!(
            out,
            "比較企業：{comp1_corp_name}, {comp2_corp_name}, {comp3_corp_name}"
        );
    }

    #[test]
    fn test_comparison_names_empty_when_no_comparisons() {
        assert_eq!(expand("[{comparison_corp_names}]", CompanyCount::new(true, 0)), "[]");
    }

    #[test]
    fn test_every_occurrence_is_expanded() {
        let out = expand("{comparison_corp_names} / {comparison_corp_names}", CompanyCount::new(true, 1));
        assert_eq!(out, "{comp1_corp_name} / {comp1_corp_name}");
    }
}
