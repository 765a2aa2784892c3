//! Prompt pipeline integration tests
//!
//! Exercises expand, resolve and validate together through the public API.

use ircompare::{
    expand, resolve, validate, Company, CompanyCount, CompanyKind, CompanyList, Locale, PromptEngine,
    SummarySection,
};

fn base(name: &str, summary: &str) -> Company {
    Company::new(CompanyKind::Base, name, summary)
}

fn comp(name: &str, summary: &str) -> Company {
    Company::new(CompanyKind::Comparison, name, summary)
}

#[test]
fn test_templates_without_placeholders_pass_through() {
    let companies = CompanyList::with_companies(base("Acme", "Grew 10%"), vec![comp("Beta", "Flat")]);
    for template in [
        "",
        "plain text",
        "{unknown} and {also_unknown}",
        "{compX_corp_name} {comp_corp_name}",
        "JSON: {\"a\": 1}",
    ] {
        assert_eq!(resolve(template, &companies), template);
        assert_eq!(expand(template, CompanyCount::new(true, 4)), template);
    }
}

#[test]
fn test_letters_follow_position_not_completeness() {
    let companies = CompanyList::with_companies(
        base("Acme", "Grew 10%"),
        vec![comp("", ""), comp("Gamma", ""), comp("Delta", "Up"), comp("Epsilon", "Down")],
    );
    let resolved = resolve(
        "{comp1_corp_name}|{comp2_corp_name}|{comp3_corp_name}|{comp4_corp_name}",
        &companies,
    );
    assert_eq!(resolved, "B:（企業名未入力）|C:Gamma|D:Delta|E:Epsilon");
}

#[test]
fn test_fifth_comparison_never_resolves() {
    let full = CompanyList::with_companies(
        base("Acme", "Grew 10%"),
        (0..4).map(|i| comp(&format!("Co{}", i), "s")).collect(),
    );
    assert_eq!(resolve("{comp5_corp_name}", &full), "");
    assert_eq!(resolve("[{comp5_corp_summary}]", &CompanyList::new()), "[]");
}

#[test]
fn test_filter_versus_fill() {
    let companies = CompanyList::with_companies(
        base("Acme", "Grew 10%"),
        vec![comp("", ""), comp("Gamma", "Down")],
    );

    assert_eq!(resolve("{comparison_corp_names}", &companies), "C:Gamma");
    assert_eq!(
        resolve("{summary_list}", &companies),
        "##\nA:Acme\nGrew 10%\n##\n\n\
         ##\nB:（企業名未入力）\n（要約未入力）\n##\n\n\
         ##\nC:Gamma\nDown\n##"
    );
}

#[test]
fn test_acme_beta_example() {
    let companies = CompanyList::with_companies(base("Acme", "Grew 10%"), vec![comp("Beta", "Flat")]);
    assert_eq!(
        resolve("Base: {base_corp_name}\n{summary_list}", &companies),
        "Base: A:Acme\n##\nA:Acme\nGrew 10%\n##\n\n##\nB:Beta\nFlat\n##"
    );
}

#[test]
fn test_zero_companies_expand_to_base_fallback() {
    assert_eq!(
        expand("{summary_list}", CompanyCount::new(false, 0)),
        "##\nA:（企業名未入力）\n（要約未入力）\n##"
    );
}

#[test]
fn test_validate_round_trip() {
    let out_of_range = validate("{comp3_corp_name}", CompanyCount::new(true, 1));
    assert!(!out_of_range.is_valid);
    assert_eq!(out_of_range.errors.len(), 1);

    let missing_base = validate("{base_corp_name}", CompanyCount::new(false, 1));
    assert!(missing_base.is_valid);
    assert_eq!(missing_base.warnings.len(), 1);
    assert!(missing_base.errors.is_empty());
}

#[test]
fn test_sections_render_with_letters_in_summary_list() {
    let companies = CompanyList::with_companies(
        base("Acme", "ignored flat text").with_sections(vec![
            SummarySection::new("Revenue", "Up 10%"),
            SummarySection::new("Margin", "Stable"),
        ]),
        vec![comp("Beta", "Flat")],
    );
    let engine = PromptEngine::new(Locale::English);
    assert_eq!(
        engine.resolve("{summary_list}", &companies),
        "##\nA:Acme\n[A:1] Key point: Revenue\nUp 10%\n\n[A:2] Key point: Margin\nStable\n##\n\n\
         ##\nB:Beta\nFlat\n##"
    );
}

#[test]
fn test_resolved_values_are_not_rescanned() {
    let companies = CompanyList::with_companies(
        base("{comp1_corp_name}", "mentions {summary_list}"),
        vec![comp("Beta", "Flat")],
    );
    assert_eq!(
        resolve("{base_corp_name} / {base_corp_summary}", &companies),
        "A:{comp1_corp_name} / mentions {summary_list}"
    );
}

#[test]
fn test_validate_with_filled_count_matches_resolution() {
    let companies = CompanyList::with_companies(
        base("Acme", "Grew 10%"),
        vec![comp("Beta", "Flat"), comp("Gamma", "")],
    );
    let count = CompanyCount::filled(&companies);
    assert_eq!(count, CompanyCount::new(true, 1));

    let report = validate("{comp1_corp_name} {comp2_corp_name}", count);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("{comp2_corp_name}"));
}

#[test]
fn test_extra_comparison_companies_are_ignored_everywhere() {
    let companies = CompanyList::with_companies(
        base("Acme", "Grew 10%"),
        (0..6).map(|i| comp(&format!("C{}", i), "s")).collect(),
    );
    let resolved = resolve(
        "{comparison_corp_names}|{comparisonCompanies}|{summary_list}|{comp5_corp_name}",
        &companies,
    );
    assert!(resolved.contains("E:C3"));
    assert!(!resolved.contains("F:C4"));
    assert!(!resolved.contains("G:C5"));
}

#[test]
fn test_zero_positions_are_kept_literally() {
    let companies = CompanyList::with_companies(base("Acme", "Grew 10%"), vec![comp("Beta", "Flat")]);
    let template = "[{comp0_corp_name}][{comp01_corp_name}]";
    assert_eq!(resolve(template, &companies), template);
    assert!(validate(template, CompanyCount::new(true, 1)).is_valid);
}
