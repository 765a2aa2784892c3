//! Plain-text reports of an analysis, in the forms a user copies out.

use crate::analysis::AnalysisResult;
use crate::locale::Locale;
use chrono::Local;
use clap::ValueEnum;

/// Which part of a result to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Header with date, model, prompt, companies and usage, then the result
    #[default]
    Full,
    /// The model's answer only
    Result,
    /// The prompt the analysis ran with
    Prompt,
    /// The companies that were compared
    Companies,
}

pub fn render(result: &AnalysisResult, format: ReportFormat, locale: Locale) -> String {
    match format {
        ReportFormat::Full => full_result(result, locale),
        ReportFormat::Result => result_only(result),
        ReportFormat::Prompt => prompt_text(result, locale),
        ReportFormat::Companies => companies_text(result, locale),
    }
}

pub fn full_result(result: &AnalysisResult, locale: Locale) -> String {
    let labels = locale.report_labels();
    let comparison_names = result
        .companies
        .comparison_companies
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "## {heading}\n\n\
         **{executed_at}**: {timestamp}\n\
         **{model}**: {model_name}\n\
         **{prompt}**: {prompt_name}\n\n\
         **{companies}**:\n\
         - {base}: {base_name}\n\
         - {comparison}: {comparison_names}\n\n\
         **{usage}**:\n\
         - {input}: {input_tokens}\n\
         - {output}: {output_tokens}\n\
         - {cost}: ${estimated_cost:.4}\n\n\
         ---\n\n\
         {body}",
        heading = labels.result_heading,
        executed_at = labels.executed_at,
        timestamp = result.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        model = labels.model,
        model_name = result.model.name,
        prompt = labels.prompt,
        prompt_name = result.prompt.name,
        companies = labels.companies,
        base = labels.base_company,
        base_name = result.companies.base_company.name,
        comparison = labels.comparison_companies,
        comparison_names = comparison_names,
        usage = labels.usage,
        input = labels.input_tokens,
        input_tokens = group_thousands(result.usage.input_tokens),
        output = labels.output_tokens,
        output_tokens = group_thousands(result.usage.output_tokens),
        cost = labels.estimated_cost,
        estimated_cost = result.usage.estimated_cost,
        body = result.result,
    )
}

pub fn result_only(result: &AnalysisResult) -> String {
    result.result.clone()
}

pub fn prompt_text(result: &AnalysisResult, locale: Locale) -> String {
    let labels = locale.report_labels();
    format!(
        "## {}\n\n**{}**: {}\n\n**{}**:\n{}",
        labels.prompt_heading, labels.name, result.prompt.name, labels.content, result.prompt.content
    )
}

pub fn companies_text(result: &AnalysisResult, locale: Locale) -> String {
    let labels = locale.report_labels();
    let base = &result.companies.base_company;
    let comparisons = result
        .companies
        .comparison_companies
        .iter()
        .enumerate()
        .map(|(index, company)| format!("{}. {}\n{}", index + 1, company.name, company.summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "## {}\n\n**{}**: {}\n{}\n\n**{}**:\n{}",
        labels.companies_heading,
        labels.base_company,
        base.name,
        base.summary,
        labels.comparison_companies,
        comparisons
    )
}

/// `1234567` -> `1,234,567`
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
