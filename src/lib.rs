//! # ircompare
//!
//! Compare the investor-relations summaries of a base company and up to four
//! comparison companies by sending a prompt template to an LLM.
//!
//! ## Features
//!
//! - **Prompt variables**: `{baseCompany}`, `{comp2_corp_summary}`, `{summary_list}` and
//!   friends are expanded and resolved against the entered companies
//! - **Validation**: templates are checked against how many companies are filled in
//! - **Templates**: Markdown files with YAML front matter, plus built-in defaults
//! - **Providers**: Azure OpenAI and Gemini, with per-model cost estimates

pub mod analysis;
pub mod company;
pub mod config;
pub mod engine;
pub mod expand;
pub mod gateway;
pub mod input;
pub mod locale;
pub mod models;
pub mod placeholder;
pub mod prompt;
pub mod report;
pub mod resolve;
pub mod template;
pub mod validate;

pub use analysis::{AnalysisRequest, AnalysisResult, Analyzer};
pub use company::{Company, CompanyCount, CompanyKind, CompanyList, SummarySection};
pub use config::Config;
pub use engine::PromptEngine;
pub use expand::expand;
pub use locale::Locale;
pub use resolve::resolve;
pub use template::{Template, TemplateLoader};
pub use validate::{validate, ValidationReport};
