//! Localized labels used when rendering prompts and reporting problems.
//!
//! Japanese is the default because the prompt templates and the IR
//! summaries this tool was written for are Japanese.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output language for markers, section labels and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "en")]
    English,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Japanese => write!(f, "ja"),
            Locale::English => write!(f, "en"),
        }
    }
}

/// Fixed strings for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub locale: Locale,
    /// Stands in for a whole company that has not been entered.
    pub not_entered: &'static str,
    pub name_not_entered: &'static str,
    pub summary_not_entered: &'static str,
    /// Prefix of the "important point" line of a summary section.
    pub important_point: &'static str,
}

const JAPANESE: Labels = Labels {
    locale: Locale::Japanese,
    not_entered: "（未入力）",
    name_not_entered: "（企業名未入力）",
    summary_not_entered: "（要約未入力）",
    important_point: "重要ポイント",
};

const ENGLISH: Labels = Labels {
    locale: Locale::English,
    not_entered: "(not entered)",
    name_not_entered: "(name not entered)",
    summary_not_entered: "(summary not entered)",
    important_point: "Key point",
};

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::Japanese => &JAPANESE,
            Locale::English => &ENGLISH,
        }
    }
}

impl Labels {
    /// One rendered summary section, e.g. `【B:2】重要ポイント：...`.
    pub fn section_entry(&self, label: &str, important_point: &str, text: &str) -> String {
        match self.locale {
            Locale::Japanese => format!(
                "【{}】{}：{}\n{}",
                label, self.important_point, important_point, text
            ),
            Locale::English => format!(
                "[{}] {}: {}\n{}",
                label, self.important_point, important_point, text
            ),
        }
    }

    pub fn base_not_filled(&self, placeholder: &str) -> String {
        match self.locale {
            Locale::Japanese => format!(
                "{} は基準企業を参照していますが、基準企業が入力されていません",
                placeholder
            ),
            Locale::English => format!(
                "{} refers to the base company, but the base company has not been entered",
                placeholder
            ),
        }
    }

    pub fn comparison_out_of_range(&self, placeholder: &str, index: usize, filled: usize) -> String {
        match self.locale {
            Locale::Japanese => format!(
                "{} は比較企業{}を参照していますが、入力済みの比較企業は{}社です",
                placeholder, index, filled
            ),
            Locale::English => format!(
                "{} refers to comparison company {}, but only {} comparison companies are filled",
                placeholder, index, filled
            ),
        }
    }

    pub fn base_name_required(&self) -> String {
        match self.locale {
            Locale::Japanese => "基準企業の企業名（1行目）は必須です".to_string(),
            Locale::English => "The base company name (first line) is required".to_string(),
        }
    }

    pub fn base_summary_required(&self) -> String {
        match self.locale {
            Locale::Japanese => "基準企業のIR要約（2行目以降）は必須です".to_string(),
            Locale::English => "The base company IR summary (second line onward) is required".to_string(),
        }
    }

    pub fn comparison_name_required(&self, position: usize) -> String {
        match self.locale {
            Locale::Japanese => format!("比較企業{}の企業名（1行目）は必須です", position),
            Locale::English => format!(
                "The name of comparison company {} (first line) is required",
                position
            ),
        }
    }

    pub fn comparison_summary_required(&self, position: usize) -> String {
        match self.locale {
            Locale::Japanese => format!("比較企業{}のIR要約（2行目以降）は必須です", position),
            Locale::English => format!(
                "The IR summary of comparison company {} (second line onward) is required",
                position
            ),
        }
    }

    pub fn comparison_required(&self) -> String {
        match self.locale {
            Locale::Japanese => "比較企業を少なくとも1社入力してください".to_string(),
            Locale::English => "Enter at least one comparison company".to_string(),
        }
    }

    pub fn prompt_name_required(&self) -> String {
        match self.locale {
            Locale::Japanese => "プロンプト名は必須です".to_string(),
            Locale::English => "A prompt name is required".to_string(),
        }
    }

    pub fn prompt_content_required(&self) -> String {
        match self.locale {
            Locale::Japanese => "プロンプト内容は必須です".to_string(),
            Locale::English => "Prompt content is required".to_string(),
        }
    }

    pub fn prompt_too_short(&self, minimum: usize) -> String {
        match self.locale {
            Locale::Japanese => format!("プロンプト内容が短すぎます（{}文字以上推奨）", minimum),
            Locale::English => format!(
                "The prompt is too short ({} characters or more recommended)",
                minimum
            ),
        }
    }
}

/// Headings used by the copyable result reports.
#[derive(Debug, Clone, Copy)]
pub struct ReportLabels {
    pub result_heading: &'static str,
    pub executed_at: &'static str,
    pub model: &'static str,
    pub prompt: &'static str,
    pub companies: &'static str,
    pub base_company: &'static str,
    pub comparison_companies: &'static str,
    pub usage: &'static str,
    pub input_tokens: &'static str,
    pub output_tokens: &'static str,
    pub estimated_cost: &'static str,
    pub prompt_heading: &'static str,
    pub name: &'static str,
    pub content: &'static str,
    pub companies_heading: &'static str,
}

const JAPANESE_REPORT: ReportLabels = ReportLabels {
    result_heading: "分析結果",
    executed_at: "実行日時",
    model: "使用モデル",
    prompt: "プロンプト",
    companies: "対象企業",
    base_company: "基準企業",
    comparison_companies: "比較企業",
    usage: "使用量",
    input_tokens: "入力トークン",
    output_tokens: "出力トークン",
    estimated_cost: "推定料金",
    prompt_heading: "使用したプロンプト",
    name: "名前",
    content: "内容",
    companies_heading: "分析対象企業",
};

const ENGLISH_REPORT: ReportLabels = ReportLabels {
    result_heading: "Analysis result",
    executed_at: "Executed at",
    model: "Model",
    prompt: "Prompt",
    companies: "Companies",
    base_company: "Base company",
    comparison_companies: "Comparison companies",
    usage: "Usage",
    input_tokens: "Input tokens",
    output_tokens: "Output tokens",
    estimated_cost: "Estimated cost",
    prompt_heading: "Prompt used",
    name: "Name",
    content: "Content",
    companies_heading: "Companies analysed",
};

impl Locale {
    pub fn report_labels(self) -> &'static ReportLabels {
        match self {
            Locale::Japanese => &JAPANESE_REPORT,
            Locale::English => &ENGLISH_REPORT,
        }
    }
}
