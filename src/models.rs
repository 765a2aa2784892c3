//! Catalog of the LLM models an analysis can be sent to.

use crate::gateway::TokenUsage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// LLM provider behind a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    AzureOpenai,
    Gemini,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::AzureOpenai => write!(f, "azure-openai"),
            Provider::Gemini => write!(f, "gemini"),
        }
    }
}

/// Price in USD per 1,000 tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input: f64,
    pub output: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmModel {
    pub id: String,
    /// Display name
    pub name: String,
    pub provider: Provider,
    /// Model name sent to the provider
    pub model_name: String,
    /// Azure OpenAI deployment; falls back to `model_name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_name: Option<String>,
    /// Maximum output tokens requested
    pub max_tokens: u32,
    pub pricing: Pricing,
}

impl LlmModel {
    pub fn deployment(&self) -> &str {
        self.deployment_name.as_deref().unwrap_or(&self.model_name)
    }

    /// Estimated cost of a call in USD
    pub fn cost(&self, usage: &TokenUsage) -> f64 {
        let input = usage.input_tokens as f64 / 1000.0 * self.pricing.input;
        let output = usage.output_tokens as f64 / 1000.0 * self.pricing.output;
        input + output
    }
}

/// Environment variables that override the Azure deployment of a model.
pub const DEPLOYMENT_ENV_VARS: &[(&str, &str)] = &[
    ("azure-gpt-4o", "AZURE_OPENAI_GPT4O_DEPLOYMENT"),
    ("azure-gpt-4o-mini", "AZURE_OPENAI_GPT4O_MINI_DEPLOYMENT"),
    ("azure-gpt-4.1-mini", "AZURE_OPENAI_GPT41_MINI_DEPLOYMENT"),
];

fn azure(id: &str, name: &str, model_name: &str, max_tokens: u32, pricing: Pricing) -> LlmModel {
    LlmModel {
        id: id.to_string(),
        name: name.to_string(),
        provider: Provider::AzureOpenai,
        model_name: model_name.to_string(),
        deployment_name: Some(model_name.to_string()),
        max_tokens,
        pricing,
    }
}

fn gemini(id: &str, name: &str, max_tokens: u32, pricing: Pricing) -> LlmModel {
    LlmModel {
        id: id.to_string(),
        name: name.to_string(),
        provider: Provider::Gemini,
        model_name: id.to_string(),
        deployment_name: None,
        max_tokens,
        pricing,
    }
}

/// The built-in model list
pub fn default_models() -> Vec<LlmModel> {
    vec![
        azure(
            "azure-gpt-4o",
            "Azure GPT-4o",
            "gpt-4o",
            4096,
            Pricing { input: 0.0025, output: 0.01 },
        ),
        azure(
            "azure-gpt-4o-mini",
            "Azure GPT-4o Mini",
            "gpt-4o-mini",
            16384,
            Pricing { input: 0.00015, output: 0.0006 },
        ),
        azure(
            "azure-gpt-4.1-mini",
            "Azure GPT-4.1 Mini",
            "gpt-4.1-mini",
            16384,
            Pricing { input: 0.00015, output: 0.0006 },
        ),
        gemini(
            "gemini-2.0-flash",
            "Gemini 2.0 Flash",
            8192,
            Pricing { input: 0.000075, output: 0.0003 },
        ),
        gemini(
            "gemini-1.5-pro",
            "Gemini 1.5 Pro",
            8192,
            Pricing { input: 0.00125, output: 0.005 },
        ),
    ]
}

pub fn find_model<'a>(models: &'a [LlmModel], id: &str) -> Option<&'a LlmModel> {
    models.iter().find(|model| model.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let models = default_models();
        assert_eq!(models.len(), 5);
        let gemini = find_model(&models, "gemini-2.0-flash").unwrap();
        assert_eq!(gemini.provider, Provider::Gemini);
        assert_eq!(gemini.deployment(), "gemini-2.0-flash");
        assert!(find_model(&models, "gpt-5").is_none());
    }

    #[test]
    fn test_cost_per_thousand_tokens() {
        let models = default_models();
        let model = find_model(&models, "azure-gpt-4o").unwrap();
        let usage = TokenUsage {
            input_tokens: 2000,
            output_tokens: 500,
            total_tokens: 2500,
        };
        let cost = model.cost(&usage);
        assert!((cost - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_provider_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&Provider::AzureOpenai).unwrap(), "\"azure-openai\"");
        assert_eq!(Provider::Gemini.to_string(), "gemini");
    }

    #[test]
    fn test_deployment_env_vars_name_known_models() {
        let models = default_models();
        for (id, _) in DEPLOYMENT_ENV_VARS {
            assert!(find_model(&models, id).is_some());
        }
    }
}
