//! Analysis pipeline: check the request, resolve the prompt, call the model
//! and price the reply.

use crate::company::CompanyList;
use crate::config::Config;
use crate::gateway::{Gateway, GatewayError, LlmResponse};
use crate::locale::Locale;
use crate::models::{LlmModel, Provider};
use crate::resolve::resolve_with;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("missing required parameters (companies, prompt, modelId)")]
    MissingParameters,
    #[error("model {0} not found")]
    UnknownModel(String),
    #[error("no LLM provider is configured, check the environment variables")]
    NoProvider,
    #[error("{0} API is not configured")]
    ProviderNotConfigured(Provider),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl AnalysisError {
    /// Status code the failure maps to when served over HTTP
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::MissingParameters | AnalysisError::UnknownModel(_) => 400,
            AnalysisError::NoProvider | AnalysisError::ProviderNotConfigured(_) => 500,
            AnalysisError::Gateway(err) => err.status_code().unwrap_or(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub companies: CompanyList,
    /// Template text, resolved against `companies` before sending
    pub prompt: String,
    pub model_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<AnalysisUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResponse {
    pub fn failure(error: &AnalysisError) -> Self {
        Self {
            success: false,
            result: None,
            usage: None,
            error: Some(error.to_string()),
        }
    }
}

/// Which providers have credentials and which models they unlock
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub azure_openai: bool,
    pub gemini: bool,
    pub available_models: Vec<LlmModel>,
}

/// A request that passed every check, ready to send
#[derive(Debug, Clone)]
pub struct PreparedAnalysis<'a> {
    pub model: &'a LlmModel,
    pub prompt: String,
}

pub struct Analyzer {
    config: Config,
    gateway: Gateway,
}

impl Analyzer {
    pub fn new(config: Config) -> Result<Self, AnalysisError> {
        let gateway = Gateway::from_config(&config)?;
        Ok(Self { config, gateway })
    }

    pub fn locale(&self) -> Locale {
        self.config.locale
    }

    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            azure_openai: self.config.azure_configured(),
            gemini: self.config.gemini_configured(),
            available_models: self
                .config
                .models
                .iter()
                .filter(|model| self.config.provider_configured(model.provider))
                .cloned()
                .collect(),
        }
    }

    /// Run the checks that need no network and resolve the prompt.
    ///
    /// Checks run in a fixed order: parameters, any provider, model, the
    /// model's provider.
    pub fn prepare(&self, request: &AnalysisRequest) -> Result<PreparedAnalysis<'_>, AnalysisError> {
        if request.prompt.trim().is_empty() || request.model_id.trim().is_empty() {
            return Err(AnalysisError::MissingParameters);
        }
        if !self.config.has_any_provider() {
            return Err(AnalysisError::NoProvider);
        }
        let model = self
            .config
            .find_model(&request.model_id)
            .ok_or_else(|| AnalysisError::UnknownModel(request.model_id.clone()))?;
        if !self.config.provider_configured(model.provider) || !self.gateway.is_configured(model.provider) {
            return Err(AnalysisError::ProviderNotConfigured(model.provider));
        }

        let prompt = resolve_with(&request.prompt, &request.companies, self.config.locale);
        Ok(PreparedAnalysis { model, prompt })
    }

    /// Send one analysis and price it.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        let prepared = self.prepare(request)?;
        log::debug!(
            "resolved prompt for {} ({} characters)",
            prepared.model.id,
            prepared.prompt.chars().count()
        );

        let reply = self.gateway.complete(prepared.model, &prepared.prompt).await?;
        Ok(priced_response(prepared.model, reply))
    }

    /// Like `analyze`, but folds failures into the response body with their status code.
    pub async fn respond(&self, request: &AnalysisRequest) -> (u16, AnalysisResponse) {
        match self.analyze(request).await {
            Ok(response) => (200, response),
            Err(err) => {
                log::error!("analysis failed: {}", err);
                (err.status_code(), AnalysisResponse::failure(&err))
            }
        }
    }

    /// Run an analysis and keep a record of it.
    ///
    /// Request problems are returned as errors; a failed model call still
    /// produces a record with status `error`.
    pub async fn execute(
        &self,
        prompt_name: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let prepared = self.prepare(request)?;
        let prompt = PromptRef {
            name: prompt_name.to_string(),
            content: request.prompt.clone(),
        };

        let record = match self.gateway.complete(prepared.model, &prepared.prompt).await {
            Ok(reply) => {
                let response = priced_response(prepared.model, reply);
                AnalysisResult::success(
                    prepared.model.clone(),
                    prompt,
                    request.companies.clone(),
                    response.result.unwrap_or_default(),
                    response.usage.unwrap_or_default(),
                )
            }
            Err(err) => {
                log::error!("analysis with {} failed: {}", prepared.model.id, err);
                AnalysisResult::failure(
                    prepared.model.clone(),
                    prompt,
                    request.companies.clone(),
                    err.to_string(),
                )
            }
        };
        Ok(record)
    }
}

fn priced_response(model: &LlmModel, reply: LlmResponse) -> AnalysisResponse {
    let estimated_cost = model.cost(&reply.usage);
    AnalysisResponse {
        success: true,
        result: Some(reply.content),
        usage: Some(AnalysisUsage {
            input_tokens: reply.usage.input_tokens,
            output_tokens: reply.usage.output_tokens,
            estimated_cost,
        }),
        error: None,
    }
}

/// Name and content of the prompt an analysis ran with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRef {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Success,
    Error,
}

/// One executed analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub model: LlmModel,
    pub prompt: PromptRef,
    pub companies: CompanyList,
    pub result: String,
    pub usage: AnalysisUsage,
    pub status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    pub fn success(
        model: LlmModel,
        prompt: PromptRef,
        companies: CompanyList,
        result: String,
        usage: AnalysisUsage,
    ) -> Self {
        let timestamp = Utc::now();
        Self {
            id: format!("analysis-{}", timestamp.timestamp_millis()),
            timestamp,
            model,
            prompt,
            companies,
            result,
            usage,
            status: AnalysisStatus::Success,
            error: None,
        }
    }

    pub fn failure(model: LlmModel, prompt: PromptRef, companies: CompanyList, error: String) -> Self {
        let timestamp = Utc::now();
        Self {
            id: format!("analysis-error-{}", timestamp.timestamp_millis()),
            timestamp,
            model,
            prompt,
            companies,
            result: String::new(),
            usage: AnalysisUsage::default(),
            status: AnalysisStatus::Error,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AnalysisStatus::Success
    }
}

/// Totals over a set of analyses
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub total_cost: f64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub successful_analyses: usize,
    pub failed_analyses: usize,
}

impl UsageStats {
    pub fn from_results(results: &[AnalysisResult]) -> Self {
        results.iter().fold(Self::default(), |mut stats, result| {
            stats.total_cost += result.usage.estimated_cost;
            stats.total_input_tokens += result.usage.input_tokens;
            stats.total_output_tokens += result.usage.output_tokens;
            match result.status {
                AnalysisStatus::Success => stats.successful_analyses += 1,
                AnalysisStatus::Error => stats.failed_analyses += 1,
            }
            stats
        })
    }
}
