//! LLM gateway: provider clients for Azure OpenAI and Gemini.
//!
//! Each client turns a resolved prompt into the provider's request body,
//! performs a single HTTP call and normalizes the reply into `LlmResponse`.

use crate::config::{AzureConfig, Config, GeminiConfig};
use crate::models::{LlmModel, Provider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// User-Agent sent with every provider request
const USER_AGENT: &str = concat!("ircompare/", env!("CARGO_PKG_VERSION"));

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0} API is not configured")]
    NotConfigured(Provider),
    #[error("failed to create HTTP client: {0}")]
    ClientError(#[source] reqwest::Error),
    #[error("{provider} request failed: {source}")]
    RequestFailed {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} API error: {status} - {body}")]
    ApiError {
        provider: Provider,
        status: u16,
        body: String,
    },
    #[error("{0} returned no content")]
    EmptyResponse(Provider),
}

impl GatewayError {
    /// HTTP status reported by the provider, if the call got that far
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Token counts reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// Provider-independent completion result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
    pub finish_reason: String,
}

// Azure OpenAI wire format

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AzureChatRequest {
    pub messages: Vec<AzureMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureChatResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<AzureChoice>,
    #[serde(default)]
    pub usage: AzureUsage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureChoice {
    pub message: AzureMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AzureUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

// Gemini wire format

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    pub generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub usage_metadata: GeminiUsage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: GeminiContent,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
    #[serde(default)]
    pub total_token_count: u64,
}

/// Build the Azure OpenAI chat body for a single user prompt
pub fn azure_request(prompt: &str, max_tokens: Option<u32>) -> AzureChatRequest {
    AzureChatRequest {
        messages: vec![AzureMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        max_tokens,
        temperature: TEMPERATURE,
        top_p: TOP_P,
    }
}

/// Build the Gemini generateContent body for a single prompt
pub fn gemini_request(prompt: &str, max_tokens: Option<u32>) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GeminiGenerationConfig {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_output_tokens: max_tokens,
        },
    }
}

/// Normalize an Azure OpenAI reply; the first choice wins
pub fn normalize_azure(response: AzureChatResponse) -> Result<LlmResponse, GatewayError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(GatewayError::EmptyResponse(Provider::AzureOpenai))?;

    Ok(LlmResponse {
        content: choice.message.content,
        usage: TokenUsage {
            input_tokens: response.usage.prompt_tokens,
            output_tokens: response.usage.completion_tokens,
            total_tokens: response.usage.total_tokens,
        },
        model: response.model,
        finish_reason: choice.finish_reason.unwrap_or_default(),
    })
}

/// Normalize a Gemini reply; the parts of the first candidate are concatenated
pub fn normalize_gemini(response: GeminiResponse, model_name: &str) -> Result<LlmResponse, GatewayError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GatewayError::EmptyResponse(Provider::Gemini))?;

    let content = candidate
        .content
        .parts
        .iter()
        .map(|part| part.text.as_str())
        .collect::<String>();

    Ok(LlmResponse {
        content,
        usage: TokenUsage {
            input_tokens: response.usage_metadata.prompt_token_count,
            output_tokens: response.usage_metadata.candidates_token_count,
            total_tokens: response.usage_metadata.total_token_count,
        },
        model: model_name.to_string(),
        finish_reason: candidate.finish_reason.unwrap_or_default(),
    })
}

/// Azure OpenAI chat completions client
pub struct AzureOpenAiClient {
    http: Client,
    endpoint: String,
    api_key: String,
    api_version: String,
}

impl AzureOpenAiClient {
    pub fn new(http: Client, config: &AzureConfig) -> Result<Self, GatewayError> {
        let endpoint = non_empty(&config.endpoint)
            .ok_or(GatewayError::NotConfigured(Provider::AzureOpenai))?;
        let api_key = non_empty(&config.api_key)
            .ok_or(GatewayError::NotConfigured(Provider::AzureOpenai))?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_version: config.api_version.clone(),
        })
    }

    pub fn url(&self, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, deployment, self.api_version
        )
    }

    pub async fn chat(
        &self,
        deployment: &str,
        request: &AzureChatRequest,
    ) -> Result<AzureChatResponse, GatewayError> {
        let provider = Provider::AzureOpenai;
        let response = self
            .http
            .post(self.url(deployment))
            .header("api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|source| GatewayError::RequestFailed { provider, source })?;

        let response = check_status(provider, response).await?;
        response
            .json()
            .await
            .map_err(|source| GatewayError::RequestFailed { provider, source })
    }
}

/// Gemini generateContent client
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(http: Client, config: &GeminiConfig) -> Result<Self, GatewayError> {
        let api_key = non_empty(&config.api_key).ok_or(GatewayError::NotConfigured(Provider::Gemini))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Endpoint without the key, safe to log
    pub fn url(&self, model_name: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model_name)
    }

    pub async fn generate_content(
        &self,
        model_name: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse, GatewayError> {
        let provider = Provider::Gemini;
        let url = format!("{}?key={}", self.url(model_name), self.api_key);
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|source| GatewayError::RequestFailed { provider, source })?;

        let response = check_status(provider, response).await?;
        response
            .json()
            .await
            .map_err(|source| GatewayError::RequestFailed { provider, source })
    }
}

async fn check_status(
    provider: Provider,
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::ApiError {
        provider,
        status: status.as_u16(),
        body,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Create the shared HTTP client
fn create_client(timeout: Duration) -> Result<Client, GatewayError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(GatewayError::ClientError)
}

/// Routes a prompt to the client of the model's provider.
pub struct Gateway {
    azure: Option<AzureOpenAiClient>,
    gemini: Option<GeminiClient>,
}

impl Gateway {
    /// Build clients for every configured provider
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let http = create_client(Duration::from_secs(config.http.timeout_secs))?;

        let azure = if config.azure_configured() {
            Some(AzureOpenAiClient::new(http.clone(), &config.azure)?)
        } else {
            None
        };
        let gemini = if config.gemini_configured() {
            Some(GeminiClient::new(http, &config.gemini)?)
        } else {
            None
        };

        Ok(Self { azure, gemini })
    }

    pub fn is_configured(&self, provider: Provider) -> bool {
        match provider {
            Provider::AzureOpenai => self.azure.is_some(),
            Provider::Gemini => self.gemini.is_some(),
        }
    }

    /// Send one prompt and wait for the complete reply
    pub async fn complete(&self, model: &LlmModel, prompt: &str) -> Result<LlmResponse, GatewayError> {
        let max_tokens = Some(model.max_tokens);
        let response = match model.provider {
            Provider::AzureOpenai => {
                let client = self
                    .azure
                    .as_ref()
                    .ok_or(GatewayError::NotConfigured(Provider::AzureOpenai))?;
                let deployment = model.deployment();
                log::info!("sending prompt to {}", client.url(deployment));
                let reply = client.chat(deployment, &azure_request(prompt, max_tokens)).await?;
                normalize_azure(reply)?
            }
            Provider::Gemini => {
                let client = self
                    .gemini
                    .as_ref()
                    .ok_or(GatewayError::NotConfigured(Provider::Gemini))?;
                log::info!("sending prompt to {}", client.url(&model.model_name));
                let reply = client
                    .generate_content(&model.model_name, &gemini_request(prompt, max_tokens))
                    .await?;
                normalize_gemini(reply, &model.model_name)?
            }
        };

        log::debug!(
            "{} replied: {} input / {} output tokens, finish reason {:?}",
            model.id,
            response.usage.input_tokens,
            response.usage.output_tokens,
            response.finish_reason
        );
        Ok(response)
    }
}
