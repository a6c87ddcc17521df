use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

mod error;
mod request;
mod templates;

pub use error::AnalyzerError;
pub use request::{AnalysisRequest, AnalysisType, Language, MAX_MAX_TOKENS, MIN_MAX_TOKENS};
pub use templates::PromptTemplates;

use crate::config::Config;

/// Prompt budget, in estimated tokens. Leaves headroom for the
/// response under the model's context window.
pub const MAX_PROMPT_TOKENS: usize = 800;

const CHARS_PER_TOKEN: usize = 4;

const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Rough token estimate: four characters per token. Not a real
/// tokenizer; it over- and under-counts on dense or non-ASCII code.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// A successful analysis: the model's reply, untouched, plus the
/// prompt-size estimate so the caller can keep its usage counter.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub text: String,
    pub estimated_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Composes the prompt for a request against the configured template
/// set. Pure; exposed separately so callers can show a token estimate
/// before dispatching.
pub fn compose_prompt(request: &AnalysisRequest, config: &Config) -> String {
    config
        .templates
        .render(request.analysis_type, request.language, &request.code)
}

/// Runs one analysis end to end: credential check, prompt assembly,
/// size guard, then a single chat-completion call. Never panics past
/// this boundary; every failure comes back as an `AnalyzerError`.
/// There are no retries — each invocation is fully independent.
pub async fn analyze(
    request: &AnalysisRequest,
    config: &Config,
) -> Result<AnalysisReport, AnalyzerError> {
    let api_key = config
        .analyzer
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            AnalyzerError::MissingCredential(
                "API key not found. Set GROQ_API_KEY in your environment or .env file".to_string(),
            )
        })?;

    let prompt = compose_prompt(request, config);
    let estimated_tokens = estimate_tokens(&prompt);
    if estimated_tokens > MAX_PROMPT_TOKENS {
        return Err(AnalyzerError::InputTooLarge {
            estimated: estimated_tokens,
            limit: MAX_PROMPT_TOKENS,
        });
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| AnalyzerError::MissingCredential(format!("Invalid API key: {}", e)))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.analyzer.timeout_secs))
        .build()
        .map_err(|e| AnalyzerError::Upstream(e.to_string()))?;

    let api_url = config.analyzer.api_url.as_deref().unwrap_or(DEFAULT_API_URL);

    debug!(
        model = %config.analyzer.model,
        estimated_tokens,
        analysis_type = %request.analysis_type,
        "dispatching analysis request"
    );

    let response = client
        .post(api_url)
        .headers(headers)
        .json(&json!({
            "model": &config.analyzer.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": request.temperature,
            "max_completion_tokens": request.max_tokens,
            "top_p": 1,
            "stream": false
        }))
        .send()
        .await
        .map_err(|e| AnalyzerError::Upstream(e.to_string()))?;

    match response.status() {
        StatusCode::OK => (),
        status => {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(AnalyzerError::Upstream(format!(
                "Unexpected status code: {} - Response: {}",
                status, error_body
            )));
        }
    }

    let chat_response: ChatResponse = response
        .json()
        .await
        .map_err(|e| AnalyzerError::Upstream(format!("Failed to parse API response: {}", e)))?;

    let text = chat_response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| AnalyzerError::Upstream("Response contained no completion choices".to_string()))?;

    Ok(AnalysisReport {
        text,
        estimated_tokens,
    })
}
