use log::{debug, info, warn};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::common::{AppError, GenerationRequest, OPENAI_API_BASE, mask_key_secure};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CompletionRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
    temperature: i64,
    n: i64,
    // always serialized, so the service sees an explicit "no stop sequence"
    stop: Option<Vec<String>>,
}

impl From<&GenerationRequest> for CompletionRequest {
    fn from(item: &GenerationRequest) -> Self {
        CompletionRequest {
            model: item.model.to_string(),
            prompt: item.prompt.clone(),
            max_tokens: item.max_tokens,
            temperature: item.temperature,
            n: item.n,
            stop: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CompletionChoice {
    text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

pub struct CompletionClient {
    base_url: String,
    http: reqwest::Client,
}

impl Default for CompletionClient {
    fn default() -> Self {
        Self::with_base_url(OPENAI_API_BASE)
    }
}

impl CompletionClient {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Sends one completion request and returns the text of the first
    /// candidate.
    pub async fn create_completion(&self, request: &GenerationRequest)
            -> Result<String, AppError> {
        // show only the edges of the key, in case we are not sure which one
        // is in use
        info!("using key: {}", mask_key_secure(
            request.api_key.key.expose_secret()));

        let body = CompletionRequest::from(request);
        debug!("completion request: model={} max_tokens={} temperature={} n={}",
            body.model, body.max_tokens, body.temperature, body.n);

        let res = self.http
            .post(format!("{url}/v1/completions", url = self.base_url))
            .bearer_auth(request.api_key.key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(parsed) => parsed.error.message,
                Err(_) => status.canonical_reason()
                    .unwrap_or("Request failed").to_string(),
            };
            warn!("completion request failed with status {}", status.as_u16());
            return Err(AppError::Api { status: status.as_u16(), message });
        }

        let response = res.json::<CompletionResponse>().await?;
        info!("received {} choice(s)", response.choices.len());
        response.choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or(AppError::NoCandidates)
    }
}
