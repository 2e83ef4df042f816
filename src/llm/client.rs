//! Classification service clients: the narrow [`LlmClient`] trait, an
//! OpenAI-compatible blocking HTTP client, and a mock for tests.

use serde::{Deserialize, Serialize};

use super::LlmError;
use crate::config::LlmConfig;

/// Fixed system instruction for the classification call.
pub const CLASSIFICATION_SYSTEM_PROMPT: &str = "You classify user inputs to known database \
processes or biosphere flows with name and location or category. You convert units if necessary.";

/// Upper bound on the single blocking round trip.
pub const REQUEST_TIMEOUT_SECS: u64 = 900;

/// Narrow interface to the external text-classification service. The core
/// pipeline depends only on this contract, not on a specific provider.
pub trait LlmClient {
    fn classify(&self, request: &str) -> Result<String, LlmError>;
}

/// OpenAI-compatible chat-completions client over blocking HTTP.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f64>,
    top_p: Option<f64>,
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            client,
        })
    }

    fn send(&self, request: &str, with_sampling: bool) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: CLASSIFICATION_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: request,
                },
            ],
            temperature: if with_sampling { self.temperature } else { None },
            top_p: if with_sampling { self.top_p } else { None },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    LlmError::HttpClient(format!(
                        "request timed out after {REQUEST_TIMEOUT_SECS}s"
                    ))
                } else {
                    LlmError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("response carried no choices".into()))
    }
}

impl LlmClient for OpenAiClient {
    fn classify(&self, request: &str) -> Result<String, LlmError> {
        match self.send(request, true) {
            // Some models reject sampling controls outright. Retry once
            // with the reduced parameter set.
            Err(LlmError::Api { status: 400, .. }) => {
                tracing::warn!(model = %self.model, "request shape rejected, retrying without sampling parameters");
                self.send(request, false)
            }
            other => other,
        }
    }
}

/// Request body for the chat-completions endpoint.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Mock classification client for tests. Returns a configurable response
/// and records the requests it receives.
pub struct MockLlmClient {
    response: String,
    requests: std::cell::RefCell<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            requests: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl LlmClient for MockLlmClient {
    fn classify(&self, request: &str) -> Result<String, LlmError> {
        self.requests.borrow_mut().push(request.to_string());
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("1. toluene | RER | kilogram | 2.0");
        let result = client.classify("request body").unwrap();
        assert_eq!(result, "1. toluene | RER | kilogram | 2.0");
        assert_eq!(client.requests(), vec!["request body".to_string()]);
    }

    #[test]
    fn openai_client_trims_trailing_slash() {
        let config = LlmConfig {
            api_key: "key".into(),
            base_url: "https://api.example.com/v1/".into(),
            model: "qwen3-235b-a22b".into(),
            temperature: Some(0.2),
            top_p: None,
        };
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
        assert_eq!(client.model, "qwen3-235b-a22b");
    }

    #[test]
    fn chat_request_omits_unset_sampling_params() {
        let body = ChatRequest {
            model: "m",
            messages: vec![],
            temperature: None,
            top_p: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("top_p").is_none());

        let body = ChatRequest {
            model: "m",
            messages: vec![],
            temperature: Some(0.1),
            top_p: Some(0.9),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["temperature"], 0.1);
        assert_eq!(json["top_p"], 0.9);
    }
}
