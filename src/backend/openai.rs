use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::backend::media::{MessagePart, build_message_parts};
use crate::backend::{VisionClient, check_response_status, handle_http_error};
use crate::config::VisionConfig;
use crate::error::{ApiErrorKind, FridgeLensError, Result};
use crate::prompt::AnalysisRequest;

const PROVIDER: &str = "OpenAI";

/// OpenAI models that accept image input.
///
/// ```rust
/// use fridgelens::OpenAIModel;
///
/// assert_eq!(OpenAIModel::default().as_str(), "gpt-4o");
/// assert_eq!("gpt-4o-mini".parse::<OpenAIModel>().unwrap(), OpenAIModel::Gpt4OMini);
/// assert_eq!(
///     OpenAIModel::from("my-proxy-model"),
///     OpenAIModel::Custom("my-proxy-model".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Model {
    #[default]
    Gpt4O,
    Gpt4OMini,
    Gpt4Turbo,
    /// Any other model name (new models or OpenAI-compatible endpoints)
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4O => "gpt-4o",
            Model::Gpt4OMini => "gpt-4o-mini",
            Model::Gpt4Turbo => "gpt-4-turbo",
            Model::Custom(name) => name,
        }
    }

    pub fn from_string(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.as_str() {
            "gpt-4o" => Model::Gpt4O,
            "gpt-4o-mini" => Model::Gpt4OMini,
            "gpt-4-turbo" => Model::Gpt4Turbo,
            _ => Model::Custom(name),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from_string(s))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::from_string(s)
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        Model::from_string(s)
    }
}

/// OpenAI chat-completions client for image analysis.
pub struct OpenAIClient {
    config: VisionConfig,
    model: Model,
    client: reqwest::Client,
}

// OpenAI API request and response structures
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<MessagePart>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ResponseMessage {
    role: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

impl OpenAIClient {
    /// Create a client from an explicit configuration.
    ///
    /// ```no_run
    /// use fridgelens::{OpenAIClient, VisionConfig};
    ///
    /// let client = OpenAIClient::new(VisionConfig::new("sk-..."));
    /// ```
    #[instrument(name = "openai_client_new", skip(config), fields(model = %Model::Gpt4O.as_str()))]
    pub fn new(config: VisionConfig) -> Self {
        info!("Creating new OpenAI client");
        let client = build_http_client(config.timeout);
        debug!(
            base_url = %config.base_url,
            has_api_key = config.has_api_key(),
            timeout = ?config.timeout,
            "OpenAI client created"
        );
        Self {
            config,
            model: Model::default(),
            client,
        }
    }

    /// Create a client with the API key taken from `OPENAI_API_KEY`.
    ///
    /// Never fails: a missing key is logged and the first request reports an
    /// authentication failure.
    pub fn from_env() -> Self {
        Self::new(VisionConfig::from_env())
    }

    /// Set the model to use
    #[instrument(skip(self))]
    pub fn model(mut self, model: impl Into<Model> + std::fmt::Debug) -> Self {
        let model = model.into();
        debug!(previous_model = ?self.model, new_model = ?model, "Setting OpenAI model");
        self.model = model;
        self
    }

    /// Set a custom base URL for OpenAI-compatible APIs, e.g. `http://localhost:1234/v1`.
    #[instrument(skip(self, base_url))]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.with_base_url(base_url);
        debug!(new_base_url = %self.config.base_url, "Setting custom base URL");
        self
    }

    /// Set the timeout for each HTTP request. Without one, a hung request waits
    /// on reqwest's own defaults.
    #[instrument(skip(self))]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        debug!(previous_timeout = ?self.config.timeout, new_timeout = ?timeout, "Setting timeout");
        self.config = self.config.with_timeout(timeout);
        self.client = build_http_client(Some(timeout));
        self
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

fn build_http_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to build reqwest client with timeout, using default");
        reqwest::Client::new()
    })
}

#[async_trait]
impl VisionClient for OpenAIClient {
    fn model_name(&self) -> &str {
        self.model.as_str()
    }

    #[instrument(
        name = "openai_complete",
        skip(self, request),
        fields(
            model = %self.model.as_str(),
            variant = %request.variant,
            max_tokens = request.max_tokens,
            image_mime = %request.image.mime_type()
        )
    )]
    async fn complete(&self, request: &AnalysisRequest<'_>) -> Result<String> {
        debug!(
            instruction_len = request.instruction.len(),
            image_len = request.image.as_str().len(),
            "Building OpenAI chat completion request"
        );
        let body = ChatCompletionRequest {
            model: self.model.as_str().to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: build_message_parts(request),
            }],
            max_tokens: request.max_tokens,
        };

        let url = self.completions_url();
        debug!(url = %url, "Sending request to OpenAI API");
        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        } else {
            warn!("Sending request without an API key");
        }

        let response = builder
            .send()
            .await
            .map_err(|e| handle_http_error(e, PROVIDER))?;
        let response = check_response_status(response, PROVIDER).await?;

        debug!("Successfully received response from OpenAI");
        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse JSON response from OpenAI");
            FridgeLensError::from(e)
        })?;

        let Some(choice) = completion.choices.into_iter().next() else {
            error!("OpenAI returned empty choices array");
            return Err(FridgeLensError::api_error(
                PROVIDER,
                ApiErrorKind::UnexpectedResponse {
                    details: "No completion choices returned".to_string(),
                },
            ));
        };
        trace!(finish_reason = ?choice.finish_reason, "Completion finish reason");

        match choice.message.content {
            Some(content) => {
                debug!(content_len = content.len(), "Extracted content from response");
                Ok(content)
            }
            None => {
                error!("No content in OpenAI response");
                Err(FridgeLensError::api_error(
                    PROVIDER,
                    ApiErrorKind::UnexpectedResponse {
                        details: "No content in response".to_string(),
                    },
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::EncodedImage;
    use crate::prompt::AnalysisOptions;

    #[test]
    fn test_request_body_shape() {
        let image = EncodedImage::from_bytes(b"abc", "image/jpeg");
        let request = AnalysisRequest::new(&image, &AnalysisOptions::detailed(["milk"]));
        let body = ChatCompletionRequest {
            model: Model::Gpt4O.as_str().to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: build_message_parts(&request),
            }],
            max_tokens: request.max_tokens,
        };
        let json = serde_json::to_value(&body).expect("request should serialize");

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 1500);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(
            json["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,YWJj"
        );
    }

    #[test]
    fn test_completions_url_uses_base_url() {
        let client =
            OpenAIClient::new(VisionConfig::new("sk-test")).base_url("http://127.0.0.1:9/v1/");
        assert_eq!(client.completions_url(), "http://127.0.0.1:9/v1/chat/completions");
    }

    #[test]
    fn test_model_override() {
        let client = OpenAIClient::new(VisionConfig::default()).model(Model::Gpt4OMini);
        assert_eq!(client.model_name(), "gpt-4o-mini");
        let client = client.model("local-llava");
        assert_eq!(client.model_name(), "local-llava");
    }

    #[test]
    fn test_response_tolerates_missing_finish_reason() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{}"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).expect("should parse");
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("{}"));
        assert!(parsed.choices[0].finish_reason.is_none());
    }
}
