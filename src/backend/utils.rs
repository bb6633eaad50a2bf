use reqwest::Response;
use serde::Deserialize;
use tracing::error;

use crate::error::{ApiErrorKind, FridgeLensError, Result};

/// Extract JSON from markdown code blocks if present, otherwise return the content as-is.
///
/// Vision models often wrap JSON answers in ```json ... ``` fences even when asked not to,
/// sometimes after a line of prose. The first complete fenced block wins.
pub fn extract_json_from_markdown(content: &str) -> String {
    let trimmed = content.trim();

    if let Some(open_idx) = trimmed.find("```") {
        let after_open = &trimmed[open_idx + 3..];
        if let Some(newline_idx) = after_open.find('\n') {
            let body = &after_open[newline_idx + 1..];
            if let Some(close_idx) = body.find("```") {
                return body[..close_idx].trim().to_string();
            }
        }
    }

    trimmed.to_string()
}

/// Convert a reqwest error to a FridgeLensError, handling timeout errors specially.
pub fn handle_http_error(e: reqwest::Error, provider_name: &str) -> FridgeLensError {
    error!(error = %e, "HTTP request to {} failed", provider_name);
    if e.is_timeout() {
        FridgeLensError::Timeout
    } else {
        FridgeLensError::HttpError(e)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Pull `error.message` out of an OpenAI-style error body, or fall back to the raw text.
pub fn error_message_from_body(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Check HTTP response status and turn an unsuccessful one into an API error.
pub async fn check_response_status(response: Response, provider_name: &str) -> Result<Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        error!(
            status = %status,
            error = %error_text,
            "{} API returned error response", provider_name
        );
        let kind = ApiErrorKind::from_status(status.as_u16(), error_message_from_body(&error_text));
        return Err(FridgeLensError::api_error(provider_name, kind));
    }
    Ok(response)
}
