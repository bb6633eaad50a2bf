//! The success/failure envelope returned by every analysis call.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::backend::extract_json_from_markdown;
use crate::error::{ApiErrorKind, FridgeLensError, Result};
use crate::report::Report;

/// Outcome of one analysis call.
///
/// Holds exactly one of the raw response text or an error message, plus the
/// model identifier that was asked. The text is passed through untouched; use
/// [`parse_report`](Self::parse_report) to opt into typed validation.
///
/// Serializes as `{"success": true, "result": "...", "model": "gpt-4o"}` or
/// `{"success": false, "error": "...", "model": "gpt-4o"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Envelope", into = "Envelope")]
pub struct AnalysisResult {
    model: String,
    outcome: std::result::Result<String, String>,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    model: String,
}

impl AnalysisResult {
    pub fn success(model: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            outcome: Ok(result.into()),
        }
    }

    pub fn failure(model: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            outcome: Err(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Raw model output, when the call succeeded.
    pub fn result(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    /// Error message, when the call failed.
    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(String::as_str)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn into_outcome(self) -> std::result::Result<String, String> {
        self.outcome
    }

    /// Parse the raw text into a typed report and validate it.
    ///
    /// Markdown code fences around the JSON are stripped first. A failure
    /// envelope yields an API error carrying its message.
    pub fn parse_report<R: Report>(&self) -> Result<R> {
        let raw = match &self.outcome {
            Ok(raw) => raw,
            Err(message) => {
                return Err(FridgeLensError::api_error(
                    self.model.clone(),
                    ApiErrorKind::UnexpectedResponse {
                        details: message.clone(),
                    },
                ));
            }
        };

        let json = extract_json_from_markdown(raw);
        let report: R = serde_json::from_str(&json).map_err(|e| {
            error!(
                error = %e,
                report = std::any::type_name::<R>(),
                "Model output is not a valid report"
            );
            FridgeLensError::ValidationError(format!(
                "Failed to parse response: {}\nPartial JSON: {}",
                e, json
            ))
        })?;
        report.validate()?;
        debug!(report = std::any::type_name::<R>(), "Parsed and validated report");
        Ok(report)
    }
}

impl TryFrom<Envelope> for AnalysisResult {
    type Error = String;

    fn try_from(envelope: Envelope) -> std::result::Result<Self, Self::Error> {
        match (envelope.success, envelope.result, envelope.error) {
            (true, Some(result), None) => Ok(Self::success(envelope.model, result)),
            (false, None, Some(error)) => Ok(Self::failure(envelope.model, error)),
            (true, _, _) => Err("a successful envelope needs `result` and no `error`".to_string()),
            (false, _, _) => Err("a failed envelope needs `error` and no `result`".to_string()),
        }
    }
}

impl From<AnalysisResult> for Envelope {
    fn from(result: AnalysisResult) -> Self {
        match result.outcome {
            Ok(text) => Envelope {
                success: true,
                result: Some(text),
                error: None,
                model: result.model,
            },
            Err(message) => Envelope {
                success: false,
                result: None,
                error: Some(message),
                model: result.model,
            },
        }
    }
}
