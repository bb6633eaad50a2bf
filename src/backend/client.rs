use async_trait::async_trait;

use crate::error::Result;
use crate::prompt::AnalysisRequest;

/// VisionClient is the seam between the analyzer and a concrete vision API.
///
/// An implementation performs exactly one round trip per call: send the
/// instruction text and image, return the text of the first choice. It must
/// not retry, cache or interpret the text.
///
/// The library ships [`OpenAIClient`](crate::OpenAIClient). Tests and
/// alternative providers can implement the trait directly:
///
/// ```
/// use async_trait::async_trait;
/// use fridgelens::{AnalysisRequest, FridgeAnalyzer, Result, VisionClient};
///
/// struct Canned;
///
/// #[async_trait]
/// impl VisionClient for Canned {
///     fn model_name(&self) -> &str {
///         "canned"
///     }
///
///     async fn complete(&self, _request: &AnalysisRequest<'_>) -> Result<String> {
///         Ok(r#"{"items": ["milk"], "notes": "mostly empty"}"#.to_string())
///     }
/// }
///
/// let analyzer = FridgeAnalyzer::with_client(Canned);
/// assert_eq!(analyzer.model_name(), "canned");
/// ```
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Model identifier reported in every result envelope.
    fn model_name(&self) -> &str;

    /// Send one request and return the raw response text.
    async fn complete(&self, request: &AnalysisRequest<'_>) -> Result<String>;
}
