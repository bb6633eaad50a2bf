use tracing::{debug, info, instrument, warn};

use crate::backend::{OpenAIClient, VisionClient};
use crate::config::VisionConfig;
use crate::encoder::EncodedImage;
use crate::error::Result;
use crate::prompt::{AnalysisOptions, AnalysisRequest, PromptVariant};
use crate::report::Report;
use crate::result::AnalysisResult;

/// Sends refrigerator photos to a vision model and wraps the answer in an
/// [`AnalysisResult`].
///
/// Every call is one independent round trip. The analyzer holds no mutable
/// state and can be shared across tasks.
///
/// # Examples
///
/// ```no_run
/// use fridgelens::{FridgeAnalyzer, VisionConfig, image_to_data_uri};
///
/// # async fn example() -> fridgelens::Result<()> {
/// let analyzer = FridgeAnalyzer::new(VisionConfig::from_env());
/// let image = image_to_data_uri("fridge.jpg").await?;
///
/// let result = analyzer.analyze_detailed(&image, ["milk", "eggs"]).await;
/// match result.result() {
///     Some(text) => println!("{}", text),
///     None => eprintln!("analysis failed: {}", result.error().unwrap_or_default()),
/// }
/// # Ok(())
/// # }
/// ```
pub struct FridgeAnalyzer<C = OpenAIClient> {
    client: C,
}

impl FridgeAnalyzer<OpenAIClient> {
    /// Analyzer backed by OpenAI `gpt-4o`.
    pub fn new(config: VisionConfig) -> Self {
        Self::with_client(OpenAIClient::new(config))
    }

    /// Analyzer whose credential comes from `OPENAI_API_KEY`.
    pub fn from_env() -> Self {
        Self::with_client(OpenAIClient::from_env())
    }
}

impl<C: VisionClient> FridgeAnalyzer<C> {
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Run one analysis with the given options.
    ///
    /// Never fails: transport, authentication and remote errors come back as a
    /// failure envelope carrying the error's message.
    #[instrument(
        name = "fridge_analyze",
        skip(self, image, options),
        fields(
            model = %self.client.model_name(),
            variant = %options.variant,
            hints = options.item_hints.len()
        )
    )]
    pub async fn analyze(&self, image: &EncodedImage, options: &AnalysisOptions) -> AnalysisResult {
        let request = AnalysisRequest::new(image, options);
        debug!(max_tokens = request.max_tokens, "Dispatching analysis request");

        let model = self.client.model_name();
        match self.client.complete(&request).await {
            Ok(text) => {
                info!(result_len = text.len(), "Analysis succeeded");
                AnalysisResult::success(model, text)
            }
            Err(e) => {
                warn!(error = %e, "Analysis failed");
                AnalysisResult::failure(model, e.to_string())
            }
        }
    }

    /// Item list with rough quantities (output capped at 1000 tokens).
    pub async fn analyze_basic(&self, image: &EncodedImage) -> AnalysisResult {
        self.analyze(image, &AnalysisOptions::basic()).await
    }

    /// Full inventory with categories, levels and shopping suggestions (1500 tokens).
    ///
    /// `stock_list` names staple items the model should look for; an empty list
    /// asks for common refrigerator items instead.
    pub async fn analyze_detailed<I, S>(
        &self,
        image: &EncodedImage,
        stock_list: I,
    ) -> AnalysisResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.analyze(image, &AnalysisOptions::detailed(stock_list)).await
    }

    /// Names only (500 tokens).
    pub async fn analyze_lightweight(&self, image: &EncodedImage) -> AnalysisResult {
        self.analyze(image, &AnalysisOptions::lightweight()).await
    }

    /// Analyze with the variant matching `R` and parse the answer into it.
    ///
    /// Unlike the other entry points this returns an error when the call fails
    /// or the output does not fit the report shape.
    pub async fn analyze_report<R, I, S>(&self, image: &EncodedImage, item_hints: I) -> Result<R>
    where
        R: Report,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = AnalysisOptions::new(R::VARIANT).with_item_hints(item_hints);
        if R::VARIANT != PromptVariant::Detailed && !options.item_hints.is_empty() {
            debug!(variant = %R::VARIANT, "Item hints are ignored by this variant");
        }
        self.analyze(image, &options).await.parse_report::<R>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiErrorKind, FridgeLensError};
    use crate::report::LightweightReport;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        answer: std::result::Result<String, ApiErrorKind>,
        seen: Mutex<Vec<(PromptVariant, String, u32)>>,
    }

    impl Recording {
        fn answering(text: &str) -> Self {
            Self {
                answer: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(kind: ApiErrorKind) -> Self {
            Self {
                answer: Err(kind),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VisionClient for Recording {
        fn model_name(&self) -> &str {
            "test-model"
        }

        async fn complete(&self, request: &AnalysisRequest<'_>) -> Result<String> {
            self.seen.lock().unwrap().push((
                request.variant,
                request.instruction.clone(),
                request.max_tokens,
            ));
            self.answer
                .clone()
                .map_err(|kind| FridgeLensError::api_error("Test", kind))
        }
    }

    fn image() -> EncodedImage {
        EncodedImage::from_bytes(b"fake jpeg", "image/jpeg")
    }

    #[tokio::test]
    async fn test_each_wrapper_uses_its_variant_and_cap() {
        let analyzer = FridgeAnalyzer::with_client(Recording::answering("{}"));
        let image = image();

        analyzer.analyze_basic(&image).await;
        analyzer.analyze_detailed(&image, Vec::<String>::new()).await;
        analyzer.analyze_lightweight(&image).await;

        let seen = analyzer.client().seen.lock().unwrap();
        let caps: Vec<_> = seen.iter().map(|(v, _, cap)| (*v, *cap)).collect();
        assert_eq!(
            caps,
            vec![
                (PromptVariant::Basic, 1000),
                (PromptVariant::Detailed, 1500),
                (PromptVariant::Lightweight, 500),
            ]
        );
    }

    #[tokio::test]
    async fn test_detailed_passes_stock_list_into_prompt() {
        let analyzer = FridgeAnalyzer::with_client(Recording::answering("{}"));
        analyzer.analyze_detailed(&image(), ["natto", "kimchi"]).await;

        let seen = analyzer.client().seen.lock().unwrap();
        assert!(seen[0].1.contains("natto, kimchi"));
    }

    #[tokio::test]
    async fn test_success_envelope_carries_raw_text() {
        let analyzer = FridgeAnalyzer::with_client(Recording::answering("not json at all"));
        let result = analyzer.analyze_lightweight(&image()).await;

        assert!(result.is_success());
        assert_eq!(result.result(), Some("not json at all"));
        assert_eq!(result.error(), None);
        assert_eq!(result.model(), "test-model");
    }

    #[tokio::test]
    async fn test_failure_envelope_carries_message() {
        let analyzer = FridgeAnalyzer::with_client(Recording::failing(
            ApiErrorKind::from_status(401, "Incorrect API key provided"),
        ));
        let result = analyzer.analyze_basic(&image()).await;

        assert!(!result.is_success());
        assert_eq!(result.result(), None);
        let message = result.error().unwrap();
        assert!(message.contains("authentication failed"));
        assert!(message.contains("Incorrect API key provided"));
        assert_eq!(result.model(), "test-model");
    }

    #[tokio::test]
    async fn test_analyze_report_parses_fenced_json() {
        let analyzer = FridgeAnalyzer::with_client(Recording::answering(
            "```json\n{\"items\": [\"milk\", \"tofu\"], \"notes\": \"sparse\"}\n```",
        ));
        let report: LightweightReport = analyzer
            .analyze_report(&image(), Vec::<String>::new())
            .await
            .expect("report should parse");

        assert_eq!(report.items, vec!["milk", "tofu"]);
        let seen = analyzer.client().seen.lock().unwrap();
        assert_eq!(seen[0].0, PromptVariant::Lightweight);
    }

    #[tokio::test]
    async fn test_analyze_report_surfaces_failure() {
        let analyzer =
            FridgeAnalyzer::with_client(Recording::failing(ApiErrorKind::from_status(429, "")));
        let err = analyzer
            .analyze_report::<LightweightReport, _, _>(&image(), Vec::<String>::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("rate limit exceeded"));
    }
}
