//! fridgelens: refrigerator photo analysis through a multimodal LLM
//!
//! # Overview
//!
//! fridgelens turns a photo of the inside of a refrigerator into a data URI,
//! sends it to OpenAI `gpt-4o` together with fixed instructions, and returns
//! the model's raw answer in a uniform envelope:
//!
//! - [`image_to_data_uri`] / [`EncodedImage`] encode an image file or buffer
//! - [`FridgeAnalyzer`] dispatches one of three prompt variants
//!   (basic, detailed with optional stock-item hints, lightweight)
//! - [`AnalysisResult`] holds either the raw text or an error message, plus
//!   the model name; dispatch itself never returns `Err`
//! - [`AnalysisResult::parse_report`] optionally turns the text into a typed,
//!   validated report
//!
//! # Quick Start
//!
//! ```no_run
//! use fridgelens::{FridgeAnalyzer, VisionConfig, image_to_data_uri};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads OPENAI_API_KEY; a missing key is logged, not fatal
//!     let analyzer = FridgeAnalyzer::new(VisionConfig::from_env());
//!
//!     let image = image_to_data_uri("fridge.jpg").await?;
//!     let result = analyzer.analyze_basic(&image).await;
//!
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!     Ok(())
//! }
//! ```
mod analyzer;
mod backend;
mod config;
mod encoder;
mod error;
#[cfg(feature = "logging")]
pub mod logging;
mod prompt;
pub mod report;
mod result;

// Re-exports for convenience
pub use analyzer::FridgeAnalyzer;
pub use backend::{OpenAIClient, OpenAIModel, VisionClient, extract_json_from_markdown};
pub use config::{API_KEY_ENV_VAR, DEFAULT_BASE_URL, VisionConfig};
pub use encoder::{EncodedImage, image_to_data_uri};
pub use error::{ApiErrorKind, FridgeLensError, Result};
pub use prompt::{AnalysisOptions, AnalysisRequest, PromptVariant};
pub use report::{BasicReport, DetailedReport, LightweightReport, Report};
pub use result::AnalysisResult;
