//! Prompt variants and request construction.

use serde::{Deserialize, Serialize};

use crate::encoder::EncodedImage;

const BASIC_INSTRUCTION: &str = r#"Analyze this photo of the inside of a refrigerator and return JSON in the following format:

{
  "detected_items": [
    {
      "name": "item name",
      "quantity": "amount remaining (plenty/normal/low/none)",
      "confidence": "confidence (0-100)",
      "location": "position inside the refrigerator"
    }
  ],
  "overall_assessment": "overall impression"
}"#;

const DETAILED_SCHEMA: &str = r#"Return JSON in the following format:

{
  "detected_items": [
    {
      "name": "item name",
      "category": "category (vegetables/meat/dairy/condiments/other)",
      "quantity_level": "amount level on a 5-step scale: 0=none, 1=almost none, 2=low, 3=normal, 4=plenty",
      "estimated_count": "estimated count or amount",
      "confidence": "detection confidence (0-100)",
      "location": "position (top shelf/middle shelf/bottom shelf/door pocket, etc.)",
      "expiry_concern": "expiry concern (low/medium/high)"
    }
  ],
  "shopping_suggestions": [
    "item to buy"
  ],
  "analysis_notes": "caveats or limitations of this analysis"
}"#;

const GENERIC_STOCK_HINT: &str = "Detect the items commonly found in a refrigerator.";

const LIGHTWEIGHT_INSTRUCTION: &str = r#"Briefly list the food items inside the refrigerator. Answer in JSON:

{
  "items": ["item 1", "item 2", "..."],
  "notes": "short comment"
}"#;

/// One of the fixed prompt/output-size configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptVariant {
    /// Item list with rough quantities and an overall assessment
    Basic,
    /// Categorised items, 5-step quantity levels, expiry concerns and shopping suggestions
    Detailed,
    /// Names only
    Lightweight,
}

impl PromptVariant {
    pub const ALL: [PromptVariant; 3] = [
        PromptVariant::Lightweight,
        PromptVariant::Basic,
        PromptVariant::Detailed,
    ];

    /// Cap on the model's output length for this variant.
    pub fn max_tokens(self) -> u32 {
        match self {
            PromptVariant::Lightweight => 500,
            PromptVariant::Basic => 1000,
            PromptVariant::Detailed => 1500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PromptVariant::Basic => "basic",
            PromptVariant::Detailed => "detailed",
            PromptVariant::Lightweight => "lightweight",
        }
    }

    /// Build the instruction text. Only the detailed variant uses `items`.
    pub fn instruction(self, items: &[String]) -> String {
        match self {
            PromptVariant::Basic => BASIC_INSTRUCTION.to_string(),
            PromptVariant::Lightweight => LIGHTWEIGHT_INSTRUCTION.to_string(),
            PromptVariant::Detailed => {
                let hint = if items.is_empty() {
                    GENERIC_STOCK_HINT.to_string()
                } else {
                    format!(
                        "Pay particular attention to the following staple items: {}",
                        items.join(", ")
                    )
                };
                format!(
                    "Analyze this photo of the inside of a refrigerator in detail. {}\n\n{}",
                    hint, DETAILED_SCHEMA
                )
            }
        }
    }
}

impl std::fmt::Display for PromptVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PromptVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(PromptVariant::Basic),
            "detailed" => Ok(PromptVariant::Detailed),
            "lightweight" | "light" => Ok(PromptVariant::Lightweight),
            other => Err(format!(
                "unknown prompt variant `{}` (expected basic, detailed or lightweight)",
                other
            )),
        }
    }
}

/// Per-call dispatch settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub variant: PromptVariant,
    /// Overrides the variant's default output cap when set.
    pub max_tokens: Option<u32>,
    /// Staple item names to look for (detailed variant only).
    pub item_hints: Vec<String>,
}

impl AnalysisOptions {
    pub fn new(variant: PromptVariant) -> Self {
        Self {
            variant,
            max_tokens: None,
            item_hints: Vec::new(),
        }
    }

    pub fn basic() -> Self {
        Self::new(PromptVariant::Basic)
    }

    pub fn detailed<I, S>(item_hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(PromptVariant::Detailed).with_item_hints(item_hints)
    }

    pub fn lightweight() -> Self {
        Self::new(PromptVariant::Lightweight)
    }

    pub fn with_item_hints<I, S>(mut self, item_hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_hints = item_hints.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        // a zero cap is rejected by the API
        self.max_tokens = Some(max_tokens.max(1));
        self
    }

    pub fn effective_max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or_else(|| self.variant.max_tokens())
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::basic()
    }
}

/// A fully built request: instruction text, image and output cap.
#[derive(Debug, Clone)]
pub struct AnalysisRequest<'a> {
    pub variant: PromptVariant,
    pub instruction: String,
    pub image: &'a EncodedImage,
    pub max_tokens: u32,
}

impl<'a> AnalysisRequest<'a> {
    pub fn new(image: &'a EncodedImage, options: &AnalysisOptions) -> Self {
        Self {
            variant: options.variant,
            instruction: options.variant.instruction(&options.item_hints),
            image,
            max_tokens: options.effective_max_tokens(),
        }
    }
}
