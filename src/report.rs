//! Typed views of the JSON shapes each prompt variant asks for.
//!
//! Nothing on the dispatch path uses these. They exist for callers that want
//! to turn a successful [`AnalysisResult`](crate::AnalysisResult) into data via
//! [`parse_report`](crate::AnalysisResult::parse_report).
//!
//! Models tend to quote numbers ("85") and sometimes emit bare numbers where a
//! string was requested, so numeric and free-text fields accept either form.
//! Optional fields also accept `null` and read it as empty.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{FridgeLensError, Result};
use crate::prompt::PromptVariant;

/// A report shape with post-parse validation.
pub trait Report: DeserializeOwned {
    /// The prompt variant that asks for this shape.
    const VARIANT: PromptVariant;

    fn validate(&self) -> Result<()>;
}

/// Answer to the basic prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicReport {
    pub detected_items: Vec<BasicItem>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub overall_assessment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicItem {
    pub name: String,
    /// plenty / normal / low / none
    #[serde(deserialize_with = "lenient_text")]
    pub quantity: String,
    #[serde(deserialize_with = "lenient_number")]
    pub confidence: u8,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: String,
}

/// Answer to the detailed prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedReport {
    pub detected_items: Vec<DetailedItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shopping_suggestions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub analysis_notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedItem {
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub category: String,
    /// 0 = none, 1 = almost none, 2 = low, 3 = normal, 4 = plenty
    #[serde(deserialize_with = "lenient_number")]
    pub quantity_level: u8,
    #[serde(default, deserialize_with = "lenient_text")]
    pub estimated_count: String,
    #[serde(deserialize_with = "lenient_number")]
    pub confidence: u8,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: String,
    /// low / medium / high
    #[serde(default, deserialize_with = "lenient_text")]
    pub expiry_concern: String,
}

/// Answer to the lightweight prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightweightReport {
    pub items: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: String,
}

pub const MAX_CONFIDENCE: u8 = 100;
pub const MAX_QUANTITY_LEVEL: u8 = 4;

impl Report for BasicReport {
    const VARIANT: PromptVariant = PromptVariant::Basic;

    fn validate(&self) -> Result<()> {
        for (idx, item) in self.detected_items.iter().enumerate() {
            check_name(idx, &item.name)?;
            check_confidence(idx, item.confidence)?;
        }
        Ok(())
    }
}

impl Report for DetailedReport {
    const VARIANT: PromptVariant = PromptVariant::Detailed;

    fn validate(&self) -> Result<()> {
        for (idx, item) in self.detected_items.iter().enumerate() {
            check_name(idx, &item.name)?;
            check_confidence(idx, item.confidence)?;
            if item.quantity_level > MAX_QUANTITY_LEVEL {
                return Err(FridgeLensError::ValidationError(format!(
                    "detected_items[{}].quantity_level must be 0-{}, got {}",
                    idx, MAX_QUANTITY_LEVEL, item.quantity_level
                )));
            }
        }
        Ok(())
    }
}

impl Report for LightweightReport {
    const VARIANT: PromptVariant = PromptVariant::Lightweight;

    fn validate(&self) -> Result<()> {
        for (idx, name) in self.items.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(FridgeLensError::ValidationError(format!(
                    "items[{}] is empty",
                    idx
                )));
            }
        }
        Ok(())
    }
}

fn check_name(idx: usize, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(FridgeLensError::ValidationError(format!(
            "detected_items[{}].name is empty",
            idx
        )));
    }
    Ok(())
}

fn check_confidence(idx: usize, confidence: u8) -> Result<()> {
    if confidence > MAX_CONFIDENCE {
        return Err(FridgeLensError::ValidationError(format!(
            "detected_items[{}].confidence must be 0-{}, got {}",
            idx, MAX_CONFIDENCE, confidence
        )));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Null,
    Number(f64),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Null => return Err(D::Error::custom("expected a number, got null")),
        NumberOrText::Number(n) => n,
        NumberOrText::Text(s) => s
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("expected a number, got `{}`", s)))?,
    };
    if !(0.0..=f64::from(u8::MAX)).contains(&value) {
        return Err(D::Error::custom(format!("number {} out of range", value)));
    }
    Ok(value.round() as u8)
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Null => String::new(),
        NumberOrText::Number(n) => n.to_string(),
        NumberOrText::Text(s) => s,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
