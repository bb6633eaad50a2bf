use serde::Serialize;

use crate::prompt::AnalysisRequest;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum MessagePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub(crate) url: String,
}

/// Instruction text first, then the inlined image.
pub(crate) fn build_message_parts(request: &AnalysisRequest<'_>) -> Vec<MessagePart> {
    vec![
        MessagePart::Text {
            text: request.instruction.clone(),
        },
        MessagePart::ImageUrl {
            image_url: ImageUrl {
                url: request.image.as_str().to_string(),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::EncodedImage;
    use crate::prompt::AnalysisOptions;

    #[test]
    fn test_parts_serialize_as_text_then_image() {
        let image = EncodedImage::from_bytes(b"abc", "image/png");
        let request = AnalysisRequest::new(&image, &AnalysisOptions::lightweight());
        let json = serde_json::to_value(build_message_parts(&request))
            .expect("parts should serialize");

        assert_eq!(json[0]["type"], "text");
        assert_eq!(json[0]["text"], request.instruction.as_str());
        assert_eq!(json[1]["type"], "image_url");
        assert_eq!(
            json[1]["image_url"],
            serde_json::json!({"url": "data:image/png;base64,YWJj"})
        );
    }
}
