use fridgelens::{EncodedImage, FridgeAnalyzer, VisionConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

#[allow(dead_code)]
pub const TEST_API_KEY: &str = "sk-test";

/// Smallest valid PNG header; enough for MIME sniffing.
pub const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

#[allow(dead_code)]
pub fn fridge_image() -> EncodedImage {
    EncodedImage::from_bytes(PNG_BYTES, "image/png")
}

#[allow(dead_code)]
pub fn analyzer_for(server: &MockServer) -> FridgeAnalyzer {
    FridgeAnalyzer::new(VisionConfig::new(TEST_API_KEY).with_base_url(server.uri()))
}

/// Chat completion body in the shape OpenAI returns.
#[allow(dead_code)]
pub fn completion_response(content: &str) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 812,
            "completion_tokens": 64,
            "total_tokens": 876
        }
    })
}

#[allow(dead_code)]
pub fn error_response(error_type: &str, message: &str, code: &str) -> Value {
    json!({
        "error": {
            "message": message,
            "type": error_type,
            "param": null,
            "code": code
        }
    })
}
