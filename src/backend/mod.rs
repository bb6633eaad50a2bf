pub mod client;
mod media;
pub mod openai;
pub mod utils;

pub use client::VisionClient;
pub use openai::{Model as OpenAIModel, OpenAIClient};
pub use utils::{check_response_status, extract_json_from_markdown, handle_http_error};
