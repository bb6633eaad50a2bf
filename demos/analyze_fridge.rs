//! Analyze a refrigerator photo from the command line
//!
//! Run with:
//! ```bash
//! export OPENAI_API_KEY=your_key_here
//! cargo run --example analyze_fridge -- fridge.jpg detailed milk eggs natto
//! ```
//!
//! The second argument picks the variant (basic, detailed, lightweight); any
//! further arguments are staple items for the detailed variant.

use fridgelens::{
    AnalysisOptions, FridgeAnalyzer, PromptVariant, VisionConfig, image_to_data_uri,
    logging::{LogLevel, init_logging},
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogLevel::Info);

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or("usage: analyze_fridge <image> [basic|detailed|lightweight] [items...]")?;
    let variant: PromptVariant = match args.next() {
        Some(v) => v.parse()?,
        None => PromptVariant::Basic,
    };
    let items: Vec<String> = args.collect();

    let analyzer = FridgeAnalyzer::new(VisionConfig::from_env());
    let image = image_to_data_uri(&path).await?;
    println!("Encoded {} as {} ({} chars)", path, image.mime_type(), image.as_str().len());

    let options = AnalysisOptions::new(variant).with_item_hints(items);
    let result = analyzer.analyze(&image, &options).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
