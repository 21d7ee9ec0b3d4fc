//! Run the text stage.

use robovid_common::config::AppConfig;
use robovid_pipeline::{PipelineCoordinator, TextServices};

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let services = TextServices::from_config(&config.text)
        .map_err(|e| anyhow::anyhow!("Failed to set up text services: {e}"))?;
    let coordinator = PipelineCoordinator::for_config(config).with_text_services(services);

    let content = coordinator
        .run_text_stage()
        .await
        .map_err(|e| anyhow::anyhow!("Text stage failed: {e}"))?;

    println!("Text stage complete for '{}'", content.search_term);
    println!(
        "  Source: {} chars ({} after sanitizing)",
        content.source_content_original.chars().count(),
        content.source_content_sanitized.chars().count()
    );
    println!("  Sentences: {}", content.sentences.len());
    for (i, sentence) in content.sentences.iter().enumerate() {
        println!("  [{i}] {} ({})", sentence.text, sentence.keywords.join(", "));
    }

    Ok(())
}
