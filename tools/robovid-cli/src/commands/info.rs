//! Show the current content snapshot.

use robovid_common::config::AppConfig;
use robovid_content_model::ContentStore;
use robovid_pipeline::layout_for;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let store = ContentStore::new(layout_for(config));
    let content = store
        .load()
        .map_err(|e| anyhow::anyhow!("Failed to load content: {e}"))?;
    let layout = store.layout();

    println!("Topic: {}", content.search_term);
    println!("  Snapshot: {}", layout.content_path().display());
    println!("  Maximum sentences: {}", content.maximum_sentences);
    println!(
        "  Source: {} chars, sanitized {} chars",
        content.source_content_original.chars().count(),
        content.source_content_sanitized.chars().count()
    );
    println!();

    println!("Sentences ({}):", content.sentences.len());
    for (i, sentence) in content.sentences.iter().enumerate() {
        println!("  [{i}] {}", sentence.text);
        if !sentence.keywords.is_empty() {
            println!("      keywords: {}", sentence.keywords.join(", "));
        }
        if !sentence.images.is_empty() {
            println!("      images: {}", sentence.images.join(", "));
        }
    }
    println!();

    println!("Artifacts:");
    for (label, path) in [
        ("Script", layout.script_path()),
        ("Thumbnail", layout.thumbnail_path()),
        ("Video", layout.output_path()),
    ] {
        let status = if path.exists() { "present" } else { "missing" };
        println!("  {label}: {} ({status})", path.display());
    }

    Ok(())
}
