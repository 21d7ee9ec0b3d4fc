//! Create the content snapshot for a new topic.

use robovid_common::config::AppConfig;
use robovid_content_model::{Content, ContentStore};
use robovid_pipeline::layout_for;

pub fn run(config: &AppConfig, term: String, max_sentences: usize, force: bool) -> anyhow::Result<()> {
    let term = term.trim().to_string();
    if term.is_empty() {
        anyhow::bail!("Search term must not be empty");
    }

    let store = ContentStore::new(layout_for(config));
    if store.exists() && !force {
        anyhow::bail!(
            "A content snapshot already exists at {} (use --force to replace it)",
            store.layout().content_path().display()
        );
    }

    let content = Content::new(&term, max_sentences);
    store
        .init(&content)
        .map_err(|e| anyhow::anyhow!("Failed to create content snapshot: {e}"))?;

    println!("Initialized '{}'", term);
    println!("  Snapshot: {}", store.layout().content_path().display());
    println!("  Maximum sentences: {}", max_sentences);
    println!();
    println!("Next: robovid text && robovid render");

    Ok(())
}
