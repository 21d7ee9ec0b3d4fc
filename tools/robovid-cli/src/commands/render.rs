//! Run the render stage.

use robovid_common::config::AppConfig;
use robovid_pipeline::{layout_for, PipelineCoordinator, RenderServices};

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let layout = layout_for(config);
    let services = RenderServices::from_config(&config.render, &layout);
    let mut coordinator = PipelineCoordinator::for_config(config).with_render_services(services);

    let content = coordinator
        .run_render_stage()
        .await
        .map_err(|e| anyhow::anyhow!("Render stage failed: {e}"))?;

    println!();
    println!("Render stage complete for '{}'", content.search_term);
    println!("  Images: {} sentences", content.sentences.len());
    println!("  Script: {}", layout.script_path().display());
    println!("  Video: {}", layout.output_path().display());

    Ok(())
}
