//! Text stage followed by render stage.

use robovid_common::config::AppConfig;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    super::text::run(config).await?;
    println!();
    super::render::run(config).await
}
