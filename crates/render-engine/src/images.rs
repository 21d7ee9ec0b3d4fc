//! Per-sentence image generation.
//!
//! For every sentence index the background is composed before the caption,
//! and the next index starts only after both finish. The thumbnail is
//! derived from index 0's background once every background exists.

use robovid_common::config::RenderConfig;
use robovid_common::error::RobovidResult;
use robovid_content_model::{AssetLayout, AssetRole, Content, SentenceTemplateTable};

use crate::compositor::{CompositionOp, CompositionRequest, Compositor};

/// Background canvas settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundSettings {
    pub width: u32,
    pub height: u32,
    pub blur_sigma: u32,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            blur_sigma: 9,
        }
    }
}

impl From<&RenderConfig> for BackgroundSettings {
    fn from(config: &RenderConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            blur_sigma: config.blur_sigma,
        }
    }
}

/// Assets produced for one sentence, relative to the content directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceAssets {
    pub index: usize,
    pub background: String,
    pub caption: String,
}

/// Everything the image stage produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageStageReport {
    pub sentences: Vec<SentenceAssets>,
    pub thumbnail: Option<String>,
}

impl ImageStageReport {
    /// Record the produced asset references on the matching sentences.
    pub fn apply_to(&self, content: &mut Content) {
        for assets in &self.sentences {
            if let Some(sentence) = content.sentences.get_mut(assets.index) {
                sentence.images = vec![assets.background.clone(), assets.caption.clone()];
            }
        }
    }
}

/// Drives the compositor over every sentence of a content document.
pub struct ImageStageRunner<'a> {
    compositor: &'a dyn Compositor,
    templates: &'a SentenceTemplateTable,
    layout: &'a AssetLayout,
    background: BackgroundSettings,
}

impl<'a> ImageStageRunner<'a> {
    pub fn new(
        compositor: &'a dyn Compositor,
        templates: &'a SentenceTemplateTable,
        layout: &'a AssetLayout,
        background: BackgroundSettings,
    ) -> Self {
        Self {
            compositor,
            templates,
            layout,
            background,
        }
    }

    /// Produce backgrounds, captions, and the thumbnail.
    ///
    /// Stops at the first failure; files written before it are left in
    /// place.
    pub async fn run(&self, content: &Content) -> RobovidResult<ImageStageReport> {
        tracing::info!(
            compositor = self.compositor.name(),
            sentences = content.sentences.len(),
            "Generating sentence images"
        );

        let mut report = ImageStageReport::default();
        for (index, sentence) in content.sentences.iter().enumerate() {
            let background = self.convert_image(index).await?;
            let caption = self.create_sentence_image(index, &sentence.text).await?;
            report.sentences.push(SentenceAssets {
                index,
                background,
                caption,
            });
        }

        if !report.sentences.is_empty() {
            report.thumbnail = Some(self.create_thumbnail().await?);
        }

        Ok(report)
    }

    /// Compose the blurred background for sentence `index`.
    pub async fn convert_image(&self, index: usize) -> RobovidResult<String> {
        let request = CompositionRequest {
            op: CompositionOp::BlurredBackground {
                source: self.layout.asset_path(AssetRole::Original, index),
                width: self.background.width,
                height: self.background.height,
                blur_sigma: self.background.blur_sigma,
            },
            output: self.layout.asset_path(AssetRole::Converted, index),
        };
        self.compositor
            .compose(&request)
            .await
            .map_err(|e| e.at_sentence(index))?;
        Ok(self.layout.asset_name(AssetRole::Converted, index))
    }

    /// Render the caption overlay for sentence `index`.
    pub async fn create_sentence_image(&self, index: usize, text: &str) -> RobovidResult<String> {
        let template = *self.templates.lookup(index)?;
        let request = CompositionRequest {
            op: CompositionOp::Caption {
                text: text.to_string(),
                template,
            },
            output: self.layout.asset_path(AssetRole::Sentence, index),
        };
        self.compositor
            .compose(&request)
            .await
            .map_err(|e| e.at_sentence(index))?;
        Ok(self.layout.asset_name(AssetRole::Sentence, index))
    }

    /// Derive the thumbnail from sentence 0's background.
    pub async fn create_thumbnail(&self) -> RobovidResult<String> {
        let request = CompositionRequest {
            op: CompositionOp::Thumbnail {
                source: self.layout.asset_path(AssetRole::Converted, 0),
            },
            output: self.layout.thumbnail_path(),
        };
        self.compositor.compose(&request).await?;
        Ok(self.layout.thumbnail_name().to_string())
    }
}
