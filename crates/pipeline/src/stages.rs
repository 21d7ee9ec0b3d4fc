//! Stage adapters over the text and render engines.

use std::sync::Arc;

use async_trait::async_trait;
use robovid_common::error::RobovidResult;
use robovid_content_model::{AssetLayout, Content, ContentField, ContentStore, SentenceTemplateTable};
use robovid_render_engine::{BackgroundSettings, Compositor, ImageStageRunner, RenderJob, RenderSupervisor};
use robovid_text_engine::{
    break_content_into_sentences, fetch_content_from_source, fetch_keywords_of_all_sentences,
    limit_maximum_sentences, sanitize_content, KeywordExtractor, TextSource,
};
use tokio::io::AsyncWrite;

use crate::stage::Stage;

/// Retrieve the article for the search term.
pub struct FetchSource {
    pub source: Arc<dyn TextSource>,
    pub locale: String,
}

#[async_trait]
impl Stage for FetchSource {
    fn name(&self) -> &'static str {
        "fetch_source"
    }

    fn writes(&self) -> &'static [ContentField] {
        &[ContentField::SourceContentOriginal]
    }

    async fn run(&mut self, content: &mut Content) -> RobovidResult<()> {
        fetch_content_from_source(content, self.source.as_ref(), &self.locale).await
    }
}

pub struct Sanitize;

#[async_trait]
impl Stage for Sanitize {
    fn name(&self) -> &'static str {
        "sanitize"
    }

    fn writes(&self) -> &'static [ContentField] {
        &[ContentField::SourceContentSanitized]
    }

    async fn run(&mut self, content: &mut Content) -> RobovidResult<()> {
        sanitize_content(content);
        Ok(())
    }
}

pub struct SplitSentences;

#[async_trait]
impl Stage for SplitSentences {
    fn name(&self) -> &'static str {
        "split_sentences"
    }

    fn writes(&self) -> &'static [ContentField] {
        &[ContentField::Sentences]
    }

    async fn run(&mut self, content: &mut Content) -> RobovidResult<()> {
        break_content_into_sentences(content);
        tracing::info!(sentences = content.sentences.len(), "Split sanitized text");
        Ok(())
    }
}

pub struct LimitSentences;

#[async_trait]
impl Stage for LimitSentences {
    fn name(&self) -> &'static str {
        "limit_sentences"
    }

    fn writes(&self) -> &'static [ContentField] {
        &[ContentField::Sentences]
    }

    async fn run(&mut self, content: &mut Content) -> RobovidResult<()> {
        limit_maximum_sentences(content);
        Ok(())
    }
}

/// Enrich every sentence with keywords.
pub struct FetchKeywords {
    pub extractor: Arc<dyn KeywordExtractor>,
    pub locale: String,
    pub limit: usize,
}

#[async_trait]
impl Stage for FetchKeywords {
    fn name(&self) -> &'static str {
        "fetch_keywords"
    }

    fn writes(&self) -> &'static [ContentField] {
        &[ContentField::Sentences]
    }

    async fn run(&mut self, content: &mut Content) -> RobovidResult<()> {
        fetch_keywords_of_all_sentences(content, self.extractor.as_ref(), &self.locale, self.limit)
            .await
    }
}

/// Compose backgrounds, captions, and the thumbnail, then record the
/// produced references on each sentence.
pub struct RenderImages {
    pub compositor: Arc<dyn Compositor>,
    pub templates: SentenceTemplateTable,
    pub layout: AssetLayout,
    pub background: BackgroundSettings,
}

#[async_trait]
impl Stage for RenderImages {
    fn name(&self) -> &'static str {
        "render_images"
    }

    fn writes(&self) -> &'static [ContentField] {
        &[ContentField::Sentences]
    }

    async fn run(&mut self, content: &mut Content) -> RobovidResult<()> {
        let runner = ImageStageRunner::new(
            self.compositor.as_ref(),
            &self.templates,
            &self.layout,
            self.background,
        );
        let report = runner.run(content).await?;
        report.apply_to(content);
        Ok(())
    }
}

/// Write the render script artifact.
pub struct WriteScript {
    pub store: ContentStore,
}

#[async_trait]
impl Stage for WriteScript {
    fn name(&self) -> &'static str {
        "write_script"
    }

    fn writes(&self) -> &'static [ContentField] {
        &[]
    }

    async fn run(&mut self, content: &mut Content) -> RobovidResult<()> {
        let path = self.store.save_script(content)?;
        tracing::info!(path = %path.display(), "Wrote render script");
        Ok(())
    }
}

/// Run the external renderer, forwarding its stdout to `sink`.
pub struct RenderVideo {
    pub job: RenderJob,
    pub sink: Box<dyn AsyncWrite + Send + Unpin>,
}

#[async_trait]
impl Stage for RenderVideo {
    fn name(&self) -> &'static str {
        "render_video"
    }

    fn writes(&self) -> &'static [ContentField] {
        &[]
    }

    async fn run(&mut self, _content: &mut Content) -> RobovidResult<()> {
        let mut supervisor = RenderSupervisor::new(self.job.clone());
        let outcome = supervisor.run(self.sink.as_mut()).await?;
        tracing::info!(
            output = %self.job.output.display(),
            exit_code = ?outcome.exit_code,
            stdout_bytes = outcome.stdout_bytes,
            elapsed_secs = outcome.elapsed_secs,
            started_at = %outcome.started_at,
            finished_at = %outcome.finished_at,
            "Rendered video"
        );
        Ok(())
    }
}
