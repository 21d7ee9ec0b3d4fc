//! Invocation sequencing: load, run stages in order, persist on success.

use std::sync::Arc;

use robovid_common::config::{AppConfig, RenderConfig, TextConfig};
use robovid_common::error::{RobovidError, RobovidResult};
use robovid_content_model::{AssetLayout, Content, ContentStore, SentenceTemplateTable};
use robovid_render_engine::{BackgroundSettings, Compositor, ImageMagickCompositor, RenderJob};
use robovid_text_engine::{KeywordExtractor, NluKeywordExtractor, TextSource, WikipediaSource};
use tokio::io::AsyncWrite;

use crate::stage::Stage;
use crate::stages::{
    FetchKeywords, FetchSource, LimitSentences, RenderImages, RenderVideo, Sanitize,
    SplitSentences, WriteScript,
};

/// Collaborators of the text invocation.
#[derive(Clone)]
pub struct TextServices {
    pub source: Arc<dyn TextSource>,
    pub extractor: Arc<dyn KeywordExtractor>,
    pub locale: String,
    pub keyword_limit: usize,
}

impl TextServices {
    /// Wikipedia source and NLU keyword extractor from configuration.
    pub fn from_config(config: &TextConfig) -> RobovidResult<Self> {
        Ok(Self {
            source: Arc::new(WikipediaSource::new(config)?),
            extractor: Arc::new(NluKeywordExtractor::new(config)?),
            locale: config.locale.clone(),
            keyword_limit: config.keyword_limit,
        })
    }
}

/// Where renderer stdout goes.
pub enum RendererOutput {
    /// This process's stdout.
    Stdout,
    /// Dropped.
    Discard,
    /// Any async writer.
    Writer(Box<dyn AsyncWrite + Send + Unpin>),
}

impl RendererOutput {
    fn into_sink(self) -> Box<dyn AsyncWrite + Send + Unpin> {
        match self {
            RendererOutput::Stdout => Box::new(tokio::io::stdout()),
            RendererOutput::Discard => Box::new(tokio::io::sink()),
            RendererOutput::Writer(writer) => writer,
        }
    }
}

/// Collaborators of the render invocation.
pub struct RenderServices {
    pub compositor: Arc<dyn Compositor>,
    pub templates: SentenceTemplateTable,
    pub background: BackgroundSettings,
    pub job: RenderJob,
    pub output: RendererOutput,
}

impl RenderServices {
    /// ImageMagick compositor, built-in templates, and the configured
    /// renderer.
    pub fn from_config(config: &RenderConfig, layout: &AssetLayout) -> Self {
        Self {
            compositor: Arc::new(ImageMagickCompositor::from_config(config)),
            templates: SentenceTemplateTable::default(),
            background: BackgroundSettings::from(config),
            job: RenderJob::from_config(config, layout),
            output: RendererOutput::Stdout,
        }
    }
}

/// Runs text and render invocations against one content directory.
pub struct PipelineCoordinator {
    store: ContentStore,
    text: Option<TextServices>,
    render: Option<RenderServices>,
}

impl PipelineCoordinator {
    pub fn new(store: ContentStore) -> Self {
        Self {
            store,
            text: None,
            render: None,
        }
    }

    /// Layout derived from configuration, with no services attached.
    pub fn for_config(config: &AppConfig) -> Self {
        Self::new(ContentStore::new(layout_for(config)))
    }

    pub fn with_text_services(mut self, services: TextServices) -> Self {
        self.text = Some(services);
        self
    }

    pub fn with_render_services(mut self, services: RenderServices) -> Self {
        self.render = Some(services);
        self
    }

    /// Fetch, sanitize, split, limit, and enrich.
    pub async fn run_text_stage(&self) -> RobovidResult<Content> {
        let services = self
            .text
            .clone()
            .ok_or_else(|| RobovidError::config("text services are not configured"))?;

        let mut stages: Vec<Box<dyn Stage>> = vec![
            Box::new(FetchSource {
                source: services.source,
                locale: services.locale.clone(),
            }),
            Box::new(Sanitize),
            Box::new(SplitSentences),
            Box::new(LimitSentences),
            Box::new(FetchKeywords {
                extractor: services.extractor,
                locale: services.locale,
                limit: services.keyword_limit,
            }),
        ];
        tracing::info!("Starting text stage");
        self.run(&mut stages, |_| Ok(())).await
    }

    /// Images, script, and video.
    ///
    /// Consumes the render services because the renderer output sink is
    /// single-use.
    pub async fn run_render_stage(&mut self) -> RobovidResult<Content> {
        let services = self
            .render
            .take()
            .ok_or_else(|| RobovidError::config("render services are not configured"))?;

        let templates = services.templates.clone();
        let mut stages: Vec<Box<dyn Stage>> = vec![
            Box::new(RenderImages {
                compositor: services.compositor,
                templates: services.templates,
                layout: self.store.layout().clone(),
                background: services.background,
            }),
            Box::new(WriteScript {
                store: self.store.clone(),
            }),
            Box::new(RenderVideo {
                job: services.job,
                sink: services.output.into_sink(),
            }),
        ];
        tracing::info!("Starting render stage");
        self.run(&mut stages, |content| {
            templates.ensure_covers(content.sentences.len())
        })
        .await
    }

    /// Load, validate with `preflight`, run `stages` in order, and save.
    ///
    /// The first failing stage aborts the invocation and nothing is saved.
    pub async fn run<F>(&self, stages: &mut [Box<dyn Stage>], preflight: F) -> RobovidResult<Content>
    where
        F: FnOnce(&Content) -> RobovidResult<()>,
    {
        let mut content = self.store.load()?;
        preflight(&content)?;

        for stage in stages.iter_mut() {
            let name = stage.name();
            tracing::info!(stage = name, "Running stage");
            let before = content.clone();

            if let Err(e) = stage.run(&mut content).await {
                tracing::error!(stage = name, error = %e, "Stage failed; content not saved");
                return Err(e);
            }

            let allowed = stage.writes();
            let undeclared: Vec<&str> = before
                .changed_fields(&content)
                .into_iter()
                .filter(|field| !allowed.contains(field))
                .map(|field| field.as_str())
                .collect();
            if !undeclared.is_empty() {
                return Err(RobovidError::pipeline(format!(
                    "stage '{name}' changed undeclared fields: {}",
                    undeclared.join(", ")
                )));
            }
        }

        self.store.save(&content)?;
        tracing::info!(path = %self.store.layout().content_path().display(), "Saved content");
        Ok(content)
    }
}

/// Asset layout for the configured content directory.
pub fn layout_for(config: &AppConfig) -> AssetLayout {
    AssetLayout::new(
        config.content_dir.clone(),
        config.render.script_file.clone(),
        config.render.output_file.clone(),
    )
}
