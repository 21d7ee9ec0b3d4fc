//! Image stage ordering and failure behavior against a recording compositor.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use robovid_common::error::{RobovidError, RobovidResult};
use robovid_content_model::{AssetLayout, Content, Sentence, SentenceTemplateTable};
use robovid_render_engine::{
    BackgroundSettings, CompositionOp, CompositionRequest, Compositor, ImageStageRunner,
};

/// Records every request and fails on the output named in `fail_on`.
#[derive(Default)]
struct RecordingCompositor {
    calls: Mutex<Vec<(String, PathBuf)>>,
    fail_on: Option<PathBuf>,
}

impl RecordingCompositor {
    fn failing_on(path: impl Into<PathBuf>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(path.into()),
        }
    }

    fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    fn position(&self, kind: &str, output: &Path) -> usize {
        self.calls()
            .iter()
            .position(|(k, o)| k == kind && o == output)
            .unwrap_or_else(|| panic!("{kind} -> {} was never composed", output.display()))
    }
}

#[async_trait]
impl Compositor for RecordingCompositor {
    async fn compose(&self, request: &CompositionRequest) -> RobovidResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((request.op.kind().to_string(), request.output.clone()));
        if self.fail_on.as_deref() == Some(request.output.as_path()) {
            return Err(RobovidError::composition(request.op.kind(), "simulated failure"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

fn content_with(count: usize) -> Content {
    let mut content = Content::new("Topic", count);
    content.sentences = (0..count)
        .map(|i| Sentence::new(format!("Sentence {i}.")))
        .collect();
    content
}

#[tokio::test]
async fn backgrounds_precede_captions_and_thumbnail_comes_last() {
    let compositor = RecordingCompositor::default();
    let templates = SentenceTemplateTable::default();
    let layout = AssetLayout::with_defaults("content");
    let runner = ImageStageRunner::new(
        &compositor,
        &templates,
        &layout,
        BackgroundSettings::default(),
    );

    let content = content_with(3);
    let report = runner.run(&content).await.unwrap();

    assert_eq!(report.sentences.len(), 3);
    assert_eq!(report.thumbnail.as_deref(), Some("youtube-thumbnail.jpg"));

    let thumbnail = compositor.position("thumbnail", &layout.thumbnail_path());
    for i in 0..3 {
        let background = compositor.position(
            "blurred_background",
            &PathBuf::from(format!("content/{i}-converted.png")),
        );
        let caption =
            compositor.position("caption", &PathBuf::from(format!("content/{i}-sentence.png")));
        assert!(background < caption);
        assert!(caption < thumbnail);
        if i > 0 {
            let previous_caption = compositor.position(
                "caption",
                &PathBuf::from(format!("content/{}-sentence.png", i - 1)),
            );
            assert!(previous_caption < background);
        }
    }
    assert_eq!(compositor.calls().len(), 7);
}

#[tokio::test]
async fn caption_failure_stops_the_stage_and_names_the_sentence() {
    let compositor = RecordingCompositor::failing_on("content/2-sentence.png");
    let templates = SentenceTemplateTable::default();
    let layout = AssetLayout::with_defaults("content");
    let runner = ImageStageRunner::new(
        &compositor,
        &templates,
        &layout,
        BackgroundSettings::default(),
    );

    let err = runner.run(&content_with(5)).await.unwrap_err();

    assert!(matches!(
        err,
        RobovidError::CompositionFailed { index: Some(2), ref operation, .. } if operation == "caption"
    ));
    let calls = compositor.calls();
    assert!(!calls
        .iter()
        .any(|(_, o)| o == Path::new("content/3-converted.png")));
    assert!(!calls.iter().any(|(k, _)| k == "thumbnail"));
}

#[tokio::test]
async fn more_sentences_than_templates_is_rejected() {
    let compositor = RecordingCompositor::default();
    let templates = SentenceTemplateTable::default();
    let layout = AssetLayout::with_defaults("content");
    let runner = ImageStageRunner::new(
        &compositor,
        &templates,
        &layout,
        BackgroundSettings::default(),
    );

    let err = runner.run(&content_with(8)).await.unwrap_err();
    assert!(matches!(err, RobovidError::TemplateNotFound { index: 7 }));
}

#[tokio::test]
async fn caption_uses_template_for_its_index() {
    let compositor = RecordingCompositor::default();
    let templates = SentenceTemplateTable::default();
    let layout = AssetLayout::with_defaults("content");
    let runner = ImageStageRunner::new(
        &compositor,
        &templates,
        &layout,
        BackgroundSettings::default(),
    );

    runner.create_sentence_image(2, "Hello.").await.unwrap();
    let expected = *templates.lookup(2).unwrap();
    let request = CompositionRequest {
        op: CompositionOp::Caption {
            text: "Hello.".to_string(),
            template: expected,
        },
        output: PathBuf::from("content/2-sentence.png"),
    };
    assert_eq!(
        compositor.calls(),
        vec![(request.op.kind().to_string(), request.output)]
    );
    assert_eq!(expected.canvas.geometry(), "800x1080");
}

#[tokio::test]
async fn empty_content_produces_nothing() {
    let compositor = RecordingCompositor::default();
    let templates = SentenceTemplateTable::default();
    let layout = AssetLayout::with_defaults("content");
    let runner = ImageStageRunner::new(
        &compositor,
        &templates,
        &layout,
        BackgroundSettings::default(),
    );

    let report = runner.run(&content_with(0)).await.unwrap();
    assert!(report.sentences.is_empty());
    assert!(report.thumbnail.is_none());
    assert!(compositor.calls().is_empty());
}

#[tokio::test]
async fn report_records_background_then_caption() {
    let compositor = RecordingCompositor::default();
    let templates = SentenceTemplateTable::default();
    let layout = AssetLayout::with_defaults("content");
    let runner = ImageStageRunner::new(
        &compositor,
        &templates,
        &layout,
        BackgroundSettings::default(),
    );

    let mut content = content_with(2);
    let report = runner.run(&content).await.unwrap();
    report.apply_to(&mut content);

    assert_eq!(
        content.sentences[1].images,
        vec!["1-converted.png", "1-sentence.png"]
    );
}
