//! Raster composition: blurred backgrounds, caption overlays, thumbnails.
//!
//! This module defines the composition operations requested by the image
//! stage and an ImageMagick-backed [`Compositor`] that executes them.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use robovid_common::config::RenderConfig;
use robovid_common::error::{RobovidError, RobovidResult};
use robovid_content_model::TemplateEntry;

/// A single composition operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionOp {
    /// Sharp, fitted foreground centered over a blurred, cover-scaled copy
    /// of the same still, cropped to exactly `width`x`height`.
    BlurredBackground {
        source: PathBuf,
        width: u32,
        height: u32,
        blur_sigma: u32,
    },

    /// White caption text on a transparent canvas laid out by `template`.
    Caption {
        text: String,
        template: TemplateEntry,
    },

    /// Format conversion of an existing asset.
    Thumbnail { source: PathBuf },
}

impl CompositionOp {
    /// Operation name used in errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CompositionOp::BlurredBackground { .. } => "blurred_background",
            CompositionOp::Caption { .. } => "caption",
            CompositionOp::Thumbnail { .. } => "thumbnail",
        }
    }
}

/// An operation plus where its result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRequest {
    pub op: CompositionOp,
    pub output: PathBuf,
}

/// Executes composition requests.
#[async_trait]
pub trait Compositor: Send + Sync {
    /// Produce `request.output` or fail with `CompositionFailed`.
    async fn compose(&self, request: &CompositionRequest) -> RobovidResult<()>;

    /// Compositor name.
    fn name(&self) -> &str;
}

/// Compositor that shells out to ImageMagick's `convert`.
#[derive(Debug, Clone)]
pub struct ImageMagickCompositor {
    binary: String,
    timeout: Duration,
}

impl ImageMagickCompositor {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(
            config.compositor_binary.clone(),
            Duration::from_secs(config.compositor_timeout_secs),
        )
    }

    /// Check if the binary can be invoked.
    pub fn is_available(&self) -> bool {
        std::process::Command::new(&self.binary)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Command-line arguments for a request.
    pub fn build_args(request: &CompositionRequest) -> Vec<String> {
        let output = request.output.display().to_string();
        match &request.op {
            CompositionOp::BlurredBackground {
                source,
                width,
                height,
                blur_sigma,
            } => {
                let size = format!("{width}x{height}");
                vec![
                    format!("{}[0]", source.display()),
                    "(".into(),
                    "-clone".into(),
                    "0".into(),
                    "-background".into(),
                    "white".into(),
                    "-blur".into(),
                    format!("0x{blur_sigma}"),
                    "-resize".into(),
                    format!("{size}^"),
                    ")".into(),
                    "(".into(),
                    "-clone".into(),
                    "0".into(),
                    "-background".into(),
                    "white".into(),
                    "-resize".into(),
                    size.clone(),
                    ")".into(),
                    "-delete".into(),
                    "0".into(),
                    "-gravity".into(),
                    "center".into(),
                    "-compose".into(),
                    "over".into(),
                    "-composite".into(),
                    "-extent".into(),
                    size,
                    output,
                ]
            }
            CompositionOp::Caption { text, template } => vec![
                "-size".into(),
                template.canvas.geometry(),
                "-gravity".into(),
                template.anchor.gravity().into(),
                "-background".into(),
                "transparent".into(),
                "-fill".into(),
                "white".into(),
                "-kerning".into(),
                "-1".into(),
                format!("caption:{}", escape_caption(text)),
                output,
            ],
            CompositionOp::Thumbnail { source } => vec![source.display().to_string(), output],
        }
    }
}

/// Neutralize ImageMagick's `@file` indirection and `%` escapes in
/// caption text.
fn escape_caption(text: &str) -> String {
    let escaped = text.replace('%', "%%");
    match escaped.strip_prefix('@') {
        Some(rest) => format!("\\@{rest}"),
        None => escaped,
    }
}

#[async_trait]
impl Compositor for ImageMagickCompositor {
    async fn compose(&self, request: &CompositionRequest) -> RobovidResult<()> {
        let kind = request.op.kind();
        let args = Self::build_args(request);
        tracing::debug!(binary = %self.binary, ?args, "Running compositor");

        let child = tokio::process::Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                RobovidError::composition(kind, format!("cannot start {}: {e}", self.binary))
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                RobovidError::composition(
                    kind,
                    format!("{} timed out after {:?}", self.binary, self.timeout),
                )
            })?
            .map_err(|e| RobovidError::composition(kind, format!("wait failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RobovidError::composition(
                kind,
                format!("{} exited with {}: {}", self.binary, output.status, stderr.trim()),
            ));
        }

        tracing::info!(operation = kind, output = %request.output.display(), "Composed image");
        Ok(())
    }

    fn name(&self) -> &str {
        "imagemagick"
    }
}
