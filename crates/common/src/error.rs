//! Error types shared across Robovid crates.

use std::path::PathBuf;

/// Top-level error type for Robovid operations.
///
/// Stage functions return these unchanged so the pipeline surfaces the
/// first failure with its original cause.
#[derive(Debug, thiserror::Error)]
pub enum RobovidError {
    #[error("No content snapshot at {path}; run `robovid init` first")]
    StateUnavailable { path: PathBuf },

    #[error("Content snapshot at {path} is unreadable: {message}")]
    StateCorrupt { path: PathBuf, message: String },

    #[error("Text source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("Keyword extraction unavailable: {message}")]
    ExtractionUnavailable { message: String },

    #[error("No sentence template for index {index}")]
    TemplateNotFound { index: usize },

    #[error("Composition failed{} ({operation}): {reason}", sentence_suffix(.index))]
    CompositionFailed {
        index: Option<usize>,
        operation: String,
        reason: String,
    },

    #[error("Render process failed ({}): {message}", exit_code_label(.exit_code))]
    RenderProcessFailed {
        exit_code: Option<i32>,
        message: String,
    },

    #[error("Render process exceeded {timeout_secs}s and was terminated")]
    RenderTimedOut { timeout_secs: u64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using RobovidError.
pub type RobovidResult<T> = Result<T, RobovidError>;

fn sentence_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" for sentence {i}"),
        None => String::new(),
    }
}

fn exit_code_label(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code".to_string(),
    }
}

impl RobovidError {
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: msg.into(),
        }
    }

    pub fn extraction_unavailable(msg: impl Into<String>) -> Self {
        Self::ExtractionUnavailable {
            message: msg.into(),
        }
    }

    pub fn composition(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CompositionFailed {
            index: None,
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    pub fn render_process(exit_code: Option<i32>, msg: impl Into<String>) -> Self {
        Self::RenderProcessFailed {
            exit_code,
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline {
            message: msg.into(),
        }
    }

    /// Attach the sentence index to a composition failure.
    ///
    /// Other variants pass through untouched.
    pub fn at_sentence(self, sentence_index: usize) -> Self {
        match self {
            Self::CompositionFailed {
                operation, reason, ..
            } => Self::CompositionFailed {
                index: Some(sentence_index),
                operation,
                reason,
            },
            other => other,
        }
    }

    /// Sentence index carried by the error, if any.
    pub fn sentence_index(&self) -> Option<usize> {
        match self {
            Self::CompositionFailed { index, .. } => *index,
            Self::TemplateNotFound { index } => Some(*index),
            _ => None,
        }
    }
}
