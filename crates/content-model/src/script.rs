//! Render-script generation.
//!
//! The renderer template `#include`s the script, so the artifact is an
//! ExtendScript prelude declaring a single `content` variable. Output is a
//! pure function of the [`Content`]: identical documents give identical
//! bytes.

use serde::{Deserialize, Serialize};

use crate::assets::THUMBNAIL_FILE;
use crate::content::Content;

/// Variable name the renderer template reads.
pub const SCRIPT_VARIABLE: &str = "content";

/// Descriptor consumed by the external renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderScript {
    pub search_term: String,
    pub thumbnail: Option<String>,
    pub segments: Vec<ScriptSegment>,
}

/// One narrated segment, in sentence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSegment {
    pub index: usize,
    pub text: String,
    pub keywords: Vec<String>,
    /// Converted background, relative to the content directory.
    pub background: Option<String>,
    /// Caption overlay, relative to the content directory.
    pub caption: Option<String>,
}

impl RenderScript {
    /// Summarize a content document.
    pub fn build(content: &Content) -> Self {
        let segments = content
            .sentences
            .iter()
            .enumerate()
            .map(|(index, sentence)| ScriptSegment {
                index,
                text: sentence.text.clone(),
                keywords: sentence.keywords.clone(),
                background: sentence.images.first().cloned(),
                caption: sentence.images.get(1).cloned(),
            })
            .collect::<Vec<_>>();

        Self {
            search_term: content.search_term.clone(),
            thumbnail: (!segments.is_empty()).then(|| THUMBNAIL_FILE.to_string()),
            segments,
        }
    }

    /// Serialized artifact bytes.
    pub fn to_descriptor(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(format!("var {SCRIPT_VARIABLE} = {json};\n"))
    }
}
