//! Asset naming under the content directory.

use std::path::{Path, PathBuf};

/// Snapshot file name.
pub const CONTENT_FILE: &str = "content.json";

/// Thumbnail file name.
pub const THUMBNAIL_FILE: &str = "youtube-thumbnail.jpg";

/// Role of a per-sentence raster asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRole {
    /// Raw still supplied for the sentence.
    Original,
    /// Blurred-background composite at the target resolution.
    Converted,
    /// Transparent caption overlay.
    Sentence,
}

impl AssetRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetRole::Original => "original",
            AssetRole::Converted => "converted",
            AssetRole::Sentence => "sentence",
        }
    }
}

/// Deterministic layout of every file the pipeline reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    root: PathBuf,
    script_file: String,
    output_file: String,
}

impl AssetLayout {
    pub fn new(
        root: impl Into<PathBuf>,
        script_file: impl Into<String>,
        output_file: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            script_file: script_file.into(),
            output_file: output_file.into(),
        }
    }

    /// Layout with the default script and video names.
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self::new(root, "after-effects-script.js", "output.mov")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name (relative to the root) for a sentence asset.
    pub fn asset_name(&self, role: AssetRole, index: usize) -> String {
        format!("{index}-{}.png", role.as_str())
    }

    /// Absolute path for a sentence asset.
    pub fn asset_path(&self, role: AssetRole, index: usize) -> PathBuf {
        self.root.join(self.asset_name(role, index))
    }

    pub fn thumbnail_name(&self) -> &str {
        THUMBNAIL_FILE
    }

    pub fn thumbnail_path(&self) -> PathBuf {
        self.root.join(THUMBNAIL_FILE)
    }

    pub fn content_path(&self) -> PathBuf {
        self.root.join(CONTENT_FILE)
    }

    pub fn script_path(&self) -> PathBuf {
        self.root.join(&self.script_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_file)
    }
}
