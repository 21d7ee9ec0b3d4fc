//! Persistence of the content snapshot and render script.

use std::io::Write;
use std::path::{Path, PathBuf};

use robovid_common::error::{RobovidError, RobovidResult};

use crate::assets::AssetLayout;
use crate::content::Content;
use crate::script::RenderScript;

/// Loads and saves the content document between stage invocations.
#[derive(Debug, Clone)]
pub struct ContentStore {
    layout: AssetLayout,
}

impl ContentStore {
    pub fn new(layout: AssetLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    /// Whether a snapshot exists.
    pub fn exists(&self) -> bool {
        self.layout.content_path().is_file()
    }

    /// Create the content directory and write the initial snapshot.
    pub fn init(&self, content: &Content) -> RobovidResult<()> {
        std::fs::create_dir_all(self.layout.root())?;
        self.save(content)
    }

    /// Reconstruct the document from the last snapshot.
    pub fn load(&self) -> RobovidResult<Content> {
        let path = self.layout.content_path();
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RobovidError::StateUnavailable { path });
            }
            Err(e) => return Err(e.into()),
        };

        let content: Content =
            serde_json::from_str(&json).map_err(|e| RobovidError::StateCorrupt {
                path: path.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            path = %path.display(),
            sentences = content.sentences.len(),
            "Loaded content snapshot"
        );
        Ok(content)
    }

    /// Replace the snapshot.
    ///
    /// Readers observe either the previous snapshot or the new one.
    pub fn save(&self, content: &Content) -> RobovidResult<()> {
        let path = self.layout.content_path();
        let json = serde_json::to_string_pretty(content)?;
        write_atomic(&path, json.as_bytes())?;
        tracing::debug!(path = %path.display(), "Saved content snapshot");
        Ok(())
    }

    /// Derive the render script from `content` and write it.
    pub fn save_script(&self, content: &Content) -> RobovidResult<PathBuf> {
        let path = self.layout.script_path();
        let descriptor = RenderScript::build(content).to_descriptor()?;
        write_atomic(&path, descriptor.as_bytes())?;
        tracing::info!(
            path = %path.display(),
            segments = content.sentences.len(),
            "Wrote render script"
        );
        Ok(path)
    }
}

/// Write through a temporary sibling, then rename over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> RobovidResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| RobovidError::Io(e.error))?;
    Ok(())
}
