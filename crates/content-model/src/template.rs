//! Per-sentence caption layout.
//!
//! Narration position alone decides the caption layout; sentence content
//! never does. The table is indexed by raw sentence index and does not
//! wrap: an index past the end is a configuration error.

use std::collections::BTreeMap;

use robovid_common::error::{RobovidError, RobovidResult};
use serde::{Deserialize, Serialize};

/// Caption canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `WIDTHxHEIGHT`, the geometry syntax the compositor expects.
    pub fn geometry(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Where caption text is anchored on its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Center,
    West,
    East,
    North,
    South,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Anchor {
    /// Compositor gravity name.
    pub fn gravity(self) -> &'static str {
        match self {
            Anchor::Center => "center",
            Anchor::West => "west",
            Anchor::East => "east",
            Anchor::North => "north",
            Anchor::South => "south",
            Anchor::NorthWest => "northwest",
            Anchor::NorthEast => "northeast",
            Anchor::SouthWest => "southwest",
            Anchor::SouthEast => "southeast",
        }
    }
}

/// Layout for one narration position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub canvas: CanvasSize,
    pub anchor: Anchor,
}

impl TemplateEntry {
    pub const fn new(width: u32, height: u32, anchor: Anchor) -> Self {
        Self {
            canvas: CanvasSize::new(width, height),
            anchor,
        }
    }
}

const BUILTIN_TEMPLATES: [TemplateEntry; 7] = [
    TemplateEntry::new(1920, 400, Anchor::Center),
    TemplateEntry::new(1920, 1080, Anchor::Center),
    TemplateEntry::new(800, 1080, Anchor::West),
    TemplateEntry::new(1920, 400, Anchor::Center),
    TemplateEntry::new(1920, 1080, Anchor::Center),
    TemplateEntry::new(800, 1080, Anchor::West),
    TemplateEntry::new(1920, 400, Anchor::Center),
];

/// Fixed mapping from sentence index to caption layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceTemplateTable {
    entries: Vec<TemplateEntry>,
}

impl Default for SentenceTemplateTable {
    fn default() -> Self {
        Self {
            entries: BUILTIN_TEMPLATES.to_vec(),
        }
    }
}

impl SentenceTemplateTable {
    /// Build a table from explicit index keys.
    ///
    /// Keys must be exactly `0..n`; a gap is rejected rather than left to
    /// fail at lookup time.
    pub fn from_entries(entries: BTreeMap<usize, TemplateEntry>) -> RobovidResult<Self> {
        if entries.is_empty() {
            return Err(RobovidError::config("sentence template table is empty"));
        }
        for (expected, index) in entries.keys().enumerate() {
            if *index != expected {
                return Err(RobovidError::config(format!(
                    "sentence template table has no entry for index {expected}"
                )));
            }
        }
        Ok(Self {
            entries: entries.into_values().collect(),
        })
    }

    /// Layout for sentence `index`.
    pub fn lookup(&self, index: usize) -> RobovidResult<&TemplateEntry> {
        self.entries
            .get(index)
            .ok_or(RobovidError::TemplateNotFound { index })
    }

    /// Check that every index in `0..count` has an entry.
    pub fn ensure_covers(&self, count: usize) -> RobovidResult<()> {
        if count > self.entries.len() {
            return Err(RobovidError::TemplateNotFound {
                index: self.entries.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_layouts() {
        let table = SentenceTemplateTable::default();
        assert_eq!(table.len(), 7);

        let first = table.lookup(0).unwrap();
        assert_eq!(first.canvas.geometry(), "1920x400");
        assert_eq!(first.anchor, Anchor::Center);

        let third = table.lookup(2).unwrap();
        assert_eq!(third.canvas.geometry(), "800x1080");
        assert_eq!(third.anchor.gravity(), "west");
    }

    #[test]
    fn test_lookup_is_pure() {
        let table = SentenceTemplateTable::default();
        for index in 0..table.len() {
            assert_eq!(table.lookup(index).unwrap(), table.lookup(index).unwrap());
        }
    }

    #[test]
    fn test_lookup_past_end_fails_without_wrapping() {
        let table = SentenceTemplateTable::default();
        for index in [7, 8, 14, usize::MAX] {
            let err = table.lookup(index).unwrap_err();
            assert!(matches!(err, RobovidError::TemplateNotFound { index: i } if i == index));
        }
    }

    #[test]
    fn test_from_entries_rejects_gaps() {
        let mut entries = BTreeMap::new();
        entries.insert(0, TemplateEntry::new(100, 100, Anchor::Center));
        entries.insert(2, TemplateEntry::new(100, 100, Anchor::West));

        let err = SentenceTemplateTable::from_entries(entries).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_from_entries_rejects_empty() {
        assert!(SentenceTemplateTable::from_entries(BTreeMap::new()).is_err());
    }

    #[test]
    fn test_ensure_covers_names_first_missing_index() {
        let table = SentenceTemplateTable::default();
        assert!(table.ensure_covers(0).is_ok());
        assert!(table.ensure_covers(7).is_ok());
        let err = table.ensure_covers(9).unwrap_err();
        assert!(matches!(err, RobovidError::TemplateNotFound { index: 7 }));
    }
}
