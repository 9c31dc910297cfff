//! Spatial cursor context
//!
//! A one-time snapshot of every element's bounding box and cursor style,
//! used during replay to decide which cursor glyph to show at a point.
//! The index is never refreshed: if the page changes after it was taken,
//! replay styling drifts from what the page would really show.

use crate::capture::input::types::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Inclusive on all four edges
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }
}

/// Resolved CSS-like cursor style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
    Text,
    Other(String),
}

/// Glyph the overlay draws for a cursor style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorGlyph {
    Arrow,
    Pointer,
    TextSelect,
}

impl CursorStyle {
    pub fn as_str(&self) -> &str {
        match self {
            CursorStyle::Default => "default",
            CursorStyle::Pointer => "pointer",
            CursorStyle::Text => "text",
            CursorStyle::Other(style) => style,
        }
    }

    pub fn glyph(&self) -> CursorGlyph {
        match self {
            CursorStyle::Pointer => CursorGlyph::Pointer,
            CursorStyle::Text => CursorGlyph::TextSelect,
            _ => CursorGlyph::Arrow,
        }
    }
}

impl From<&str> for CursorStyle {
    fn from(style: &str) -> Self {
        match style {
            "" | "default" => CursorStyle::Default,
            "pointer" => CursorStyle::Pointer,
            "text" => CursorStyle::Text,
            other => CursorStyle::Other(other.to_string()),
        }
    }
}

impl From<String> for CursorStyle {
    fn from(style: String) -> Self {
        CursorStyle::from(style.as_str())
    }
}

impl From<CursorStyle> for String {
    fn from(style: CursorStyle) -> Self {
        match style {
            CursorStyle::Other(style) => style,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for CursorStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextEntry {
    pub bounding_box: BoundingBox,
    pub cursor: CursorStyle,
}

impl ContextEntry {
    pub fn new(bounding_box: BoundingBox, cursor: impl Into<CursorStyle>) -> Self {
        Self {
            bounding_box,
            cursor: cursor.into(),
        }
    }
}

/// Source of element layout, enumerated in document order
pub trait LayoutSource {
    fn layout(&self) -> Vec<ContextEntry>;
}

static DEFAULT_CURSOR: CursorStyle = CursorStyle::Default;

/// Ordered, immutable collection of [`ContextEntry`] values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextIndex {
    entries: Vec<ContextEntry>,
}

impl ContextIndex {
    pub fn new(entries: Vec<ContextEntry>) -> Self {
        Self { entries }
    }

    /// Snapshot the current layout of a page
    pub fn capture(source: &impl LayoutSource) -> Self {
        let index: Self = source.layout().into_iter().collect();
        tracing::debug!("Captured cursor context for {} elements", index.len());
        index
    }

    /// Cursor style of the first entry (in enumeration order) containing `point`.
    ///
    /// This is not a z-order hit test: with overlapping boxes the earliest
    /// enumerated element wins, not the topmost one.
    pub fn cursor_at(&self, point: Point) -> &CursorStyle {
        self.entries
            .iter()
            .find(|entry| entry.bounding_box.contains(point))
            .map(|entry| &entry.cursor)
            .unwrap_or(&DEFAULT_CURSOR)
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ContextEntry> for ContextIndex {
    fn from_iter<T: IntoIterator<Item = ContextEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Page(Vec<ContextEntry>);

    impl LayoutSource for Page {
        fn layout(&self) -> Vec<ContextEntry> {
            self.0.clone()
        }
    }

    #[test]
    fn test_empty_index_is_default() {
        let index = ContextIndex::default();
        assert_eq!(index.cursor_at(Point::new(10.0, 10.0)), &CursorStyle::Default);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let index = ContextIndex::new(vec![ContextEntry::new(
            BoundingBox::new(10.0, 10.0, 20.0, 20.0),
            "pointer",
        )]);

        for corner in [
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 20.0),
            Point::new(20.0, 20.0),
        ] {
            assert_eq!(index.cursor_at(corner), &CursorStyle::Pointer, "corner {:?}", corner);
        }
        assert_eq!(index.cursor_at(Point::new(20.5, 15.0)), &CursorStyle::Default);
    }

    #[test]
    fn test_first_match_wins_over_later_overlap() {
        let page = Page(vec![
            ContextEntry::new(BoundingBox::from_origin_size(0.0, 0.0, 100.0, 100.0), "text"),
            ContextEntry::new(BoundingBox::from_origin_size(40.0, 40.0, 10.0, 10.0), "pointer"),
        ]);
        let index = ContextIndex::capture(&page);

        assert_eq!(index.len(), 2);
        // Inner box is enumerated later, so the outer one still wins
        assert_eq!(index.cursor_at(Point::new(45.0, 45.0)), &CursorStyle::Text);
    }

    #[test]
    fn test_empty_cursor_string_falls_back_to_default() {
        let index: ContextIndex = [
            ContextEntry::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), ""),
            ContextEntry::new(BoundingBox::new(0.0, 0.0, 50.0, 50.0), "pointer"),
        ]
        .into_iter()
        .collect();

        // The empty entry still wins as the first match, but reads as default
        assert_eq!(index.cursor_at(Point::new(5.0, 5.0)), &CursorStyle::Default);
        assert_eq!(index.cursor_at(Point::new(30.0, 30.0)), &CursorStyle::Pointer);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_cursor_style_strings() {
        assert_eq!(CursorStyle::from("text"), CursorStyle::Text);
        assert_eq!(CursorStyle::from("grab"), CursorStyle::Other("grab".into()));
        assert_eq!(CursorStyle::from("grab").as_str(), "grab");
        assert_eq!(CursorStyle::from("auto").glyph(), CursorGlyph::Arrow);
        assert_eq!(CursorStyle::Text.glyph(), CursorGlyph::TextSelect);
        assert_eq!(String::from(CursorStyle::Pointer), "pointer");
    }

    #[test]
    fn test_index_from_json_manifest() {
        let json = r#"[{"boundingBox":{"left":0,"top":0,"right":50,"bottom":50},"cursor":"pointer"}]"#;
        let index: ContextIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.cursor_at(Point::new(25.0, 25.0)), &CursorStyle::Pointer);
    }
}
