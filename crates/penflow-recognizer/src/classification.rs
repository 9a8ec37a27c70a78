//! Raw-content classification model.
//!
//! The service answers a `Raw Content` request with a list of typed
//! elements. `Text` elements hold words whose items cover text strokes;
//! `Edge` and `Node` elements hold items covering shape strokes. Each item's
//! `F` array echoes the pressure channel of the request, whose first value
//! is the stroke id.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Element type reported by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Handwritten text.
    Text,
    /// A connector shape.
    Edge,
    /// A closed shape.
    Node,
    /// Anything else, ignored.
    #[serde(other)]
    Other,
}

impl ElementKind {
    /// Returns `true` for shape elements.
    pub fn is_shape(self) -> bool {
        matches!(self, ElementKind::Edge | ElementKind::Node)
    }
}

/// A stroke fragment inside an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    /// Echoed pressure values.
    #[serde(rename = "F", default)]
    pub f: Vec<f64>,
    /// Other item fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClassifiedItem {
    /// Stroke id carried in the first echoed pressure value.
    pub fn stroke_id(&self) -> Option<i32> {
        self.f.first().map(|v| v.round() as i32)
    }
}

/// A word inside a `Text` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedWord {
    /// Items covering the word.
    #[serde(default)]
    pub items: Option<Vec<ClassifiedItem>>,
    /// Other word fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One typed element of the classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawContentElement {
    /// Element type.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Words, for text elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<ClassifiedWord>>,
    /// Items, for shape elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ClassifiedItem>>,
    /// Other element fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-stroke text/non-text labeling for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawContentClassification {
    /// Container type, normally `Raw Content`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Elements in reading order.
    #[serde(default)]
    pub elements: Vec<RawContentElement>,
}

impl RawContentClassification {
    /// Ids of strokes under `Text` element words, in element order.
    pub fn text_stroke_ids(&self) -> Vec<i32> {
        self.elements
            .iter()
            .filter(|e| e.kind == ElementKind::Text)
            .flat_map(|e| e.words.iter().flatten())
            .flat_map(|w| w.items.iter().flatten())
            .filter_map(ClassifiedItem::stroke_id)
            .collect()
    }

    /// Ids of strokes under `Edge` and `Node` elements, in element order.
    pub fn non_text_stroke_ids(&self) -> Vec<i32> {
        self.elements
            .iter()
            .filter(|e| e.kind.is_shape())
            .flat_map(|e| e.items.iter().flatten())
            .filter_map(ClassifiedItem::stroke_id)
            .collect()
    }

    /// Returns `true` unless the classifier labeled the stroke as a shape.
    ///
    /// Strokes the classifier never mentions count as text.
    pub fn is_text_stroke(&self, stroke_id: i32) -> bool {
        !self.non_text_stroke_ids().contains(&stroke_id)
    }

    /// Keeps the items whose stroke is text, preserving order.
    pub fn retain_text<T, F>(&self, items: Vec<T>, stroke_id: F) -> Vec<T>
    where
        F: Fn(&T) -> i32,
    {
        let shapes: BTreeSet<i32> = self.non_text_stroke_ids().into_iter().collect();
        items
            .into_iter()
            .filter(|item| !shapes.contains(&stroke_id(item)))
            .collect()
    }
}
