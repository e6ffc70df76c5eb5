//! PDF variant of the normalizer: rendered text-layer fragments → label index.
//!
//! Labels are keyed by their trimmed text; every occurrence on the page keeps
//! its own box so a label printed twice gets two highlights.

use crate::{
    core::{
        bounds::Bounds,
        constants::MIN_LABEL_LENGTH,
        geo::Point,
    },
    data::{normalizer::NameCollator, NormalizeStrategy, SpatialCatalog, SpatialTarget},
    prelude::HashMap,
    search::text::{fold, fold_query},
};
use serde::{Deserialize, Serialize};

/// One rendered text span with its page-space client rect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub bounds: Bounds,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }
}

/// Rendered text layer: fragment rects plus the container's own top-left
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextLayer {
    pub origin: Point,
    pub fragments: Vec<TextFragment>,
}

/// Label → highlight boxes, with labels in display order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelIndex {
    boxes: HashMap<String, Vec<Bounds>>,
    ordered: Vec<String>,
}

impl LabelIndex {
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.boxes.contains_key(label)
    }

    /// Every label, sorted
    pub fn labels(&self) -> &[String] {
        &self.ordered
    }

    pub fn boxes(&self, label: &str) -> &[Bounds] {
        self.boxes.get(label).map(Vec::as_slice).unwrap_or_default()
    }

    /// Labels containing the folded query, in display order; all labels for a blank query
    pub fn filter(&self, query: &str) -> Vec<&str> {
        match fold_query(query) {
            None => self.ordered.iter().map(String::as_str).collect(),
            Some(needle) => self
                .ordered
                .iter()
                .filter(|label| fold(label).contains(&needle))
                .map(String::as_str)
                .collect(),
        }
    }
}

impl SpatialCatalog for LabelIndex {
    fn targets(&self, key: &str) -> Vec<SpatialTarget> {
        self.boxes(key).iter().copied().map(SpatialTarget::Region).collect()
    }
}

#[derive(Debug)]
pub struct LabelNormalizer {
    min_label_length: usize,
    collator: NameCollator,
}

impl LabelNormalizer {
    pub fn new(min_label_length: usize) -> Self {
        Self {
            min_label_length,
            collator: NameCollator::traditional_chinese(),
        }
    }

    pub fn min_label_length(&self) -> usize {
        self.min_label_length
    }

    pub fn build(&self, layer: &TextLayer) -> LabelIndex {
        let mut index = LabelIndex::default();

        for fragment in &layer.fragments {
            let label = fragment.text.trim();
            if label.is_empty() || label.chars().count() < self.min_label_length {
                continue;
            }
            let bounds = fragment.bounds.relative_to(&layer.origin);
            if !bounds.is_finite() {
                log::debug!("skipping label {:?} with non-finite geometry", label);
                continue;
            }

            match index.boxes.get_mut(label) {
                Some(boxes) => boxes.push(bounds),
                None => {
                    index.boxes.insert(label.to_string(), vec![bounds]);
                    index.ordered.push(label.to_string());
                }
            }
        }

        index.ordered.sort_by(|a, b| self.collator.compare(a, b));
        log::debug!(
            "indexed {} labels from {} text fragments",
            index.len(),
            layer.fragments.len()
        );
        index
    }
}

impl Default for LabelNormalizer {
    fn default() -> Self {
        Self::new(MIN_LABEL_LENGTH)
    }
}

impl NormalizeStrategy for LabelNormalizer {
    type Input = TextLayer;
    type Output = LabelIndex;

    fn normalize(&self, input: &Self::Input) -> Self::Output {
        self.build(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(fragments: &[(&str, f64, f64)]) -> TextLayer {
        TextLayer {
            origin: Point::new(100.0, 50.0),
            fragments: fragments
                .iter()
                .map(|(text, x, y)| TextFragment::new(*text, Bounds::from_rect(*x, *y, 40.0, 12.0)))
                .collect(),
        }
    }

    #[test]
    fn test_short_and_blank_fragments_are_ignored() {
        let index = LabelNormalizer::default().build(&layer(&[
            ("  ", 110.0, 60.0),
            ("A", 120.0, 60.0),
            (" 城 ", 130.0, 60.0),
            (" 城堡 ", 140.0, 60.0),
        ]));

        assert_eq!(index.labels(), &["城堡".to_string()]);
    }

    #[test]
    fn test_boxes_are_container_relative_and_grouped() {
        let index = LabelNormalizer::default().build(&layer(&[
            ("Restroom", 110.0, 60.0),
            ("Castle", 300.0, 250.0),
            ("Restroom", 500.0, 450.0),
        ]));

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.boxes("Restroom"),
            &[
                Bounds::from_rect(10.0, 10.0, 40.0, 12.0),
                Bounds::from_rect(400.0, 400.0, 40.0, 12.0)
            ]
        );
        assert_eq!(index.targets("Castle").len(), 1);
        assert!(index.boxes("Missing").is_empty());
    }

    #[test]
    fn test_labels_are_sorted_and_filterable() {
        let index = LabelNormalizer::default().build(&layer(&[
            ("restroom", 0.0, 0.0),
            ("Castle", 0.0, 0.0),
            ("ATM", 0.0, 0.0),
        ]));

        assert_eq!(index.labels(), &["ATM", "Castle", "restroom"]);
        assert_eq!(index.filter(""), vec!["ATM", "Castle", "restroom"]);
        assert_eq!(index.filter("  ＲＥＳＴ "), vec!["restroom"]);
        assert_eq!(index.filter("t"), vec!["ATM", "Castle", "restroom"]);
        assert!(index.filter("zzz").is_empty());
    }

    #[test]
    fn test_chinese_labels_follow_stroke_order() {
        let index = LabelNormalizer::default().build(&layer(&[
            ("漢堡店", 0.0, 0.0),
            ("城堡", 0.0, 0.0),
            ("丁字路", 0.0, 0.0),
            ("乙館", 0.0, 0.0),
        ]));

        assert_eq!(index.labels(), &["乙館", "丁字路", "城堡", "漢堡店"]);
    }
}
