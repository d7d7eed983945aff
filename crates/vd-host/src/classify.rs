//! Part classification
//!
//! Maps a part to the product code used in sheet names and the batch report.

use crate::host::PartRecord;

/// Looks up a part's product code
pub trait PartClassifier {
    /// Product code, or `None` when the part is unclassified
    fn classify(&self, part: &PartRecord) -> Option<String>;
}

/// Reads the product code attribute stored on the part
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeClassifier;

impl PartClassifier for AttributeClassifier {
    fn classify(&self, part: &PartRecord) -> Option<String> {
        part.product_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
    }
}

impl<F> PartClassifier for F
where
    F: Fn(&PartRecord) -> Option<String>,
{
    fn classify(&self, part: &PartRecord) -> Option<String> {
        self(part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use vd_core::{BoundingVolume, ElementId};

    fn part(code: Option<&str>) -> PartRecord {
        let mut part = PartRecord::new(
            ElementId(1),
            "Bracket",
            BoundingVolume::new(DVec3::ZERO, DVec3::ONE),
        );
        part.product_code = code.map(str::to_string);
        part
    }

    #[test]
    fn test_attribute_classifier() {
        let classifier = AttributeClassifier;
        assert_eq!(classifier.classify(&part(Some("PC-10"))), Some("PC-10".to_string()));
        assert_eq!(classifier.classify(&part(Some("  PC-10 "))), Some("PC-10".to_string()));
        assert_eq!(classifier.classify(&part(Some("   "))), None);
        assert_eq!(classifier.classify(&part(None)), None);
    }

    #[test]
    fn test_closure_classifier() {
        let classifier = |p: &PartRecord| Some(format!("X{}", p.id.0));
        assert_eq!(classifier.classify(&part(None)), Some("X1".to_string()));
    }
}
