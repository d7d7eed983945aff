//! Batch input file
//!
//! A RON file describing the document to draw from (templates and parts)
//! and the parts selected for this run.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vd_core::ElementId;
use vd_host::{HostDocument, PartRecord, SheetTemplate};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchFile {
    pub templates: Vec<SheetTemplate>,
    pub parts: Vec<PartRecord>,
    /// Parts to draw, in order
    pub selection: Vec<ElementId>,
}

impl BatchFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file {}", path.display()))?;
        ron::from_str(&content)
            .with_context(|| format!("Failed to parse batch file {}", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize batch file")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write batch file {}", path.display()))
    }

    /// Selected ids, or every part when `all` is set
    pub fn selection(&self, all: bool) -> Vec<ElementId> {
        if all {
            self.parts.iter().map(|p| p.id).collect()
        } else {
            self.selection.clone()
        }
    }

    pub fn into_document(self) -> HostDocument {
        HostDocument {
            templates: self.templates,
            parts: self.parts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, DVec3};
    use vd_core::{BoundingVolume, ConnectorTransform, Rect2};

    fn sample() -> BatchFile {
        BatchFile {
            templates: vec![SheetTemplate {
                id: ElementId(1),
                name: "A3".to_string(),
                outline: Rect2::new(DVec2::ZERO, DVec2::new(420.0, 297.0)),
            }],
            parts: vec![
                PartRecord::new(
                    ElementId(2),
                    "Bracket",
                    BoundingVolume::new(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0)),
                )
                .with_product_code("PC-2"),
                PartRecord::new(
                    ElementId(3),
                    "Flange",
                    BoundingVolume::new(DVec3::ZERO, DVec3::ONE),
                )
                .with_connector(ConnectorTransform::default()),
            ],
            selection: vec![ElementId(3)],
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.ron");
        sample().save(&path).unwrap();
        assert_eq!(BatchFile::load(&path).unwrap(), sample());
    }

    #[test]
    fn test_selection() {
        let batch = sample();
        assert_eq!(batch.selection(false), vec![ElementId(3)]);
        assert_eq!(batch.selection(true), vec![ElementId(2), ElementId(3)]);
    }

    #[test]
    fn test_missing_file() {
        let err = BatchFile::load("/nonexistent/batch.ron").unwrap_err();
        assert!(err.to_string().contains("Failed to read batch file"));
    }
}
