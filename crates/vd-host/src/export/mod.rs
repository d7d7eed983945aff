//! Sheet export
//!
//! Each exported sheet produces two files sharing a base path: an SVG
//! vector document and a binary PPM raster image.

mod drawing;
mod raster;
mod svg;

use std::path::{Path, PathBuf};

use thiserror::Error;

use vd_core::ConfirmationPolicy;

use crate::config::RasterConfig;
use crate::host::Sheet;

pub use drawing::{Drawing, Label, Stroke};
pub use raster::{Canvas, render_raster};
pub use svg::{render_svg, xml_escape};

/// Export-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Sheet '{0}' has isolated views and confirmation was not suppressed")]
    ConfirmationRequired(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Where and how a sheet is exported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Output directory
    pub output_dir: PathBuf,
    /// Answer to the isolated-export prompt
    pub confirmation: ConfirmationPolicy,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            confirmation: ConfirmationPolicy::Proceed,
        }
    }
}

impl ExportOptions {
    /// Refuse sheets that would need the user to confirm isolated export
    pub fn check_confirmation(&self, sheet: &Sheet) -> Result<(), ExportError> {
        if self.confirmation == ConfirmationPolicy::Ask && sheet.has_isolated_views() {
            return Err(ExportError::ConfirmationRequired(sheet.name.clone()));
        }
        Ok(())
    }

    /// Base path (without extension) for a sheet's outputs
    pub fn base_path(&self, sheet_name: &str) -> PathBuf {
        self.output_dir.join(sanitize_filename(sheet_name))
    }
}

/// Paths written for one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub vector: PathBuf,
    pub raster: PathBuf,
}

/// Writes a finished sheet somewhere outside the host
pub trait SheetExporter {
    fn export(&mut self, sheet: &Sheet, options: &ExportOptions)
    -> Result<ExportedFiles, ExportError>;
}

/// Writes `<dir>/<name>.svg` and `<dir>/<name>.ppm`
#[derive(Debug, Clone, Default)]
pub struct DirectoryExporter {
    pub raster: RasterConfig,
}

impl DirectoryExporter {
    pub fn new(raster: RasterConfig) -> Self {
        Self { raster }
    }
}

impl SheetExporter for DirectoryExporter {
    fn export(
        &mut self,
        sheet: &Sheet,
        options: &ExportOptions,
    ) -> Result<ExportedFiles, ExportError> {
        options.check_confirmation(sheet)?;

        let drawing = Drawing::from_sheet(sheet);
        let svg = render_svg(&drawing).map_err(|e| ExportError::Encode(e.to_string()))?;
        let ppm = render_raster(&drawing, &self.raster).to_ppm();

        std::fs::create_dir_all(&options.output_dir).map_err(|e| ExportError::Io(e.to_string()))?;
        let base = options.base_path(&sheet.name);
        let files = ExportedFiles {
            vector: with_suffix(&base, "svg"),
            raster: with_suffix(&base, "ppm"),
        };
        std::fs::write(&files.vector, svg).map_err(|e| ExportError::Io(e.to_string()))?;
        std::fs::write(&files.raster, ppm).map_err(|e| ExportError::Io(e.to_string()))?;

        tracing::debug!(
            "Exported sheet '{}' to {}",
            sheet.name,
            files.vector.display()
        );
        Ok(files)
    }
}

fn with_suffix(base: &Path, ext: &str) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(".");
    path.push(ext);
    PathBuf::from(path)
}

/// Replace anything that is not alphanumeric, `_` or `-` with `_`
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "sheet".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, DVec3};
    use vd_core::{ElementId, Frame, Rect2, SectionKind, Visibility, build_section};

    use crate::host::PlacedView;

    fn sheet(isolated: bool) -> Sheet {
        let frame = Frame::world(DVec3::ZERO, 1.0);
        let mut spec = build_section(&frame, SectionKind::Top, "Part - Top");
        if isolated {
            spec.visibility = Visibility::TemporaryIsolation([ElementId(1)].into());
        }
        Sheet {
            id: ElementId(2),
            name: "PC-7-Part 1/2".to_string(),
            template: "A3".to_string(),
            outline: Rect2::new(DVec2::ZERO, DVec2::new(10.0, 8.0)),
            views: vec![PlacedView {
                id: ElementId(3),
                spec,
                center: DVec2::new(3.25, 3.12),
                markers: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("PC-7-Part 1/2"), "PC-7-Part_1_2");
        assert_eq!(sanitize_filename("a.b"), "a_b");
        assert_eq!(sanitize_filename(""), "sheet");
    }

    #[test]
    fn test_export_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            output_dir: dir.path().join("out"),
            confirmation: ConfirmationPolicy::Proceed,
        };
        let mut exporter = DirectoryExporter::new(RasterConfig {
            width_px: 50,
            height_px: 40,
        });

        let files = exporter.export(&sheet(true), &options).unwrap();
        assert_eq!(files.vector, dir.path().join("out").join("PC-7-Part_1_2.svg"));
        assert_eq!(files.raster, dir.path().join("out").join("PC-7-Part_1_2.ppm"));

        let svg = std::fs::read_to_string(&files.vector).unwrap();
        assert!(svg.contains("Part - Top"));
        let ppm = std::fs::read(&files.raster).unwrap();
        assert!(ppm.starts_with(b"P6\n50 40\n255\n"));
    }

    #[test]
    fn test_confirmation_required_for_isolated_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            output_dir: dir.path().to_path_buf(),
            confirmation: ConfirmationPolicy::Ask,
        };
        let mut exporter = DirectoryExporter::default();

        assert_eq!(
            exporter.export(&sheet(true), &options),
            Err(ExportError::ConfirmationRequired("PC-7-Part 1/2".to_string()))
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        // nothing to confirm without isolation
        assert!(exporter.export(&sheet(false), &options).is_ok());
    }
}
