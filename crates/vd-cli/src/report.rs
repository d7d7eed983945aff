//! Machine-readable run summary

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use vd_host::{BatchReport, PartStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub run_id: String,
    pub mode: String,
    pub processed: usize,
    pub not_processed: usize,
    pub unclassified: usize,
    /// `{code}-{identifier}` per processed part
    pub codes: Vec<String>,
    pub exports: Vec<ExportEntry>,
    pub failures: Vec<FailureEntry>,
    pub skipped: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportEntry {
    pub part: u64,
    pub vector: PathBuf,
    pub raster: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureEntry {
    pub part: u64,
    pub name: String,
    pub code: String,
    pub error: String,
}

impl From<&BatchReport> for ReportSummary {
    fn from(report: &BatchReport) -> Self {
        let exports = report
            .entries
            .iter()
            .filter_map(|entry| {
                entry.exported().map(|files| ExportEntry {
                    part: entry.part.0,
                    vector: files.vector.clone(),
                    raster: files.raster.clone(),
                })
            })
            .collect();
        let failures = report
            .entries
            .iter()
            .filter_map(|entry| match &entry.status {
                PartStatus::Failed { code, error } => Some(FailureEntry {
                    part: entry.part.0,
                    name: entry.name.clone(),
                    code: code.clone(),
                    error: error.to_string(),
                }),
                _ => None,
            })
            .collect();

        Self {
            run_id: report.run_id.to_string(),
            mode: report.mode.to_string(),
            processed: report.processed_count(),
            not_processed: report.not_processed_count(),
            unclassified: report.unclassified_count(),
            codes: report.processed_codes(),
            exports,
            failures,
            skipped: report.skipped.iter().map(|id| id.0).collect(),
        }
    }
}

impl ReportSummary {
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to encode report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vd_core::{ElementId, GeometryError};
    use vd_host::{DraftError, PartReport, RunMode};

    fn report() -> BatchReport {
        BatchReport {
            run_id: uuid::Uuid::nil(),
            mode: RunMode::Export,
            entries: vec![
                PartReport {
                    part: ElementId(4),
                    name: "Pin".to_string(),
                    status: PartStatus::Failed {
                        code: "PC-4".to_string(),
                        error: DraftError::from(GeometryError::DegenerateBounds),
                    },
                },
                PartReport {
                    part: ElementId(5),
                    name: "Spacer".to_string(),
                    status: PartStatus::Unclassified,
                },
            ],
            skipped: vec![ElementId(99)],
        }
    }

    #[test]
    fn test_summary_from_report() {
        let summary = ReportSummary::from(&report());
        assert_eq!(summary.mode, "export");
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.not_processed, 2);
        assert_eq!(summary.unclassified, 1);
        assert_eq!(summary.failures[0].code, "PC-4");
        assert_eq!(summary.skipped, vec![99]);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        ReportSummary::from(&report()).write(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["run_id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(
            value["failures"][0]["error"],
            "Geometry inconsistent: Bounding volume has zero extent"
        );
    }
}
