//! Batch driver
//!
//! Runs the part pipeline over a selection, one part at a time. Per-part
//! geometry and export failures become report entries; a missing or
//! unusable template and an empty selection stop the batch.

use std::collections::BTreeSet;
use std::fmt;

use uuid::Uuid;

use vd_core::ElementId;

use crate::classify::{AttributeClassifier, PartClassifier};
use crate::config::{DraftConfig, RunMode};
use crate::error::{DraftError, DraftResult};
use crate::export::{ExportedFiles, SheetExporter};
use crate::host::{DrawingHost, PartRecord};
use crate::pipeline::{PartViewPipeline, PipelineOutcome};

/// What happened to one part
#[derive(Debug, Clone, PartialEq)]
pub enum PartStatus {
    Processed {
        code: String,
        outcome: PipelineOutcome,
    },
    Unclassified,
    Failed {
        code: String,
        error: DraftError,
    },
}

/// Report line for one part
#[derive(Debug, Clone, PartialEq)]
pub struct PartReport {
    pub part: ElementId,
    pub name: String,
    pub status: PartStatus,
}

impl PartReport {
    pub fn is_processed(&self) -> bool {
        matches!(self.status, PartStatus::Processed { .. })
    }

    pub fn exported(&self) -> Option<&ExportedFiles> {
        match &self.status {
            PartStatus::Processed { outcome, .. } => outcome.exported.as_ref(),
            _ => None,
        }
    }
}

/// End-of-run summary
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub mode: RunMode,
    pub entries: Vec<PartReport>,
    /// Selected identifiers the host could not resolve
    pub skipped: Vec<ElementId>,
}

impl BatchReport {
    pub fn processed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_processed()).count()
    }

    pub fn not_processed_count(&self) -> usize {
        self.entries.len() - self.processed_count()
    }

    pub fn unclassified_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, PartStatus::Unclassified))
            .count()
    }

    pub fn failed(&self) -> impl Iterator<Item = (&PartReport, &DraftError)> {
        self.entries.iter().filter_map(|entry| match &entry.status {
            PartStatus::Failed { error, .. } => Some((entry, error)),
            _ => None,
        })
    }

    /// `{code}-{identifier}` for every processed part
    pub fn processed_codes(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.status {
                PartStatus::Processed { code, .. } => Some(format!("{}-{}", code, entry.part.0)),
                _ => None,
            })
            .collect()
    }

    pub fn export_count(&self) -> usize {
        self.entries.iter().filter(|e| e.exported().is_some()).count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {} ({})", self.run_id, self.mode)?;
        writeln!(
            f,
            "Processed: {}, not processed: {} ({} unclassified)",
            self.processed_count(),
            self.not_processed_count(),
            self.unclassified_count()
        )?;
        for code in self.processed_codes() {
            writeln!(f, "  {}", code)?;
        }
        for (entry, error) in self.failed() {
            writeln!(f, "  failed {} '{}': {}", entry.part, entry.name, error)?;
        }
        Ok(())
    }
}

/// Runs the drawing pipeline over a part selection
#[derive(Debug, Clone)]
pub struct BatchDriver<C = AttributeClassifier> {
    pipeline: PartViewPipeline,
    classifier: C,
}

impl BatchDriver<AttributeClassifier> {
    pub fn new(config: &DraftConfig) -> Self {
        Self::with_classifier(config, AttributeClassifier)
    }
}

impl<C: PartClassifier> BatchDriver<C> {
    pub fn with_classifier(config: &DraftConfig, classifier: C) -> Self {
        Self {
            pipeline: PartViewPipeline::from_config(config),
            classifier,
        }
    }

    pub fn pipeline(&self) -> &PartViewPipeline {
        &self.pipeline
    }

    /// Draw every resolvable, classified part in `selection`
    pub fn run<H, E>(
        &self,
        host: &mut H,
        exporter: &mut E,
        selection: &[ElementId],
    ) -> DraftResult<BatchReport>
    where
        H: DrawingHost + ?Sized,
        E: SheetExporter + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let (parts, skipped) = resolve_selection(host, selection);
        if parts.is_empty() {
            tracing::info!("Batch {} cancelled: nothing selected", run_id);
            return Err(DraftError::SelectionEmpty);
        }

        self.check_template(host)?;

        tracing::info!(
            "Batch {} started on '{}': {} parts, mode {}",
            run_id,
            host.name(),
            parts.len(),
            self.pipeline.mode
        );

        let mut entries = Vec::with_capacity(parts.len());
        for part in parts {
            let status = self.process(host, exporter, &part)?;
            entries.push(PartReport {
                part: part.id,
                name: part.name,
                status,
            });
        }

        let report = BatchReport {
            run_id,
            mode: self.pipeline.mode,
            entries,
            skipped,
        };
        tracing::info!(
            "Batch {} finished: {} processed, {} not processed",
            run_id,
            report.processed_count(),
            report.not_processed_count()
        );
        Ok(report)
    }

    fn check_template<H: DrawingHost + ?Sized>(&self, host: &H) -> DraftResult<()> {
        let name = &self.pipeline.template_name;
        let template = host
            .find_template(name)
            .ok_or_else(|| DraftError::TemplateMissing(name.clone()))?;
        if template.outline.is_degenerate() {
            return Err(DraftError::InvalidTemplate {
                name: name.clone(),
                source: vd_core::LayoutError::DegenerateOutline,
            });
        }
        Ok(())
    }

    fn process<H, E>(
        &self,
        host: &mut H,
        exporter: &mut E,
        part: &PartRecord,
    ) -> DraftResult<PartStatus>
    where
        H: DrawingHost + ?Sized,
        E: SheetExporter + ?Sized,
    {
        let Some(code) = self.classifier.classify(part) else {
            tracing::info!("Part '{}' ({}) is unclassified, skipping", part.name, part.id);
            return Ok(PartStatus::Unclassified);
        };

        tracing::info!("Drawing part '{}' ({}) as {}", part.name, part.id, code);
        match self.pipeline.run(host, exporter, part, Some(code.as_str())) {
            Ok(outcome) => Ok(PartStatus::Processed { code, outcome }),
            Err(e) if e.is_batch_fatal() => Err(e),
            Err(error) => {
                tracing::warn!("Part '{}' ({}) not processed: {}", part.name, part.id, error);
                Ok(PartStatus::Failed { code, error })
            }
        }
    }
}

/// Resolve selected ids in order, dropping duplicates and unknown ids
fn resolve_selection<H: DrawingHost + ?Sized>(
    host: &H,
    selection: &[ElementId],
) -> (Vec<PartRecord>, Vec<ElementId>) {
    let mut seen = BTreeSet::new();
    let mut parts = Vec::new();
    let mut skipped = Vec::new();
    for id in selection {
        if !seen.insert(*id) {
            continue;
        }
        match host.part(*id) {
            Ok(part) => parts.push(part),
            Err(e) => {
                tracing::warn!("Skipping selection {}: {}", id, e);
                skipped.push(*id);
            }
        }
    }
    (parts, skipped)
}
