//! Per-part drawing pipeline
//!
//! One part goes `Start -> FrameResolved -> ViewsBuilt -> SheetComposed ->
//! Isolated` and ends `Exported` or `Discarded`. All host changes happen
//! inside a single [`WorkScope`]; any early return drops the scope, which
//! discards it.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use vd_core::{
    ElementId, Frame, LayoutError, SectionKind, Tolerance, ViewKind, ViewSlot, ViewSpec,
    VisibilityIsolator, build_isometric, build_section, compose, resolve_frame,
};

use crate::config::{DraftConfig, RunMode};
use crate::error::{DraftError, DraftResult};
use crate::export::{ExportOptions, ExportedFiles, SheetExporter};
use crate::host::{DrawingHost, PartRecord};
use crate::scope::WorkScope;

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    Start,
    FrameResolved,
    ViewsBuilt,
    SheetComposed,
    Isolated,
    Exported,
    Discarded,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Start => "Start",
            PipelineStage::FrameResolved => "FrameResolved",
            PipelineStage::ViewsBuilt => "ViewsBuilt",
            PipelineStage::SheetComposed => "SheetComposed",
            PipelineStage::Isolated => "Isolated",
            PipelineStage::Exported => "Exported",
            PipelineStage::Discarded => "Discarded",
        };
        f.write_str(name)
    }
}

/// Result of one successful pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub part: ElementId,
    /// Terminal stage
    pub stage: PipelineStage,
    pub sheet_name: String,
    /// Host id of the sheet, only meaningful when `committed`
    pub sheet: ElementId,
    pub exported: Option<ExportedFiles>,
    pub committed: bool,
}

/// Sheet name for a part: `"{code}-{name}"`, or the bare name when unclassified
pub fn sheet_name(part: &PartRecord, code: Option<&str>) -> String {
    match code {
        Some(code) => format!("{}-{}", code, part.name),
        None => part.name.clone(),
    }
}

/// The three sections and the isometric view of a part
pub fn part_views(frame: &Frame, part_name: &str) -> Vec<ViewSpec> {
    let mut views: Vec<ViewSpec> = SectionKind::ALL
        .iter()
        .map(|kind| {
            build_section(
                frame,
                *kind,
                format!("{} - {}", part_name, kind.display_name()),
            )
        })
        .collect();
    views.push(build_isometric(frame.origin, format!("{} - Iso", part_name)));
    views
}

/// Draws one part onto one sheet
#[derive(Debug, Clone)]
pub struct PartViewPipeline {
    pub template_name: String,
    pub mode: RunMode,
    pub tolerance: Tolerance,
    pub isolator: VisibilityIsolator,
    pub include_markers: bool,
    pub output_dir: PathBuf,
}

impl PartViewPipeline {
    pub fn from_config(config: &DraftConfig) -> Self {
        Self {
            template_name: config.template_name.clone(),
            mode: config.mode,
            tolerance: config.tolerance(),
            isolator: config.isolator(),
            include_markers: config.include_markers,
            output_dir: config.output_dir.clone(),
        }
    }

    /// Export options carrying the isolator's confirmation policy
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            output_dir: self.output_dir.clone(),
            confirmation: self.isolator.policy(),
        }
    }

    /// Run the pipeline for one part inside its own work scope
    pub fn run<H, E>(
        &self,
        host: &mut H,
        exporter: &mut E,
        part: &PartRecord,
        code: Option<&str>,
    ) -> DraftResult<PipelineOutcome>
    where
        H: DrawingHost + ?Sized,
        E: SheetExporter + ?Sized,
    {
        let mut stage = PipelineStage::Start;
        let result = self.drive(host, exporter, part, code, &mut stage);
        if let Err(e) = &result {
            tracing::debug!("Part '{}' stopped after {}: {}", part.name, stage, e);
        }
        result
    }

    fn advance(&self, part: &PartRecord, stage: &mut PipelineStage, next: PipelineStage) {
        tracing::debug!("Part '{}' ({}): {} -> {}", part.name, part.id, stage, next);
        *stage = next;
    }

    fn drive<H, E>(
        &self,
        host: &mut H,
        exporter: &mut E,
        part: &PartRecord,
        code: Option<&str>,
        stage: &mut PipelineStage,
    ) -> DraftResult<PipelineOutcome>
    where
        H: DrawingHost + ?Sized,
        E: SheetExporter + ?Sized,
    {
        let mut scope = WorkScope::open(host, &format!("Draw {}", part.name))?;

        let frame = resolve_frame(&part.bounds, part.connector.as_ref(), self.tolerance)?;
        self.advance(part, stage, PipelineStage::FrameResolved);

        let views = part_views(&frame, &part.name);
        self.advance(part, stage, PipelineStage::ViewsBuilt);

        let template = scope
            .find_template(&self.template_name)
            .ok_or_else(|| DraftError::TemplateMissing(self.template_name.clone()))?;
        let invalid_template = |source: LayoutError| DraftError::InvalidTemplate {
            name: template.name.clone(),
            source,
        };
        let layout = compose(template.outline, &views).map_err(invalid_template)?;

        let sheet_name = sheet_name(part, code);
        let sheet = scope.create_sheet(&template, &sheet_name)?;
        let mut isolated = BTreeSet::from([part.id]);
        let mut view_ids = Vec::with_capacity(views.len());
        for view in &views {
            let view_id = scope.create_view(view)?;
            if let ViewKind::Section(section) = &view.kind {
                for marker in &section.markers {
                    let marker_id = scope.create_marker(view_id, marker)?;
                    if self.include_markers {
                        isolated.insert(marker_id);
                    }
                }
            }
            let center = layout
                .placement(&view.name)
                .ok_or_else(|| invalid_template(LayoutError::MissingSlot(ViewSlot::for_view(view))))?;
            scope.place_viewport(sheet, view_id, center)?;
            view_ids.push(view_id);
        }
        self.advance(part, stage, PipelineStage::SheetComposed);

        for view_id in &view_ids {
            scope.isolate(*view_id, &isolated)?;
        }
        self.advance(part, stage, PipelineStage::Isolated);

        let mut outcome = PipelineOutcome {
            part: part.id,
            stage: *stage,
            sheet_name,
            sheet,
            exported: None,
            committed: false,
        };

        if !self.mode.exports() {
            scope.discard()?;
            self.advance(part, stage, PipelineStage::Discarded);
            outcome.stage = *stage;
            return Ok(outcome);
        }

        let snapshot = scope.sheet(sheet)?;
        let exported = exporter.export(&snapshot, &self.export_options());

        // The sheet outlives a failed export when the run persists
        if self.mode.commits() {
            scope.commit()?;
            outcome.committed = true;
        } else {
            scope.discard()?;
        }

        let files = exported?;
        self.advance(part, stage, PipelineStage::Exported);
        outcome.stage = *stage;
        outcome.exported = Some(files);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, DVec3};
    use vd_core::{BoundingVolume, ConfirmationPolicy, Rect2};

    use crate::export::ExportError;
    use crate::host::{Sheet, SheetTemplate};
    use crate::memory::{HostDocument, MemoryHost};

    /// Records sheets instead of writing files
    #[derive(Default)]
    struct RecordingExporter {
        sheets: Vec<Sheet>,
        fail: bool,
    }

    impl SheetExporter for RecordingExporter {
        fn export(
            &mut self,
            sheet: &Sheet,
            options: &ExportOptions,
        ) -> Result<ExportedFiles, ExportError> {
            if self.fail {
                return Err(ExportError::Io("disk full".to_string()));
            }
            options.check_confirmation(sheet)?;
            self.sheets.push(sheet.clone());
            let base = options.base_path(&sheet.name);
            Ok(ExportedFiles {
                vector: base.with_extension("svg"),
                raster: base.with_extension("ppm"),
            })
        }
    }

    fn part() -> PartRecord {
        PartRecord::new(
            ElementId(100),
            "Bracket",
            BoundingVolume::new(DVec3::ZERO, DVec3::splat(2.0)),
        )
    }

    fn host() -> MemoryHost {
        MemoryHost::new(HostDocument {
            templates: vec![SheetTemplate {
                id: ElementId(1),
                name: "A3".to_string(),
                outline: Rect2::new(DVec2::ZERO, DVec2::new(10.0, 8.0)),
            }],
            parts: vec![part()],
        })
    }

    fn pipeline(mode: RunMode) -> PartViewPipeline {
        PartViewPipeline::from_config(&DraftConfig {
            template_name: "A3".to_string(),
            mode,
            ..Default::default()
        })
    }

    #[test]
    fn test_names() {
        assert_eq!(sheet_name(&part(), Some("PC-1")), "PC-1-Bracket");
        assert_eq!(sheet_name(&part(), None), "Bracket");

        let frame = Frame::world(DVec3::ZERO, 1.0);
        let names: Vec<String> = part_views(&frame, "Bracket")
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Bracket - Front",
                "Bracket - Right",
                "Bracket - Top",
                "Bracket - Iso"
            ]
        );
    }

    #[test]
    fn test_dry_run_discards() {
        let mut host = host();
        let mut exporter = RecordingExporter::default();
        let outcome = pipeline(RunMode::DryRun)
            .run(&mut host, &mut exporter, &part(), Some("PC-1"))
            .unwrap();

        assert_eq!(outcome.stage, PipelineStage::Discarded);
        assert_eq!(outcome.sheet_name, "PC-1-Bracket");
        assert!(outcome.exported.is_none());
        assert!(exporter.sheets.is_empty());
        assert_eq!(host.view_count(), 0);
        assert_eq!(host.stats().discarded, 1);
    }

    #[test]
    fn test_export_isolates_all_views() {
        let mut host = host();
        let mut exporter = RecordingExporter::default();
        let outcome = pipeline(RunMode::Export)
            .run(&mut host, &mut exporter, &part(), None)
            .unwrap();

        assert_eq!(outcome.stage, PipelineStage::Exported);
        assert!(!outcome.committed);
        assert_eq!(host.view_count(), 0);

        let sheet = &exporter.sheets[0];
        assert_eq!(sheet.views.len(), 4);
        for view in &sheet.views {
            let ids = view.spec.isolated_ids().unwrap();
            assert!(ids.contains(&ElementId(100)));
            for marker in &view.markers {
                assert!(ids.contains(marker));
            }
        }
        // 3 markers per section view
        let markers: usize = sheet.views.iter().map(|v| v.markers.len()).sum();
        assert_eq!(markers, 9);
    }

    #[test]
    fn test_markers_left_out_of_isolation() {
        let mut host = host();
        let mut exporter = RecordingExporter::default();
        let mut pipeline = pipeline(RunMode::Export);
        pipeline.include_markers = false;
        pipeline.run(&mut host, &mut exporter, &part(), None).unwrap();

        let ids = exporter.sheets[0].views[0].spec.isolated_ids().unwrap();
        assert_eq!(ids, &BTreeSet::from([ElementId(100)]));
    }

    #[test]
    fn test_persist_commits() {
        let mut host = host();
        let mut exporter = RecordingExporter::default();
        let outcome = pipeline(RunMode::Persist)
            .run(&mut host, &mut exporter, &part(), Some("PC-1"))
            .unwrap();

        assert!(outcome.committed);
        assert_eq!(host.sheet_names(), vec!["PC-1-Bracket"]);
        assert_eq!(host.view_count(), 4);
        assert_eq!(host.marker_count(), 9);
    }

    #[test]
    fn test_persist_keeps_sheet_after_failed_export() {
        let mut host = host();
        let mut exporter = RecordingExporter {
            fail: true,
            ..Default::default()
        };
        let result = pipeline(RunMode::Persist).run(&mut host, &mut exporter, &part(), None);

        assert!(matches!(result, Err(DraftError::ExportFailed(_))));
        assert_eq!(host.sheet_names(), vec!["Bracket"]);
        assert_eq!(host.stats().committed, 1);
    }

    #[test]
    fn test_ask_policy_refuses_export() {
        let mut host = host();
        let mut exporter = RecordingExporter::default();
        let pipeline = PartViewPipeline::from_config(&DraftConfig {
            template_name: "A3".to_string(),
            mode: RunMode::Export,
            suppress_confirmation: false,
            ..Default::default()
        });
        let result = pipeline.run(&mut host, &mut exporter, &part(), None);
        assert!(matches!(
            result,
            Err(DraftError::ExportFailed(ExportError::ConfirmationRequired(_)))
        ));
        assert!(host.open_scope().is_none());
    }

    #[test]
    fn test_isolator_decides_export_confirmation() {
        let mut pipeline = pipeline(RunMode::Export);
        assert_eq!(pipeline.export_options().confirmation, ConfirmationPolicy::Proceed);

        pipeline.isolator = VisibilityIsolator::new(false);
        assert_eq!(pipeline.export_options().confirmation, ConfirmationPolicy::Ask);

        let mut host = host();
        let mut exporter = RecordingExporter::default();
        let result = pipeline.run(&mut host, &mut exporter, &part(), None);
        assert!(matches!(
            result,
            Err(DraftError::ExportFailed(ExportError::ConfirmationRequired(_)))
        ));
        assert!(exporter.sheets.is_empty());
    }

    #[test]
    fn test_degenerate_part_discards_scope() {
        let mut host = host();
        let mut exporter = RecordingExporter::default();
        let flat = PartRecord::new(
            ElementId(101),
            "Point",
            BoundingVolume::new(DVec3::ONE, DVec3::ONE),
        );
        let result = pipeline(RunMode::Persist).run(&mut host, &mut exporter, &flat, None);

        assert!(matches!(result, Err(DraftError::GeometryInconsistent(_))));
        assert!(host.open_scope().is_none());
        assert_eq!(host.stats().discarded, 1);
        assert!(host.sheet_names().is_empty());
    }

    #[test]
    fn test_missing_template() {
        let mut host = host();
        let mut exporter = RecordingExporter::default();
        let mut pipeline = pipeline(RunMode::Export);
        pipeline.template_name = "A0".to_string();
        let result = pipeline.run(&mut host, &mut exporter, &part(), None);

        assert_eq!(result, Err(DraftError::TemplateMissing("A0".to_string())));
        assert!(exporter.sheets.is_empty());
        assert!(host.open_scope().is_none());
    }
}
