//! In-memory drawing host
//!
//! Holds parts, templates, views and sheets in ordered maps. Every change
//! made inside a scope is journaled so a discard can roll it back.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use vd_core::{ElementId, Marker, Rect2, ViewSpec, Visibility, VisibilityIsolator};

use crate::host::{
    DrawingHost, HostError, HostResult, PartRecord, PlacedView, ScopeId, Sheet, SheetTemplate,
};

/// Serializable contents of a [`MemoryHost`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostDocument {
    #[serde(default)]
    pub templates: Vec<SheetTemplate>,
    #[serde(default)]
    pub parts: Vec<PartRecord>,
}

/// Scope bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeStats {
    pub opened: usize,
    pub committed: usize,
    pub discarded: usize,
}

#[derive(Debug, Clone)]
enum Change {
    Created(ElementId),
    Placed { sheet: ElementId, view: ElementId },
    Visibility { view: ElementId, previous: Visibility },
}

#[derive(Debug, Clone)]
struct OpenScope {
    id: ScopeId,
    label: String,
    journal: Vec<Change>,
}

#[derive(Debug, Clone)]
struct SheetRecord {
    name: String,
    template: String,
    outline: Rect2,
    viewports: Vec<(ElementId, DVec2)>,
}

/// Drawing host backed by memory
#[derive(Debug, Clone)]
pub struct MemoryHost {
    name: String,
    parts: BTreeMap<ElementId, PartRecord>,
    templates: Vec<SheetTemplate>,
    views: BTreeMap<ElementId, ViewSpec>,
    markers: BTreeMap<ElementId, (ElementId, Marker)>,
    sheets: BTreeMap<ElementId, SheetRecord>,
    next_id: u64,
    next_scope: u64,
    open: Option<OpenScope>,
    stats: ScopeStats,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(HostDocument::default())
    }
}

impl MemoryHost {
    /// Create a host holding the document's parts and templates
    pub fn new(document: HostDocument) -> Self {
        let mut host = Self {
            name: "memory".to_string(),
            parts: BTreeMap::new(),
            templates: Vec::new(),
            views: BTreeMap::new(),
            markers: BTreeMap::new(),
            sheets: BTreeMap::new(),
            next_id: 1,
            next_scope: 1,
            open: None,
            stats: ScopeStats::default(),
        };
        for template in document.templates {
            host.add_template(template);
        }
        for part in document.parts {
            host.add_part(part);
        }
        host
    }

    pub fn add_part(&mut self, part: PartRecord) {
        self.reserve_id(part.id);
        self.parts.insert(part.id, part);
    }

    pub fn add_template(&mut self, template: SheetTemplate) {
        self.reserve_id(template.id);
        self.templates.push(template);
    }

    pub fn stats(&self) -> ScopeStats {
        self.stats
    }

    /// Label of the open scope, if any
    pub fn open_scope(&self) -> Option<&str> {
        self.open.as_ref().map(|scope| scope.label.as_str())
    }

    pub fn view(&self, id: ElementId) -> Option<&ViewSpec> {
        self.views.get(&id)
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Names of all sheets, in creation order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.values().map(|s| s.name.as_str()).collect()
    }

    pub fn find_sheet(&self, name: &str) -> Option<ElementId> {
        self.sheets
            .iter()
            .find(|(_, sheet)| sheet.name == name)
            .map(|(id, _)| *id)
    }

    fn reserve_id(&mut self, id: ElementId) {
        self.next_id = self.next_id.max(id.0 + 1);
    }

    fn allocate(&mut self) -> HostResult<ElementId> {
        let scope = self.open.as_mut().ok_or(HostError::NoActiveScope)?;
        let id = ElementId(self.next_id);
        self.next_id += 1;
        scope.journal.push(Change::Created(id));
        Ok(id)
    }

    fn record(&mut self, change: Change) -> HostResult<()> {
        let scope = self.open.as_mut().ok_or(HostError::NoActiveScope)?;
        scope.journal.push(change);
        Ok(())
    }

    fn take_scope(&mut self, id: ScopeId) -> HostResult<OpenScope> {
        let active = self
            .open
            .as_ref()
            .map(|scope| scope.id)
            .ok_or(HostError::NoActiveScope)?;
        if active != id {
            return Err(HostError::StaleScope(id));
        }
        self.open.take().ok_or(HostError::NoActiveScope)
    }

    fn undo(&mut self, change: Change) {
        match change {
            Change::Created(id) => {
                self.views.remove(&id);
                self.markers.remove(&id);
                self.sheets.remove(&id);
            }
            Change::Placed { sheet, view } => {
                if let Some(record) = self.sheets.get_mut(&sheet) {
                    record.viewports.retain(|(placed, _)| *placed != view);
                }
            }
            Change::Visibility { view, previous } => {
                if let Some(spec) = self.views.get_mut(&view) {
                    spec.visibility = previous;
                }
            }
        }
    }
}

impl DrawingHost for MemoryHost {
    fn name(&self) -> &str {
        &self.name
    }

    fn part(&self, id: ElementId) -> HostResult<PartRecord> {
        self.parts.get(&id).cloned().ok_or(HostError::UnknownPart(id))
    }

    fn find_template(&self, name: &str) -> Option<SheetTemplate> {
        self.templates.iter().find(|t| t.name == name).cloned()
    }

    fn begin_scope(&mut self, label: &str) -> HostResult<ScopeId> {
        if let Some(scope) = &self.open {
            return Err(HostError::ScopeAlreadyOpen(scope.id));
        }
        let id = ScopeId(self.next_scope);
        self.next_scope += 1;
        self.open = Some(OpenScope {
            id,
            label: label.to_string(),
            journal: Vec::new(),
        });
        self.stats.opened += 1;
        Ok(id)
    }

    fn commit_scope(&mut self, scope: ScopeId) -> HostResult<()> {
        let scope = self.take_scope(scope)?;
        tracing::debug!(
            "Committed {} '{}' ({} changes)",
            scope.id,
            scope.label,
            scope.journal.len()
        );
        self.stats.committed += 1;
        Ok(())
    }

    fn discard_scope(&mut self, scope: ScopeId) -> HostResult<()> {
        let scope = self.take_scope(scope)?;
        let changes = scope.journal.len();
        for change in scope.journal.into_iter().rev() {
            self.undo(change);
        }
        tracing::debug!(
            "Discarded {} '{}' ({} changes)",
            scope.id,
            scope.label,
            changes
        );
        self.stats.discarded += 1;
        Ok(())
    }

    fn create_view(&mut self, spec: &ViewSpec) -> HostResult<ElementId> {
        let id = self.allocate()?;
        self.views.insert(id, spec.clone());
        Ok(id)
    }

    fn create_marker(&mut self, view: ElementId, marker: &Marker) -> HostResult<ElementId> {
        if !self.views.contains_key(&view) {
            return Err(HostError::UnknownView(view));
        }
        let id = self.allocate()?;
        self.markers.insert(id, (view, marker.clone()));
        Ok(id)
    }

    fn create_sheet(&mut self, template: &SheetTemplate, name: &str) -> HostResult<ElementId> {
        let id = self.allocate()?;
        self.sheets.insert(
            id,
            SheetRecord {
                name: name.to_string(),
                template: template.name.clone(),
                outline: template.outline,
                viewports: Vec::new(),
            },
        );
        Ok(id)
    }

    fn place_viewport(
        &mut self,
        sheet: ElementId,
        view: ElementId,
        center: DVec2,
    ) -> HostResult<()> {
        if !self.views.contains_key(&view) {
            return Err(HostError::UnknownView(view));
        }
        if !self.sheets.contains_key(&sheet) {
            return Err(HostError::UnknownSheet(sheet));
        }
        self.record(Change::Placed { sheet, view })?;
        if let Some(record) = self.sheets.get_mut(&sheet) {
            record.viewports.push((view, center));
        }
        Ok(())
    }

    fn isolate(&mut self, view: ElementId, ids: &BTreeSet<ElementId>) -> HostResult<()> {
        if ids.is_empty() {
            return Err(HostError::IsolationRejected {
                view,
                reason: "empty element set".to_string(),
            });
        }
        let previous = self
            .views
            .get(&view)
            .map(|spec| spec.visibility.clone())
            .ok_or(HostError::UnknownView(view))?;
        self.record(Change::Visibility { view, previous })?;
        if let Some(spec) = self.views.get_mut(&view) {
            VisibilityIsolator::default().isolate(spec, ids);
        }
        Ok(())
    }

    fn sheet(&self, id: ElementId) -> HostResult<Sheet> {
        let record = self.sheets.get(&id).ok_or(HostError::UnknownSheet(id))?;
        let mut views = Vec::with_capacity(record.viewports.len());
        for (view_id, center) in &record.viewports {
            let spec = self
                .views
                .get(view_id)
                .cloned()
                .ok_or(HostError::UnknownView(*view_id))?;
            let markers = self
                .markers
                .iter()
                .filter(|(_, (host, _))| host == view_id)
                .map(|(id, _)| *id)
                .collect();
            views.push(PlacedView {
                id: *view_id,
                spec,
                center: *center,
                markers,
            });
        }
        Ok(Sheet {
            id,
            name: record.name.clone(),
            template: record.template.clone(),
            outline: record.outline,
            views,
        })
    }
}
