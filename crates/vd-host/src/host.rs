//! Drawing host interface
//!
//! The host owns the persistent document: parts, sheet templates, views and
//! sheets. Everything the pipeline creates goes through [`DrawingHost`] and
//! only inside an open work scope.

use std::collections::BTreeSet;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vd_core::{BoundingVolume, ConnectorTransform, ElementId, Marker, Rect2, ViewSpec};

/// Host errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("Unknown part: {0}")]
    UnknownPart(ElementId),

    #[error("Unknown view: {0}")]
    UnknownView(ElementId),

    #[error("Unknown sheet: {0}")]
    UnknownSheet(ElementId),

    #[error("A work scope is already open: {0}")]
    ScopeAlreadyOpen(ScopeId),

    #[error("No work scope is open")]
    NoActiveScope,

    #[error("Work scope {0} is not the active scope")]
    StaleScope(ScopeId),

    #[error("Isolation rejected for view {view}: {reason}")]
    IsolationRejected { view: ElementId, reason: String },
}

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;

/// Identifier of an open work scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub u64);

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scope {}", self.0)
    }
}

/// A part as the host resolves it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    /// Host element id
    pub id: ElementId,
    /// Display name used for sheet and view names
    pub name: String,
    /// World-space bounding volume
    pub bounds: BoundingVolume,
    /// Primary connector, if the part has one
    #[serde(default)]
    pub connector: Option<ConnectorTransform>,
    /// Product code attribute
    #[serde(default)]
    pub product_code: Option<String>,
}

impl PartRecord {
    pub fn new(id: ElementId, name: impl Into<String>, bounds: BoundingVolume) -> Self {
        Self {
            id,
            name: name.into(),
            bounds,
            connector: None,
            product_code: None,
        }
    }

    pub fn with_connector(mut self, connector: ConnectorTransform) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn with_product_code(mut self, code: impl Into<String>) -> Self {
        self.product_code = Some(code.into());
        self
    }
}

/// A title block sheet templates are created from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetTemplate {
    pub id: ElementId,
    pub name: String,
    /// Drawable outline of the title block
    pub outline: Rect2,
}

/// View placed on a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedView {
    pub id: ElementId,
    pub spec: ViewSpec,
    /// Viewport centre in sheet coordinates
    pub center: DVec2,
    /// Orientation markers hosted by the view
    pub markers: Vec<ElementId>,
}

/// Snapshot of a sheet and its viewports
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub id: ElementId,
    pub name: String,
    pub template: String,
    pub outline: Rect2,
    pub views: Vec<PlacedView>,
}

impl Sheet {
    /// True if any placed view is under temporary isolation
    pub fn has_isolated_views(&self) -> bool {
        self.views.iter().any(|view| view.spec.isolated_ids().is_some())
    }
}

/// Document operations the drawing pipeline relies on
///
/// Mutating calls are only valid between `begin_scope` and the matching
/// `commit_scope`/`discard_scope`. At most one scope is open at a time.
pub trait DrawingHost {
    /// Get the host name
    fn name(&self) -> &str;

    /// Resolve a part identifier
    fn part(&self, id: ElementId) -> HostResult<PartRecord>;

    /// Find a sheet template by exact name
    fn find_template(&self, name: &str) -> Option<SheetTemplate>;

    /// Open a discardable work scope
    fn begin_scope(&mut self, label: &str) -> HostResult<ScopeId>;

    /// Keep everything changed inside the scope
    fn commit_scope(&mut self, scope: ScopeId) -> HostResult<()>;

    /// Roll back everything changed inside the scope
    fn discard_scope(&mut self, scope: ScopeId) -> HostResult<()>;

    /// Create a view from its specification
    fn create_view(&mut self, spec: &ViewSpec) -> HostResult<ElementId>;

    /// Create a text marker hosted by a view
    fn create_marker(&mut self, view: ElementId, marker: &Marker) -> HostResult<ElementId>;

    /// Create an empty sheet from a template
    fn create_sheet(&mut self, template: &SheetTemplate, name: &str) -> HostResult<ElementId>;

    /// Place a view on a sheet with its viewport centred at `center`
    fn place_viewport(&mut self, sheet: ElementId, view: ElementId, center: DVec2)
    -> HostResult<()>;

    /// Temporarily restrict a view to `ids`
    fn isolate(&mut self, view: ElementId, ids: &BTreeSet<ElementId>) -> HostResult<()>;

    /// Snapshot a sheet for export
    fn sheet(&self, id: ElementId) -> HostResult<Sheet>;
}
