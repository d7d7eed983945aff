//! Sheet layout
//!
//! Views are placed at fixed fractional positions inside the usable area
//! of the sheet outline. The layout assumes the views fit at their scales
//! and does no collision detection.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    SHEET_MARGIN_BOTTOM, SHEET_MARGIN_LEFT, SHEET_USABLE_HEIGHT, SHEET_USABLE_WIDTH,
};
use crate::section::SectionKind;
use crate::view::{ViewKind, ViewSpec};

/// Layout errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Sheet outline has zero or negative area")]
    DegenerateOutline,

    #[error("Expected 4 views, got {0}")]
    ViewCount(usize),

    #[error("Duplicate view name: {0}")]
    DuplicateViewName(String),

    #[error("No view for the {0:?} slot")]
    MissingSlot(ViewSlot),
}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Axis-aligned rectangle on a sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect2 {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect2 {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    pub fn from_origin_size(origin: DVec2, size: DVec2) -> Self {
        Self::new(origin, origin + size)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.min.is_finite() && self.max.is_finite())
            || self.width() <= 0.0
            || self.height() <= 0.0
    }

    /// True if the point is inside and not on the boundary
    pub fn contains_strict(&self, p: DVec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }

    /// Point at fractional coordinates `(fx, fy)` of the rectangle
    pub fn at_fraction(&self, fraction: DVec2) -> DVec2 {
        self.min + self.size() * fraction
    }
}

/// Viewport positions on the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViewSlot {
    RightSection,
    FrontSection,
    TopSection,
    Isometric,
}

impl ViewSlot {
    pub const ALL: [ViewSlot; 4] = [
        ViewSlot::RightSection,
        ViewSlot::FrontSection,
        ViewSlot::TopSection,
        ViewSlot::Isometric,
    ];

    /// Slot a view belongs in
    pub fn for_view(view: &ViewSpec) -> Self {
        match &view.kind {
            ViewKind::Section(section) => match section.kind {
                SectionKind::Front => ViewSlot::FrontSection,
                SectionKind::Right => ViewSlot::RightSection,
                SectionKind::Top => ViewSlot::TopSection,
            },
            ViewKind::Isometric(_) => ViewSlot::Isometric,
        }
    }

    /// Fractional placement inside the usable area
    pub fn fraction(&self) -> DVec2 {
        match self {
            ViewSlot::RightSection => DVec2::new(0.25, 0.75),
            ViewSlot::FrontSection => DVec2::new(0.75, 0.75),
            ViewSlot::TopSection => DVec2::new(0.25, 0.30),
            ViewSlot::Isometric => DVec2::new(0.70, 0.30),
        }
    }
}

/// Sheet outline with one placement point per view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub outline: Rect2,
    /// View name to viewport centre
    pub viewports: BTreeMap<String, DVec2>,
}

impl SheetLayout {
    pub fn placement(&self, view_name: &str) -> Option<DVec2> {
        self.viewports.get(view_name).copied()
    }
}

/// Outline shrunk by the left/bottom margins and scaled to the usable fraction
pub fn usable_area(outline: &Rect2) -> Rect2 {
    let origin = DVec2::new(
        outline.min.x + outline.width() * SHEET_MARGIN_LEFT,
        outline.min.y + outline.height() * SHEET_MARGIN_BOTTOM,
    );
    let size = DVec2::new(
        outline.width() * SHEET_USABLE_WIDTH,
        outline.height() * SHEET_USABLE_HEIGHT,
    );
    Rect2::from_origin_size(origin, size)
}

/// Place the four views of a part on a sheet
pub fn compose(outline: Rect2, views: &[ViewSpec]) -> LayoutResult<SheetLayout> {
    if outline.is_degenerate() {
        return Err(LayoutError::DegenerateOutline);
    }
    if views.len() != ViewSlot::ALL.len() {
        return Err(LayoutError::ViewCount(views.len()));
    }

    let area = usable_area(&outline);
    let mut filled = BTreeSet::new();
    let mut viewports = BTreeMap::new();

    for view in views {
        let slot = ViewSlot::for_view(view);
        let point = area.at_fraction(slot.fraction());
        if viewports.insert(view.name.clone(), point).is_some() {
            return Err(LayoutError::DuplicateViewName(view.name.clone()));
        }
        filled.insert(slot);
    }

    if let Some(slot) = ViewSlot::ALL.iter().find(|slot| !filled.contains(*slot)) {
        return Err(LayoutError::MissingSlot(*slot));
    }

    Ok(SheetLayout { outline, viewports })
}
