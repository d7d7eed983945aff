//! Drawing View Geometry
//!
//! This crate provides:
//! - Tolerance-aware comparisons and foot/millimetre conversion
//! - Local frame resolution from a part's bounds and primary connector
//! - Frame-aligned section views with orientation markers
//! - A fixed-angle isometric view
//! - Temporary view isolation
//! - Fixed four-viewport sheet layout

pub mod constants;
pub mod frame;
pub mod isometric;
pub mod layout;
pub mod section;
pub mod units;
pub mod view;
pub mod visibility;

// Re-exports for convenience
pub use constants::*;
pub use frame::{
    BasisStage, BoundingVolume, ConnectorTransform, Frame, GeometryError, GeometryResult,
    resolve_frame,
};
pub use isometric::{IsometricCamera, build_isometric};
pub use layout::{LayoutError, LayoutResult, Rect2, SheetLayout, ViewSlot, compose, usable_area};
pub use section::{CutPlane, Marker, SectionBox, SectionKind, SectionView, build_section};
pub use units::Tolerance;
pub use view::{DetailLevel, ElementId, ViewKind, ViewSpec, Visibility};
pub use visibility::{ConfirmationPolicy, VisibilityIsolator};
