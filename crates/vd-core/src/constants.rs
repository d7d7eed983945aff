//! Global constants for vd-core

/// Default comparison tolerance for lengths, coordinates and determinants
pub const EPSILON: f64 = 1e-9;

/// Millimetres per foot (internal length unit is the foot)
pub const FEET_TO_MM: f64 = 304.8;

/// Drawing scale (1:N) shared by the three section views
pub const SECTION_SCALE: u32 = 5;

/// Drawing scale (1:N) of the isometric view
pub const ISOMETRIC_SCALE: u32 = 10;

/// Horizontal azimuth of the isometric camera, in degrees
pub const ISOMETRIC_AZIMUTH_DEG: f64 = 135.0;

/// Vertical tilt of the isometric camera, in degrees
pub const ISOMETRIC_TILT_DEG: f64 = -30.0;

/// Offset of the axis markers from the frame origin, as a fraction of the half-extent
pub const MARKER_OFFSET_RATIO: f64 = 0.2;

/// Left margin of the usable sheet area, as a fraction of the outline width
pub const SHEET_MARGIN_LEFT: f64 = 0.10;

/// Bottom margin of the usable sheet area, as a fraction of the outline height
pub const SHEET_MARGIN_BOTTOM: f64 = 0.15;

/// Width of the usable sheet area, as a fraction of the outline width
pub const SHEET_USABLE_WIDTH: f64 = 0.90;

/// Height of the usable sheet area, as a fraction of the outline height
pub const SHEET_USABLE_HEIGHT: f64 = 0.80;
