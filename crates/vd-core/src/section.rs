//! Frame-aligned section views
//!
//! Each section is described by a pair of frame axes `(up, right)`. The cut
//! box uses the basis `{up × right, up, right}`, which is right-handed for
//! any orthonormal pair, and the view looks along `up × right`.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::{MARKER_OFFSET_RATIO, SECTION_SCALE};
use crate::frame::Frame;
use crate::view::{ViewKind, ViewSpec};

/// The three standard section views of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    /// Up = frame Y, right = frame Z, looking along frame X
    Front,
    /// Up = frame Z, right = frame X, looking along frame Y
    Right,
    /// Up = frame X, right = frame Y, looking along frame Z
    Top,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [SectionKind::Front, SectionKind::Right, SectionKind::Top];

    /// The `(up, right)` axes of the frame this section is aligned to
    pub fn axes(&self, frame: &Frame) -> (DVec3, DVec3) {
        match self {
            SectionKind::Front => (frame.basis_y, frame.basis_z),
            SectionKind::Right => (frame.basis_z, frame.basis_x),
            SectionKind::Top => (frame.basis_x, frame.basis_y),
        }
    }

    /// Frame axis labels for `(up, right)`
    pub fn axis_labels(&self) -> (&'static str, &'static str) {
        match self {
            SectionKind::Front => ("Y", "Z"),
            SectionKind::Right => ("Z", "X"),
            SectionKind::Top => ("X", "Y"),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SectionKind::Front => "Front",
            SectionKind::Right => "Right",
            SectionKind::Top => "Top",
        }
    }
}

/// Cube-shaped cut region centred on the frame origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionBox {
    pub origin: DVec3,
    /// View direction, `up × right`
    pub basis_x: DVec3,
    /// Up
    pub basis_y: DVec3,
    /// Right
    pub basis_z: DVec3,
    /// Half-width along all three local axes
    pub half_extent: f64,
}

impl SectionBox {
    pub fn new(origin: DVec3, up: DVec3, right: DVec3, half_extent: f64) -> Self {
        Self {
            origin,
            basis_x: up.cross(right),
            basis_y: up,
            basis_z: right,
            half_extent,
        }
    }

    pub fn view_direction(&self) -> DVec3 {
        self.basis_x
    }

    /// Local min corner (`-h` on every axis)
    pub fn local_min(&self) -> DVec3 {
        DVec3::splat(-self.half_extent)
    }

    /// Local max corner (`+h` on every axis)
    pub fn local_max(&self) -> DVec3 {
        DVec3::splat(self.half_extent)
    }

    /// World-space point expressed in box coordinates
    pub fn to_local(&self, point: DVec3) -> DVec3 {
        let d = point - self.origin;
        DVec3::new(d.dot(self.basis_x), d.dot(self.basis_y), d.dot(self.basis_z))
    }

    /// True if the world point lies inside the box (boundary included)
    pub fn contains(&self, point: DVec3) -> bool {
        let local = self.to_local(point);
        local.abs().max_element() <= self.half_extent
    }

    /// Face of the box facing the viewer, perpendicular to the view direction
    pub fn cut_plane(&self) -> CutPlane {
        CutPlane {
            point: self.origin - self.basis_x * self.half_extent,
            normal: self.basis_x,
            up: self.basis_y,
            right: self.basis_z,
            half_size: self.half_extent,
        }
    }
}

/// Square cut plane of a section box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutPlane {
    /// Centre of the face
    pub point: DVec3,
    /// Equal to the view direction
    pub normal: DVec3,
    pub up: DVec3,
    pub right: DVec3,
    pub half_size: f64,
}

impl CutPlane {
    /// Signed distance of a point from the plane, positive on the viewing side
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        (point - self.point).dot(self.normal)
    }

    /// The four corners, counter-clockwise when seen against the normal
    pub fn corners(&self) -> [DVec3; 4] {
        let u = self.up * self.half_size;
        let r = self.right * self.half_size;
        [
            self.point - r - u,
            self.point + r - u,
            self.point + r + u,
            self.point - r + u,
        ]
    }
}

/// Text annotation placed in a section to show its orientation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub label: String,
    pub position: DVec3,
    /// Text rotation in radians (cosmetic)
    pub rotation: f64,
}

/// Geometry of a section view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionView {
    pub kind: SectionKind,
    pub section_box: SectionBox,
    pub cut_plane: CutPlane,
    /// Origin, up-axis and right-axis markers, in that order
    pub markers: [Marker; 3],
}

/// Orientation markers for a section: "O" at the origin plus one label per axis
pub fn orientation_markers(
    frame: &Frame,
    up: DVec3,
    right: DVec3,
    labels: (&str, &str),
) -> [Marker; 3] {
    let offset = frame.half_extent * MARKER_OFFSET_RATIO;
    // Best effort only, nothing downstream reads the rotation
    let rotation = DVec3::X.angle_between(right);
    [
        Marker {
            label: "O".to_string(),
            position: frame.origin,
            rotation,
        },
        Marker {
            label: labels.0.to_string(),
            position: frame.origin + up * offset,
            rotation,
        },
        Marker {
            label: labels.1.to_string(),
            position: frame.origin + right * offset,
            rotation,
        },
    ]
}

/// Build a section view aligned to two axes of the frame
pub fn build_section(frame: &Frame, kind: SectionKind, name: impl Into<String>) -> ViewSpec {
    let (up, right) = kind.axes(frame);
    let section_box = SectionBox::new(frame.origin, up, right, frame.half_extent);
    let view = SectionView {
        kind,
        section_box,
        cut_plane: section_box.cut_plane(),
        markers: orientation_markers(frame, up, right, kind.axis_labels()),
    };
    ViewSpec::new(name, ViewKind::Section(view), SECTION_SCALE)
}
