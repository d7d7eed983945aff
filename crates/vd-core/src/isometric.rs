//! Fixed-angle isometric view
//!
//! Unlike the section views, the camera does not follow the part frame:
//! every part is drawn from the same azimuth and tilt.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::{ISOMETRIC_AZIMUTH_DEG, ISOMETRIC_SCALE, ISOMETRIC_TILT_DEG};
use crate::units::spherical_to_unit;
use crate::view::{ViewKind, ViewSpec};

/// Orientation of a 3D view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsometricCamera {
    pub eye: DVec3,
    /// Unit viewing direction
    pub forward: DVec3,
    /// Unit up vector, perpendicular to `forward`
    pub up: DVec3,
}

impl IsometricCamera {
    /// Camera at `eye` looking along the standard isometric direction
    pub fn standard(eye: DVec3) -> Self {
        Self::from_angles(eye, ISOMETRIC_AZIMUTH_DEG, ISOMETRIC_TILT_DEG)
    }

    /// Camera from a horizontal azimuth and vertical tilt in degrees
    pub fn from_angles(eye: DVec3, azimuth_deg: f64, tilt_deg: f64) -> Self {
        Self {
            eye,
            forward: spherical_to_unit(azimuth_deg, tilt_deg),
            up: spherical_to_unit(azimuth_deg, tilt_deg + 90.0),
        }
    }

    /// Completes the right-handed camera basis
    pub fn right(&self) -> DVec3 {
        self.forward.cross(self.up)
    }
}

/// Build the isometric view for a part centred at `eye`
pub fn build_isometric(eye: DVec3, name: impl Into<String>) -> ViewSpec {
    ViewSpec::new(
        name,
        ViewKind::Isometric(IsometricCamera::standard(eye)),
        ISOMETRIC_SCALE,
    )
}
