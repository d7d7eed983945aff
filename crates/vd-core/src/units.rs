//! Tolerance-aware comparisons and unit conversion
//!
//! Every geometric check in the crate goes through [`Tolerance`] instead of
//! exact float equality. Lengths are stored in feet and converted to
//! millimetres only for display.

use std::cmp::Ordering;

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::constants::{EPSILON, FEET_TO_MM};

/// Absolute comparison tolerance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance(pub f64);

impl Default for Tolerance {
    fn default() -> Self {
        Self(EPSILON)
    }
}

impl Tolerance {
    /// Create a tolerance, clamping negative input to zero
    pub fn new(value: f64) -> Self {
        Self(value.max(0.0))
    }

    /// The raw tolerance value
    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self, a: f64) -> bool {
        a.abs() <= self.0
    }

    pub fn is_equal(&self, a: f64, b: f64) -> bool {
        self.is_zero(a - b)
    }

    /// Three-way comparison where values within tolerance compare equal
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        if self.is_equal(a, b) {
            Ordering::Equal
        } else if a < b {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    pub fn vec_is_equal(&self, a: DVec3, b: DVec3) -> bool {
        self.vec_compare(a, b) == Ordering::Equal
    }

    /// Componentwise comparison, deciding on the first axis (x, y, z) that differs
    pub fn vec_compare(&self, a: DVec3, b: DVec3) -> Ordering {
        self.compare(a.x, b.x)
            .then_with(|| self.compare(a.y, b.y))
            .then_with(|| self.compare(a.z, b.z))
    }

    /// Check that three axes are unit length and mutually perpendicular
    pub fn is_orthonormal(&self, x: DVec3, y: DVec3, z: DVec3) -> bool {
        self.is_equal(x.length(), 1.0)
            && self.is_equal(y.length(), 1.0)
            && self.is_equal(z.length(), 1.0)
            && self.is_zero(x.dot(y))
            && self.is_zero(y.dot(z))
            && self.is_zero(z.dot(x))
    }
}

pub fn is_zero(a: f64) -> bool {
    Tolerance::default().is_zero(a)
}

pub fn is_equal(a: f64, b: f64) -> bool {
    Tolerance::default().is_equal(a, b)
}

pub fn compare(a: f64, b: f64) -> Ordering {
    Tolerance::default().compare(a, b)
}

pub fn vec_is_equal(a: DVec3, b: DVec3) -> bool {
    Tolerance::default().vec_is_equal(a, b)
}

pub fn vec_compare(a: DVec3, b: DVec3) -> Ordering {
    Tolerance::default().vec_compare(a, b)
}

/// Determinant of the 3x3 matrix whose columns are `x`, `y`, `z`
pub fn determinant(x: DVec3, y: DVec3, z: DVec3) -> f64 {
    DMat3::from_cols(x, y, z).determinant()
}

pub fn feet_to_mm(feet: f64) -> f64 {
    feet * FEET_TO_MM
}

pub fn mm_to_feet(mm: f64) -> f64 {
    mm / FEET_TO_MM
}

/// Round to the nearest integer, ties away from zero
pub fn round_half_away(value: f64) -> i64 {
    value.round() as i64
}

/// Format a length given in feet as whole millimetres, e.g. `"1219 mm"`
pub fn format_length(feet: f64) -> String {
    format!("{} mm", round_half_away(feet_to_mm(feet)))
}

/// Format an angle given in radians as degrees with two decimals
pub fn format_angle(radians: f64) -> String {
    format!("{:.2}°", radians.to_degrees())
}

/// Unit vector for a horizontal azimuth and a vertical tilt, both in degrees
pub fn spherical_to_unit(azimuth_deg: f64, tilt_deg: f64) -> DVec3 {
    let az = azimuth_deg.to_radians();
    let tilt = tilt_deg.to_radians();
    DVec3::new(tilt.cos() * az.cos(), tilt.cos() * az.sin(), tilt.sin())
}
