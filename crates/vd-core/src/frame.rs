//! Local part frame resolution
//!
//! A part's frame is derived from its axis-aligned bounding volume and,
//! when the part has one, the transform of its primary connector. The
//! connector basis is adopted with its Y and Z axes negated so that the
//! frame's Z axis points into the part.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::{Tolerance, determinant};

/// Which basis a consistency check was run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasisStage {
    /// The connector basis as supplied by the host
    Connector,
    /// The basis after the fixed Y/Z flip
    Flipped,
}

impl std::fmt::Display for BasisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasisStage::Connector => write!(f, "connector basis"),
            BasisStage::Flipped => write!(f, "flipped basis"),
        }
    }
}

/// Geometry consistency errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Bounding volume is not finite or has min > max")]
    InvalidBounds,

    #[error("Bounding volume has zero extent")]
    DegenerateBounds,

    #[error("{stage} is not orthonormal")]
    NotOrthonormal { stage: BasisStage },

    #[error("{stage} is not right-handed (determinant {determinant})")]
    NotRightHanded { stage: BasisStage, determinant: f64 },
}

/// Result type for geometry operations
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Axis-aligned bounding volume of a part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingVolume {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl BoundingVolume {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Componentwise midpoint of the two corners
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents along each world axis
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Euclidean length of the min-max diagonal
    pub fn diagonal(&self) -> f64 {
        self.size().length()
    }

    /// True if both corners are finite and min <= max on every axis
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }
}

/// Local-to-world transform of a part's primary connector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectorTransform {
    pub origin: DVec3,
    pub basis_x: DVec3,
    pub basis_y: DVec3,
    pub basis_z: DVec3,
}

impl ConnectorTransform {
    pub fn new(origin: DVec3, basis_x: DVec3, basis_y: DVec3, basis_z: DVec3) -> Self {
        Self {
            origin,
            basis_x,
            basis_y,
            basis_z,
        }
    }

    /// Build a connector from an origin and a rotation matrix (columns are the axes)
    pub fn from_rotation(origin: DVec3, rotation: DMat3) -> Self {
        Self::new(origin, rotation.x_axis, rotation.y_axis, rotation.z_axis)
    }
}

impl Default for ConnectorTransform {
    fn default() -> Self {
        Self::new(DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z)
    }
}

/// A part's local orthonormal right-handed frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Centre of the part's bounding volume
    pub origin: DVec3,
    /// Half the bounding volume diagonal
    pub half_extent: f64,
    pub basis_x: DVec3,
    pub basis_y: DVec3,
    pub basis_z: DVec3,
}

impl Frame {
    /// World-aligned frame
    pub fn world(origin: DVec3, half_extent: f64) -> Self {
        Self {
            origin,
            half_extent,
            basis_x: DVec3::X,
            basis_y: DVec3::Y,
            basis_z: DVec3::Z,
        }
    }

    /// Basis as a matrix with the axes as columns
    pub fn matrix(&self) -> DMat3 {
        DMat3::from_cols(self.basis_x, self.basis_y, self.basis_z)
    }

    pub fn determinant(&self) -> f64 {
        determinant(self.basis_x, self.basis_y, self.basis_z)
    }

    /// Express a world point in frame coordinates
    pub fn world_to_local(&self, point: DVec3) -> DVec3 {
        // Orthonormal basis: the inverse is the transpose
        self.matrix().transpose() * (point - self.origin)
    }

    /// Map a point in frame coordinates to world space
    pub fn local_to_world(&self, point: DVec3) -> DVec3 {
        self.origin + self.matrix() * point
    }
}

/// Resolve the local frame of a part
///
/// # Arguments
/// * `bounds` - The part's axis-aligned bounding volume
/// * `connector` - Primary connector transform, if the part has one
/// * `tol` - Tolerance for the orthonormality and determinant checks
pub fn resolve_frame(
    bounds: &BoundingVolume,
    connector: Option<&ConnectorTransform>,
    tol: Tolerance,
) -> GeometryResult<Frame> {
    if !bounds.is_valid() {
        return Err(GeometryError::InvalidBounds);
    }

    let diagonal = bounds.diagonal();
    let origin = bounds.center();
    // finite corners can still overflow once squared or summed
    if !diagonal.is_finite() || !origin.is_finite() {
        return Err(GeometryError::InvalidBounds);
    }
    if tol.is_zero(diagonal) {
        return Err(GeometryError::DegenerateBounds);
    }

    let half_extent = diagonal * 0.5;

    let Some(connector) = connector else {
        return Ok(Frame::world(origin, half_extent));
    };

    check_basis(
        connector.basis_x,
        connector.basis_y,
        connector.basis_z,
        BasisStage::Connector,
        tol,
    )?;

    // Fixed sign convention: negate Y and Z so Z points into the part
    let basis_x = connector.basis_x;
    let basis_y = -connector.basis_y;
    let basis_z = -connector.basis_z;

    check_basis(basis_x, basis_y, basis_z, BasisStage::Flipped, tol)?;

    tracing::debug!(
        "Resolved frame at {:?} (half extent {}) with basis {:?} {:?} {:?}",
        origin,
        half_extent,
        basis_x,
        basis_y,
        basis_z
    );

    Ok(Frame {
        origin,
        half_extent,
        basis_x,
        basis_y,
        basis_z,
    })
}

fn check_basis(
    x: DVec3,
    y: DVec3,
    z: DVec3,
    stage: BasisStage,
    tol: Tolerance,
) -> GeometryResult<()> {
    if !tol.is_orthonormal(x, y, z) {
        return Err(GeometryError::NotOrthonormal { stage });
    }
    let det = determinant(x, y, z);
    if !tol.is_equal(det, 1.0) {
        return Err(GeometryError::NotRightHanded {
            stage,
            determinant: det,
        });
    }
    Ok(())
}
