//! Shared geometry value types for the nozzle-attachment pipeline.
//!
//! Everything here is a plain immutable value: deriving a new plane by
//! translating or flipping returns a fresh value instead of mutating shared
//! state, so no two pipeline stages can alias each other's geometry.

pub mod bbox;
pub mod curve;
pub mod plane;
pub mod point;
pub mod region;
pub mod vector;

pub use bbox::BoundingBox;
pub use curve::Polyline;
pub use plane::Plane;
pub use point::Point3d;
pub use region::Region;
pub use vector::Vec3;

use serde::{Deserialize, Serialize};

/// Tolerance used when merging curve fragments and comparing coordinates.
pub const MERGE_TOLERANCE: f64 = 1e-4;

/// Looser tolerance used when reconnecting chamfer leftovers into weld loops.
pub const LOOSE_TOLERANCE: f64 = 0.1;

/// Which in-plane axis of the flush plane carries the lateral ("hillside")
/// offset of the neck. The two variants correspond to the two orthogonal
/// symmetry planes a case can be laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymmetryAxis {
    /// Hillside offset along the flush plane's X axis; loops and surfaces
    /// are ranked by their Z extent (case symmetric about the XY plane).
    X,
    /// Hillside offset along the flush plane's Y axis; loops and surfaces
    /// are ranked by their X extent.
    Y,
}

impl SymmetryAxis {
    /// Direction of the lateral neck offset in the given flush plane.
    pub fn lateral_direction(&self, flush: &Plane) -> Vec3 {
        match self {
            SymmetryAxis::X => flush.axis_x(),
            SymmetryAxis::Y => flush.axis_y(),
        }
    }

    /// Global axis used to rank intersection loops. The outer loop of a
    /// thick-walled neck always reaches further along this axis than the
    /// inner one, which is what makes the ranking deterministic.
    pub fn rank_direction(&self) -> Vec3 {
        match self {
            SymmetryAxis::X => Vec3::Z,
            SymmetryAxis::Y => Vec3::X,
        }
    }
}
