use serde::{Deserialize, Serialize};

use crate::curve::Polyline;
use crate::plane::Plane;
use crate::vector::Vec3;

/// A planar region bounded by one or more closed contours.
///
/// An annular region (a tube cross-section) carries two contours; a plain
/// disc carries one. Contour order is not significant — consumers pick the
/// outer contour geometrically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub plane: Plane,
    pub contours: Vec<Polyline>,
}

impl Region {
    pub fn new(plane: Plane, contours: Vec<Polyline>) -> Self {
        Self { plane, contours }
    }

    pub fn single(plane: Plane, contour: Polyline) -> Self {
        Self::new(plane, vec![contour])
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            plane: self.plane.translated(offset),
            contours: self.contours.iter().map(|c| c.translated(offset)).collect(),
        }
    }

    /// The contour reaching farthest from the region plane's origin.
    pub fn outer_contour(&self) -> &Polyline {
        self.contours
            .iter()
            .max_by(|a, b| {
                let da = max_distance_from_origin(a, &self.plane);
                let db = max_distance_from_origin(b, &self.plane);
                da.partial_cmp(&db).expect("contour distances are finite")
            })
            .expect("region has no contours")
    }
}

fn max_distance_from_origin(contour: &Polyline, plane: &Plane) -> f64 {
    let origin = plane.origin();
    contour
        .points
        .iter()
        .map(|p| p.distance_to(&origin))
        .fold(0.0, f64::max)
}
