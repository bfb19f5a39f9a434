//! Internal geometry model of the mock kernel.
//!
//! Every surface is one of a handful of analytic shapes, rich enough to
//! answer the queries the nozzle pipeline makes (sectioning, intersection,
//! closest point) without carrying a real b-rep.

use vessel_types::{BoundingBox, Plane, Point3d, Polyline, Vec3};

use crate::types::{SurfaceHandle, SurfaceKind};

#[derive(Debug, Clone)]
pub(crate) enum SurfaceGeom {
    Plane {
        plane: Plane,
        bounds: BoundingBox,
    },
    Cylinder {
        origin: Point3d,
        axis: Vec3,
        radius: f64,
        length: f64,
    },
    Sphere {
        center: Point3d,
        radius: f64,
        bounds: BoundingBox,
    },
    /// Side wall of a generic (non-circular) extrusion.
    Swept {
        profile: Polyline,
        direction: Vec3,
        length: f64,
    },
    /// Fillet strip bounded by two rail curves.
    Band {
        lower: Polyline,
        upper: Polyline,
    },
    /// General surface of revolution about `axis` through `origin`.
    Revolved {
        profile: Polyline,
        axis: Vec3,
        origin: Point3d,
    },
}

impl SurfaceGeom {
    pub(crate) fn kind(&self) -> SurfaceKind {
        match self {
            SurfaceGeom::Plane { .. } => SurfaceKind::Planar,
            SurfaceGeom::Cylinder { .. } => SurfaceKind::Cylindrical,
            SurfaceGeom::Sphere { .. } => SurfaceKind::Spherical,
            SurfaceGeom::Swept { .. } => SurfaceKind::Extruded,
            SurfaceGeom::Band { .. } => SurfaceKind::Fillet,
            SurfaceGeom::Revolved { .. } => SurfaceKind::Revolved,
        }
    }

    pub(crate) fn bounding_box(&self) -> BoundingBox {
        match self {
            SurfaceGeom::Plane { bounds, .. } | SurfaceGeom::Sphere { bounds, .. } => *bounds,
            SurfaceGeom::Cylinder {
                origin,
                axis,
                radius,
                length,
            } => {
                let mut bb = BoundingBox::empty();
                let (u, v) = axis_frame(*axis);
                for station in [0.0, *length] {
                    let c = *origin + *axis * station;
                    for (su, sv) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
                        bb.expand(&(c + u * (su * radius) + v * (sv * radius)));
                    }
                }
                bb
            }
            SurfaceGeom::Swept {
                profile,
                direction,
                length,
            } => {
                let mut bb = BoundingBox::from_points(&profile.points);
                for p in &profile.points {
                    bb.expand(&(*p + *direction * *length));
                }
                bb
            }
            SurfaceGeom::Band { lower, upper } => {
                let mut bb = BoundingBox::from_points(&lower.points);
                for p in &upper.points {
                    bb.expand(p);
                }
                bb
            }
            SurfaceGeom::Revolved {
                profile,
                axis,
                origin,
            } => revolved_bounds(&profile.points, *axis, *origin),
        }
    }
}

/// Box containing the full revolution of `points` around `axis`.
pub(crate) fn revolved_bounds(points: &[Point3d], axis: Vec3, origin: Point3d) -> BoundingBox {
    let (u, v) = axis_frame(axis);
    let mut bb = BoundingBox::empty();
    for p in points {
        let w = *p - origin;
        let h = w.dot(&axis);
        let radial = (w - axis * h).length();
        let c = origin + axis * h;
        for (su, sv) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
            bb.expand(&(c + u * (su * radial) + v * (sv * radial)));
        }
    }
    bb
}

/// Two unit vectors completing `axis` to an orthonormal frame.
pub(crate) fn axis_frame(axis: Vec3) -> (Vec3, Vec3) {
    let u = axis.any_perpendicular();
    let v = axis.cross(&u).normalize();
    (u, v)
}

/// What the mock remembers a solid to be, beyond its surface list.
#[derive(Debug, Clone)]
pub(crate) enum ShapeInfo {
    /// Circular extrusion, possibly annular. `inner_radius` is zero for a
    /// plain disc extrusion.
    Tube {
        inner_radius: f64,
        outer_radius: f64,
        length: f64,
    },
    /// Thin revolved or lofted shell without meaningful volume.
    Shell,
    Generic,
}

/// Record of one prismatic cut, kept so tests can check hole placement.
#[derive(Debug, Clone)]
pub struct CutRecord {
    pub origin: Point3d,
    pub direction: Vec3,
    pub radius: f64,
    pub length: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct MockSolid {
    pub surfaces: Vec<SurfaceHandle>,
    pub bounds: BoundingBox,
    pub volume: f64,
    pub closed: bool,
    pub shape: ShapeInfo,
    pub cuts: Vec<CutRecord>,
    /// Ids of tool solids subtracted from this body.
    pub trims: Vec<u64>,
    pub repaired: bool,
    pub normals_flipped: bool,
}

impl MockSolid {
    pub(crate) fn new(surfaces: Vec<SurfaceHandle>, bounds: BoundingBox, volume: f64) -> Self {
        Self {
            surfaces,
            bounds,
            volume,
            closed: true,
            shape: ShapeInfo::Generic,
            cuts: Vec::new(),
            trims: Vec::new(),
            repaired: false,
            normals_flipped: false,
        }
    }
}
