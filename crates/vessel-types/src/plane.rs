use serde::{Deserialize, Serialize};

use crate::point::Point3d;
use crate::vector::Vec3;

/// An oriented plane: origin, unit normal, and a right-handed in-plane frame.
///
/// Planes are immutable values. Deriving a translated or flipped plane
/// returns a new value, so a plane handed to one pipeline stage can never be
/// mutated out from under another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    origin: Point3d,
    normal: Vec3,
    x_axis: Vec3,
    y_axis: Vec3,
}

impl Plane {
    /// Build a plane from origin and normal, deriving a stable in-plane frame.
    pub fn new(origin: Point3d, normal: Vec3) -> Self {
        let normal = normal.normalize();
        let x_axis = normal.any_perpendicular();
        let y_axis = normal.cross(&x_axis);
        Self {
            origin,
            normal,
            x_axis,
            y_axis,
        }
    }

    /// Build a plane with an explicit in-plane X axis.
    pub fn with_axes(origin: Point3d, normal: Vec3, x_axis: Vec3) -> Self {
        let normal = normal.normalize();
        let x_axis = x_axis.normalize();
        let y_axis = normal.cross(&x_axis);
        Self {
            origin,
            normal,
            x_axis,
            y_axis,
        }
    }

    pub fn xy() -> Self {
        Self::with_axes(Point3d::ORIGIN, Vec3::Z, Vec3::X)
    }

    pub fn xz() -> Self {
        Self::with_axes(Point3d::ORIGIN, -Vec3::Y, Vec3::X)
    }

    pub fn yz() -> Self {
        Self::with_axes(Point3d::ORIGIN, Vec3::X, Vec3::Y)
    }

    pub fn origin(&self) -> Point3d {
        self.origin
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn axis_x(&self) -> Vec3 {
        self.x_axis
    }

    pub fn axis_y(&self) -> Vec3 {
        self.y_axis
    }

    /// The plane moved by an offset vector; orientation is unchanged.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            origin: self.origin + offset,
            ..*self
        }
    }

    /// The plane with its normal reversed. The in-plane X axis is kept and
    /// the Y axis recomputed so the frame stays right-handed.
    pub fn flipped(&self) -> Self {
        let normal = -self.normal;
        let y_axis = normal.cross(&self.x_axis);
        Self {
            origin: self.origin,
            normal,
            x_axis: self.x_axis,
            y_axis,
        }
    }

    /// Signed distance from a point to the plane, positive on the normal side.
    pub fn signed_distance(&self, p: &Point3d) -> f64 {
        (*p - self.origin).dot(&self.normal)
    }

    /// Closest point on the plane.
    pub fn project_point(&self, p: &Point3d) -> Point3d {
        *p - self.normal * self.signed_distance(p)
    }

    pub fn contains_point(&self, p: &Point3d, tol: f64) -> bool {
        self.signed_distance(p).abs() <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_right_handed() {
        let p = Plane::new(Point3d::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 2.0));
        assert!((p.axis_x().cross(&p.axis_y()) - p.normal()).length() < 1e-12);
    }

    #[test]
    fn flipped_reverses_normal_but_stays_right_handed() {
        let p = Plane::new(Point3d::ORIGIN, Vec3::X);
        let f = p.flipped();
        assert!((f.normal() + p.normal()).length() < 1e-12);
        assert!((f.axis_x().cross(&f.axis_y()) - f.normal()).length() < 1e-12);
    }

    #[test]
    fn translated_moves_origin_only() {
        let p = Plane::new(Point3d::ORIGIN, Vec3::Z);
        let t = p.translated(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(t.origin(), Point3d::new(0.0, 0.0, 5.0));
        assert_eq!(t.normal(), p.normal());
    }

    #[test]
    fn projection_lands_on_plane() {
        let p = Plane::new(Point3d::new(0.0, 0.0, 2.0), Vec3::Z);
        let q = p.project_point(&Point3d::new(3.0, 4.0, 9.0));
        assert_eq!(q, Point3d::new(3.0, 4.0, 2.0));
        assert!(p.contains_point(&q, 1e-12));
    }
}
