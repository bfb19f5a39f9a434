//! Attachment frame derivation.
//!
//! The nozzle is located by a reference point on the shell wall plus two
//! spherical-style angles. From those this module derives the flush plane
//! (tangent to the wall at the reference point) and the extrude plane the
//! neck profile is drawn on, pushed out along the attachment normal and
//! turned to face back at the vessel.

use serde::{Deserialize, Serialize};
use vessel_types::{Plane, Point3d, Vec3};

use crate::types::BuildError;

/// How the two attachment angles map to a direction vector. Both styles
/// appear in vessel drawings; they differ in whether `beta` is measured
/// from the axis (polar) or from the equatorial plane (elevation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalConvention {
    Polar,
    Elevation,
}

impl NormalConvention {
    pub fn attachment_normal(&self, theta: f64, beta: f64) -> Vec3 {
        match self {
            NormalConvention::Polar => Vec3::new(
                theta.cos() * beta.sin(),
                theta.sin() * beta.sin(),
                beta.cos(),
            ),
            NormalConvention::Elevation => Vec3::new(
                theta.cos() * beta.cos(),
                theta.sin() * beta.cos(),
                beta.sin(),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttachmentFrame {
    /// Tangent plane at the reference point, normal pointing off the wall.
    pub flush: Plane,
    /// Profile plane for the neck, offset outward and flipped so its
    /// normal points back toward the vessel.
    pub extrude: Plane,
    /// Outward attachment direction.
    pub normal: Vec3,
}

pub fn derive_attachment_frame(
    reference: Point3d,
    theta: f64,
    beta: f64,
    convention: NormalConvention,
    extrude_offset: f64,
) -> Result<AttachmentFrame, BuildError> {
    if !theta.is_finite() || !beta.is_finite() {
        return Err(BuildError::invalid("attachment angles must be finite"));
    }
    if !extrude_offset.is_finite() || extrude_offset < 0.0 {
        return Err(BuildError::invalid(format!(
            "extrude offset {extrude_offset} must be finite and non-negative"
        )));
    }
    let normal = convention.attachment_normal(theta, beta);
    let flush = Plane::new(reference, normal);
    let extrude = flush.translated(normal * extrude_offset).flipped();
    Ok(AttachmentFrame {
        flush,
        extrude,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn polar_side_attachment_points_along_x() {
        let n = NormalConvention::Polar.attachment_normal(0.0, FRAC_PI_2);
        assert_relative_eq!(n.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(n.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn polar_crown_attachment_points_up() {
        let n = NormalConvention::Polar.attachment_normal(0.0, 0.0);
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn elevation_convention_measures_from_the_equator() {
        let n = NormalConvention::Elevation.attachment_normal(0.0, 0.0);
        assert_relative_eq!(n.x, 1.0, epsilon = 1e-12);
        let up = NormalConvention::Elevation.attachment_normal(0.3, FRAC_PI_2);
        assert_relative_eq!(up.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn extrude_plane_faces_back_at_the_vessel() {
        let frame = derive_attachment_frame(
            Point3d::new(20.0, 0.0, 30.0),
            0.0,
            FRAC_PI_2,
            NormalConvention::Polar,
            8.0,
        )
        .unwrap();
        assert_relative_eq!(frame.extrude.origin().x, 28.0, epsilon = 1e-12);
        assert_relative_eq!(frame.extrude.normal().x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn crown_extrude_plane_faces_down() {
        let frame = derive_attachment_frame(
            Point3d::new(0.0, 0.0, 30.0),
            0.0,
            0.0,
            NormalConvention::Polar,
            8.0,
        )
        .unwrap();
        assert_relative_eq!(frame.extrude.origin().z, 38.0, epsilon = 1e-12);
        assert_relative_eq!(frame.extrude.normal().z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_non_finite_angles() {
        let err = derive_attachment_frame(
            Point3d::ORIGIN,
            f64::NAN,
            0.0,
            NormalConvention::Polar,
            1.0,
        );
        assert!(err.is_err());
    }
}
