//! Wall-offset tool bodies.
//!
//! The pad blank is extruded oversize and then trimmed between two
//! surfaces of revolution rebuilt from the shell wall itself: the outer
//! wall as-is for the seat, and the wall pushed outward by the pad
//! thickness for the cap. Rebuilding the wall from its own meridian
//! section keeps the tools exact for any wall of revolution, not just
//! cylindrical courses.

use std::f64::consts::TAU;

use tracing::{debug, instrument};
use vessel_types::{Plane, Point3d, Polyline, Vec3, MERGE_TOLERANCE};

use geom_kernel::{connect_curves, SolidHandle, SurfaceHandle};

use crate::rank;
use crate::types::{BuildError, KernelBundle};

/// Meridian curve of the outer pierced wall in the XZ half-plane,
/// clipped to the positive-x half when the section crosses the axis.
fn outer_meridian(
    kb: &mut dyn KernelBundle,
    walls: &[SurfaceHandle],
    rel_origin: Point3d,
) -> Result<Polyline, BuildError> {
    let outer = rank::farthest_surface_from(kb.as_probe(), walls, rel_origin)?.ok_or_else(
        || BuildError::DegenerateIntersection {
            reason: "no pierced wall to rebuild an offset from".into(),
        },
    )?;

    let sections = kb.section_surface(outer, &Plane::xz(), MERGE_TOLERANCE)?;
    let mut chains = connect_curves(&sections, MERGE_TOLERANCE);
    if chains.is_empty() {
        return Err(BuildError::DegenerateIntersection {
            reason: "outer wall has no meridian section".into(),
        });
    }
    // Farthest chain from the axis first; ties broken toward positive x
    // so the kept meridian is deterministic.
    chains.sort_by(|a, b| {
        let da = a.start_point().distance_to(&Point3d::ORIGIN);
        let db = b.start_point().distance_to(&Point3d::ORIGIN);
        db.total_cmp(&da)
            .then(b.start_point().x.total_cmp(&a.start_point().x))
    });
    let flat = chains
        .iter()
        .any(|c| c.lies_in_plane(&Plane::xy(), MERGE_TOLERANCE));
    let mut meridian = if flat {
        chains.pop()
    } else {
        chains.drain(..1).next()
    }
    .ok_or_else(|| BuildError::DegenerateIntersection {
        reason: "outer wall has no meridian section".into(),
    })?;

    // A meridian crossing the axis revolves into a doubled surface; keep
    // the half the attachment is on.
    let start_x = meridian.start_point().x;
    let end_x = meridian.end_point().x;
    if start_x * end_x < 0.0 {
        meridian = meridian.clipped_to_length(meridian.length() / 2.0);
    }
    Ok(meridian)
}

/// Build a revolved tool surface from the pierced outer wall, offset
/// outward by `thickness`. Zero thickness rebuilds the wall in place.
/// `flip` turns the tool's normals inward after the revolve.
#[instrument(skip(kb, walls), fields(thickness, flip))]
pub fn build_offset_shell(
    kb: &mut dyn KernelBundle,
    walls: &[SurfaceHandle],
    rel_origin: Point3d,
    thickness: f64,
    flip: bool,
) -> Result<SolidHandle, BuildError> {
    if !thickness.is_finite() {
        return Err(BuildError::invalid("offset thickness must be finite"));
    }

    let meridian = outer_meridian(kb, walls, rel_origin)?;
    let flat = meridian.lies_in_plane(&Plane::xy(), MERGE_TOLERANCE);

    let profile = if thickness == 0.0 {
        meridian
    } else if flat {
        meridian.translated(Vec3::Z * thickness)
    } else {
        // Section normal pointing so positive offsets move off the axis.
        let outward_normal = if meridian.max_coord_along(&Vec3::X) >= 0.0 {
            -Vec3::Y
        } else {
            Vec3::Y
        };
        kb.offset_curve(&meridian, thickness, outward_normal, MERGE_TOLERANCE)?
    };

    let mut tool = kb.revolve_curve(&profile, 0.0, TAU, Vec3::Z, Point3d::ORIGIN, MERGE_TOLERANCE)?;
    if flip && !flat {
        tool = kb.flip_normals(&tool)?;
    }
    debug!(flat, "offset tool revolved");
    Ok(tool)
}
