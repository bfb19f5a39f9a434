//! Neck/shell intersection resolution.
//!
//! Where the neck tube pierces the vessel wall the kernel hands back raw
//! surface-surface fragments. This stage stitches them into closed loops,
//! ranks them, and derives everything downstream stages anchor on: the
//! cut loop on the inner wall, the orientation loop on the outer wall,
//! the revolve anchor for the offset-shell tools, and the local pad
//! normal probed off the wall itself.

use tracing::{debug, instrument};
use vessel_types::{Point3d, Polyline, SymmetryAxis, Vec3, MERGE_TOLERANCE};

use geom_kernel::{connect_curves, SolidHandle, SurfaceHandle};

use crate::rank;
use crate::types::{BuildError, KernelBundle};

/// Parameters the resolver needs beyond the two bodies.
#[derive(Debug, Clone)]
pub struct IntersectSpec {
    pub symmetry: SymmetryAxis,
    /// Whether centers keep their lateral component. Off-axis or rotated
    /// attachments do; a straight on-axis neck averages to zero and gets
    /// it pinned there.
    pub has_lateral: bool,
    /// Azimuth of the attachment, used for the fallback normal when only
    /// one loop survives.
    pub theta: f64,
}

/// A closed intersection loop together with the shell wall it lies on.
#[derive(Debug, Clone)]
pub struct WallLoop {
    pub curve: Polyline,
    pub wall: SurfaceHandle,
}

#[derive(Debug, Clone)]
pub struct IntersectionOutcome {
    /// Loop on the innermost pierced wall; the bore opens here.
    pub cut: WallLoop,
    /// Loop on the outermost pierced wall, present when the neck goes all
    /// the way through. The pad is oriented off this loop.
    pub orientation: Option<WallLoop>,
    /// Shell walls that produced intersection curves, outermost ranking
    /// left to the caller.
    pub walls: Vec<SurfaceHandle>,
    /// Anchor point the offset-shell stage measures wall depth from.
    pub rel_origin: Point3d,
    /// Center of the orientation loop, where the pad flush plane sits.
    pub pad_origin: Point3d,
    /// Local wall normal at the pad origin.
    pub pad_normal: Vec3,
    /// Whether the pad normal leaves the equatorial plane; steered necks
    /// flip their offset-shell tools.
    pub steep: bool,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Mean of samples taken every 1/69th of the curve length, rounded to
/// three decimals per component. Curves symmetric about a plane of the
/// case land their center exactly on it.
pub fn find_center(curve: &Polyline, has_lateral: bool) -> Point3d {
    let step = curve.length() / 69.0;
    let samples = curve.sample_by_length(step);
    if samples.is_empty() {
        return Point3d::ORIGIN;
    }
    let n = samples.len() as f64;
    let (mut sx, mut sy, mut sz) = (0.0, 0.0, 0.0);
    for p in &samples {
        sx += p.x;
        sy += p.y;
        sz += p.z;
    }
    let y = if has_lateral { round3(sy / n) } else { 0.0 };
    Point3d::new(round3(sx / n), y, round3(sz / n))
}

fn min_sampled_z(curve: &Polyline) -> f64 {
    let step = curve.length() / 69.0;
    curve
        .sample_by_length(step)
        .iter()
        .map(|p| p.z)
        .fold(f64::INFINITY, f64::min)
}

/// Fallback normal when the wall cannot be probed: straight along the
/// azimuth for a side attachment, straight up for a crown one.
fn analytic_normal(symmetry: SymmetryAxis, theta: f64) -> Vec3 {
    let elevation = match symmetry {
        SymmetryAxis::X => std::f64::consts::FRAC_PI_2,
        SymmetryAxis::Y => 0.0,
    };
    Vec3::new(
        theta.cos() * elevation.cos(),
        theta.sin() * elevation.cos(),
        elevation.sin(),
    )
}

/// A probed normal can come back pointing into the vessel when the
/// evaluation lands on the far side of the wall. The two axis-aligned
/// cases are detectable from the components alone.
fn orient_outward(normal: Vec3) -> Vec3 {
    let (x, y, z) = (normal.x, normal.y, normal.z);
    let axial_case = z < 0.0 && round3(x) == 0.0 && round3(y) == 0.0;
    let radial_case = x < 0.0 && round3(z) == 0.0 && round3(y) == 0.0;
    if axial_case || radial_case {
        -normal
    } else {
        normal
    }
}

#[instrument(skip(kb, shell, neck), fields(theta = spec.theta))]
pub fn resolve_intersections(
    kb: &mut dyn KernelBundle,
    shell: &SolidHandle,
    neck: &SolidHandle,
    spec: &IntersectSpec,
) -> Result<IntersectionOutcome, BuildError> {
    let neck_curved = rank::curved_surfaces(kb.as_probe(), neck)?;
    let neck_outer =
        rank::widest_surface(kb.as_probe(), &neck_curved)?.ok_or_else(|| {
            BuildError::DegenerateIntersection {
                reason: "neck has no curved surface to intersect".into(),
            }
        })?;

    // Significant shell surfaces only: planar faces never carry the
    // opening, and zero-extent slivers along the ranking axis cannot be
    // ordered.
    let rank_dir = spec.symmetry.rank_direction();
    let mut candidates = Vec::new();
    for wall in rank::curved_surfaces(kb.as_probe(), shell)? {
        let bb = kb.as_probe().surface_bounding_box(wall)?;
        let extent = (bb.max - bb.min).dot(&rank_dir).abs();
        if extent > MERGE_TOLERANCE {
            candidates.push(wall);
        }
    }

    let mut loops: Vec<WallLoop> = Vec::new();
    let mut walls: Vec<SurfaceHandle> = Vec::new();
    for wall in candidates {
        let fragments = kb.intersect_surfaces(neck_outer, wall, MERGE_TOLERANCE)?;
        if fragments.is_empty() {
            continue;
        }
        walls.push(wall);
        for curve in connect_curves(&fragments, MERGE_TOLERANCE) {
            if curve.closed {
                loops.push(WallLoop { curve, wall });
            }
        }
    }

    // Outermost loop first along the family's ranking axis. The cut loop
    // is the innermost one, the orientation loop the outermost.
    loops.sort_by(|a, b| {
        b.curve
            .max_coord_along(&rank_dir)
            .total_cmp(&a.curve.max_coord_along(&rank_dir))
    });
    debug!(loops = loops.len(), walls = walls.len(), "stitched intersection loops");

    let cut = loops.pop().ok_or_else(|| BuildError::DegenerateIntersection {
        reason: "neck does not pierce any shell wall".into(),
    })?;
    let orientation = loops.first().cloned();

    let cut_center = find_center(&cut.curve, spec.has_lateral);
    let rel_origin = match spec.symmetry {
        SymmetryAxis::X => Point3d::new(cut_center.x, cut_center.y, min_sampled_z(&cut.curve)),
        SymmetryAxis::Y => Point3d::new(0.0, 0.0, cut_center.z),
    };

    let (pad_origin, pad_normal) = match &orientation {
        Some(outer) => {
            let origin = find_center(&outer.curve, spec.has_lateral);
            let eval = kb.as_probe().closest_point_on_surface(outer.wall, origin)?;
            let normal = kb.as_probe().surface_normal_at(outer.wall, eval)?;
            (origin, normal)
        }
        None => (cut_center, analytic_normal(spec.symmetry, spec.theta)),
    };
    let steep = (pad_normal.angle_from_xy() * 100.0).round() != 0.0;
    let pad_normal = orient_outward(pad_normal);
    debug!(
        px = pad_origin.x,
        py = pad_origin.y,
        pz = pad_origin.z,
        steep,
        "pad frame resolved"
    );

    Ok(IntersectionOutcome {
        cut,
        orientation,
        walls,
        rel_origin,
        pad_origin,
        pad_normal,
        steep,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{derive_attachment_frame, AttachmentFrame, NormalConvention};
    use crate::neck::{build_neck, NeckSpec};
    use approx::assert_relative_eq;
    use geom_kernel::{GeometryKernel, MockKernel};
    use std::f64::consts::{FRAC_PI_2, TAU};
    use vessel_types::{Plane, Region};

    fn course_shell(kernel: &mut MockKernel) -> SolidHandle {
        let plane = Plane::xy();
        let wall = kernel.circle(&plane, Point3d::ORIGIN, 20.0).unwrap();
        let region = kernel.offset_curve_to_region(&wall, 1.0, 1e-4).unwrap();
        kernel.extrude(&region, 60.0).unwrap()
    }

    fn head_shell(kernel: &mut MockKernel) -> SolidHandle {
        let mut points = Vec::new();
        for i in 0..=32 {
            let phi = FRAC_PI_2 * i as f64 / 32.0;
            points.push(Point3d::new(31.0 * phi.cos(), 0.0, 31.0 * phi.sin()));
        }
        for i in (0..=32).rev() {
            let phi = FRAC_PI_2 * i as f64 / 32.0;
            points.push(Point3d::new(30.0 * phi.cos(), 0.0, 30.0 * phi.sin()));
        }
        let region = Region::single(Plane::xz(), Polyline::closed_loop(points));
        kernel
            .revolve(&region, 0.0, TAU, Vec3::Z, Point3d::ORIGIN, 1e-6)
            .unwrap()
    }

    fn side_frame() -> AttachmentFrame {
        derive_attachment_frame(
            Point3d::new(20.0, 0.0, 30.0),
            0.0,
            FRAC_PI_2,
            NormalConvention::Polar,
            8.0,
        )
        .unwrap()
    }

    fn side_neck(kernel: &mut MockKernel) -> SolidHandle {
        let spec = NeckSpec {
            radius: 1.0,
            thickness: 0.2,
            external: 7.0,
            internal: 2.0,
            shell_thickness: 1.0,
            hillside: 0.0,
            symmetry: SymmetryAxis::Y,
            repair: false,
        };
        build_neck(kernel, &side_frame(), &spec).unwrap().tube
    }

    fn side_spec() -> IntersectSpec {
        IntersectSpec {
            symmetry: SymmetryAxis::Y,
            has_lateral: false,
            theta: 0.0,
        }
    }

    #[test]
    fn side_attachment_yields_cut_inside_and_orientation_outside() {
        let mut kernel = MockKernel::new();
        let shell = course_shell(&mut kernel);
        let neck = side_neck(&mut kernel);
        let outcome = resolve_intersections(&mut kernel, &shell, &neck, &side_spec()).unwrap();

        let cut_reach = outcome.cut.curve.max_coord_along(&Vec3::X);
        assert_relative_eq!(cut_reach, 20.0, epsilon = 0.05);
        let orientation = outcome.orientation.expect("neck goes through the wall");
        let outer_reach = orientation.curve.max_coord_along(&Vec3::X);
        assert_relative_eq!(outer_reach, 21.0, epsilon = 0.05);
        assert_eq!(outcome.walls.len(), 2);
    }

    #[test]
    fn side_attachment_pad_normal_is_radial() {
        let mut kernel = MockKernel::new();
        let shell = course_shell(&mut kernel);
        let neck = side_neck(&mut kernel);
        let outcome = resolve_intersections(&mut kernel, &shell, &neck, &side_spec()).unwrap();

        assert_relative_eq!(outcome.pad_normal.x, 1.0, epsilon = 1e-3);
        assert_relative_eq!(outcome.pad_normal.y, 0.0, epsilon = 1e-3);
        assert!(!outcome.steep);
        assert!(outcome.pad_origin.x > 20.9 && outcome.pad_origin.x < 21.0);
        assert_relative_eq!(outcome.pad_origin.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(outcome.pad_origin.z, 30.0, epsilon = 1e-3);
        // revolve anchor sits on the vessel axis at the attachment height
        assert_relative_eq!(outcome.rel_origin.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(outcome.rel_origin.z, 30.0, epsilon = 1e-3);
    }

    #[test]
    fn crown_attachment_probes_a_vertical_normal() {
        let mut kernel = MockKernel::new();
        let shell = head_shell(&mut kernel);
        let frame = derive_attachment_frame(
            Point3d::new(0.0, 0.0, 30.0),
            0.0,
            0.0,
            NormalConvention::Polar,
            8.0,
        )
        .unwrap();
        let spec = NeckSpec {
            radius: 2.0,
            thickness: 0.5,
            external: 7.0,
            internal: 2.0,
            shell_thickness: 1.0,
            hillside: 0.0,
            symmetry: SymmetryAxis::X,
            repair: false,
        };
        let neck = build_neck(&mut kernel, &frame, &spec).unwrap().tube;
        let ispec = IntersectSpec {
            symmetry: SymmetryAxis::X,
            has_lateral: false,
            theta: 0.0,
        };
        let outcome = resolve_intersections(&mut kernel, &shell, &neck, &ispec).unwrap();

        assert_relative_eq!(outcome.pad_normal.z, 1.0, epsilon = 1e-3);
        assert!(outcome.steep);
        // inner wall r=30 pierced at z = sqrt(900 - 6.25)
        let expect_z = (900.0f64 - 6.25).sqrt();
        assert_relative_eq!(outcome.rel_origin.z, expect_z, epsilon = 0.01);
        assert_relative_eq!(outcome.rel_origin.x, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn single_wall_falls_back_to_the_analytic_normal() {
        let mut kernel = MockKernel::new();
        // solid course, one barrel only: the neck opens a single loop
        let plane = Plane::xy();
        let wall = kernel.circle(&plane, Point3d::ORIGIN, 20.0).unwrap();
        let region = Region::single(plane, wall);
        let shell = kernel.extrude(&region, 60.0).unwrap();
        let neck = side_neck(&mut kernel);
        let outcome = resolve_intersections(&mut kernel, &shell, &neck, &side_spec()).unwrap();

        assert!(outcome.orientation.is_none());
        assert_relative_eq!(outcome.pad_normal.x, 1.0, epsilon = 1e-12);
        assert!(!outcome.steep);
    }

    #[test]
    fn missed_shell_is_a_degenerate_intersection() {
        let mut kernel = MockKernel::new();
        let shell = course_shell(&mut kernel);
        let frame = derive_attachment_frame(
            Point3d::new(20.0, 0.0, 200.0),
            0.0,
            FRAC_PI_2,
            NormalConvention::Polar,
            8.0,
        )
        .unwrap();
        let spec = NeckSpec {
            radius: 1.0,
            thickness: 0.2,
            external: 7.0,
            internal: 2.0,
            shell_thickness: 1.0,
            hillside: 0.0,
            symmetry: SymmetryAxis::Y,
            repair: false,
        };
        let neck = build_neck(&mut kernel, &frame, &spec).unwrap().tube;
        let err = resolve_intersections(&mut kernel, &shell, &neck, &side_spec());
        assert!(matches!(
            err,
            Err(BuildError::DegenerateIntersection { .. })
        ));
    }

    #[test]
    fn find_center_pins_the_lateral_component_on_axis() {
        let points: Vec<Point3d> = (0..96)
            .map(|i| {
                let t = TAU * i as f64 / 96.0;
                Point3d::new(28.0, 0.3 + 1.2 * t.cos(), 30.0 + 1.2 * t.sin())
            })
            .collect();
        let ring = Polyline::closed_loop(points);
        let pinned = find_center(&ring, false);
        assert_relative_eq!(pinned.y, 0.0, epsilon = 1e-12);
        let free = find_center(&ring, true);
        assert!((free.y - 0.3).abs() < 0.05);
        assert_relative_eq!(pinned.x, 28.0, epsilon = 1e-9);
        assert_relative_eq!(pinned.z, 30.0, epsilon = 0.01);
    }

    #[test]
    fn outward_orientation_flips_an_inward_probe() {
        let flipped = orient_outward(Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(flipped.z, 1.0, epsilon = 1e-12);
        let kept = orient_outward(Vec3::new(0.5, 0.0, -0.5));
        assert_relative_eq!(kept.z, -0.5, epsilon = 1e-12);
        let radial = orient_outward(Vec3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(radial.x, 1.0, epsilon = 1e-12);
    }

    // orientation loops on a cylindrical course straddle the attachment
    // azimuth symmetrically, so the sampled z mean lands on the axis height
    #[test]
    fn course_loop_center_height_matches_the_reference() {
        let mut kernel = MockKernel::new();
        let shell = course_shell(&mut kernel);
        let neck = side_neck(&mut kernel);
        let outcome = resolve_intersections(&mut kernel, &shell, &neck, &side_spec()).unwrap();
        let center = find_center(&outcome.cut.curve, false);
        assert_relative_eq!(center.z, 30.0, epsilon = 0.01);
        assert!(center.x > 19.9 && center.x < 20.0);
    }
}
