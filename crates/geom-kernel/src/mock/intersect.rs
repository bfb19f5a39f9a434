//! Analytic surface/surface and surface/plane intersection.
//!
//! The tool side of an intersection is always a finite cylinder here; the
//! pipeline only ever intersects the neck barrel against shell walls. The
//! cylinder is parametrized by angle and the other surface's implicit form
//! is solved along the ruling line at each sample.

use std::f64::consts::TAU;

use vessel_types::{BoundingBox, Plane, Point3d, Polyline, Vec3};

use super::solid::{axis_frame, SurfaceGeom};

const ANGLE_SAMPLES: usize = 256;
const SECTION_SAMPLES: usize = 128;

pub(crate) fn bounds_contain(bb: &BoundingBox, p: &Point3d, tol: f64) -> bool {
    p.x >= bb.min.x - tol
        && p.x <= bb.max.x + tol
        && p.y >= bb.min.y - tol
        && p.y <= bb.max.y + tol
        && p.z >= bb.min.z - tol
        && p.z <= bb.max.z + tol
}

/// Intersect a finite tool cylinder with another surface. Closed loops are
/// deliberately returned as several fragments in mixed orientation, the way
/// a real kernel hands back trimmed intersection pieces.
pub(crate) fn tool_cylinder_with_surface(
    origin: Point3d,
    axis: Vec3,
    radius: f64,
    length: f64,
    other: &SurfaceGeom,
    tol: f64,
) -> Vec<Polyline> {
    let (u, v) = axis_frame(axis);
    let mut samples: Vec<Option<Point3d>> = Vec::with_capacity(ANGLE_SAMPLES);
    for i in 0..ANGLE_SAMPLES {
        let t = TAU * i as f64 / ANGLE_SAMPLES as f64;
        let base = origin + u * (radius * t.cos()) + v * (radius * t.sin());
        samples.push(first_hit_along(base, axis, length, other, tol));
    }

    if samples.iter().all(|s| s.is_some()) {
        let loop_points: Vec<Point3d> = samples.into_iter().flatten().collect();
        return fragment_loop(&loop_points);
    }

    contiguous_runs(&samples)
}

/// Smallest parameter hit of the ruling line `base + s*axis`, `s` within
/// the tool's extent, against the other surface.
fn first_hit_along(
    base: Point3d,
    axis: Vec3,
    length: f64,
    other: &SurfaceGeom,
    tol: f64,
) -> Option<Point3d> {
    let roots: Vec<f64> = match other {
        SurfaceGeom::Cylinder {
            origin: o_s,
            axis: d_s,
            radius,
            length: l_s,
        } => {
            let a_vec = axis - *d_s * axis.dot(d_s);
            let q0 = base - *o_s;
            let b_vec = q0 - *d_s * q0.dot(d_s);
            let roots = solve_quadratic(
                a_vec.length_squared(),
                2.0 * a_vec.dot(&b_vec),
                b_vec.length_squared() - radius * radius,
            );
            roots
                .into_iter()
                .filter(|s| {
                    let h = (base + axis * *s - *o_s).dot(d_s);
                    h >= -tol && h <= l_s + tol
                })
                .collect()
        }
        SurfaceGeom::Sphere {
            center,
            radius,
            bounds,
        } => {
            let q0 = base - *center;
            let roots = solve_quadratic(
                1.0,
                2.0 * q0.dot(&axis),
                q0.length_squared() - radius * radius,
            );
            roots
                .into_iter()
                .filter(|s| bounds_contain(bounds, &(base + axis * *s), tol.max(1e-6)))
                .collect()
        }
        _ => Vec::new(),
    };

    roots
        .into_iter()
        .filter(|s| *s >= -tol && *s <= length + tol)
        .fold(None, |best: Option<f64>, s| match best {
            Some(b) if b <= s => Some(b),
            _ => Some(s),
        })
        .map(|s| base + axis * s)
}

fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < 1e-14 {
        if b.abs() < 1e-14 {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sq = disc.sqrt();
    vec![(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)]
}

/// Split a closed loop into four open fragments, one of them reversed.
fn fragment_loop(points: &[Point3d]) -> Vec<Polyline> {
    let n = points.len();
    let quarter = n / 4;
    let mut out = Vec::with_capacity(4);
    for k in 0..4 {
        let start = k * quarter;
        let end = if k == 3 { n } else { (k + 1) * quarter };
        let mut pts: Vec<Point3d> = points[start..end].to_vec();
        // shared endpoint with the next fragment, wrapping for the last
        pts.push(points[end % n]);
        let frag = Polyline::open(pts);
        out.push(if k == 2 { frag.reversed() } else { frag });
    }
    out
}

fn contiguous_runs(samples: &[Option<Point3d>]) -> Vec<Polyline> {
    let mut out = Vec::new();
    let mut run: Vec<Point3d> = Vec::new();
    for s in samples {
        match s {
            Some(p) => run.push(*p),
            None => {
                if run.len() >= 2 {
                    out.push(Polyline::open(std::mem::take(&mut run)));
                } else {
                    run.clear();
                }
            }
        }
    }
    if run.len() >= 2 {
        out.push(Polyline::open(run));
    }
    out
}

/// Section one surface with a plane.
pub(crate) fn section_surface_with_plane(
    geom: &SurfaceGeom,
    plane: &Plane,
    tol: f64,
) -> Vec<Polyline> {
    match geom {
        SurfaceGeom::Cylinder {
            origin,
            axis,
            radius,
            length,
        } => section_cylinder(*origin, *axis, *radius, *length, plane, tol),
        SurfaceGeom::Sphere {
            center,
            radius,
            bounds,
        } => section_sphere(*center, *radius, bounds, plane, tol),
        _ => Vec::new(),
    }
}

fn section_cylinder(
    origin: Point3d,
    axis: Vec3,
    radius: f64,
    length: f64,
    plane: &Plane,
    tol: f64,
) -> Vec<Polyline> {
    let n = plane.normal();
    let (u, v) = axis_frame(axis);
    let axial = axis.dot(&n);

    if axial.abs() < 1e-9 {
        // Plane parallel to the axis: up to two ruling lines.
        let b = (origin - plane.origin()).dot(&n);
        let c_coef = radius * u.dot(&n);
        let s_coef = radius * v.dot(&n);
        let amp = (c_coef * c_coef + s_coef * s_coef).sqrt();
        if amp < 1e-12 || b.abs() > amp + tol {
            return Vec::new();
        }
        let phi = s_coef.atan2(c_coef);
        let delta = (-b / amp).clamp(-1.0, 1.0).acos();
        let mut angles = vec![phi + delta];
        if delta > 1e-9 && delta < std::f64::consts::PI - 1e-9 {
            angles.push(phi - delta);
        }
        return angles
            .into_iter()
            .map(|t| {
                let base = origin + u * (radius * t.cos()) + v * (radius * t.sin());
                Polyline::open(vec![base, base + axis * length])
            })
            .collect();
    }

    // Oblique or perpendicular plane: sampled conic on the barrel.
    let mut samples = Vec::with_capacity(SECTION_SAMPLES);
    for i in 0..SECTION_SAMPLES {
        let t = TAU * i as f64 / SECTION_SAMPLES as f64;
        let base = origin + u * (radius * t.cos()) + v * (radius * t.sin());
        let s = -(base - plane.origin()).dot(&n) / axial;
        if s >= -tol && s <= length + tol {
            samples.push(Some(base + axis * s));
        } else {
            samples.push(None);
        }
    }
    if samples.iter().all(|s| s.is_some()) {
        let points: Vec<Point3d> = samples.into_iter().flatten().collect();
        vec![Polyline::closed_loop(points)]
    } else {
        contiguous_runs(&samples)
    }
}

/// Circle of latitude where the plane meets the sphere, clipped to the
/// surface's trimmed extent. Emitted over half a turn starting on the
/// plane's local +X axis.
fn section_sphere(
    center: Point3d,
    radius: f64,
    bounds: &BoundingBox,
    plane: &Plane,
    tol: f64,
) -> Vec<Polyline> {
    let dist = plane.signed_distance(&center);
    if dist.abs() > radius - 1e-12 {
        return Vec::new();
    }
    let ring_radius = (radius * radius - dist * dist).sqrt();
    let foot = center + plane.normal() * (-dist);
    let mut samples = Vec::with_capacity(SECTION_SAMPLES + 1);
    for i in 0..=SECTION_SAMPLES {
        let phi = std::f64::consts::PI * i as f64 / SECTION_SAMPLES as f64;
        let p = foot + plane.axis_x() * (ring_radius * phi.cos())
            + plane.axis_y() * (ring_radius * phi.sin());
        if bounds_contain(bounds, &p, tol.max(1e-6)) {
            samples.push(Some(p));
        } else {
            samples.push(None);
        }
    }
    contiguous_runs(&samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::connect_curves;
    use approx::assert_relative_eq;
    use vessel_types::MERGE_TOLERANCE;

    fn shell_cylinder() -> SurfaceGeom {
        SurfaceGeom::Cylinder {
            origin: Point3d::ORIGIN,
            axis: Vec3::Z,
            radius: 21.0,
            length: 60.0,
        }
    }

    #[test]
    fn neck_through_shell_wall_is_one_closed_loop() {
        // Tool runs along -X from x=28 at mid-height of the shell.
        let frags = tool_cylinder_with_surface(
            Point3d::new(28.0, 0.0, 30.0),
            Vec3::new(-1.0, 0.0, 0.0),
            1.2,
            10.2,
            &shell_cylinder(),
            MERGE_TOLERANCE,
        );
        assert_eq!(frags.len(), 4);
        let loops = connect_curves(&frags, MERGE_TOLERANCE);
        assert_eq!(loops.len(), 1);
        assert!(loops[0].closed);
        // The far wall at x = -21 is beyond the tool's extent.
        for p in &loops[0].points {
            assert!(p.x > 20.0);
            assert_relative_eq!(p.x * p.x + p.y * p.y, 441.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn neck_into_sphere_cap_sits_at_the_right_height() {
        let sphere = SurfaceGeom::Sphere {
            center: Point3d::ORIGIN,
            radius: 30.0,
            bounds: BoundingBox {
                min: Point3d::new(-30.0, -30.0, 0.0),
                max: Point3d::new(30.0, 30.0, 30.0),
            },
        };
        let frags = tool_cylinder_with_surface(
            Point3d::new(0.0, 0.0, 38.0),
            Vec3::new(0.0, 0.0, -1.0),
            2.0,
            10.0,
            &sphere,
            MERGE_TOLERANCE,
        );
        let loops = connect_curves(&frags, MERGE_TOLERANCE);
        assert_eq!(loops.len(), 1);
        let expected_z = (900.0_f64 - 4.0).sqrt();
        for p in &loops[0].points {
            assert_relative_eq!(p.z, expected_z, epsilon = 1e-9);
        }
    }

    #[test]
    fn axial_plane_sections_cylinder_into_two_lines() {
        let lines = section_surface_with_plane(&shell_cylinder(), &Plane::xz(), 1e-6);
        assert_eq!(lines.len(), 2);
        let mut xs: Vec<f64> = lines.iter().map(|l| l.start_point().x).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        assert_relative_eq!(xs[0], -21.0, epsilon = 1e-9);
        assert_relative_eq!(xs[1], 21.0, epsilon = 1e-9);
        assert_relative_eq!(lines[0].length(), 60.0, epsilon = 1e-9);
    }

    #[test]
    fn perpendicular_plane_sections_cylinder_into_a_circle() {
        let plane = Plane::new(Point3d::new(0.0, 0.0, 30.0), Vec3::Z);
        let curves = section_surface_with_plane(&shell_cylinder(), &plane, 1e-6);
        assert_eq!(curves.len(), 1);
        assert!(curves[0].closed);
        for p in &curves[0].points {
            assert_relative_eq!((p.x * p.x + p.y * p.y).sqrt(), 21.0, epsilon = 1e-9);
            assert_relative_eq!(p.z, 30.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn sphere_section_starts_on_plus_x_and_arcs_over_the_top() {
        let sphere = SurfaceGeom::Sphere {
            center: Point3d::ORIGIN,
            radius: 31.0,
            bounds: BoundingBox {
                min: Point3d::new(-31.0, -31.0, 0.0),
                max: Point3d::new(31.0, 31.0, 31.0),
            },
        };
        let arcs = section_surface_with_plane(&sphere, &Plane::xz(), 1e-6);
        assert_eq!(arcs.len(), 1);
        let arc = &arcs[0];
        assert_relative_eq!(arc.start_point().x, 31.0, epsilon = 1e-6);
        assert_relative_eq!(arc.end_point().x, -31.0, epsilon = 1e-6);
        let top = arc
            .points
            .iter()
            .map(|p| p.z)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(top, 31.0, epsilon = 1e-3);
    }
}
