//! Planar curve analysis and offsetting for the mock kernel.

use vessel_types::{Plane, Point3d, Polyline, Vec3};

use crate::types::KernelError;

/// Centroid of a curve's vertices.
pub(crate) fn centroid(curve: &Polyline) -> Point3d {
    let n = curve.points.len().max(1) as f64;
    let sum = curve
        .points
        .iter()
        .fold(Vec3::ZERO, |acc, p| acc + p.to_vec3());
    Point3d::new(sum.x / n, sum.y / n, sum.z / n)
}

/// Newell-style plane fit through a closed curve. Fails on degenerate
/// (collinear) input.
pub(crate) fn fit_plane(curve: &Polyline) -> Result<Plane, KernelError> {
    let c = centroid(curve);
    let mut normal = Vec3::ZERO;
    for (a, b) in curve.segments() {
        let ra = a - c;
        let rb = b - c;
        normal = normal + ra.cross(&rb);
    }
    let normal = normal.normalized().ok_or_else(|| KernelError::OffsetFailed {
        reason: "curve is degenerate, no plane fit".into(),
    })?;
    Ok(Plane::new(c, normal))
}

/// If every vertex is equidistant from the centroid and the perimeter
/// matches a full turn at that radius, the curve is treated as a circle
/// and its (center, radius) returned. The perimeter check rejects regular
/// polygons coarse enough to be visibly faceted, whose vertices are also
/// equidistant.
pub(crate) fn as_circle(curve: &Polyline, tolerance: f64) -> Option<(Point3d, f64)> {
    if curve.points.len() < 3 || !curve.closed {
        return None;
    }
    let c = centroid(curve);
    let radii: Vec<f64> = curve.points.iter().map(|p| p.distance_to(&c)).collect();
    let mean = radii.iter().sum::<f64>() / radii.len() as f64;
    if !radii
        .iter()
        .all(|r| (r - mean).abs() <= tolerance.max(mean * 1e-6))
    {
        return None;
    }
    if mean < 1e-12 || (curve.length() / (std::f64::consts::TAU * mean) - 1.0).abs() > 0.01 {
        return None;
    }
    Some((c, mean))
}

/// Offset a closed planar curve radially from its centroid. Exact for
/// circles, adequate for the convex loops the mock sees.
pub(crate) fn offset_radial(curve: &Polyline, distance: f64) -> Result<Polyline, KernelError> {
    let c = centroid(curve);
    let mut points = Vec::with_capacity(curve.points.len());
    for p in &curve.points {
        let r = *p - c;
        let len = r.length();
        if len < 1e-12 {
            return Err(KernelError::OffsetFailed {
                reason: "curve vertex coincides with centroid".into(),
            });
        }
        points.push(c + r * ((len + distance) / len));
    }
    Ok(Polyline::new(points, curve.closed))
}

/// Offset a planar curve within its plane. Each vertex moves along
/// `tangent x plane_normal`, which points outward for counterclockwise
/// loops and away from the enclosed side for open sections.
pub(crate) fn offset_in_plane(
    curve: &Polyline,
    distance: f64,
    plane_normal: Vec3,
) -> Result<Polyline, KernelError> {
    let n = curve.points.len();
    if n < 2 {
        return Err(KernelError::OffsetFailed {
            reason: "cannot offset a curve with fewer than two points".into(),
        });
    }
    let mut normal = plane_normal
        .normalized()
        .ok_or_else(|| KernelError::OffsetFailed {
            reason: "zero plane normal".into(),
        })?;
    // Closed loops offset relative to their own winding so that a positive
    // distance always moves outward, whichever way the caller's plane faces.
    if curve.closed {
        if let Ok(fitted) = fit_plane(curve) {
            normal = fitted.normal();
        }
    }
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let prev = if i > 0 {
            curve.points[i] - curve.points[i - 1]
        } else if curve.closed {
            curve.points[0] - curve.points[n - 1]
        } else {
            curve.points[1] - curve.points[0]
        };
        let next = if i + 1 < n {
            curve.points[i + 1] - curve.points[i]
        } else if curve.closed {
            curve.points[0] - curve.points[n - 1]
        } else {
            curve.points[n - 1] - curve.points[n - 2]
        };
        let tangent = (prev + next)
            .normalized()
            .or_else(|| prev.normalized())
            .ok_or_else(|| KernelError::OffsetFailed {
                reason: "degenerate tangent in offset".into(),
            })?;
        let dir = tangent.cross(&normal);
        let dir = dir.normalized().ok_or_else(|| KernelError::OffsetFailed {
            reason: "curve tangent parallel to plane normal".into(),
        })?;
        points.push(curve.points[i] + dir * distance);
    }
    Ok(Polyline::new(points, curve.closed))
}

/// Signed polygon area of a closed planar curve, measured in its plane.
pub(crate) fn polygon_area(curve: &Polyline, plane: &Plane) -> f64 {
    let mut acc = 0.0;
    for (a, b) in curve.segments() {
        let ra = a - plane.origin();
        let rb = b - plane.origin();
        let ua = ra.dot(&plane.axis_x());
        let va = ra.dot(&plane.axis_y());
        let ub = rb.dot(&plane.axis_x());
        let vb = rb.dot(&plane.axis_y());
        acc += ua * vb - ub * va;
    }
    acc / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    fn circle(r: f64, n: usize) -> Polyline {
        let points = (0..n)
            .map(|i| {
                let t = TAU * i as f64 / n as f64;
                Point3d::new(r * t.cos(), r * t.sin(), 0.0)
            })
            .collect();
        Polyline::closed_loop(points)
    }

    #[test]
    fn detects_circles() {
        let c = circle(2.0, 48);
        let (center, radius) = as_circle(&c, 1e-6).unwrap();
        assert_relative_eq!(radius, 2.0, epsilon = 1e-9);
        assert_relative_eq!(center.distance_to(&Point3d::ORIGIN), 0.0, epsilon = 1e-9);

        let square = Polyline::closed_loop(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        ]);
        assert!(as_circle(&square, 1e-6).is_none());
    }

    #[test]
    fn radial_offset_grows_a_circle() {
        let c = circle(2.0, 48);
        let out = offset_radial(&c, 0.5).unwrap();
        let (_, radius) = as_circle(&out, 1e-6).unwrap();
        assert_relative_eq!(radius, 2.5, epsilon = 1e-9);
    }

    #[test]
    fn in_plane_offset_is_outward_for_ccw_circle() {
        let c = circle(2.0, 96);
        let out = offset_in_plane(&c, 0.3, Vec3::Z).unwrap();
        let (_, radius) = as_circle(&out, 1e-3).unwrap();
        assert_relative_eq!(radius, 2.3, epsilon = 1e-3);
    }

    #[test]
    fn circle_area_matches_pi_r_squared() {
        let c = circle(3.0, 720);
        let plane = fit_plane(&c).unwrap();
        let area = polygon_area(&c, &plane).abs();
        assert_relative_eq!(area, std::f64::consts::PI * 9.0, epsilon = 0.01);
    }
}
