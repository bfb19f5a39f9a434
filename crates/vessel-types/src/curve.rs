use serde::{Deserialize, Serialize};

use crate::plane::Plane;
use crate::point::Point3d;
use crate::vector::Vec3;

/// A sampled 3D curve: an ordered run of points, optionally closed.
///
/// Intersection curves, section curves and offset boundaries all travel
/// through the pipeline in this form. The kernel guarantees sampling fine
/// enough that chord length approximates arc length within the merge
/// tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point3d>,
    pub closed: bool,
}

impl Polyline {
    pub fn new(points: Vec<Point3d>, closed: bool) -> Self {
        Self { points, closed }
    }

    pub fn open(points: Vec<Point3d>) -> Self {
        Self::new(points, false)
    }

    pub fn closed_loop(points: Vec<Point3d>) -> Self {
        Self::new(points, true)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start_point(&self) -> Point3d {
        self.points[0]
    }

    pub fn end_point(&self) -> Point3d {
        *self.points.last().expect("polyline has no points")
    }

    /// Consecutive point pairs, including the closing segment for loops.
    pub fn segments(&self) -> Vec<(Point3d, Point3d)> {
        let mut out = Vec::with_capacity(self.points.len());
        for pair in self.points.windows(2) {
            out.push((pair[0], pair[1]));
        }
        if self.closed && self.points.len() > 2 {
            out.push((self.end_point(), self.start_point()));
        }
        out
    }

    pub fn length(&self) -> f64 {
        self.segments()
            .iter()
            .map(|(a, b)| a.distance_to(b))
            .sum()
    }

    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self {
            points,
            closed: self.closed,
        }
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            points: self.points.iter().map(|p| *p + offset).collect(),
            closed: self.closed,
        }
    }

    /// Points spaced `step` apart in arc length, starting at the curve start.
    /// A closed curve wraps around once; the final wrap point is omitted so
    /// the start is not duplicated.
    pub fn sample_by_length(&self, step: f64) -> Vec<Point3d> {
        if self.points.len() < 2 || step <= 0.0 {
            return self.points.clone();
        }
        let segments = self.segments();
        let total = self.length();
        let mut out = Vec::new();
        let mut target = 0.0;
        let mut walked = 0.0;
        let mut seg_iter = segments.iter();
        let mut current = *seg_iter.next().expect("at least one segment");
        let mut seg_len = current.0.distance_to(&current.1);
        while target < total - step * 0.5 {
            while walked + seg_len < target {
                walked += seg_len;
                match seg_iter.next() {
                    Some(seg) => {
                        current = *seg;
                        seg_len = current.0.distance_to(&current.1);
                    }
                    None => return out,
                }
            }
            let t = if seg_len > 1e-15 {
                (target - walked) / seg_len
            } else {
                0.0
            };
            out.push(current.0.lerp(&current.1, t));
            target += step;
        }
        out
    }

    /// The leading portion of the curve up to the given arc length. Used to
    /// clip a section boundary that crosses the revolve axis down to a
    /// half-curve.
    pub fn clipped_to_length(&self, target_len: f64) -> Self {
        let mut points = vec![self.points[0]];
        let mut walked = 0.0;
        for (a, b) in self.segments() {
            let seg = a.distance_to(&b);
            if walked + seg >= target_len {
                let t = if seg > 1e-15 {
                    (target_len - walked) / seg
                } else {
                    0.0
                };
                points.push(a.lerp(&b, t));
                return Self::open(points);
            }
            points.push(b);
            walked += seg;
        }
        Self::open(points)
    }

    pub fn lies_in_plane(&self, plane: &Plane, tol: f64) -> bool {
        self.points.iter().all(|p| plane.contains_point(p, tol))
    }

    pub fn max_coord_along(&self, direction: &Vec3) -> f64 {
        self.points
            .iter()
            .map(|p| p.coord_along(direction))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min_coord_along(&self, direction: &Vec3) -> f64 {
        self.points
            .iter()
            .map(|p| p.coord_along(direction))
            .fold(f64::INFINITY, f64::min)
    }
}
