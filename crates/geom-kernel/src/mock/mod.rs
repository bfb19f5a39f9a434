//! Deterministic in-process stand-in for a real modeling kernel.
//!
//! Solids are a bag of analytic surfaces plus a few scalars (volume,
//! bounds, shape tag). Booleans are intentionally shallow: subtraction
//! yields a single piece when the bodies overlap and nothing when they are
//! disjoint, which is enough to drive trim and cut sequencing. The
//! geometric queries (intersection, sectioning, closest point) are exact
//! for the analytic shapes involved.

mod intersect;
mod offset;
mod solid;

pub use solid::CutRecord;

use std::collections::HashMap;
use std::f64::consts::TAU;

use vessel_types::{BoundingBox, Plane, Point3d, Polyline, Region, Vec3};

use crate::connect::connect_curves;
use crate::traits::{GeometryKernel, KernelProbe};
use crate::types::{ChamferOutcome, KernelError, SolidHandle, SurfaceHandle, SurfaceKind};

use intersect::{bounds_contain, section_surface_with_plane, tool_cylinder_with_surface};
use offset::{as_circle, fit_plane, offset_in_plane, offset_radial, polygon_area};
use solid::{axis_frame, revolved_bounds, MockSolid, ShapeInfo, SurfaceGeom};

const CIRCLE_SAMPLES: usize = 96;

#[derive(Debug, Default)]
pub struct MockKernel {
    solids: HashMap<u64, MockSolid>,
    surfaces: HashMap<u64, SurfaceGeom>,
    next_id: u64,
    /// When set, `repair_topology` reports that no repair was possible.
    pub decline_repairs: bool,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn add_surface(&mut self, geom: SurfaceGeom) -> SurfaceHandle {
        let id = self.fresh_id();
        self.surfaces.insert(id, geom);
        SurfaceHandle(id)
    }

    fn add_solid(&mut self, solid: MockSolid) -> SolidHandle {
        let id = self.fresh_id();
        self.solids.insert(id, solid);
        SolidHandle(id)
    }

    fn solid(&self, handle: &SolidHandle) -> Result<&MockSolid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or(KernelError::EntityNotFound { id: handle.id() })
    }

    fn surface(&self, handle: SurfaceHandle) -> Result<&SurfaceGeom, KernelError> {
        self.surfaces
            .get(&handle.id())
            .ok_or(KernelError::EntityNotFound { id: handle.id() })
    }

    /// Prismatic cuts applied to a solid, oldest first. Test hook.
    pub fn cut_records(&self, solid: &SolidHandle) -> Vec<CutRecord> {
        self.solids
            .get(&solid.id())
            .map(|s| s.cuts.clone())
            .unwrap_or_default()
    }

    /// `(inner_radius, outer_radius, length)` when the solid is a circular
    /// extrusion. Test hook.
    pub fn tube_profile(&self, solid: &SolidHandle) -> Option<(f64, f64, f64)> {
        match self.solids.get(&solid.id()).map(|s| &s.shape) {
            Some(ShapeInfo::Tube {
                inner_radius,
                outer_radius,
                length,
            }) => Some((*inner_radius, *outer_radius, *length)),
            _ => None,
        }
    }

    pub fn was_repaired(&self, solid: &SolidHandle) -> bool {
        self.solids
            .get(&solid.id())
            .map(|s| s.repaired)
            .unwrap_or(false)
    }

    /// How many tool bodies have been subtracted from this solid.
    pub fn trim_count(&self, solid: &SolidHandle) -> usize {
        self.solids
            .get(&solid.id())
            .map(|s| s.trims.len())
            .unwrap_or(0)
    }

    pub fn normals_are_flipped(&self, solid: &SolidHandle) -> bool {
        self.solids
            .get(&solid.id())
            .map(|s| s.normals_flipped)
            .unwrap_or(false)
    }

    fn disc_bounds(center: Point3d, normal: Vec3, radius: f64) -> BoundingBox {
        let (u, v) = axis_frame(normal);
        let mut bb = BoundingBox::empty();
        for (su, sv) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
            bb.expand(&(center + u * (su * radius) + v * (sv * radius)));
        }
        bb.expand(&center);
        bb
    }

    fn tube_solid(
        &mut self,
        base: Point3d,
        axis: Vec3,
        inner_radius: f64,
        outer_radius: f64,
        length: f64,
    ) -> SolidHandle {
        let mut surfaces = vec![self.add_surface(SurfaceGeom::Cylinder {
            origin: base,
            axis,
            radius: outer_radius,
            length,
        })];
        if inner_radius > 1e-12 {
            surfaces.push(self.add_surface(SurfaceGeom::Cylinder {
                origin: base,
                axis,
                radius: inner_radius,
                length,
            }));
        }
        for station in [0.0, length] {
            let center = base + axis * station;
            surfaces.push(self.add_surface(SurfaceGeom::Plane {
                plane: Plane::new(center, axis),
                bounds: Self::disc_bounds(center, axis, outer_radius),
            }));
        }
        let mut bounds = Self::disc_bounds(base, axis, outer_radius);
        bounds = bounds.merge(&Self::disc_bounds(base + axis * length, axis, outer_radius));
        let volume =
            std::f64::consts::PI * (outer_radius.powi(2) - inner_radius.powi(2)) * length;
        let mut solid = MockSolid::new(surfaces, bounds, volume);
        solid.shape = ShapeInfo::Tube {
            inner_radius,
            outer_radius,
            length,
        };
        self.add_solid(solid)
    }

    fn revolved_surfaces(
        &mut self,
        contour: &Polyline,
        axis: Vec3,
        origin: Point3d,
        tol: f64,
    ) -> Vec<SurfaceHandle> {
        classify_profile(contour, axis, origin, tol)
            .into_iter()
            .map(|(class, points)| {
                let geom = match class {
                    RunClass::Sphere => {
                        let radius = mean(points.iter().map(|p| p.distance_to(&origin)));
                        SurfaceGeom::Sphere {
                            center: origin,
                            radius,
                            bounds: revolved_bounds(&points, axis, origin),
                        }
                    }
                    RunClass::Cylinder => {
                        let radius = mean(points.iter().map(|p| radial_distance(p, axis, origin)));
                        let stations: Vec<f64> =
                            points.iter().map(|p| (*p - origin).dot(&axis)).collect();
                        let lo = stations.iter().copied().fold(f64::INFINITY, f64::min);
                        let hi = stations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                        SurfaceGeom::Cylinder {
                            origin: origin + axis * lo,
                            axis,
                            radius,
                            length: hi - lo,
                        }
                    }
                    RunClass::Cap => {
                        let h = mean(points.iter().map(|p| (*p - origin).dot(&axis)));
                        SurfaceGeom::Plane {
                            plane: Plane::new(origin + axis * h, axis),
                            bounds: revolved_bounds(&points, axis, origin),
                        }
                    }
                    RunClass::General => SurfaceGeom::Revolved {
                        profile: Polyline::open(points),
                        axis,
                        origin,
                    },
                };
                self.add_surface(geom)
            })
            .collect()
    }
}

impl GeometryKernel for MockKernel {
    fn circle(
        &mut self,
        plane: &Plane,
        center: Point3d,
        radius: f64,
    ) -> Result<Polyline, KernelError> {
        if radius <= 0.0 {
            return Err(KernelError::Other {
                message: format!("non-positive circle radius {radius}"),
            });
        }
        let points = (0..CIRCLE_SAMPLES)
            .map(|i| {
                let t = TAU * i as f64 / CIRCLE_SAMPLES as f64;
                center + plane.axis_x() * (radius * t.cos()) + plane.axis_y() * (radius * t.sin())
            })
            .collect();
        Ok(Polyline::closed_loop(points))
    }

    fn offset_curve_to_region(
        &mut self,
        curve: &Polyline,
        distance: f64,
        _tolerance: f64,
    ) -> Result<Region, KernelError> {
        let plane = fit_plane(curve)?;
        let offset = offset_radial(curve, distance)?;
        Ok(Region::new(plane, vec![curve.clone(), offset]))
    }

    fn offset_curve(
        &mut self,
        curve: &Polyline,
        distance: f64,
        plane_normal: Vec3,
        _tolerance: f64,
    ) -> Result<Polyline, KernelError> {
        offset_in_plane(curve, distance, plane_normal)
    }

    fn extrude(&mut self, region: &Region, length: f64) -> Result<SolidHandle, KernelError> {
        if region.contours.is_empty() {
            return Err(KernelError::ExtrudeFailed {
                reason: "region has no contours".into(),
            });
        }
        let axis = region.plane.normal();
        let circles: Vec<Option<(Point3d, f64)>> = region
            .contours
            .iter()
            .map(|c| as_circle(c, 1e-6))
            .collect();
        if circles.iter().all(|c| c.is_some()) && region.contours.len() <= 2 {
            let mut rings: Vec<(Point3d, f64)> = circles.into_iter().flatten().collect();
            rings.sort_by(|a, b| a.1.total_cmp(&b.1));
            let (outer_center, outer_radius) = rings[rings.len() - 1];
            let inner_radius = if rings.len() == 2 { rings[0].1 } else { 0.0 };
            return Ok(self.tube_solid(outer_center, axis, inner_radius, outer_radius, length));
        }

        // Generic prism: swept side walls plus two caps.
        let mut surfaces = Vec::new();
        let mut bounds = BoundingBox::empty();
        for contour in &region.contours {
            for p in &contour.points {
                bounds.expand(p);
                bounds.expand(&(*p + axis * length));
            }
            surfaces.push(self.add_surface(SurfaceGeom::Swept {
                profile: contour.clone(),
                direction: axis,
                length,
            }));
        }
        let outer = region.outer_contour().clone();
        for station in [0.0, length] {
            let shifted = outer.translated(axis * station);
            let cap_bounds = BoundingBox::from_points(&shifted.points);
            surfaces.push(self.add_surface(SurfaceGeom::Plane {
                plane: region.plane.translated(axis * station),
                bounds: cap_bounds,
            }));
        }
        let mut area = polygon_area(&outer, &region.plane).abs();
        for contour in &region.contours {
            if !std::ptr::eq(contour, region.outer_contour()) {
                area -= polygon_area(contour, &region.plane).abs();
            }
        }
        let solid = MockSolid::new(surfaces, bounds, area.max(0.0) * length);
        Ok(self.add_solid(solid))
    }

    fn revolve(
        &mut self,
        region: &Region,
        _start_angle: f64,
        angle: f64,
        axis: Vec3,
        origin: Point3d,
        tolerance: f64,
    ) -> Result<SolidHandle, KernelError> {
        if region.contours.is_empty() {
            return Err(KernelError::RevolveFailed {
                reason: "region has no contours".into(),
            });
        }
        let mut surfaces = Vec::new();
        let mut bounds = BoundingBox::empty();
        for contour in &region.contours {
            surfaces.extend(self.revolved_surfaces(contour, axis, origin, tolerance.max(1e-6)));
            bounds = bounds.merge(&revolved_bounds(&contour.points, axis, origin));
        }
        let outer = region.outer_contour();
        let area = polygon_area(outer, &region.plane).abs();
        let centroid = offset::centroid(outer);
        let volume = area * angle * radial_distance(&centroid, axis, origin);
        Ok(self.add_solid(MockSolid::new(surfaces, bounds, volume)))
    }

    fn revolve_curve(
        &mut self,
        profile: &Polyline,
        _start_angle: f64,
        _angle: f64,
        axis: Vec3,
        origin: Point3d,
        tolerance: f64,
    ) -> Result<SolidHandle, KernelError> {
        if profile.points.len() < 2 {
            return Err(KernelError::RevolveFailed {
                reason: "profile has fewer than two points".into(),
            });
        }
        let surfaces = self.revolved_surfaces(profile, axis, origin, tolerance.max(1e-6));
        let bounds = revolved_bounds(&profile.points, axis, origin);
        let mut solid = MockSolid::new(surfaces, bounds, 0.0);
        solid.closed = false;
        solid.shape = ShapeInfo::Shell;
        Ok(self.add_solid(solid))
    }

    fn intersect_surfaces(
        &mut self,
        a: SurfaceHandle,
        b: SurfaceHandle,
        tolerance: f64,
    ) -> Result<Vec<Polyline>, KernelError> {
        let geom_a = self.surface(a)?.clone();
        let geom_b = self.surface(b)?.clone();
        if let SurfaceGeom::Cylinder {
            origin,
            axis,
            radius,
            length,
        } = geom_a
        {
            return Ok(tool_cylinder_with_surface(
                origin, axis, radius, length, &geom_b, tolerance,
            ));
        }
        if let SurfaceGeom::Cylinder {
            origin,
            axis,
            radius,
            length,
        } = geom_b
        {
            return Ok(tool_cylinder_with_surface(
                origin, axis, radius, length, &geom_a, tolerance,
            ));
        }
        Ok(Vec::new())
    }

    fn section_solid(
        &mut self,
        solid: &SolidHandle,
        plane: &Plane,
        tolerance: f64,
    ) -> Result<Vec<Polyline>, KernelError> {
        let surfaces = self.solid(solid)?.surfaces.clone();
        let mut out = Vec::new();
        for handle in surfaces {
            let geom = self.surface(handle)?;
            out.extend(section_surface_with_plane(geom, plane, tolerance));
        }
        Ok(out)
    }

    fn section_surface(
        &mut self,
        surface: SurfaceHandle,
        plane: &Plane,
        tolerance: f64,
    ) -> Result<Vec<Polyline>, KernelError> {
        let geom = self.surface(surface)?;
        Ok(section_surface_with_plane(geom, plane, tolerance))
    }

    fn boolean_difference(
        &mut self,
        target: &SolidHandle,
        tool: &SolidHandle,
    ) -> Result<Vec<SolidHandle>, KernelError> {
        let target_solid = self.solid(target)?.clone();
        let tool_bounds = self.solid(tool)?.bounds;
        if !target_solid.bounds.intersects(&tool_bounds) {
            return Ok(Vec::new());
        }
        let mut piece = target_solid;
        piece.trims.push(tool.id());
        Ok(vec![self.add_solid(piece)])
    }

    fn booleans_intersect(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<bool, KernelError> {
        Ok(self.solid(a)?.bounds.intersects(&self.solid(b)?.bounds))
    }

    fn extrude_remove(
        &mut self,
        solid: &SolidHandle,
        region: &Region,
        length: f64,
    ) -> Result<SolidHandle, KernelError> {
        let mut cut_body = self.solid(solid)?.clone();
        let contour = region.outer_contour();
        let (center, radius) = match as_circle(contour, 1e-6) {
            Some(hit) => hit,
            None => {
                let c = offset::centroid(contour);
                let r = mean(contour.points.iter().map(|p| p.distance_to(&c)));
                (c, r)
            }
        };
        cut_body.cuts.push(CutRecord {
            origin: center,
            direction: region.plane.normal(),
            radius,
            length,
        });
        Ok(self.add_solid(cut_body))
    }

    fn chamfer(
        &mut self,
        surfaces_a: &[SurfaceHandle],
        surfaces_b: &[SurfaceHandle],
        size_a: f64,
        _size_b: f64,
    ) -> Result<ChamferOutcome, KernelError> {
        for &ha in surfaces_a {
            for &hb in surfaces_b {
                let ga = self.surface(ha)?.clone();
                let gb = self.surface(hb)?.clone();
                if let Some((junction, direction)) = junction_loop(&ga, &gb) {
                    let upper = junction.translated(direction * size_a);
                    let band = self.add_surface(SurfaceGeom::Band {
                        lower: junction,
                        upper,
                    });
                    return Ok(ChamferOutcome {
                        fillet_surfaces: vec![band],
                        leftover_a: surfaces_a.to_vec(),
                        leftover_b: surfaces_b.to_vec(),
                    });
                }
            }
        }
        Ok(ChamferOutcome::default())
    }

    fn loft(&mut self, sections: &[Polyline]) -> Result<SolidHandle, KernelError> {
        if sections.len() < 2 {
            return Err(KernelError::LoftFailed {
                reason: "loft needs at least two sections".into(),
            });
        }
        if let Some(open) = sections.iter().find(|s| !s.closed) {
            return Err(KernelError::LoftFailed {
                reason: format!("loft section with {} points is not closed", open.points.len()),
            });
        }
        let mut surfaces = Vec::new();
        let mut bounds = BoundingBox::empty();
        for pair in sections.windows(2) {
            surfaces.push(self.add_surface(SurfaceGeom::Band {
                lower: pair[0].clone(),
                upper: pair[1].clone(),
            }));
        }
        for section in sections {
            for p in &section.points {
                bounds.expand(p);
            }
        }
        let volume = match fit_plane(&sections[0]) {
            Ok(plane) => {
                let span = offset::centroid(&sections[0])
                    .distance_to(&offset::centroid(&sections[sections.len() - 1]));
                polygon_area(&sections[0], &plane).abs() * span.max(1e-3)
            }
            Err(_) => 0.0,
        };
        Ok(self.add_solid(MockSolid::new(surfaces, bounds, volume)))
    }

    fn repair_topology(
        &mut self,
        solid: &SolidHandle,
    ) -> Result<Option<SolidHandle>, KernelError> {
        if self.decline_repairs {
            return Ok(None);
        }
        let mut repaired = self.solid(solid)?.clone();
        repaired.repaired = true;
        Ok(Some(self.add_solid(repaired)))
    }

    fn flip_normals(&mut self, solid: &SolidHandle) -> Result<SolidHandle, KernelError> {
        let mut flipped = self.solid(solid)?.clone();
        flipped.normals_flipped = !flipped.normals_flipped;
        Ok(self.add_solid(flipped))
    }

    fn clone_solid(&mut self, solid: &SolidHandle) -> Result<SolidHandle, KernelError> {
        let copy = self.solid(solid)?.clone();
        Ok(self.add_solid(copy))
    }

    fn surface_to_solid(&mut self, surface: SurfaceHandle) -> Result<SolidHandle, KernelError> {
        let bounds = self.surface(surface)?.bounding_box();
        let mut solid = MockSolid::new(vec![surface], bounds, 0.0);
        solid.closed = false;
        solid.shape = ShapeInfo::Shell;
        Ok(self.add_solid(solid))
    }
}

impl KernelProbe for MockKernel {
    fn solid_surfaces(&self, solid: &SolidHandle) -> Result<Vec<SurfaceHandle>, KernelError> {
        Ok(self.solid(solid)?.surfaces.clone())
    }

    fn surface_kind(&self, surface: SurfaceHandle) -> Result<SurfaceKind, KernelError> {
        Ok(self.surface(surface)?.kind())
    }

    fn surface_bounding_box(&self, surface: SurfaceHandle) -> Result<BoundingBox, KernelError> {
        Ok(self.surface(surface)?.bounding_box())
    }

    fn solid_bounding_box(&self, solid: &SolidHandle) -> Result<BoundingBox, KernelError> {
        Ok(self.solid(solid)?.bounds)
    }

    fn closest_point_on_surface(
        &self,
        surface: SurfaceHandle,
        point: Point3d,
    ) -> Result<Point3d, KernelError> {
        match self.surface(surface)? {
            SurfaceGeom::Plane { plane, .. } => Ok(plane.project_point(&point)),
            SurfaceGeom::Cylinder {
                origin,
                axis,
                radius,
                length,
            } => {
                let w = point - *origin;
                let h = w.dot(axis).clamp(0.0, *length);
                let radial = w - *axis * w.dot(axis);
                let dir = radial.normalized().unwrap_or_else(|| axis_frame(*axis).0);
                Ok(*origin + *axis * h + dir * *radius)
            }
            SurfaceGeom::Sphere { center, radius, .. } => {
                let dir = (point - *center).normalized().unwrap_or(Vec3::Z);
                Ok(*center + dir * *radius)
            }
            SurfaceGeom::Revolved {
                profile,
                axis,
                origin,
            } => {
                let w = point - *origin;
                let planar = (w - *axis * w.dot(axis)).normalized();
                let meridian = planar.unwrap_or_else(|| axis_frame(*axis).0);
                let (r_p, h_p) = (radial_distance(&point, *axis, *origin), w.dot(axis));
                let nearest = profile
                    .points
                    .iter()
                    .min_by(|a, b| {
                        meridian_gap(a, *axis, *origin, r_p, h_p)
                            .total_cmp(&meridian_gap(b, *axis, *origin, r_p, h_p))
                    })
                    .ok_or(KernelError::Other {
                        message: "revolved surface with empty profile".into(),
                    })?;
                let r_n = radial_distance(nearest, *axis, *origin);
                let h_n = (*nearest - *origin).dot(axis);
                Ok(*origin + *axis * h_n + meridian * r_n)
            }
            other => Err(KernelError::NotSupported {
                operation: format!("closest point on {:?} surface", other.kind()),
            }),
        }
    }

    fn surface_normal_at(
        &self,
        surface: SurfaceHandle,
        point: Point3d,
    ) -> Result<Vec3, KernelError> {
        match self.surface(surface)? {
            SurfaceGeom::Plane { plane, .. } => Ok(plane.normal()),
            SurfaceGeom::Cylinder { origin, axis, .. } => {
                let w = point - *origin;
                let radial = w - *axis * w.dot(axis);
                Ok(radial.normalized().unwrap_or_else(|| axis_frame(*axis).0))
            }
            SurfaceGeom::Sphere { center, .. } => {
                Ok((point - *center).normalized().unwrap_or(Vec3::Z))
            }
            SurfaceGeom::Revolved { axis, origin, .. } => {
                let w = point - *origin;
                let radial = w - *axis * w.dot(axis);
                Ok(radial.normalized().unwrap_or(*axis))
            }
            other => Err(KernelError::NotSupported {
                operation: format!("normal on {:?} surface", other.kind()),
            }),
        }
    }

    fn surface_boundary_loops(
        &self,
        surface: SurfaceHandle,
    ) -> Result<Vec<Polyline>, KernelError> {
        match self.surface(surface)? {
            SurfaceGeom::Band { lower, upper } => Ok(vec![lower.clone(), upper.clone()]),
            SurfaceGeom::Cylinder {
                origin,
                axis,
                radius,
                length,
            } => {
                let (u, v) = axis_frame(*axis);
                let ring = |center: Point3d| {
                    Polyline::closed_loop(
                        (0..CIRCLE_SAMPLES)
                            .map(|i| {
                                let t = TAU * i as f64 / CIRCLE_SAMPLES as f64;
                                center + u * (radius * t.cos()) + v * (radius * t.sin())
                            })
                            .collect(),
                    )
                };
                Ok(vec![ring(*origin), ring(*origin + *axis * *length)])
            }
            _ => Ok(Vec::new()),
        }
    }

    fn is_closed_solid(&self, solid: &SolidHandle) -> Result<bool, KernelError> {
        Ok(self.solid(solid)?.closed)
    }

    fn solid_volume(&self, solid: &SolidHandle) -> Result<f64, KernelError> {
        Ok(self.solid(solid)?.volume)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunClass {
    Sphere,
    Cylinder,
    Cap,
    General,
}

fn radial_distance(p: &Point3d, axis: Vec3, origin: Point3d) -> f64 {
    let w = *p - origin;
    (w - axis * w.dot(&axis)).length()
}

fn meridian_gap(p: &Point3d, axis: Vec3, origin: Point3d, r: f64, h: f64) -> f64 {
    let dr = radial_distance(p, axis, origin) - r;
    let dh = (*p - origin).dot(&axis) - h;
    (dr * dr + dh * dh).sqrt()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn classify_segment(a: &Point3d, b: &Point3d, axis: Vec3, origin: Point3d, tol: f64) -> RunClass {
    let spherical = (a.distance_to(&origin) - b.distance_to(&origin)).abs() <= tol;
    if spherical {
        return RunClass::Sphere;
    }
    if (radial_distance(a, axis, origin) - radial_distance(b, axis, origin)).abs() <= tol {
        return RunClass::Cylinder;
    }
    if ((*a - origin).dot(&axis) - (*b - origin).dot(&axis)).abs() <= tol {
        return RunClass::Cap;
    }
    RunClass::General
}

/// Partition a profile into maximal runs of segments with the same
/// revolved-surface classification.
fn classify_profile(
    contour: &Polyline,
    axis: Vec3,
    origin: Point3d,
    tol: f64,
) -> Vec<(RunClass, Vec<Point3d>)> {
    let mut runs: Vec<(RunClass, Vec<Point3d>)> = Vec::new();
    for (a, b) in contour.segments() {
        let class = classify_segment(&a, &b, axis, origin, tol);
        match runs.last_mut() {
            Some((current, points)) if *current == class => points.push(b),
            _ => runs.push((class, vec![a, b])),
        }
    }
    runs
}

/// Closed loop where two surfaces meet, with a direction for raising the
/// fillet's second rail off the junction.
fn junction_loop(a: &SurfaceGeom, b: &SurfaceGeom) -> Option<(Polyline, Vec3)> {
    match (a, b) {
        (
            SurfaceGeom::Cylinder {
                origin,
                axis,
                radius,
                length,
            },
            SurfaceGeom::Plane { plane, bounds },
        ) => cylinder_plane_ring(*origin, *axis, *radius, *length, plane, bounds),
        (SurfaceGeom::Plane { plane, bounds }, SurfaceGeom::Cylinder { .. }) => {
            junction_loop(b, a).map(|(ring, _)| (ring, plane_ring_direction(plane, bounds)))
        }
        // Two barrels: parametrize the narrower one, its full circumference
        // crosses the junction so the ring closes.
        (
            SurfaceGeom::Cylinder { radius: ra, .. },
            SurfaceGeom::Cylinder { radius: rb, .. },
        ) if rb < ra => junction_loop(b, a),
        (SurfaceGeom::Cylinder { origin, axis, radius, length }, _)
            if matches!(b, SurfaceGeom::Cylinder { .. } | SurfaceGeom::Sphere { .. }) =>
        {
            let frags =
                tool_cylinder_with_surface(*origin, *axis, *radius, *length, b, 1e-6);
            let loops = connect_curves(&frags, vessel_types::LOOSE_TOLERANCE);
            loops
                .into_iter()
                .find(|l| l.closed)
                .map(|ring| (ring, *axis))
        }
        (_, SurfaceGeom::Cylinder { .. }) => junction_loop(b, a),
        _ => None,
    }
}

fn plane_ring_direction(plane: &Plane, _bounds: &BoundingBox) -> Vec3 {
    plane.normal()
}

fn cylinder_plane_ring(
    origin: Point3d,
    axis: Vec3,
    radius: f64,
    length: f64,
    plane: &Plane,
    bounds: &BoundingBox,
) -> Option<(Polyline, Vec3)> {
    let axial = axis.dot(&plane.normal());
    if axial.abs() < 0.99 {
        return None;
    }
    let s = (plane.origin() - origin).dot(&plane.normal()) / axial;
    if !(0.0..=length).contains(&s) {
        return None;
    }
    let center = origin + axis * s;
    if !bounds_contain(bounds, &center, radius) {
        return None;
    }
    let (u, v) = axis_frame(axis);
    let ring = Polyline::closed_loop(
        (0..CIRCLE_SAMPLES)
            .map(|i| {
                let t = TAU * i as f64 / CIRCLE_SAMPLES as f64;
                center + u * (radius * t.cos()) + v * (radius * t.sin())
            })
            .collect(),
    );
    Some((ring, axis))
}
