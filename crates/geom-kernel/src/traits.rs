use vessel_types::{BoundingBox, Plane, Point3d, Polyline, Region, Vec3};

use crate::types::{ChamferOutcome, KernelError, SolidHandle, SurfaceHandle, SurfaceKind};

/// Modeling operations on the external geometry kernel.
///
/// Every method takes `&mut self` because kernels track entity state
/// internally; even queries that look read-only may allocate handles.
/// All curve and region inputs live in world coordinates.
pub trait GeometryKernel {
    /// Build a circle of the given radius centered at `center`, lying in
    /// `plane`. Returned as a closed sampled polyline.
    fn circle(
        &mut self,
        plane: &Plane,
        center: Point3d,
        radius: f64,
    ) -> Result<Polyline, KernelError>;

    /// Offset a closed planar curve by `distance` and return the annular
    /// region bounded by the original curve and its offset. Positive
    /// distance offsets outward (away from the enclosed area).
    fn offset_curve_to_region(
        &mut self,
        curve: &Polyline,
        distance: f64,
        tolerance: f64,
    ) -> Result<Region, KernelError>;

    /// Offset a planar curve by `distance` within the plane whose normal is
    /// `plane_normal`. Positive distance offsets outward.
    fn offset_curve(
        &mut self,
        curve: &Polyline,
        distance: f64,
        plane_normal: Vec3,
        tolerance: f64,
    ) -> Result<Polyline, KernelError>;

    /// Extrude a planar region along its plane normal by `length`.
    fn extrude(&mut self, region: &Region, length: f64) -> Result<SolidHandle, KernelError>;

    /// Revolve a planar region around `axis` through `origin` by `angle`
    /// radians starting at `start_angle`.
    fn revolve(
        &mut self,
        region: &Region,
        start_angle: f64,
        angle: f64,
        axis: Vec3,
        origin: Point3d,
        tolerance: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Revolve an open profile curve into a shell solid (thin-walled
    /// surface of revolution treated as a solid body).
    fn revolve_curve(
        &mut self,
        profile: &Polyline,
        start_angle: f64,
        angle: f64,
        axis: Vec3,
        origin: Point3d,
        tolerance: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Intersect two trimmed surfaces. Returns the intersection curves as
    /// polyline fragments; callers are expected to stitch fragments into
    /// loops themselves. An empty result means the surfaces do not meet.
    fn intersect_surfaces(
        &mut self,
        a: SurfaceHandle,
        b: SurfaceHandle,
        tolerance: f64,
    ) -> Result<Vec<Polyline>, KernelError>;

    /// Section a solid with a plane, returning the section curves.
    fn section_solid(
        &mut self,
        solid: &SolidHandle,
        plane: &Plane,
        tolerance: f64,
    ) -> Result<Vec<Polyline>, KernelError>;

    /// Section a single surface with a plane.
    fn section_surface(
        &mut self,
        surface: SurfaceHandle,
        plane: &Plane,
        tolerance: f64,
    ) -> Result<Vec<Polyline>, KernelError>;

    /// Subtract `tool` from `target`. Returns the resulting pieces; an
    /// empty vector means the subtraction produced nothing (disjoint
    /// bodies or total consumption), which is not itself an error.
    fn boolean_difference(
        &mut self,
        target: &SolidHandle,
        tool: &SolidHandle,
    ) -> Result<Vec<SolidHandle>, KernelError>;

    /// Whether two solids overlap at all. Used to decide if an empty
    /// boolean result is benign.
    fn booleans_intersect(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<bool, KernelError>;

    /// Cut a prismatic hole: extrude `region` by `length` along its plane
    /// normal and subtract the prism from `solid`, returning the cut body.
    fn extrude_remove(
        &mut self,
        solid: &SolidHandle,
        region: &Region,
        length: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Chamfer the junction between two surface sets with the given leg
    /// sizes. Surfaces that do not meet yield an empty outcome.
    fn chamfer(
        &mut self,
        surfaces_a: &[SurfaceHandle],
        surfaces_b: &[SurfaceHandle],
        size_a: f64,
        size_b: f64,
    ) -> Result<ChamferOutcome, KernelError>;

    /// Loft a solid through a sequence of closed section curves.
    fn loft(&mut self, sections: &[Polyline]) -> Result<SolidHandle, KernelError>;

    /// Attempt to heal a defective body. `Ok(Some(_))` is the repaired
    /// solid, `Ok(None)` means the kernel declined to repair.
    fn repair_topology(
        &mut self,
        solid: &SolidHandle,
    ) -> Result<Option<SolidHandle>, KernelError>;

    /// Reverse the surface normals of every face of a solid.
    fn flip_normals(&mut self, solid: &SolidHandle) -> Result<SolidHandle, KernelError>;

    /// Duplicate a solid so the copy can be consumed independently.
    fn clone_solid(&mut self, solid: &SolidHandle) -> Result<SolidHandle, KernelError>;

    /// Promote a standalone surface to a (zero-thickness) solid body so it
    /// can participate in assembly output.
    fn surface_to_solid(&mut self, surface: SurfaceHandle) -> Result<SolidHandle, KernelError>;
}

/// Read-only interrogation of kernel entities. Split from
/// [`GeometryKernel`] so analysis passes can state they never mutate.
pub trait KernelProbe {
    fn solid_surfaces(&self, solid: &SolidHandle) -> Result<Vec<SurfaceHandle>, KernelError>;

    fn surface_kind(&self, surface: SurfaceHandle) -> Result<SurfaceKind, KernelError>;

    fn surface_bounding_box(&self, surface: SurfaceHandle) -> Result<BoundingBox, KernelError>;

    fn solid_bounding_box(&self, solid: &SolidHandle) -> Result<BoundingBox, KernelError>;

    /// Closest point on the surface to `point`, in world coordinates.
    fn closest_point_on_surface(
        &self,
        surface: SurfaceHandle,
        point: Point3d,
    ) -> Result<Point3d, KernelError>;

    /// Outward surface normal at (the closest point to) `point`.
    fn surface_normal_at(
        &self,
        surface: SurfaceHandle,
        point: Point3d,
    ) -> Result<Vec3, KernelError>;

    /// Boundary loops of a trimmed surface as polylines.
    fn surface_boundary_loops(
        &self,
        surface: SurfaceHandle,
    ) -> Result<Vec<Polyline>, KernelError>;

    fn is_closed_solid(&self, solid: &SolidHandle) -> Result<bool, KernelError>;

    fn solid_volume(&self, solid: &SolidHandle) -> Result<f64, KernelError>;
}
