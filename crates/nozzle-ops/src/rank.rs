//! Ranking helpers for picking among kernel-returned candidates.
//!
//! Booleans and sectioning hand back unordered pieces and curves; the
//! pipeline's selection rules all reduce to ordering by a simple scalar
//! measure, collected here under intention-revealing names.

use geom_kernel::{KernelProbe, SolidHandle, SurfaceHandle, SurfaceKind};
use vessel_types::Point3d;

use crate::types::BuildError;

/// Which end of the ranking a trim keeps, measured by the greatest
/// coordinate any point of the piece's bounding box reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepSide {
    Outermost,
    Innermost,
}

/// Pick one piece out of a boolean result. Pieces are ranked by the
/// maximum coordinate of their bounding box; the outermost piece reaches
/// the furthest out, the innermost the least.
pub fn select_piece(
    probe: &dyn KernelProbe,
    pieces: &[SolidHandle],
    keep: KeepSide,
) -> Result<SolidHandle, BuildError> {
    let mut ranked: Vec<(f64, &SolidHandle)> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let reach = probe.solid_bounding_box(piece)?.max_coordinate();
        ranked.push((reach, piece));
    }
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    let chosen = match keep {
        KeepSide::Outermost => ranked.first(),
        KeepSide::Innermost => ranked.last(),
    };
    chosen
        .map(|(_, h)| (*h).clone())
        .ok_or_else(|| BuildError::AmbiguousTrim {
            reason: "no pieces to select from".into(),
        })
}

/// Non-planar boundary surfaces of a solid.
pub fn curved_surfaces(
    probe: &dyn KernelProbe,
    solid: &SolidHandle,
) -> Result<Vec<SurfaceHandle>, BuildError> {
    let mut out = Vec::new();
    for surface in probe.solid_surfaces(solid)? {
        if probe.surface_kind(surface)? != SurfaceKind::Planar {
            out.push(surface);
        }
    }
    Ok(out)
}

/// The surface whose bounding box has the longest diagonal. On a tube
/// this is the outer barrel.
pub fn widest_surface(
    probe: &dyn KernelProbe,
    surfaces: &[SurfaceHandle],
) -> Result<Option<SurfaceHandle>, BuildError> {
    let mut best: Option<(f64, SurfaceHandle)> = None;
    for &surface in surfaces {
        let diagonal = probe.surface_bounding_box(surface)?.diagonal();
        if best.map(|(d, _)| diagonal > d).unwrap_or(true) {
            best = Some((diagonal, surface));
        }
    }
    Ok(best.map(|(_, s)| s))
}

/// The surface whose bounding box has the shortest diagonal. On a tube
/// this is the inner barrel.
pub fn narrowest_surface(
    probe: &dyn KernelProbe,
    surfaces: &[SurfaceHandle],
) -> Result<Option<SurfaceHandle>, BuildError> {
    let mut best: Option<(f64, SurfaceHandle)> = None;
    for &surface in surfaces {
        let diagonal = probe.surface_bounding_box(surface)?.diagonal();
        if best.map(|(d, _)| diagonal < d).unwrap_or(true) {
            best = Some((diagonal, surface));
        }
    }
    Ok(best.map(|(_, s)| s))
}

/// The surface farthest from `anchor`, measured to the closest point on
/// each surface. With the anchor inside the wall stack this separates the
/// outer wall from the inner.
pub fn farthest_surface_from(
    probe: &dyn KernelProbe,
    surfaces: &[SurfaceHandle],
    anchor: Point3d,
) -> Result<Option<SurfaceHandle>, BuildError> {
    let mut best: Option<(f64, SurfaceHandle)> = None;
    for &surface in surfaces {
        let nearest = probe.closest_point_on_surface(surface, anchor)?;
        let distance = anchor.distance_to(&nearest);
        if best.map(|(d, _)| distance > d).unwrap_or(true) {
            best = Some((distance, surface));
        }
    }
    Ok(best.map(|(_, s)| s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom_kernel::{GeometryKernel, MockKernel};
    use vessel_types::{Plane, Point3d, Vec3};

    fn tube(kernel: &mut MockKernel, center: Point3d, radius: f64, length: f64) -> SolidHandle {
        let plane = Plane::new(center, Vec3::Z);
        let circle = kernel.circle(&plane, center, radius).unwrap();
        let region = kernel.offset_curve_to_region(&circle, 0.5, 1e-4).unwrap();
        kernel.extrude(&region, length).unwrap()
    }

    #[test]
    fn outermost_and_innermost_pick_opposite_pieces() {
        let mut kernel = MockKernel::new();
        let near = tube(&mut kernel, Point3d::ORIGIN, 1.0, 2.0);
        let far = tube(&mut kernel, Point3d::new(50.0, 0.0, 0.0), 1.0, 2.0);
        let pieces = vec![near.clone(), far.clone()];

        let outer = select_piece(&kernel, &pieces, KeepSide::Outermost).unwrap();
        assert_eq!(outer, far);
        let inner = select_piece(&kernel, &pieces, KeepSide::Innermost).unwrap();
        assert_eq!(inner, near);
    }

    #[test]
    fn selecting_from_nothing_is_an_error() {
        let kernel = MockKernel::new();
        assert!(select_piece(&kernel, &[], KeepSide::Outermost).is_err());
    }

    #[test]
    fn farthest_surface_from_axis_is_the_outer_barrel() {
        let mut kernel = MockKernel::new();
        let solid = tube(&mut kernel, Point3d::ORIGIN, 5.0, 3.0);
        let curved = curved_surfaces(&kernel, &solid).unwrap();
        let outer = farthest_surface_from(&kernel, &curved, Point3d::new(0.0, 0.0, 1.5))
            .unwrap()
            .unwrap();
        let bb = kernel.surface_bounding_box(outer).unwrap();
        assert!((bb.max.x - 5.5).abs() < 1e-6);
        let narrow = narrowest_surface(&kernel, &curved).unwrap().unwrap();
        let nb = kernel.surface_bounding_box(narrow).unwrap();
        assert!((nb.max.x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn widest_surface_of_a_tube_is_the_outer_barrel() {
        let mut kernel = MockKernel::new();
        let solid = tube(&mut kernel, Point3d::ORIGIN, 5.0, 3.0);
        let curved = curved_surfaces(&kernel, &solid).unwrap();
        assert_eq!(curved.len(), 2);
        let widest = widest_surface(&kernel, &curved).unwrap().unwrap();
        let bb = kernel.surface_bounding_box(widest).unwrap();
        assert!((bb.max.x - 5.5).abs() < 1e-6);
    }
}
