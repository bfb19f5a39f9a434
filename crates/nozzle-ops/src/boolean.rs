//! Boolean trims and punch cuts.
//!
//! Kernel booleans on curved bodies are the least reliable step of the
//! whole build, so every trim is wrapped with an explicit policy: a
//! result with pieces keeps one by ranking, an empty result against a
//! disjoint tool leaves the body alone, and an empty result against an
//! overlapping tool is refused rather than silently dropping the pad.

use tracing::{debug, instrument};
use vessel_types::Region;

use geom_kernel::SolidHandle;

use crate::rank::{select_piece, KeepSide};
use crate::types::{BuildError, KernelBundle};

/// Subtract `tool` from `target`, keeping the piece on the requested
/// side. A tool that never touches the target is a no-op.
#[instrument(skip(kb, target, tool), fields(keep = ?keep))]
pub fn trim_solid(
    kb: &mut dyn KernelBundle,
    target: &SolidHandle,
    tool: &SolidHandle,
    keep: KeepSide,
) -> Result<SolidHandle, BuildError> {
    let pieces = kb.boolean_difference(target, tool)?;
    if pieces.is_empty() {
        if kb.booleans_intersect(target, tool)? {
            return Err(BuildError::AmbiguousTrim {
                reason: "overlapping trim consumed the whole body".into(),
            });
        }
        debug!("trim tool is disjoint, keeping the body unchanged");
        return Ok(target.clone());
    }
    debug!(pieces = pieces.len(), "trim produced pieces");
    select_piece(kb.as_probe(), &pieces, keep)
}

/// Open a prismatic bore through a body.
pub fn punch_cut(
    kb: &mut dyn KernelBundle,
    solid: &SolidHandle,
    bore: &Region,
    depth: f64,
) -> Result<SolidHandle, BuildError> {
    let cut = kb.extrude_remove(solid, bore, depth)?;
    Ok(cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom_kernel::{GeometryKernel, MockKernel};
    use vessel_types::{Plane, Point3d, Vec3};

    fn disc(kernel: &mut MockKernel, center: Point3d, radius: f64, depth: f64) -> SolidHandle {
        let plane = Plane::new(center, Vec3::Z);
        let rim = kernel.circle(&plane, center, radius).unwrap();
        let region = Region::single(plane, rim);
        kernel.extrude(&region, depth).unwrap()
    }

    #[test]
    fn overlapping_trim_keeps_a_ranked_piece() {
        let mut kernel = MockKernel::new();
        let body = disc(&mut kernel, Point3d::ORIGIN, 3.0, 2.0);
        let tool = disc(&mut kernel, Point3d::ORIGIN, 1.0, 5.0);
        let kept = trim_solid(&mut kernel, &body, &tool, KeepSide::Outermost).unwrap();
        assert_ne!(kept, body);
        assert_eq!(kernel.trim_count(&kept), 1);
    }

    #[test]
    fn disjoint_trim_is_a_no_op() {
        let mut kernel = MockKernel::new();
        let body = disc(&mut kernel, Point3d::ORIGIN, 3.0, 2.0);
        let tool = disc(&mut kernel, Point3d::new(100.0, 0.0, 0.0), 1.0, 2.0);
        let kept = trim_solid(&mut kernel, &body, &tool, KeepSide::Innermost).unwrap();
        assert_eq!(kept, body);
    }

    #[test]
    fn punch_cut_records_the_bore() {
        let mut kernel = MockKernel::new();
        let body = disc(&mut kernel, Point3d::ORIGIN, 3.0, 2.0);
        let plane = Plane::new(Point3d::new(0.0, 0.0, 2.0), -Vec3::Z);
        let rim = kernel.circle(&plane, plane.origin(), 1.2).unwrap();
        let bore = Region::single(plane, rim);
        let cut = punch_cut(&mut kernel, &body, &bore, 2.0).unwrap();
        let records = kernel.cut_records(&cut);
        assert_eq!(records.len(), 1);
        assert!((records[0].radius - 1.2).abs() < 1e-6);
    }
}
