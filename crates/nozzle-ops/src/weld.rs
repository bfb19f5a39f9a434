//! Weld fillet construction.
//!
//! Welds run along the junction rings where one body meets another: the
//! neck emerging through the pad seat, and the pad rim landing on the
//! shell wall (outside and inside). The kernel's chamfer hands back
//! fillet surfaces plus the leftover faces it trimmed against; what gets
//! made of those differs by strategy. A junction the kernel cannot
//! fillet yields no weld rather than an error, matching how fabrication
//! drawings simply omit an impossible fillet.

use tracing::{debug, instrument};
use vessel_types::{Polyline, LOOSE_TOLERANCE};

use geom_kernel::{connect_curves, ChamferOutcome, SolidHandle, SurfaceHandle};

use crate::rank;
use crate::types::{BuildError, KernelBundle};

/// How chamfer output is turned into weld bodies.
pub trait WeldStrategy {
    fn build_weld(
        &self,
        kb: &mut dyn KernelBundle,
        base: &SolidHandle,
        attached: &SolidHandle,
        size: f64,
        inner: bool,
    ) -> Result<Vec<SolidHandle>, BuildError>;
}

/// Keep each fillet surface as its own sheet body.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceWeldStrategy;

/// Stitch the fillet and leftover boundaries into rings and loft one
/// solid bead through them. Any open ring aborts to an empty weld.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidWeldStrategy;

/// Faces presented to the chamfer. The base contributes its selected
/// wall plus its planar faces (the junction often lies on a cap), the
/// attached body only its outer wall.
fn junction_faces(
    kb: &mut dyn KernelBundle,
    base: &SolidHandle,
    attached: &SolidHandle,
    inner: bool,
) -> Result<(Vec<SurfaceHandle>, Vec<SurfaceHandle>), BuildError> {
    let probe = kb.as_probe();
    let base_curved = rank::curved_surfaces(probe, base)?;
    let base_wall = if inner {
        rank::narrowest_surface(probe, &base_curved)?
    } else {
        rank::widest_surface(probe, &base_curved)?
    };
    let mut base_faces: Vec<SurfaceHandle> = base_wall.into_iter().collect();
    for face in probe.solid_surfaces(base)? {
        if !base_curved.contains(&face) {
            base_faces.push(face);
        }
    }

    let attached_curved = rank::curved_surfaces(probe, attached)?;
    let attached_faces: Vec<SurfaceHandle> =
        rank::widest_surface(probe, &attached_curved)?.into_iter().collect();
    Ok((base_faces, attached_faces))
}

fn run_chamfer(
    kb: &mut dyn KernelBundle,
    base: &SolidHandle,
    attached: &SolidHandle,
    size: f64,
    inner: bool,
) -> Result<Option<ChamferOutcome>, BuildError> {
    if !size.is_finite() || size <= 0.0 {
        return Err(BuildError::invalid(format!(
            "weld size {size} must be finite and positive"
        )));
    }
    let (base_faces, attached_faces) = junction_faces(kb, base, attached, inner)?;
    if base_faces.is_empty() || attached_faces.is_empty() {
        return Ok(None);
    }
    let outcome = kb.chamfer(&base_faces, &attached_faces, size, size)?;
    if outcome.is_empty() {
        debug!("no junction between the bodies, weld omitted");
        return Ok(None);
    }
    Ok(Some(outcome))
}

impl WeldStrategy for SurfaceWeldStrategy {
    #[instrument(skip(self, kb, base, attached), fields(size, inner))]
    fn build_weld(
        &self,
        kb: &mut dyn KernelBundle,
        base: &SolidHandle,
        attached: &SolidHandle,
        size: f64,
        inner: bool,
    ) -> Result<Vec<SolidHandle>, BuildError> {
        let Some(outcome) = run_chamfer(kb, base, attached, size, inner)? else {
            return Ok(Vec::new());
        };
        let mut welds = Vec::with_capacity(outcome.fillet_surfaces.len());
        for fillet in outcome.fillet_surfaces {
            welds.push(kb.surface_to_solid(fillet)?);
        }
        debug!(welds = welds.len(), "surface welds built");
        Ok(welds)
    }
}

impl WeldStrategy for SolidWeldStrategy {
    #[instrument(skip(self, kb, base, attached), fields(size, inner))]
    fn build_weld(
        &self,
        kb: &mut dyn KernelBundle,
        base: &SolidHandle,
        attached: &SolidHandle,
        size: f64,
        inner: bool,
    ) -> Result<Vec<SolidHandle>, BuildError> {
        let Some(outcome) = run_chamfer(kb, base, attached, size, inner)? else {
            return Ok(Vec::new());
        };
        let mut boundaries: Vec<Polyline> = Vec::new();
        for face in outcome
            .fillet_surfaces
            .iter()
            .chain(&outcome.leftover_a)
            .chain(&outcome.leftover_b)
        {
            boundaries.extend(kb.as_probe().surface_boundary_loops(*face)?);
        }
        let rings = connect_curves(&boundaries, LOOSE_TOLERANCE);
        if rings.len() < 2 || rings.iter().any(|r| !r.closed) {
            debug!(rings = rings.len(), "weld boundaries do not close, weld omitted");
            return Ok(Vec::new());
        }
        let bead = kb.loft(&rings)?;
        debug!("solid weld lofted");
        Ok(vec![bead])
    }
}
