//! End-to-end nozzle attachment pipeline.
//!
//! `run_case` drives the stage builders in [`nozzle_ops`] in order:
//! attachment frame, shell, neck, intersection resolution, pad blank,
//! wall-offset trim tools, pad trims, welds, and finally the bore punch
//! through pad and shell. Every kernel interaction goes through the
//! [`KernelBundle`] traits, so the whole pipeline runs against the mock
//! kernel in tests exactly as it would against a production binding.

pub mod case;

use tracing::{info, instrument};
use vessel_types::{Point3d, Vec3};

use geom_kernel::SolidHandle;
use nozzle_ops::{
    build_neck, build_offset_shell, build_pad, derive_attachment_frame, find_center, punch_cut,
    resolve_intersections, trim_solid, BuildError, IntersectSpec, KeepSide, KernelBundle,
    NeckSpec, PadSpec, SolidWeldStrategy, SurfaceWeldStrategy, WeldStrategy,
};

pub use case::{build_shell, CaseParameters, CasePreset, ShellForm, WeldChoice};

/// Fillet leg size as a fraction of the pad thickness.
const WELD_SIZE_RATIO: f64 = 0.7;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("unknown case preset: {name}")]
    InvalidCase { name: String },
}

/// Finished geometry for one nozzle case.
#[derive(Debug, Clone)]
pub struct NozzleResult {
    pub shell: SolidHandle,
    pub neck: SolidHandle,
    pub pad: SolidHandle,
    /// Weld beads, empty when welds are omitted or infeasible.
    pub welds: Vec<SolidHandle>,
    /// Center of the bore opening on the extrude plane.
    pub reference_center: Point3d,
    /// Outward wall normal the pad is seated along.
    pub pad_normal: Vec3,
}

fn build_welds(
    kb: &mut dyn KernelBundle,
    strategy: &dyn WeldStrategy,
    shell: &SolidHandle,
    pad: &SolidHandle,
    neck: &SolidHandle,
    size: f64,
) -> Result<Vec<SolidHandle>, BuildError> {
    let mut welds = Vec::new();
    welds.extend(strategy.build_weld(kb, pad, neck, size, false)?);
    welds.extend(strategy.build_weld(kb, shell, pad, size, false)?);
    welds.extend(strategy.build_weld(kb, shell, pad, size, true)?);
    Ok(welds)
}

#[instrument(skip(kb, params), fields(theta = params.theta, beta = params.beta))]
pub fn run_case(
    kb: &mut dyn KernelBundle,
    params: &CaseParameters,
) -> Result<NozzleResult, PipelineError> {
    let frame = derive_attachment_frame(
        params.reference,
        params.theta,
        params.beta,
        params.convention,
        params.external + params.shell_thickness,
    )?;
    let shell = build_shell(kb, params)?;

    let neck_spec = NeckSpec {
        radius: params.neck_radius,
        thickness: params.neck_thickness,
        external: params.external,
        internal: params.internal,
        shell_thickness: params.shell_thickness,
        hillside: params.hillside,
        symmetry: params.symmetry,
        repair: params.repair,
    };
    let neck = build_neck(kb, &frame, &neck_spec)?;
    // The pad outline stage sections the tube as-built, before any trims
    // land on it.
    let uncut_neck = kb.clone_solid(&neck.tube).map_err(BuildError::from)?;

    let has_lateral = params.has_lateral_component();
    let intersections = resolve_intersections(
        kb,
        &shell,
        &neck.tube,
        &IntersectSpec {
            symmetry: params.symmetry,
            has_lateral,
            theta: params.theta,
        },
    )?;

    let pad_spec = PadSpec {
        radius: params.pad_radius,
        thickness: params.pad_thickness,
        style: params.pad_style,
        external: params.external,
        repair: params.repair,
    };
    let pad = build_pad(kb, &intersections, &uncut_neck, &pad_spec, neck.extrude_length)?;

    // Trim the oversize pad blank between the wall itself and the wall
    // pushed out by the pad thickness.
    let seat_tool = build_offset_shell(
        kb,
        &intersections.walls,
        intersections.rel_origin,
        0.0,
        !intersections.steep,
    )?;
    let cap_tool = build_offset_shell(
        kb,
        &intersections.walls,
        intersections.rel_origin,
        params.pad_thickness,
        intersections.steep,
    )?;
    let pad = trim_solid(kb, &pad, &seat_tool, KeepSide::Outermost)?;
    let pad = trim_solid(kb, &pad, &cap_tool, KeepSide::Innermost)?;

    let weld_size = params.pad_thickness * WELD_SIZE_RATIO;
    let welds = match params.welds {
        WeldChoice::Omit => Vec::new(),
        WeldChoice::Surface => build_welds(
            kb,
            &SurfaceWeldStrategy,
            &shell,
            &pad,
            &neck.tube,
            weld_size,
        )?,
        WeldChoice::Solid => build_welds(
            kb,
            &SolidWeldStrategy,
            &shell,
            &pad,
            &neck.tube,
            weld_size,
        )?,
    };

    // Open the bore last so the welds see the full bodies.
    let pad = punch_cut(kb, &pad, &neck.cut_region, neck.extrude_length)?;
    let shell = punch_cut(kb, &shell, &neck.cut_region, neck.extrude_length)?;

    let reference_center = find_center(neck.cut_region.outer_contour(), has_lateral);
    info!(
        welds = welds.len(),
        cx = reference_center.x,
        cy = reference_center.y,
        cz = reference_center.z,
        "nozzle case built"
    );
    Ok(NozzleResult {
        shell,
        neck: neck.tube,
        pad,
        welds,
        reference_center,
        pad_normal: intersections.pad_normal,
    })
}
