//! Case parameters and the stock analysis presets.
//!
//! A case bundles everything that locates and sizes one nozzle: the
//! vessel wall to pierce, the attachment angles and hillside offset, the
//! neck and pad sections, and which welds to draw. The presets are the
//! standing regression cases the pipeline is exercised against.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vessel_types::{Plane, Point3d, Polyline, Region, SymmetryAxis, Vec3};

use geom_kernel::SolidHandle;
use nozzle_ops::{BuildError, KernelBundle, NormalConvention, PadStyle};

use crate::PipelineError;

/// Points per quarter arc when sampling a spherical head profile.
const HEAD_ARC_SAMPLES: usize = 64;

/// The vessel wall the nozzle lands on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShellForm {
    /// Straight cylindrical course around the z axis, base at z = 0.
    Course { radius: f64, height: f64 },
    /// Hemispherical head centered on the origin, equator at z = 0.
    SphericalHead { inner_radius: f64 },
}

/// Which welds, if any, get drawn at the three junctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeldChoice {
    Omit,
    Surface,
    Solid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseParameters {
    pub shell_form: ShellForm,
    pub shell_thickness: f64,
    /// Attachment point on the wall the flush plane is anchored at.
    pub reference: Point3d,
    /// Azimuth of the attachment around the vessel axis.
    pub theta: f64,
    /// Second attachment angle; its meaning depends on `convention`.
    pub beta: f64,
    pub convention: NormalConvention,
    /// Sideways offset of the neck off the attachment axis.
    pub hillside: f64,
    pub symmetry: SymmetryAxis,
    /// Neck standout beyond the wall.
    pub external: f64,
    /// Neck projection inside the vessel.
    pub internal: f64,
    pub neck_radius: f64,
    pub neck_thickness: f64,
    pub pad_radius: f64,
    pub pad_thickness: f64,
    pub pad_style: PadStyle,
    pub welds: WeldChoice,
    /// Ask the kernel to heal the neck tube after extrusion.
    pub repair: bool,
}

impl CaseParameters {
    /// Whether sampled centers keep their lateral component. An on-axis
    /// neck is symmetric about the case plane and gets it pinned to zero.
    pub fn has_lateral_component(&self) -> bool {
        let lateral_family = self.symmetry == SymmetryAxis::Y;
        (self.hillside != 0.0 && lateral_family)
            || (self.theta != 0.0 && !(self.hillside == 0.0 && !lateral_family))
    }
}

/// Build the case's shell solid against the kernel.
pub fn build_shell(
    kb: &mut dyn KernelBundle,
    params: &CaseParameters,
) -> Result<SolidHandle, BuildError> {
    let thickness = params.shell_thickness;
    if !thickness.is_finite() || thickness <= 0.0 {
        return Err(BuildError::invalid(format!(
            "shell thickness {thickness} must be finite and positive"
        )));
    }
    match params.shell_form {
        ShellForm::Course { radius, height } => {
            if radius <= 0.0 || height <= 0.0 {
                return Err(BuildError::invalid("course radius and height must be positive"));
            }
            let plane = Plane::xy();
            let wall = kb.circle(&plane, Point3d::ORIGIN, radius)?;
            let section = kb.offset_curve_to_region(&wall, thickness, vessel_types::MERGE_TOLERANCE)?;
            Ok(kb.extrude(&section, height)?)
        }
        ShellForm::SphericalHead { inner_radius } => {
            if inner_radius <= 0.0 {
                return Err(BuildError::invalid("head radius must be positive"));
            }
            let outer_radius = inner_radius + thickness;
            let profile = head_profile(inner_radius, outer_radius);
            let region = Region::single(Plane::xz(), profile);
            Ok(kb.revolve(
                &region,
                0.0,
                std::f64::consts::TAU,
                Vec3::Z,
                Point3d::ORIGIN,
                vessel_types::MERGE_TOLERANCE,
            )?)
        }
    }
}

/// Closed meridian profile of a hemispherical head wall: up the outer
/// arc from the equator to the pole, down the axis, and back along the
/// inner arc.
fn head_profile(inner_radius: f64, outer_radius: f64) -> Polyline {
    let quarter = std::f64::consts::FRAC_PI_2;
    let mut points = Vec::with_capacity(2 * (HEAD_ARC_SAMPLES + 1));
    for i in 0..=HEAD_ARC_SAMPLES {
        let phi = quarter * i as f64 / HEAD_ARC_SAMPLES as f64;
        points.push(Point3d::new(
            outer_radius * phi.cos(),
            0.0,
            outer_radius * phi.sin(),
        ));
    }
    for i in (0..=HEAD_ARC_SAMPLES).rev() {
        let phi = quarter * i as f64 / HEAD_ARC_SAMPLES as f64;
        points.push(Point3d::new(
            inner_radius * phi.cos(),
            0.0,
            inner_radius * phi.sin(),
        ));
    }
    Polyline::closed_loop(points)
}

/// The standing regression cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CasePreset {
    /// Radial nozzle on a cylindrical course.
    Base,
    /// Oblique nozzle with a constant-width pad rim.
    ConstantWidth,
    /// Crown nozzle on a spherical head.
    Sphere,
    /// Tilted, hillside-offset nozzle on a spherical head.
    SphereWithBeta,
    /// The base case with surface weld fillets at all three junctions.
    Fillets,
}

impl CasePreset {
    pub fn parameters(&self) -> CaseParameters {
        let base = CaseParameters {
            shell_form: ShellForm::Course {
                radius: 20.0,
                height: 60.0,
            },
            shell_thickness: 1.0,
            reference: Point3d::new(20.0, 0.0, 30.0),
            theta: 0.0,
            beta: std::f64::consts::FRAC_PI_2,
            convention: NormalConvention::Polar,
            hillside: 0.0,
            symmetry: SymmetryAxis::Y,
            external: 7.0,
            internal: 2.0,
            neck_radius: 1.0,
            neck_thickness: 0.2,
            pad_radius: 3.0,
            pad_thickness: 0.5,
            pad_style: PadStyle::ConstantRadius,
            welds: WeldChoice::Omit,
            repair: true,
        };
        match self {
            CasePreset::Base => base,
            CasePreset::ConstantWidth => CaseParameters {
                beta: std::f64::consts::FRAC_PI_2 - 0.1,
                pad_style: PadStyle::ConstantWidth,
                ..base
            },
            CasePreset::Sphere => CaseParameters {
                shell_form: ShellForm::SphericalHead { inner_radius: 30.0 },
                reference: Point3d::new(0.0, 0.0, 30.0),
                beta: 0.0,
                symmetry: SymmetryAxis::X,
                neck_radius: 2.0,
                neck_thickness: 0.5,
                pad_radius: 5.0,
                ..base
            },
            CasePreset::SphereWithBeta => CaseParameters {
                beta: 0.2,
                hillside: 4.0,
                ..CasePreset::Sphere.parameters()
            },
            CasePreset::Fillets => CaseParameters {
                welds: WeldChoice::Surface,
                ..base
            },
        }
    }
}

impl FromStr for CasePreset {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base" => Ok(CasePreset::Base),
            "constant-width" => Ok(CasePreset::ConstantWidth),
            "sphere" => Ok(CasePreset::Sphere),
            "sphere-with-beta" => Ok(CasePreset::SphereWithBeta),
            "fillets" => Ok(CasePreset::Fillets),
            other => Err(PipelineError::InvalidCase {
                name: other.to_string(),
            }),
        }
    }
}
