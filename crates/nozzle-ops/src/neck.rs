//! Neck construction.
//!
//! The neck is an annular tube drawn on the extrude plane and pushed back
//! through the shell wall: far enough out to give the external standout,
//! deep enough in to give the internal projection plus the wall itself.
//! A hillside attachment shifts the whole profile sideways off the
//! attachment axis within the flush plane.

use tracing::{debug, instrument};
use vessel_types::{Region, SymmetryAxis, MERGE_TOLERANCE};

use geom_kernel::SolidHandle;

use crate::frame::AttachmentFrame;
use crate::types::{BuildError, KernelBundle};

#[derive(Debug, Clone)]
pub struct NeckSpec {
    /// Inner radius of the neck bore.
    pub radius: f64,
    pub thickness: f64,
    /// Standout beyond the shell wall.
    pub external: f64,
    /// Projection inside the vessel.
    pub internal: f64,
    pub shell_thickness: f64,
    /// Sideways shift off the attachment axis, zero for an on-axis neck.
    pub hillside: f64,
    pub symmetry: SymmetryAxis,
    /// Ask the kernel to heal the tube after extrusion.
    pub repair: bool,
}

impl NeckSpec {
    pub fn extrude_length(&self) -> f64 {
        self.external + self.internal + self.shell_thickness
    }

    fn validate(&self) -> Result<(), BuildError> {
        for (name, value) in [
            ("neck radius", self.radius),
            ("neck thickness", self.thickness),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BuildError::invalid(format!(
                    "{name} {value} must be finite and positive"
                )));
            }
        }
        for (name, value) in [
            ("external standout", self.external),
            ("internal projection", self.internal),
            ("shell thickness", self.shell_thickness),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BuildError::invalid(format!(
                    "{name} {value} must be finite and non-negative"
                )));
            }
        }
        if self.extrude_length() <= 0.0 {
            return Err(BuildError::invalid("neck has zero length"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NeckParts {
    /// The annular tube solid.
    pub tube: SolidHandle,
    /// Punch region for opening the bore through shell and pad, sized to
    /// the neck's outer radius.
    pub cut_region: Region,
    pub extrude_length: f64,
}

#[instrument(skip(kb, frame), fields(radius = spec.radius, hillside = spec.hillside))]
pub fn build_neck(
    kb: &mut dyn KernelBundle,
    frame: &AttachmentFrame,
    spec: &NeckSpec,
) -> Result<NeckParts, BuildError> {
    spec.validate()?;
    let extrude_length = spec.extrude_length();

    let plane = &frame.extrude;
    let bore = kb.circle(plane, plane.origin(), spec.radius)?;
    let annulus = kb.offset_curve_to_region(&bore, spec.thickness, MERGE_TOLERANCE)?;
    let cut_circle = kb.offset_curve(&bore, spec.thickness, plane.normal(), MERGE_TOLERANCE)?;

    let lateral = spec.symmetry.lateral_direction(&frame.flush) * spec.hillside;
    let annulus = annulus.translated(lateral);
    let cut_region = Region::single(plane.translated(lateral), cut_circle.translated(lateral));

    let mut tube = kb.extrude(&annulus, extrude_length)?;
    if spec.repair {
        match kb.repair_topology(&tube)? {
            Some(healed) => tube = healed,
            None => debug!("kernel declined to repair the neck tube, keeping the raw body"),
        }
    }

    debug!(extrude_length, "neck tube built");
    Ok(NeckParts {
        tube,
        cut_region,
        extrude_length,
    })
}
