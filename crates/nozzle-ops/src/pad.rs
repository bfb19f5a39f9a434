//! Reinforcement pad construction.
//!
//! The pad is a thick washer seated on the shell wall around the neck.
//! Its flush plane sits at the orientation loop center with the probed
//! wall normal; the blank is drawn out at the external standout and
//! extruded back toward the vessel deep enough to reach past the inner
//! wall, then trimmed between the wall offsets by the boolean stage.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use vessel_types::{Plane, Region, MERGE_TOLERANCE};

use geom_kernel::{connect_curves, SolidHandle};

use crate::intersect::IntersectionOutcome;
use crate::types::{BuildError, KernelBundle};

/// How the pad rim is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadStyle {
    /// A circle of the pad radius about the attachment point.
    ConstantRadius,
    /// The neck's own outline pushed outward by the pad radius, keeping
    /// a constant rim width around an obliquely attached neck.
    ConstantWidth,
}

#[derive(Debug, Clone)]
pub struct PadSpec {
    /// Rim radius: the blank radius for `ConstantRadius`, the rim width
    /// for `ConstantWidth`.
    pub radius: f64,
    pub thickness: f64,
    pub style: PadStyle,
    /// Standout of the pad seat beyond the shell wall.
    pub external: f64,
    /// Ask the kernel to heal the blank's topology after extrusion.
    pub repair: bool,
}

impl PadSpec {
    fn validate(&self) -> Result<(), BuildError> {
        for (name, value) in [("pad radius", self.radius), ("pad thickness", self.thickness)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BuildError::invalid(format!(
                    "{name} {value} must be finite and positive"
                )));
            }
        }
        Ok(())
    }
}

#[instrument(skip(kb, intersections, uncut_neck), fields(style = ?spec.style, radius = spec.radius))]
pub fn build_pad(
    kb: &mut dyn KernelBundle,
    intersections: &IntersectionOutcome,
    uncut_neck: &SolidHandle,
    spec: &PadSpec,
    neck_extrude_length: f64,
) -> Result<SolidHandle, BuildError> {
    spec.validate()?;

    let flush = Plane::new(intersections.pad_origin, intersections.pad_normal);
    // Face the vessel so the extrusion runs back through the wall.
    let seat = flush.flipped();

    let rim = match spec.style {
        PadStyle::ConstantRadius => kb.circle(&seat, seat.origin(), spec.radius)?,
        PadStyle::ConstantWidth => {
            let sections = kb.section_solid(uncut_neck, &flush, MERGE_TOLERANCE)?;
            let outline = connect_curves(&sections, MERGE_TOLERANCE)
                .into_iter()
                .filter(|c| c.closed)
                .max_by(|a, b| {
                    a.start_point()
                        .distance_to(&flush.origin())
                        .total_cmp(&b.start_point().distance_to(&flush.origin()))
                })
                .ok_or_else(|| BuildError::DegenerateIntersection {
                    reason: "pad plane misses the neck outline".into(),
                })?;
            kb.offset_curve(&outline, spec.radius, flush.normal(), MERGE_TOLERANCE)?
        }
    };

    let blank = Region::single(seat, rim).translated(intersections.pad_normal * spec.external);
    let depth = neck_extrude_length + spec.thickness;
    let mut pad = kb.extrude(&blank, depth)?;
    if spec.repair {
        match kb.repair_topology(&pad)? {
            Some(healed) => pad = healed,
            None => debug!("kernel declined to repair the pad blank, keeping the raw body"),
        }
    }
    debug!(depth, "pad blank extruded");
    Ok(pad)
}
