//! Structured case summaries for diagnostics.
//!
//! A report distills a finished case into plain numbers a failing CI run
//! can print: per-body volume, closedness, extents and bore radii, plus
//! the case-level center and normal.

use serde::Serialize;

use geom_kernel::{KernelProbe, MockKernel, SolidHandle};
use nozzle_pipeline::NozzleResult;

use crate::helpers::{corners, point_array, HarnessError};

#[derive(Debug, Serialize)]
pub struct SolidSummary {
    pub volume: f64,
    pub closed: bool,
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub bore_radii: Vec<f64>,
}

impl SolidSummary {
    fn collect(kernel: &MockKernel, solid: &SolidHandle) -> Result<Self, HarnessError> {
        let bb = kernel.solid_bounding_box(solid)?;
        let (min, max) = corners(&bb);
        Ok(Self {
            volume: kernel.solid_volume(solid)?,
            closed: kernel.is_closed_solid(solid)?,
            min,
            max,
            bore_radii: kernel.cut_records(solid).iter().map(|c| c.radius).collect(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CaseReport {
    pub shell: SolidSummary,
    pub neck: SolidSummary,
    pub pad: SolidSummary,
    pub weld_count: usize,
    pub reference_center: [f64; 3],
    pub pad_normal: [f64; 3],
}

impl CaseReport {
    pub fn collect(kernel: &MockKernel, result: &NozzleResult) -> Result<Self, HarnessError> {
        Ok(Self {
            shell: SolidSummary::collect(kernel, &result.shell)?,
            neck: SolidSummary::collect(kernel, &result.neck)?,
            pad: SolidSummary::collect(kernel, &result.pad)?,
            weld_count: result.welds.len(),
            reference_center: point_array(&result.reference_center),
            pad_normal: [
                result.pad_normal.x,
                result.pad_normal.y,
                result.pad_normal.z,
            ],
        })
    }

    pub fn to_json(&self) -> Result<String, HarnessError> {
        serde_json::to_string_pretty(self).map_err(|e| HarnessError::Report {
            message: e.to_string(),
        })
    }
}
