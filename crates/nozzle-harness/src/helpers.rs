//! Harness error type and small shared helpers.

use geom_kernel::KernelError;
use nozzle_pipeline::PipelineError;
use vessel_types::{BoundingBox, Point3d};

/// Unified error type for the scenario harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("report error: {message}")]
    Report { message: String },
}

/// Corner pair of a bounding box as plain arrays, for expected-value
/// tables in scenarios.
pub fn corners(bb: &BoundingBox) -> ([f64; 3], [f64; 3]) {
    (point_array(&bb.min), point_array(&bb.max))
}

pub fn point_array(p: &Point3d) -> [f64; 3] {
    [p.x, p.y, p.z]
}
