//! Assertion helpers with diagnostic output.
//!
//! Every failure message carries the scenario context and the expected
//! vs actual values, so a failing end-to-end run points at the stage
//! that drifted without rerunning under a debugger.

use geom_kernel::{KernelProbe, MockKernel, SolidHandle};

use crate::helpers::{point_array, HarnessError};

/// Assert the solid's bounding box corners within a tolerance.
pub fn assert_bounding_box(
    probe: &dyn KernelProbe,
    solid: &SolidHandle,
    expected_min: [f64; 3],
    expected_max: [f64; 3],
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let bb = probe.solid_bounding_box(solid)?;
    let (actual_min, actual_max) = (point_array(&bb.min), point_array(&bb.max));
    for i in 0..3 {
        if (actual_min[i] - expected_min[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box min[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_min[i], actual_min[i], tol,
                ),
            });
        }
        if (actual_max[i] - expected_max[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box max[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_max[i], actual_max[i], tol,
                ),
            });
        }
    }
    Ok(())
}

/// Assert the solid is topologically closed.
pub fn assert_closed_solid(
    probe: &dyn KernelProbe,
    solid: &SolidHandle,
    ctx: &str,
) -> Result<(), HarnessError> {
    if probe.is_closed_solid(solid)? {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{}] solid is not closed", ctx),
        })
    }
}

/// Assert the solid's volume within a tolerance.
pub fn assert_volume(
    probe: &dyn KernelProbe,
    solid: &SolidHandle,
    expected: f64,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = probe.solid_volume(solid)?;
    if (actual - expected).abs() <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] volume: expected {:.4}, got {:.4} (tol={})",
                ctx, expected, actual, tol,
            ),
        })
    }
}

/// Assert a single bore of the expected radius was punched through the
/// solid. Relies on the mock kernel's cut records.
pub fn assert_cut_radius(
    kernel: &MockKernel,
    solid: &SolidHandle,
    expected: f64,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let cuts = kernel.cut_records(solid);
    if cuts.len() != 1 {
        return Err(HarnessError::AssertionFailed {
            detail: format!("[{}] expected exactly one bore, got {}", ctx, cuts.len()),
        });
    }
    let actual = cuts[0].radius;
    if (actual - expected).abs() <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] bore radius: expected {:.4}, got {:.4} (tol={})",
                ctx, expected, actual, tol,
            ),
        })
    }
}
