//! Scenario driver over the mock kernel.

use geom_kernel::MockKernel;
use nozzle_pipeline::{run_case, CaseParameters, CasePreset, NozzleResult};

use crate::helpers::HarnessError;

/// Runs cases against a fresh [`MockKernel`] and keeps the kernel
/// around so scenarios can interrogate the bodies afterwards.
pub struct CaseRunner {
    pub kernel: MockKernel,
}

impl CaseRunner {
    pub fn new() -> Self {
        Self {
            kernel: MockKernel::new(),
        }
    }

    pub fn run(&mut self, params: &CaseParameters) -> Result<NozzleResult, HarnessError> {
        Ok(run_case(&mut self.kernel, params)?)
    }

    pub fn run_preset(&mut self, preset: CasePreset) -> Result<NozzleResult, HarnessError> {
        self.run(&preset.parameters())
    }
}

impl Default for CaseRunner {
    fn default() -> Self {
        Self::new()
    }
}
