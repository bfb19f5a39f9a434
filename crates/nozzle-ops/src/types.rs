use geom_kernel::{GeometryKernel, KernelError, KernelProbe};

/// Both kernel traits behind one object. Stage functions take
/// `&mut dyn KernelBundle` and reborrow it immutably through `as_probe`
/// for the queries between mutations.
pub trait KernelBundle: GeometryKernel + KernelProbe {
    fn as_probe(&self) -> &dyn KernelProbe;
}

impl<T: GeometryKernel + KernelProbe> KernelBundle for T {
    fn as_probe(&self) -> &dyn KernelProbe {
        self
    }
}

/// Errors raised while building nozzle geometry.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// The neck never produces a usable opening on the shell wall.
    #[error("degenerate neck/shell intersection: {reason}")]
    DegenerateIntersection { reason: String },

    /// A trim consumed the whole body even though the tool overlaps it,
    /// so no piece can be picked with confidence.
    #[error("ambiguous trim: {reason}")]
    AmbiguousTrim { reason: String },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}

impl BuildError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        BuildError::InvalidParameter {
            reason: reason.into(),
        }
    }
}
