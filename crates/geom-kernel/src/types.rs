use serde::{Deserialize, Serialize};

/// Opaque handle to a solid in the geometry kernel.
/// NEVER persisted. Valid only for the current kernel session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolidHandle(pub(crate) u64);

impl SolidHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

/// Opaque handle to a single boundary surface of a solid.
/// Stable within a kernel session, NOT across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub(crate) u64);

impl SurfaceHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

/// Broad classification of a boundary surface, used by the pipeline when
/// filtering "significant" surfaces for a geometric query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    Planar,
    Cylindrical,
    Spherical,
    /// General surface of revolution that is not a cylinder or sphere.
    Revolved,
    /// Side wall of a generic extrusion.
    Extruded,
    /// Fillet/chamfer strip between two surfaces.
    Fillet,
}

/// Result of a surface-to-surface chamfer request: the new fillet strip
/// surfaces plus whatever remains of each input after trimming.
#[derive(Debug, Clone, Default)]
pub struct ChamferOutcome {
    pub fillet_surfaces: Vec<SurfaceHandle>,
    pub leftover_a: Vec<SurfaceHandle>,
    pub leftover_b: Vec<SurfaceHandle>,
}

impl ChamferOutcome {
    pub fn is_empty(&self) -> bool {
        self.fillet_surfaces.is_empty()
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("curve offset failed: {reason}")]
    OffsetFailed { reason: String },

    #[error("extrusion failed: {reason}")]
    ExtrudeFailed { reason: String },

    #[error("revolve failed: {reason}")]
    RevolveFailed { reason: String },

    #[error("loft failed: {reason}")]
    LoftFailed { reason: String },

    #[error("entity not found: handle {id}")]
    EntityNotFound { id: u64 },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}
