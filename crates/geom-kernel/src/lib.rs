//! Capability traits over an external solid-modeling kernel, plus a
//! deterministic mock used throughout the test suites.
//!
//! The nozzle pipeline never talks to a concrete kernel type; it is
//! written against [`GeometryKernel`] for modeling operations and
//! [`KernelProbe`] for read-only interrogation, so a production kernel
//! binding and the in-process [`MockKernel`] are interchangeable.

pub mod connect;
pub mod mock;
pub mod traits;
pub mod types;

pub use connect::connect_curves;
pub use mock::{CutRecord, MockKernel};
pub use traits::{GeometryKernel, KernelProbe};
pub use types::{ChamferOutcome, KernelError, SolidHandle, SurfaceHandle, SurfaceKind};
