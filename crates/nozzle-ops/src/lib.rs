//! Modeling stages for building a nozzle attachment on a vessel shell.
//!
//! Each stage is a free function over a [`KernelBundle`], taking the
//! previous stage's output and returning kernel handles. The stages are
//! deliberately independent of any particular kernel: everything they
//! know about geometry goes through the [`geom_kernel`] traits, so the
//! whole pipeline runs unchanged against the mock kernel in tests.

pub mod boolean;
pub mod frame;
pub mod intersect;
pub mod neck;
pub mod pad;
pub mod rank;
pub mod shell_offset;
pub mod types;
pub mod weld;

pub use boolean::{punch_cut, trim_solid};
pub use frame::{derive_attachment_frame, AttachmentFrame, NormalConvention};
pub use intersect::{find_center, resolve_intersections, IntersectSpec, IntersectionOutcome, WallLoop};
pub use neck::{build_neck, NeckParts, NeckSpec};
pub use pad::{build_pad, PadSpec, PadStyle};
pub use rank::KeepSide;
pub use shell_offset::build_offset_shell;
pub use types::{BuildError, KernelBundle};
pub use weld::{SolidWeldStrategy, SurfaceWeldStrategy, WeldStrategy};
