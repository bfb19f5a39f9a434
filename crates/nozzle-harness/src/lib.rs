//! Scenario harness for the nozzle pipeline.
//!
//! - [`CaseRunner`] — drives cases against the mock kernel
//! - [`assertions`] — assertion helpers with diagnostic messages
//! - [`report`] — JSON case summaries for failing runs
//! - [`helpers`] — the shared [`HarnessError`] and small conversions

pub mod assertions;
pub mod helpers;
pub mod report;
pub mod runner;

pub use helpers::HarnessError;
pub use report::CaseReport;
pub use runner::CaseRunner;
