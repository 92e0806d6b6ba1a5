//! Data models for vault-export.
//!
//! Every value here lives for one export run and flows one way through the
//! services:
//! - [`Reference`]: raw link text captured by the extractor
//! - [`ResolvedFile`] / [`UnresolvedReference`]: outcome of path resolution
//! - [`CopyPlan`]: output names chosen by the flat copy planner
//! - [`ExportRun`] / [`ExportSummary`]: what the orchestrator reports back
//! - [`ExportConfig`] / [`LogSettings`]: settings parsed from the command line

pub mod config;
pub mod export;
pub mod reference;

pub use config::{ExportConfig, LogLevel, LogSettings};
pub use export::{
    CopyPlan, CopyPlanEntry, ExportRun, ExportSummary, FileRole, ResolvedFile, UnresolvedReference,
};
pub use reference::{ExtractedReferences, Reference, ReferenceKind};
