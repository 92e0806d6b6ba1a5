// vault-export - copy a note and its direct links into one flat directory
//
// This is the library crate containing the export pipeline and its data model.
// The binary crate (main.rs) provides the command-line entry point.

pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use models::{CopyPlan, ExportConfig, ExportRun, ExportSummary, LogSettings};
pub use services::{ExportError, Exporter};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
