//! Services module - the export pipeline.
//!
//! Data flows one way through four components:
//!
//! - [`ReferenceExtractor`]: regex matchers that pull wiki-link targets and
//!   image/link urls out of markdown text
//! - [`PathResolver`]: maps each reference to an existing file, trying the
//!   string as written and then relative to the note's folder
//! - [`CopyPlanner`]: assigns flat output names, renaming collisions once with
//!   the parent directory name
//! - [`Exporter`]: validates the target, runs the stages above and copies the
//!   planned files
//!
//! Everything is synchronous and single-threaded. Only direct links of the
//! target note are followed; linked notes are copied but not scanned.
//!
//! # Usage Example
//!
//! ```ignore
//! use vault_export::services::{CopyPlanner, PathResolver, ReferenceExtractor};
//!
//! let refs = ReferenceExtractor::new().extract(&content);
//! let resolver = PathResolver::new("vault");
//! let linked = resolver.resolve_all(&refs.wiki_links);
//! let assets = resolver.resolve_all(&refs.markdown_links);
//! let plan = CopyPlanner::plan(&target, &linked.files, &assets.files);
//! ```

pub mod export;
pub mod extractor;
pub mod planner;
pub mod resolver;

pub use export::{ExportError, Exporter, copy_plan, copy_preserving_times, validate_target};
pub use extractor::ReferenceExtractor;
pub use planner::{CopyPlanner, disambiguate};
pub use resolver::{
    FileProbe, FsProbe, PathResolver, REMOTE_SCHEMES, Resolution, ResolutionOutcome, is_remote,
    with_markdown_extension,
};
