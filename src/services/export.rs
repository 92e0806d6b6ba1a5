use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File, FileTimes};
use std::io;
use thiserror::Error;

use super::extractor::ReferenceExtractor;
use super::planner::CopyPlanner;
use super::resolver::PathResolver;
use crate::models::{CopyPlan, CopyPlanEntry, ExportConfig, ExportRun, FileRole, ResolvedFile};

/// Errors that can stop an export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Target file '{0}' does not exist.")]
    TargetNotFound(Utf8PathBuf),

    #[error("Target file '{0}' is not a markdown file.")]
    NotMarkdown(Utf8PathBuf),

    #[error("Failed to read target file '{path}'")]
    ReadTarget {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create output directory '{path}'")]
    CreateOutputDir {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{0}' would be copied onto itself")]
    SameFile(Utf8PathBuf),

    #[error("Failed to copy '{from}' to '{to}'")]
    Copy {
        from: Utf8PathBuf,
        to: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    /// Raised before anything touches the filesystem
    pub fn is_preflight(&self) -> bool {
        matches!(self, ExportError::TargetNotFound(_) | ExportError::NotMarkdown(_))
    }
}

/// Check that the target is an existing file with a `.md` extension (any case).
pub fn validate_target(target: &Utf8Path) -> Result<(), ExportError> {
    // a directory named `x.md` fails here, before anything is created
    if !target.is_file() {
        return Err(ExportError::TargetNotFound(target.to_path_buf()));
    }

    let is_markdown = target
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    if !is_markdown {
        return Err(ExportError::NotMarkdown(target.to_path_buf()));
    }

    Ok(())
}

/// Copy a file and carry over its access and modification times.
///
/// Times the platform cannot report are left as the copy set them.
pub fn copy_preserving_times(from: &Utf8Path, to: &Utf8Path) -> io::Result<u64> {
    let bytes = fs::copy(from, to)?;

    let metadata = fs::metadata(from)?;
    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    open_for_times(to)?.set_times(times)?;

    Ok(bytes)
}

/// Handle that may change timestamps even when the copy kept a read-only mode.
#[cfg(windows)]
fn open_for_times(path: &Utf8Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    const FILE_WRITE_ATTRIBUTES: u32 = 0x0100;
    fs::OpenOptions::new()
        .access_mode(FILE_WRITE_ATTRIBUTES)
        .open(path)
}

#[cfg(not(windows))]
fn open_for_times(path: &Utf8Path) -> io::Result<File> {
    File::open(path)
}

fn is_same_file(source: &Utf8Path, destination: &Utf8Path) -> bool {
    match (source.canonicalize_utf8(), destination.canonicalize_utf8()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Drives extraction, resolution, planning and copying for one note.
///
/// # Usage Example
///
/// ```no_run
/// use vault_export::models::ExportConfig;
/// use vault_export::services::Exporter;
///
/// let run = Exporter::new()
///     .run(&ExportConfig::new("vault/note.md", "out"))
///     .unwrap();
/// println!("{}", run.summary());
/// ```
pub struct Exporter {
    extractor: ReferenceExtractor,
}

impl Exporter {
    pub fn new() -> Self {
        Self {
            extractor: ReferenceExtractor::new(),
        }
    }

    pub fn run(&self, config: &ExportConfig) -> Result<ExportRun, ExportError> {
        let target_path = &config.target_file;
        validate_target(target_path)?;

        if !config.dry_run {
            fs::create_dir_all(&config.output_dir).map_err(|source| ExportError::CreateOutputDir {
                path: config.output_dir.clone(),
                source,
            })?;
        }

        let content = fs::read_to_string(target_path).map_err(|source| ExportError::ReadTarget {
            path: target_path.clone(),
            source,
        })?;

        let references = self.extractor.extract(&content);
        let base_dir = target_path.parent().unwrap_or(Utf8Path::new(""));
        let resolver = PathResolver::new(base_dir);

        let linked = resolver.resolve_all(&references.wiki_links);
        let assets = resolver.resolve_all(&references.markdown_links);
        if assets.remote_skipped > 0 {
            tracing::debug!("Skipped {} remote references", assets.remote_skipped);
        }

        let target = ResolvedFile::new(target_path.clone());
        let plan = CopyPlanner::plan(&target, &linked.files, &assets.files);

        let copied = if config.dry_run {
            0
        } else {
            copy_plan(&plan, &config.output_dir)?
        };

        let mut unresolved = linked.unresolved;
        unresolved.extend(assets.unresolved);

        Ok(ExportRun {
            target,
            output_dir: config.output_dir.clone(),
            linked_files: linked.files,
            assets: assets.files,
            unresolved,
            plan,
            copied,
            dry_run: config.dry_run,
        })
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy every planned entry in order; stops at the first failure.
///
/// Files copied before a failure are left in the output directory.
pub fn copy_plan(plan: &CopyPlan, output_dir: &Utf8Path) -> Result<usize, ExportError> {
    let mut copied = 0;
    for entry in plan.iter() {
        copy_entry(entry, output_dir)?;
        copied += 1;
    }
    Ok(copied)
}

fn copy_entry(entry: &CopyPlanEntry, output_dir: &Utf8Path) -> Result<(), ExportError> {
    let from = &entry.file.source;
    let to = entry.output_path(output_dir);

    if is_same_file(from, &to) {
        return Err(ExportError::SameFile(from.clone()));
    }

    copy_preserving_times(from, &to).map_err(|source| ExportError::Copy {
        from: from.clone(),
        to: to.clone(),
        source,
    })?;

    match entry.role {
        FileRole::Target => tracing::info!("Copied target file: {}", entry.output_name),
        role => tracing::info!(
            "Copied {}: {} as {}",
            role,
            entry.file.file_name,
            entry.output_name
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (temp_dir, root)
    }

    #[test]
    fn test_validate_missing_target() {
        let (_temp_dir, root) = temp_root();
        let err = validate_target(&root.join("nope.md")).unwrap_err();
        assert!(matches!(err, ExportError::TargetNotFound(_)));
        assert!(err.is_preflight());
        assert!(err.to_string().ends_with("does not exist."));
    }

    #[test]
    fn test_validate_extension_case_insensitive() {
        let (_temp_dir, root) = temp_root();
        fs::write(root.join("upper.MD"), "x").unwrap();
        fs::write(root.join("plain.txt"), "x").unwrap();

        assert!(validate_target(&root.join("upper.MD")).is_ok());
        let err = validate_target(&root.join("plain.txt")).unwrap_err();
        assert!(matches!(err, ExportError::NotMarkdown(_)));
    }

    #[test]
    fn test_copy_preserves_content_and_mtime() {
        let (_temp_dir, root) = temp_root();
        let from = root.join("src.txt");
        let to = root.join("dst.txt");
        fs::write(&from, "hello").unwrap();

        let old = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000_000);
        fs::OpenOptions::new()
            .write(true)
            .open(&from)
            .unwrap()
            .set_modified(old)
            .unwrap();

        let bytes = copy_preserving_times(&from, &to).unwrap();
        assert_eq!(bytes, 5);
        assert_eq!(fs::read_to_string(&to).unwrap(), "hello");
        assert_eq!(fs::metadata(&to).unwrap().modified().unwrap(), old);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_read_only_source() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp_dir, root) = temp_root();
        let vault = root.join("vault");
        fs::create_dir_all(vault.join("images")).unwrap();
        fs::write(vault.join("note.md"), "![img](images/pic.png)").unwrap();
        let pic = vault.join("images/pic.png");
        fs::write(&pic, "png").unwrap();

        let old = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_500_000_000);
        File::options().write(true).open(&pic).unwrap().set_modified(old).unwrap();
        fs::set_permissions(&pic, fs::Permissions::from_mode(0o444)).unwrap();

        let out = root.join("out");
        let run = Exporter::new()
            .run(&ExportConfig::new(vault.join("note.md"), out.clone()))
            .unwrap();

        assert_eq!(run.copied, 2);
        let copy = out.join("pic.png");
        assert_eq!(fs::read_to_string(&copy).unwrap(), "png");
        let metadata = fs::metadata(&copy).unwrap();
        assert!(metadata.permissions().readonly());
        assert_eq!(metadata.modified().unwrap(), old);
    }

    #[test]
    fn test_directory_named_like_markdown_is_rejected() {
        let (_temp_dir, root) = temp_root();
        fs::create_dir_all(root.join("folder.md")).unwrap();
        let out = root.join("out");

        let err = Exporter::new()
            .run(&ExportConfig::new(root.join("folder.md"), out.clone()))
            .unwrap_err();

        assert!(err.is_preflight());
        assert!(!out.exists());
    }

    #[test]
    fn test_copy_onto_itself_is_refused() {
        let (_temp_dir, root) = temp_root();
        fs::write(root.join("note.md"), "body").unwrap();

        let config = ExportConfig::new(root.join("note.md"), root.clone());
        let err = Exporter::new().run(&config).unwrap_err();

        assert!(matches!(err, ExportError::SameFile(_)));
        assert_eq!(fs::read_to_string(root.join("note.md")).unwrap(), "body");
    }

    #[test]
    fn test_dry_run_creates_nothing() {
        let (_temp_dir, root) = temp_root();
        fs::write(root.join("note.md"), "[[Other]]").unwrap();
        fs::write(root.join("Other.md"), "other").unwrap();
        let out = root.join("out");

        let run = Exporter::new()
            .run(&ExportConfig::new(root.join("note.md"), out.clone()).dry_run(true))
            .unwrap();

        assert!(!out.exists());
        assert_eq!(run.copied, 0);
        assert_eq!(run.plan.len(), 2);
        assert_eq!(run.summary().total, 2);
    }
}
