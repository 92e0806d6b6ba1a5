use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

use super::ReferenceKind;

/// A reference that mapped to an existing regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Path as it was found: as written, or joined onto the base directory
    pub source: Utf8PathBuf,
    pub file_name: String,
    /// Name of the containing directory, used only to disambiguate collisions
    pub parent_dir_name: String,
}

impl ResolvedFile {
    pub fn new(source: impl Into<Utf8PathBuf>) -> Self {
        let source = source.into();
        let file_name = source.file_name().unwrap_or_default().to_string();
        let parent_dir_name = parent_dir_name(&source);

        Self {
            source,
            file_name,
            parent_dir_name,
        }
    }
}

/// Last component of the file's parent directory.
///
/// A bare filename has an empty lexical parent; the working directory's real
/// name is used then, or an empty string if it cannot be determined.
fn parent_dir_name(path: &Utf8Path) -> String {
    let Some(parent) = path.parent() else {
        return String::new();
    };

    if let Some(name) = parent.file_name() {
        return name.to_string();
    }

    let lookup = if parent.as_str().is_empty() {
        Utf8Path::new(".")
    } else {
        parent
    };

    lookup
        .canonicalize_utf8()
        .ok()
        .and_then(|dir| dir.file_name().map(str::to_string))
        .unwrap_or_default()
}

/// A reference that could not be mapped to a file, reported as a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// Candidate string that was tried (wiki-links carry the `.md` suffix)
    pub candidate: String,
    pub kind: ReferenceKind,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_wiki_link() {
            write!(f, "Linked file '{}' not found", self.candidate)
        } else {
            write!(f, "Referenced asset '{}' not found", self.candidate)
        }
    }
}

/// Why a file is part of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    Target,
    Linked,
    Asset,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileRole::Target => "target file",
            FileRole::Linked => "linked file",
            FileRole::Asset => "asset",
        };
        f.write_str(label)
    }
}

/// One planned copy: a source file and the name it gets in the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlanEntry {
    pub file: ResolvedFile,
    pub role: FileRole,
    pub output_name: String,
    /// Output name differs from the original filename
    pub renamed: bool,
    /// Disambiguated name was already claimed; this entry replaces the earlier file
    pub overwrites_earlier: bool,
}

impl CopyPlanEntry {
    pub fn output_path(&self, output_dir: &Utf8Path) -> Utf8PathBuf {
        output_dir.join(&self.output_name)
    }
}

/// Ordered copy plan: target first, then linked files, then assets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyPlan {
    pub entries: Vec<CopyPlanEntry>,
}

impl CopyPlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CopyPlanEntry> {
        self.entries.iter()
    }

    pub fn output_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.output_name.as_str()).collect()
    }

    pub fn count(&self, role: FileRole) -> usize {
        self.entries.iter().filter(|e| e.role == role).count()
    }
}

/// Everything one invocation produced.
#[derive(Debug, Clone)]
pub struct ExportRun {
    pub target: ResolvedFile,
    pub output_dir: Utf8PathBuf,
    pub linked_files: Vec<ResolvedFile>,
    pub assets: Vec<ResolvedFile>,
    pub unresolved: Vec<UnresolvedReference>,
    pub plan: CopyPlan,
    /// Files physically written; zero on a dry run
    pub copied: usize,
    pub dry_run: bool,
}

impl ExportRun {
    pub fn summary(&self) -> ExportSummary {
        ExportSummary {
            target_files: 1,
            linked_files: self.linked_files.len(),
            assets: self.assets.len(),
            total: if self.dry_run { self.plan.len() } else { self.copied },
        }
    }
}

/// Final tally printed after a successful export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub target_files: usize,
    pub linked_files: usize,
    pub assets: usize,
    pub total: usize,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Export complete!")?;
        writeln!(f, "- Target file: {}", self.target_files)?;
        writeln!(f, "- Linked files: {}", self.linked_files)?;
        writeln!(f, "- Assets: {}", self.assets)?;
        write!(f, "- Total files copied: {}", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_file_names() {
        let file = ResolvedFile::new("vault/images/pic.png");
        assert_eq!(file.file_name, "pic.png");
        assert_eq!(file.parent_dir_name, "images");
    }

    #[test]
    fn test_bare_filename_uses_working_directory_name() {
        let file = ResolvedFile::new("note.md");
        let cwd = std::env::current_dir().unwrap();
        let expected = cwd.file_name().unwrap().to_str().unwrap();
        assert_eq!(file.parent_dir_name, expected);
    }

    #[test]
    fn test_unresolved_messages() {
        let wiki = UnresolvedReference {
            candidate: "Missing Page.md".to_string(),
            kind: ReferenceKind::WikiLink,
        };
        assert_eq!(wiki.to_string(), "Linked file 'Missing Page.md' not found");

        let asset = UnresolvedReference {
            candidate: "img/gone.png".to_string(),
            kind: ReferenceKind::Image,
        };
        assert_eq!(asset.to_string(), "Referenced asset 'img/gone.png' not found");
    }

    #[test]
    fn test_summary_display() {
        let summary = ExportSummary {
            target_files: 1,
            linked_files: 1,
            assets: 1,
            total: 3,
        };
        let text = summary.to_string();
        assert!(text.starts_with("Export complete!"));
        assert!(text.contains("- Linked files: 1"));
        assert!(text.ends_with("- Total files copied: 3"));
    }
}
