//! Path resolution for extracted references.
//!
//! A reference resolves by trying an ordered list of candidate paths and
//! taking the first that names an existing regular file:
//! 1. the string as written (absolute, or relative to the working directory)
//! 2. the string joined onto the base directory (the target note's folder)
//!
//! Wiki-link targets get `.md` appended first unless they already end in it
//! (any case). Image and link urls with a remote scheme are skipped without a
//! warning.

use camino::{Utf8Path, Utf8PathBuf};

use crate::models::{Reference, ResolvedFile, UnresolvedReference};

/// Schemes that mark a markdown url as out of scope.
pub const REMOTE_SCHEMES: [&str; 3] = ["http://", "https://", "ftp://"];

/// Filesystem check used by the resolver.
#[cfg_attr(test, mockall::automock)]
pub trait FileProbe {
    /// True when `path` exists and is a regular file (symlinks followed).
    fn is_file(&self, path: &Utf8Path) -> bool;
}

/// [`FileProbe`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn is_file(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }
}

/// Outcome of resolving one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedFile),
    /// Remote url, ignored silently
    Remote,
    Unresolved(UnresolvedReference),
}

/// Resolved files and warnings from a batch of references, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionOutcome {
    pub files: Vec<ResolvedFile>,
    pub unresolved: Vec<UnresolvedReference>,
    pub remote_skipped: usize,
}

pub fn is_remote(raw: &str) -> bool {
    REMOTE_SCHEMES.iter().any(|scheme| raw.starts_with(scheme))
}

/// Append `.md` unless the target already ends with it, ignoring case.
pub fn with_markdown_extension(target: &str) -> String {
    if target.to_lowercase().ends_with(".md") {
        target.to_string()
    } else {
        format!("{}.md", target)
    }
}

pub struct PathResolver<P: FileProbe = FsProbe> {
    base_dir: Utf8PathBuf,
    probe: P,
}

impl PathResolver<FsProbe> {
    pub fn new(base_dir: impl Into<Utf8PathBuf>) -> Self {
        Self::with_probe(base_dir, FsProbe)
    }
}

impl<P: FileProbe> PathResolver<P> {
    pub fn with_probe(base_dir: impl Into<Utf8PathBuf>, probe: P) -> Self {
        Self {
            base_dir: base_dir.into(),
            probe,
        }
    }

    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Candidate paths for `candidate`, in the order they are tried.
    pub fn candidates(&self, candidate: &str) -> [Utf8PathBuf; 2] {
        [Utf8PathBuf::from(candidate), self.base_dir.join(candidate)]
    }

    /// First candidate that is an existing regular file.
    pub fn locate(&self, candidate: &str) -> Option<Utf8PathBuf> {
        self.candidates(candidate).into_iter().find(|path| {
            let found = self.probe.is_file(path);
            tracing::debug!("Probing {} -> {}", path, found);
            found
        })
    }

    pub fn resolve(&self, reference: &Reference) -> Resolution {
        let candidate = if reference.kind.is_wiki_link() {
            with_markdown_extension(&reference.raw)
        } else if is_remote(&reference.raw) {
            tracing::debug!("Skipping remote {}: {}", reference.kind, reference.raw);
            return Resolution::Remote;
        } else {
            reference.raw.clone()
        };

        match self.locate(&candidate) {
            Some(path) => Resolution::Resolved(ResolvedFile::new(path)),
            None => Resolution::Unresolved(UnresolvedReference {
                candidate,
                kind: reference.kind,
            }),
        }
    }

    /// Resolve a batch, warning once per reference that could not be found.
    pub fn resolve_all(&self, references: &[Reference]) -> ResolutionOutcome {
        let mut outcome = ResolutionOutcome::default();

        for reference in references {
            match self.resolve(reference) {
                Resolution::Resolved(file) => outcome.files.push(file),
                Resolution::Remote => outcome.remote_skipped += 1,
                Resolution::Unresolved(missing) => {
                    tracing::warn!("{}", missing);
                    outcome.unresolved.push(missing);
                }
            }
        }

        outcome
    }
}
