use std::fmt;

/// Syntax a reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// `[[target]]` or `[[target|display]]`
    WikiLink,
    /// `![alt](url)`
    Image,
    /// `[text](url)` not preceded by `!`
    Link,
}

impl ReferenceKind {
    /// Wiki-links name notes; images and plain links name assets.
    pub fn is_wiki_link(self) -> bool {
        matches!(self, ReferenceKind::WikiLink)
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReferenceKind::WikiLink => "wiki-link",
            ReferenceKind::Image => "image",
            ReferenceKind::Link => "link",
        };
        f.write_str(label)
    }
}

/// A raw reference captured from a markdown document.
///
/// Only `raw` takes part in resolution. `display` holds the wiki-link alias or
/// the bracketed alt/link text and is kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub raw: String,
    pub kind: ReferenceKind,
    pub display: Option<String>,
    /// Byte offset of the match start in the source text
    pub offset: usize,
}

impl Reference {
    pub fn new(raw: impl Into<String>, kind: ReferenceKind, offset: usize) -> Self {
        Self {
            raw: raw.into(),
            kind,
            display: None,
            offset,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

/// Output of one extraction pass over a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedReferences {
    /// Wiki-link targets in source order
    pub wiki_links: Vec<Reference>,
    /// Image and plain-link urls in source order
    pub markdown_links: Vec<Reference>,
}

impl ExtractedReferences {
    pub fn is_empty(&self) -> bool {
        self.wiki_links.is_empty() && self.markdown_links.is_empty()
    }

    pub fn len(&self) -> usize {
        self.wiki_links.len() + self.markdown_links.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_with_display() {
        let reference = Reference::new("Other Note", ReferenceKind::WikiLink, 4).with_display("alias");
        assert_eq!(reference.raw, "Other Note");
        assert_eq!(reference.display.as_deref(), Some("alias"));
        assert!(reference.kind.is_wiki_link());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ReferenceKind::WikiLink.to_string(), "wiki-link");
        assert_eq!(ReferenceKind::Image.to_string(), "image");
        assert!(!ReferenceKind::Link.is_wiki_link());
    }
}
